//! End-to-end chart computation through the public API: known positions,
//! error ordering, retries and the time-unknown path.

use std::sync::atomic::{AtomicU32, Ordering};

use kundali_base::{BaseError, Graha, Rashi};
use kundali_engine::{
    AnalyticEphemeris, ChartError, ChartOptions, ChartReport, EphemerisProvider, ProviderError,
    RawPosition, RetryPolicy, compute_chart, dasha_tree, strength, yogas,
};
use kundali_time::{CivilDate, GeoLocation, Instant, TimeOfDay, UtcOffset};

fn j2000_delhi() -> Instant {
    Instant::new(
        CivilDate::new(2000, 1, 1).unwrap(),
        Some(TimeOfDay::new(12, 0, 0.0).unwrap()),
        UtcOffset::from_hours(0.0).unwrap(),
        GeoLocation::new(28.61, 77.21).unwrap(),
    )
}

fn fast_retry(max_attempts: u32) -> RetryPolicy {
    RetryPolicy {
        max_attempts,
        initial_backoff_ms: 0,
        max_backoff_ms: 0,
        multiplier: 1.0,
    }
}

/// Counts calls and fails the first `failures` of them.
struct FlakyProvider {
    inner: AnalyticEphemeris,
    failures: u32,
    calls: AtomicU32,
}

impl FlakyProvider {
    fn new(failures: u32) -> Self {
        Self {
            inner: AnalyticEphemeris::default(),
            failures,
            calls: AtomicU32::new(0),
        }
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl EphemerisProvider for FlakyProvider {
    fn positions(&self, jd_tt: f64, bodies: &[Graha]) -> Result<Vec<RawPosition>, ProviderError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if n < self.failures {
            return Err(ProviderError::Unavailable(format!("attempt {n} refused")));
        }
        self.inner.positions(jd_tt, bodies)
    }

    fn supported_range(&self) -> (f64, f64) {
        self.inner.supported_range()
    }

    fn version(&self) -> String {
        format!("flaky/{}", self.inner.version())
    }
}

/// Sun near 280.4 tropical at J2000 lands in sidereal Dhanu under Lahiri;
/// the Moon near 223 tropical lands in Tula.
#[test]
fn j2000_luminaries() {
    let chart = compute_chart(
        &AnalyticEphemeris::default(),
        &RetryPolicy::NONE,
        &j2000_delhi(),
        &ChartOptions::default(),
    )
    .unwrap();
    let sun = chart.body(Graha::Surya);
    assert!((sun.tropical_longitude_deg - 280.37).abs() < 0.05, "{}", sun.tropical_longitude_deg);
    assert_eq!(sun.rashi, Rashi::Dhanu);
    let moon = chart.body(Graha::Chandra);
    assert!((moon.tropical_longitude_deg - 223.32).abs() < 0.3, "{}", moon.tropical_longitude_deg);
    assert_eq!(moon.rashi, Rashi::Tula);
    assert!(!chart.approximate);
}

/// Rahu and Ketu stay exactly opposite and are reported retrograde.
#[test]
fn nodes_are_opposite() {
    let chart = compute_chart(
        &AnalyticEphemeris::default(),
        &RetryPolicy::NONE,
        &j2000_delhi(),
        &ChartOptions::default(),
    )
    .unwrap();
    let rahu = chart.body(Graha::Rahu);
    let ketu = chart.body(Graha::Ketu);
    let diff = (ketu.sidereal_longitude_deg - rahu.sidereal_longitude_deg).rem_euclid(360.0);
    assert!((diff - 180.0).abs() < 1e-9);
    assert!(rahu.is_retrograde());
    assert_eq!(rahu.rashi.add(6), ketu.rashi);
}

/// Whole-sign house of each body is its sign counted from the lagna sign.
#[test]
fn whole_sign_houses_follow_lagna() {
    let chart = compute_chart(
        &AnalyticEphemeris::default(),
        &RetryPolicy::NONE,
        &j2000_delhi(),
        &ChartOptions::default(),
    )
    .unwrap();
    let lagna = kundali_base::rashi_of(chart.angles.ascendant_deg);
    for b in &chart.bodies {
        let expected = (b.rashi.index() + 12 - lagna.index()) % 12 + 1;
        assert_eq!(b.bhava, expected, "{:?}", b.graha);
    }
}

/// Unsupported options are rejected while parsing, so no provider is touched.
#[test]
fn unsupported_options_fail_before_ephemeris() {
    assert_eq!(
        ChartOptions::parse("lahiri", "whole_sign", &[1, 11]),
        Err(ChartError::UnsupportedDivision(11))
    );
    assert!(matches!(
        ChartOptions::parse("nonesuch", "whole_sign", &[1]),
        Err(ChartError::UnsupportedAyanamsha(_))
    ));
    assert!(matches!(
        ChartOptions::parse("lahiri", "koch", &[1]),
        Err(ChartError::UnsupportedHouseSystem(_))
    ));
}

/// An instant outside the provider range is an invalid request and never
/// reaches the provider.
#[test]
fn out_of_range_instant_is_invalid() {
    let provider = FlakyProvider::new(0);
    let far = Instant::new(
        CivilDate::new(1600, 1, 1).unwrap(),
        None,
        UtcOffset::from_hours(0.0).unwrap(),
        GeoLocation::new(0.0, 0.0).unwrap(),
    );
    let err = compute_chart(&provider, &fast_retry(3), &far, &ChartOptions::default()).unwrap_err();
    assert!(matches!(err, ChartError::InvalidInstant(_)), "{err:?}");
    assert_eq!(provider.calls(), 0);
}

/// Two refusals followed by success are absorbed by three attempts.
#[test]
fn transient_failures_are_retried() {
    let provider = FlakyProvider::new(2);
    let chart = compute_chart(&provider, &fast_retry(3), &j2000_delhi(), &ChartOptions::default()).unwrap();
    assert_eq!(provider.calls(), 3);
    assert!(chart.provider_version.starts_with("flaky/"));
}

/// A provider that never answers surfaces as CalculationUnavailable with
/// the attempt count.
#[test]
fn exhausted_retries_are_unavailable() {
    let provider = FlakyProvider::new(u32::MAX);
    let err = compute_chart(&provider, &fast_retry(4), &j2000_delhi(), &ChartOptions::default()).unwrap_err();
    match err {
        ChartError::CalculationUnavailable { attempts, .. } => assert_eq!(attempts, 4),
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(provider.calls(), 4);
}

/// Placidus has no cusps above the polar circle.
#[test]
fn placidus_fails_in_the_arctic() {
    let tromso = Instant::new(
        CivilDate::new(2000, 6, 21).unwrap(),
        Some(TimeOfDay::new(12, 0, 0.0).unwrap()),
        UtcOffset::from_hours(2.0).unwrap(),
        GeoLocation::new(69.65, 18.96).unwrap(),
    );
    let opts = ChartOptions::parse("lahiri", "placidus", &[1]).unwrap();
    let err = compute_chart(&AnalyticEphemeris::default(), &RetryPolicy::NONE, &tromso, &opts).unwrap_err();
    assert!(matches!(
        err,
        ChartError::Calculation(BaseError::HouseSystemUndefined { .. })
    ));
    let whole = ChartOptions::parse("lahiri", "whole_sign", &[1]).unwrap();
    assert!(compute_chart(&AnalyticEphemeris::default(), &RetryPolicy::NONE, &tromso, &whole).is_ok());
}

/// Without a birth time the chart is cast for local noon and everything
/// time-sensitive is tagged approximate in the report.
#[test]
fn unknown_time_is_tagged_approximate() {
    let noon = Instant::new(
        CivilDate::new(1985, 10, 3).unwrap(),
        None,
        UtcOffset::from_hours(5.5).unwrap(),
        GeoLocation::new(13.08, 80.27).unwrap(),
    );
    let chart = compute_chart(&AnalyticEphemeris::default(), &RetryPolicy::NONE, &noon, &ChartOptions::default()).unwrap();
    assert!(chart.approximate);

    let report = ChartReport::new(&chart);
    assert!(report.instant.time_unknown);
    assert!(report.ascendant.approximate);
    assert!(report.cusps.iter().all(|c| c.longitude.approximate));
    let sun = report.bodies.iter().find(|b| b.graha == Graha::Surya).unwrap();
    assert!(!sun.longitude.approximate);
    let moon = report.bodies.iter().find(|b| b.graha == Graha::Chandra).unwrap();
    assert!(moon.longitude.approximate);

    let json = report.to_json().unwrap();
    assert!(json.contains("\"approximate\": true"));
}

/// The four public operations chain together on one chart.
#[test]
fn operations_compose() {
    let inst = j2000_delhi();
    let opts = ChartOptions::parse("lahiri", "whole_sign", &[1, 9, 10, 60]).unwrap();
    let chart = compute_chart(&AnalyticEphemeris::default(), &RetryPolicy::NONE, &inst, &opts).unwrap();
    assert_eq!(chart.vargas.len(), 4);

    let start = inst.jd_ut();
    let tree = dasha_tree(chart.moon_sidereal_deg(), &inst, 2, start, start + 36_525.0).unwrap();
    let first = tree.roots().next().unwrap().period;
    assert_eq!(first.ruler, tree.balance.first_ruler());

    let s = strength(&chart);
    assert_eq!(s.shadbala.len(), 7);
    assert!(s.shadbala.iter().all(|e| e.total_shashtiamsas >= 0.0));
    assert_eq!(s.ashtakavarga.sarva.total(), 337);

    let found = yogas(&chart, &s);
    let report = ChartReport::new(&chart).with_dasha(&tree).with_strength(&s).with_yogas(found);
    assert!(report.to_json().is_ok());
}
