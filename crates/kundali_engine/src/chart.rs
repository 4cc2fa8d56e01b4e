//! The chart pipeline: instant -> positions -> houses -> vargas -> aspects.

use kundali_base::amsha::{AmshaChart, amsha_chart};
use kundali_base::drishti::{AspectRecord, aspect_table};
use kundali_base::nakshatra::{Nakshatra, nakshatra_position};
use kundali_base::rashi::{Rashi, rashi_position};
use kundali_base::{
    ALL_GRAHAS, BhavaSet, Dignity, Graha, MeridianAngles, PairRelation, SAPTA_GRAHAS,
    ayanamsha_deg, compute_bhavas, dignity, normalize_360, relationship_table, sidereal_longitude,
};
use kundali_frames::{ascendant_deg, ecliptic_to_equatorial, mean_obliquity_deg, midheaven_deg, nutation};
use kundali_time::{Instant, julian_centuries};
use serde::Serialize;
use tracing::{debug, info_span};

use crate::ephemeris::{EphemerisProvider, RawPosition};
use crate::error::ChartError;
use crate::options::ChartOptions;
use crate::retry::RetryPolicy;

/// Bodies requested from the provider; Ketu is derived.
const PROVIDER_BODIES: [Graha; 8] = [
    Graha::Surya,
    Graha::Chandra,
    Graha::Mangal,
    Graha::Buddh,
    Graha::Guru,
    Graha::Shukra,
    Graha::Shani,
    Graha::Rahu,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Motion {
    Direct,
    Retrograde,
    /// Exactly zero daily motion; not counted as retrograde.
    Stationary,
}

impl Motion {
    pub fn from_speed(speed_deg_per_day: f64) -> Self {
        if speed_deg_per_day < 0.0 {
            Self::Retrograde
        } else if speed_deg_per_day > 0.0 {
            Self::Direct
        } else {
            Self::Stationary
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BodyPosition {
    pub graha: Graha,
    pub tropical_longitude_deg: f64,
    pub sidereal_longitude_deg: f64,
    pub latitude_deg: f64,
    pub distance_au: f64,
    pub speed_deg_per_day: f64,
    pub motion: Motion,
    pub right_ascension_deg: f64,
    pub declination_deg: f64,
    pub rashi: Rashi,
    pub degrees_in_rashi: f64,
    pub nakshatra: Nakshatra,
    pub pada: u8,
    pub bhava: u8,
    /// `None` for the nodes.
    pub dignity: Option<Dignity>,
}

impl BodyPosition {
    pub fn is_retrograde(&self) -> bool {
        self.motion == Motion::Retrograde
    }
}

/// Horizon and meridian angles. Ecliptic longitudes are sidereal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Angles {
    pub ascendant_deg: f64,
    pub midheaven_deg: f64,
    pub ramc_deg: f64,
    pub obliquity_deg: f64,
}

/// A fully computed natal chart. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartResult {
    pub instant: Instant,
    pub options: ChartOptions,
    pub provider_version: String,
    pub ayanamsha_deg: f64,
    pub angles: Angles,
    /// All nine grahas in [`ALL_GRAHAS`] order.
    pub bodies: Vec<BodyPosition>,
    pub bhavas: BhavaSet,
    pub vargas: Vec<AmshaChart>,
    pub aspects: Vec<AspectRecord>,
    /// Natural, temporal and compound relation of each ordered pair among
    /// Sun..Saturn.
    pub relationships: Vec<PairRelation>,
    /// Birth time unknown: angles, houses and the Moon are approximate.
    pub approximate: bool,
}

impl ChartResult {
    pub fn body(&self, graha: Graha) -> &BodyPosition {
        &self.bodies[graha.index()]
    }

    pub fn moon_sidereal_deg(&self) -> f64 {
        self.body(Graha::Chandra).sidereal_longitude_deg
    }

    /// Sidereal longitudes of Sun..Saturn.
    pub fn sapta_longitudes(&self) -> [f64; 7] {
        std::array::from_fn(|i| self.bodies[i].sidereal_longitude_deg)
    }

    pub fn sapta_rashis(&self) -> [Rashi; 7] {
        std::array::from_fn(|i| self.bodies[i].rashi)
    }

    pub fn varga(&self, amsha: kundali_base::Amsha) -> Option<&AmshaChart> {
        self.vargas.iter().find(|v| v.amsha == amsha)
    }
}

/// Check that `instant` falls inside what `provider` can serve.
pub fn check_instant(provider: &dyn EphemerisProvider, instant: &Instant) -> Result<(), ChartError> {
    let jd = instant.jd_tt();
    let (start, end) = provider.supported_range();
    if !jd.is_finite() || jd < start || jd > end {
        return Err(ChartError::InvalidInstant(format!(
            "{instant} (JD TT {jd}) outside supported range [{start}, {end}]"
        )));
    }
    Ok(())
}

/// Compute a natal chart.
///
/// Options are already validated by construction; the instant is checked
/// against the provider range before the single batched ephemeris call.
pub fn compute_chart(
    provider: &dyn EphemerisProvider,
    retry: &RetryPolicy,
    instant: &Instant,
    options: &ChartOptions,
) -> Result<ChartResult, ChartError> {
    let _span = info_span!(
        "compute_chart",
        jd_ut = instant.jd_ut(),
        ayanamsha = options.ayanamsha.key(),
        houses = options.house_system.key(),
    )
    .entered();
    check_instant(provider, instant)?;

    let jd_tt = instant.jd_tt();
    let raw = retry.run(|| provider.positions(jd_tt, &PROVIDER_BODIES))?;
    let raw = order_positions(raw)?;

    let t = julian_centuries(jd_tt);
    let obliquity = mean_obliquity_deg(t) + nutation(t).obliquity_deg();
    let aya = ayanamsha_deg(options.ayanamsha, jd_tt);
    let location = instant.location();
    let ramc = instant.local_sidereal_time_deg();
    let asc = sidereal_longitude(ascendant_deg(ramc, location.latitude_deg, obliquity), aya);
    let mc = sidereal_longitude(midheaven_deg(ramc, obliquity), aya);
    assert!(asc.is_finite() && mc.is_finite(), "non-finite angles at {instant}");

    let meridian = MeridianAngles {
        mc_deg: mc,
        ramc_deg: ramc,
        latitude_deg: location.latitude_deg,
        obliquity_deg: obliquity,
        ayanamsha_deg: aya,
    };
    let bhavas = compute_bhavas(options.house_system, asc, Some(&meridian))?;

    let sidereal: [f64; 9] = std::array::from_fn(|i| sidereal_longitude(raw[i].longitude_deg, aya));
    let sapta_rashis: [Rashi; 7] = std::array::from_fn(|i| rashi_position(sidereal[i]).rashi);
    let bodies: Vec<BodyPosition> = ALL_GRAHAS
        .iter()
        .enumerate()
        .map(|(i, &graha)| {
            let r = &raw[i];
            let rp = rashi_position(sidereal[i]);
            let np = nakshatra_position(sidereal[i]);
            let eq = ecliptic_to_equatorial(r.longitude_deg, r.latitude_deg, obliquity);
            let standing = SAPTA_GRAHAS
                .contains(&graha)
                .then(|| dignity(graha, rp.rashi, Some(rp.degrees_in_rashi), &sapta_rashis));
            BodyPosition {
                graha,
                tropical_longitude_deg: r.longitude_deg,
                sidereal_longitude_deg: sidereal[i],
                latitude_deg: r.latitude_deg,
                distance_au: r.distance_au,
                speed_deg_per_day: r.speed_deg_per_day,
                motion: Motion::from_speed(r.speed_deg_per_day),
                right_ascension_deg: eq.right_ascension_deg,
                declination_deg: eq.declination_deg,
                rashi: rp.rashi,
                degrees_in_rashi: rp.degrees_in_rashi,
                nakshatra: np.nakshatra,
                pada: np.pada,
                bhava: bhavas.house_of(sidereal[i]),
                dignity: standing,
            }
        })
        .collect();

    let pairs: Vec<(Graha, f64)> = ALL_GRAHAS.iter().copied().zip(sidereal).collect();
    let vargas = options
        .divisions
        .iter()
        .map(|&amsha| amsha_chart(amsha, asc, &pairs))
        .collect();
    let placements: Vec<(Graha, Rashi)> = bodies.iter().map(|b| (b.graha, b.rashi)).collect();
    let aspects = aspect_table(&placements, &bhavas);
    let relationships = relationship_table(&sapta_rashis);

    debug!(ascendant = asc, ayanamsha = aya, "chart computed");
    Ok(ChartResult {
        instant: instant.clone(),
        options: options.clone(),
        provider_version: provider.version(),
        ayanamsha_deg: aya,
        angles: Angles {
            ascendant_deg: asc,
            midheaven_deg: mc,
            ramc_deg: ramc,
            obliquity_deg: obliquity,
        },
        bodies,
        bhavas,
        vargas,
        aspects,
        relationships,
        approximate: instant.is_approximate(),
    })
}

/// Put provider output in [`ALL_GRAHAS`] order and add Ketu opposite Rahu.
fn order_positions(raw: Vec<RawPosition>) -> Result<[RawPosition; 9], ChartError> {
    let find = |g: Graha| {
        raw.iter().find(|p| p.graha == g).copied().ok_or_else(|| ChartError::CalculationUnavailable {
            attempts: 1,
            reason: format!("provider omitted {g}"),
        })
    };
    let mut out = [find(Graha::Surya)?; 9];
    for (slot, g) in out.iter_mut().zip(PROVIDER_BODIES) {
        *slot = find(g)?;
    }
    let rahu = out[Graha::Rahu.index()];
    out[Graha::Ketu.index()] = RawPosition {
        graha: Graha::Ketu,
        longitude_deg: normalize_360(rahu.longitude_deg + 180.0),
        latitude_deg: -rahu.latitude_deg,
        distance_au: 0.0,
        speed_deg_per_day: rahu.speed_deg_per_day,
    };
    for p in &out {
        assert!(
            p.longitude_deg.is_finite() && p.latitude_deg.is_finite() && p.speed_deg_per_day.is_finite(),
            "non-finite position for {}",
            p.graha
        );
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn motion_classification() {
        assert_eq!(Motion::from_speed(0.3), Motion::Direct);
        assert_eq!(Motion::from_speed(-0.01), Motion::Retrograde);
        assert_eq!(Motion::from_speed(0.0), Motion::Stationary);
        assert_eq!(Motion::from_speed(-0.0), Motion::Stationary);
    }

    #[test]
    fn ketu_mirrors_rahu() {
        let raw: Vec<RawPosition> = PROVIDER_BODIES
            .iter()
            .enumerate()
            .map(|(i, &graha)| RawPosition {
                graha,
                longitude_deg: 10.0 * i as f64 + 5.0,
                latitude_deg: 0.0,
                distance_au: 1.0,
                speed_deg_per_day: -0.05,
            })
            .collect();
        let out = order_positions(raw).unwrap();
        assert_eq!(out[8].graha, Graha::Ketu);
        assert!((out[8].longitude_deg - (75.0 + 180.0)).abs() < 1e-12);
        assert_eq!(out[8].distance_au, 0.0);
    }

    #[test]
    fn missing_body_is_unavailable() {
        let err = order_positions(Vec::new()).unwrap_err();
        assert!(matches!(err, ChartError::CalculationUnavailable { .. }));
    }
}
