//! Weekday and hora lords around civil midnight and sunrise.
//!
//! Mumbai (72.82 E) sits west of the IST zone meridian (82.5 E), so local
//! solar midnight falls after civil midnight. In early January sunrise there
//! is close to 07:12 IST.

use kundali_base::Graha;
use kundali_engine::{AnalyticEphemeris, ChartOptions, RetryPolicy, compute_chart, strength};
use kundali_time::{CivilDate, GeoLocation, Instant, TimeOfDay, UtcOffset};

fn mumbai(day: u32, hour: u32, minute: u32) -> Instant {
    Instant::new(
        CivilDate::new(2000, 1, day).unwrap(),
        Some(TimeOfDay::new(hour, minute, 0.0).unwrap()),
        UtcOffset::from_hours(5.5).unwrap(),
        GeoLocation::new(18.96, 72.82).unwrap(),
    )
}

fn lords(instant: &Instant) -> (Graha, Graha) {
    let chart = compute_chart(
        &AnalyticEphemeris::default(),
        &RetryPolicy::NONE,
        instant,
        &ChartOptions::default(),
    )
    .unwrap();
    let kala = strength(&chart).kala;
    (kala.vara_lord, kala.hora_lord)
}

/// 2000-01-01 was a Saturday.
#[test]
fn evening_keeps_civil_weekday() {
    assert_eq!(lords(&mumbai(1, 23, 50)).0, Graha::Shani);
}

/// Past civil midnight but before solar midnight.
#[test]
fn before_solar_midnight_is_previous_day() {
    assert_eq!(lords(&mumbai(2, 0, 20)).0, Graha::Shani);
}

#[test]
fn after_solar_midnight_is_previous_day() {
    assert_eq!(lords(&mumbai(2, 1, 0)).0, Graha::Shani);
}

#[test]
fn just_before_sunrise_is_previous_day() {
    assert_eq!(lords(&mumbai(2, 6, 40)).0, Graha::Shani);
}

/// The Sunday begins at sunrise with the Sun's own hora.
#[test]
fn just_after_sunrise_starts_new_day() {
    assert_eq!(lords(&mumbai(2, 7, 45)), (Graha::Surya, Graha::Surya));
}

#[test]
fn weekday_is_stable_through_the_night() {
    let mut samples = Vec::new();
    for day in [1, 2] {
        let hours: Vec<u32> = if day == 1 { (19..24).collect() } else { (0..7).collect() };
        for hour in hours {
            for minute in [0, 20, 40] {
                samples.push(mumbai(day, hour, minute));
            }
        }
    }
    for instant in &samples {
        assert_eq!(lords(instant).0, Graha::Shani, "at {instant}");
    }
}
