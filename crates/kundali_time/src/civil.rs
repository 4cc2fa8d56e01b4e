//! Civil birth data and its normalization into an astronomical instant.
//!
//! A birth record is a local calendar date, an optional local clock time,
//! a UTC offset and a geographic position. [`Instant`] validates those
//! fields once and derives the UT/TT Julian Days and the local sidereal
//! time. An unknown clock time is replaced by local noon and the instant
//! is marked approximate; every house- or Ascendant-dependent value
//! computed from it inherits that flag.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::delta_t::ut_to_tt;
use crate::error::TimeError;
use crate::julian::{calendar_to_jd, days_in_month};
use crate::sidereal::local_sidereal_time_deg;

/// Earliest calendar year accepted (first full Gregorian year).
pub const MIN_YEAR: i32 = 1583;
/// Latest calendar year accepted.
pub const MAX_YEAR: i32 = 9999;
/// Largest UTC offset in use anywhere, in seconds (UTC+14).
pub const MAX_OFFSET_SECONDS: i32 = 14 * 3600;

/// A Gregorian calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CivilDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl CivilDate {
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self, TimeError> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(TimeError::invalid(format!(
                "year {year} outside {MIN_YEAR}..={MAX_YEAR}"
            )));
        }
        let last = days_in_month(year, month)
            .ok_or_else(|| TimeError::invalid(format!("month {month} outside 1..=12")))?;
        if day == 0 || day > last {
            return Err(TimeError::invalid(format!(
                "day {day} outside 1..={last} for {year}-{month:02}"
            )));
        }
        Ok(Self { year, month, day })
    }
}

impl Display for CivilDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// A local clock time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeOfDay {
    pub hour: u32,
    pub minute: u32,
    pub second: f64,
}

impl TimeOfDay {
    /// Local noon, the substitute for an unknown birth time.
    pub const NOON: Self = Self {
        hour: 12,
        minute: 0,
        second: 0.0,
    };

    pub fn new(hour: u32, minute: u32, second: f64) -> Result<Self, TimeError> {
        if hour > 23 || minute > 59 || !(0.0..60.0).contains(&second) {
            return Err(TimeError::invalid(format!(
                "time {hour:02}:{minute:02}:{second} is not a valid clock time"
            )));
        }
        Ok(Self {
            hour,
            minute,
            second,
        })
    }

    /// Fraction of the day elapsed since local midnight.
    pub fn day_fraction(&self) -> f64 {
        (f64::from(self.hour) * 3600.0 + f64::from(self.minute) * 60.0 + self.second) / 86_400.0
    }
}

impl Display for TimeOfDay {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hour,
            self.minute,
            self.second.floor() as u32
        )
    }
}

/// Offset of local civil time from UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UtcOffset {
    seconds: i32,
}

impl UtcOffset {
    pub const UTC: Self = Self { seconds: 0 };

    pub fn from_seconds(seconds: i32) -> Result<Self, TimeError> {
        if seconds.abs() > MAX_OFFSET_SECONDS {
            return Err(TimeError::UnresolvedTimezone(format!(
                "offset of {seconds} s exceeds ±14 h"
            )));
        }
        Ok(Self { seconds })
    }

    /// Offset from fractional hours, e.g. `5.5` for UTC+05:30.
    pub fn from_hours(hours: f64) -> Result<Self, TimeError> {
        if !hours.is_finite() {
            return Err(TimeError::UnresolvedTimezone(format!(
                "offset {hours} h is not a number"
            )));
        }
        Self::from_seconds((hours * 3600.0).round() as i32)
    }

    pub fn seconds(&self) -> i32 {
        self.seconds
    }

    pub fn hours(&self) -> f64 {
        f64::from(self.seconds) / 3600.0
    }
}

impl Display for UtcOffset {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let sign = if self.seconds < 0 { '-' } else { '+' };
        let abs = self.seconds.unsigned_abs();
        write!(f, "{sign}{:02}:{:02}", abs / 3600, (abs % 3600) / 60)
    }
}

/// Geographic position of the birth place. East longitude and north
/// latitude are positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
}

impl GeoLocation {
    pub fn new(latitude_deg: f64, longitude_deg: f64) -> Result<Self, TimeError> {
        if !(-90.0..=90.0).contains(&latitude_deg) {
            return Err(TimeError::invalid(format!(
                "latitude {latitude_deg} outside [-90, 90]"
            )));
        }
        if !(-180.0..=180.0).contains(&longitude_deg) {
            return Err(TimeError::invalid(format!(
                "longitude {longitude_deg} outside [-180, 180]"
            )));
        }
        Ok(Self {
            latitude_deg,
            longitude_deg,
        })
    }
}

/// Supplies the UTC offset in force at a place and local time.
///
/// Real deployments back this with a timezone database; the engine only
/// depends on the trait.
pub trait TimezoneResolver {
    fn resolve(
        &self,
        date: &CivilDate,
        time: &TimeOfDay,
        location: &GeoLocation,
    ) -> Result<UtcOffset, TimeError>;
}

/// Always returns the same offset.
#[derive(Debug, Clone, Copy)]
pub struct FixedOffsetResolver(pub UtcOffset);

impl TimezoneResolver for FixedOffsetResolver {
    fn resolve(&self, _: &CivilDate, _: &TimeOfDay, _: &GeoLocation) -> Result<UtcOffset, TimeError> {
        Ok(self.0)
    }
}

/// Local mean time: the offset is the longitude expressed in hours.
///
/// Appropriate for historical records kept before standard time zones.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalMeanTimeResolver;

impl TimezoneResolver for LocalMeanTimeResolver {
    fn resolve(
        &self,
        _: &CivilDate,
        _: &TimeOfDay,
        location: &GeoLocation,
    ) -> Result<UtcOffset, TimeError> {
        UtcOffset::from_seconds((location.longitude_deg * 240.0).round() as i32)
    }
}

/// A validated birth instant with its derived astronomical time scales.
///
/// Immutable once built; the Julian Days and sidereal time are computed
/// exactly once in the constructor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Instant {
    date: CivilDate,
    time: Option<TimeOfDay>,
    offset: UtcOffset,
    location: GeoLocation,
    jd_ut: f64,
    jd_tt: f64,
    local_sidereal_time_deg: f64,
    approximate: bool,
}

impl Instant {
    /// Build an instant from civil fields and a known UTC offset.
    ///
    /// `time = None` means the birth time is unknown: local noon is used
    /// and the instant is flagged approximate.
    pub fn new(
        date: CivilDate,
        time: Option<TimeOfDay>,
        offset: UtcOffset,
        location: GeoLocation,
    ) -> Self {
        let clock = time.unwrap_or(TimeOfDay::NOON);
        let local_jd = calendar_to_jd(date.year, date.month, f64::from(date.day))
            + clock.day_fraction();
        let jd_ut = local_jd - f64::from(offset.seconds()) / 86_400.0;
        let jd_tt = ut_to_tt(jd_ut);
        let lst = local_sidereal_time_deg(jd_ut, location.longitude_deg);
        Self {
            date,
            time,
            offset,
            location,
            jd_ut,
            jd_tt,
            local_sidereal_time_deg: lst,
            approximate: time.is_none(),
        }
    }

    /// Build an instant, asking `resolver` for the UTC offset.
    pub fn resolve(
        date: CivilDate,
        time: Option<TimeOfDay>,
        location: GeoLocation,
        resolver: &dyn TimezoneResolver,
    ) -> Result<Self, TimeError> {
        let clock = time.unwrap_or(TimeOfDay::NOON);
        let offset = resolver.resolve(&date, &clock, &location)?;
        Ok(Self::new(date, time, offset, location))
    }

    pub fn date(&self) -> CivilDate {
        self.date
    }

    /// Local clock time, `None` when unknown.
    pub fn time(&self) -> Option<TimeOfDay> {
        self.time
    }

    pub fn offset(&self) -> UtcOffset {
        self.offset
    }

    pub fn location(&self) -> GeoLocation {
        self.location
    }

    pub fn jd_ut(&self) -> f64 {
        self.jd_ut
    }

    pub fn jd_tt(&self) -> f64 {
        self.jd_tt
    }

    pub fn local_sidereal_time_deg(&self) -> f64 {
        self.local_sidereal_time_deg
    }

    /// True when the birth time was unknown and local noon was substituted.
    pub fn is_approximate(&self) -> bool {
        self.approximate
    }

    /// Julian Day of the birth on the local civil clock.
    pub fn local_civil_jd(&self) -> f64 {
        self.jd_ut + f64::from(self.offset.seconds()) / 86_400.0
    }

    /// Julian Day of local civil midnight starting the birth date.
    pub fn local_midnight_jd(&self) -> f64 {
        calendar_to_jd(self.date.year, self.date.month, f64::from(self.date.day))
    }
}

impl Display for Instant {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.time {
            Some(t) => write!(f, "{}T{}{}", self.date, t, self.offset),
            None => write!(f, "{} (time unknown){}", self.date, self.offset),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::julian::J2000_JD;

    fn greenwich() -> GeoLocation {
        GeoLocation::new(51.4769, 0.0).unwrap()
    }

    #[test]
    fn rejects_bad_calendar_fields() {
        assert!(CivilDate::new(2023, 2, 29).is_err());
        assert!(CivilDate::new(2024, 0, 1).is_err());
        assert!(CivilDate::new(1200, 1, 1).is_err());
        assert!(CivilDate::new(2024, 2, 29).is_ok());
    }

    #[test]
    fn rejects_bad_clock_and_place() {
        assert!(TimeOfDay::new(24, 0, 0.0).is_err());
        assert!(TimeOfDay::new(10, 60, 0.0).is_err());
        assert!(TimeOfDay::new(10, 0, 60.0).is_err());
        assert!(GeoLocation::new(91.0, 0.0).is_err());
        assert!(GeoLocation::new(0.0, -181.0).is_err());
    }

    #[test]
    fn offset_out_of_range_is_unresolved() {
        let err = UtcOffset::from_hours(15.0).unwrap_err();
        assert!(matches!(err, TimeError::UnresolvedTimezone(_)));
    }

    #[test]
    fn offset_display() {
        assert_eq!(UtcOffset::from_hours(5.5).unwrap().to_string(), "+05:30");
        assert_eq!(UtcOffset::from_hours(-3.75).unwrap().to_string(), "-03:45");
    }

    #[test]
    fn utc_noon_is_j2000() {
        let date = CivilDate::new(2000, 1, 1).unwrap();
        let time = TimeOfDay::new(12, 0, 0.0).unwrap();
        let inst = Instant::new(date, Some(time), UtcOffset::UTC, greenwich());
        assert!((inst.jd_ut() - J2000_JD).abs() < 1e-9);
        assert!(!inst.is_approximate());
        assert!(inst.jd_tt() > inst.jd_ut());
    }

    #[test]
    fn offset_shifts_to_ut() {
        let date = CivilDate::new(2000, 1, 1).unwrap();
        let time = TimeOfDay::new(17, 30, 0.0).unwrap();
        let ist = UtcOffset::from_hours(5.5).unwrap();
        let inst = Instant::new(date, Some(time), ist, greenwich());
        assert!((inst.jd_ut() - J2000_JD).abs() < 1e-9);
    }

    #[test]
    fn unknown_time_uses_local_noon() {
        let date = CivilDate::new(1990, 6, 15).unwrap();
        let offset = UtcOffset::from_hours(2.0).unwrap();
        let unknown = Instant::new(date, None, offset, greenwich());
        let noon = Instant::new(date, Some(TimeOfDay::NOON), offset, greenwich());
        assert!(unknown.is_approximate());
        assert_eq!(unknown.jd_ut(), noon.jd_ut());
        assert_eq!(unknown.local_sidereal_time_deg(), noon.local_sidereal_time_deg());
    }

    #[test]
    fn local_mean_time_resolver() {
        let date = CivilDate::new(1890, 3, 1).unwrap();
        let loc = GeoLocation::new(13.08, 80.27).unwrap();
        let inst = Instant::resolve(date, None, loc, &LocalMeanTimeResolver).unwrap();
        let expected = (80.27f64 * 240.0).round() as i32;
        assert_eq!(inst.offset().seconds(), expected);
    }

    #[test]
    fn failing_resolver_propagates() {
        struct NoZone;
        impl TimezoneResolver for NoZone {
            fn resolve(
                &self,
                _: &CivilDate,
                _: &TimeOfDay,
                _: &GeoLocation,
            ) -> Result<UtcOffset, TimeError> {
                Err(TimeError::UnresolvedTimezone("no zone at sea".into()))
            }
        }
        let date = CivilDate::new(2001, 1, 1).unwrap();
        let err = Instant::resolve(date, None, greenwich(), &NoZone).unwrap_err();
        assert!(matches!(err, TimeError::UnresolvedTimezone(_)));
    }
}
