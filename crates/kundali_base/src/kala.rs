//! Temporal lords: the rulers of the weekday, planetary hour, year and month
//! used by kala bala.

use crate::graha::{Graha, SAPTA_GRAHAS};

/// Julian Day of the Kali Yuga epoch (3102 BCE Feb 18, midnight).
pub const KALI_EPOCH_JD: f64 = 588_465.5;

/// Descending order of orbital period; successive horas follow it.
const CHALDEAN: [Graha; 7] = [
    Graha::Shani,
    Graha::Guru,
    Graha::Mangal,
    Graha::Surya,
    Graha::Shukra,
    Graha::Buddh,
    Graha::Chandra,
];

/// Weekday (0 = Sunday) of the civil day containing `jd`.
pub fn weekday_of(jd: f64) -> usize {
    (((jd + 0.5).floor() as i64 + 1).rem_euclid(7)) as usize
}

/// Lord of weekday `weekday` (0 = Sunday).
pub fn weekday_lord(weekday: usize) -> Graha {
    SAPTA_GRAHAS[weekday % 7]
}

/// Lord of the Vedic day. The Vedic day runs sunrise to sunrise and takes
/// the weekday of the civil date on which its sunrise fell, so the lord is
/// read `days_since_sunrise` back from the birth's local civil JD.
pub fn vara_lord(local_civil_jd: f64, days_since_sunrise: f64) -> Graha {
    weekday_lord(weekday_of(local_civil_jd - days_since_sunrise))
}

/// Lord of the `hora_index`-th planetary hour after sunrise (0-based).
pub fn hora_lord(day_lord: Graha, hora_index: usize) -> Graha {
    let start = CHALDEAN.iter().position(|&g| g == day_lord).unwrap_or(0);
    CHALDEAN[(start + hora_index) % 7]
}

/// Days elapsed since the Kali epoch (ahargana).
pub fn ahargana(jd: f64) -> f64 {
    (jd - KALI_EPOCH_JD).floor()
}

/// Lord of the 360-day year containing `jd`: the lord of its first weekday.
pub fn abda_lord(jd: f64) -> Graha {
    let a = ahargana(jd);
    let year_start = a - a.rem_euclid(360.0);
    weekday_lord(weekday_of(KALI_EPOCH_JD + year_start))
}

/// Lord of the 30-day month containing `jd`.
pub fn masa_lord(jd: f64) -> Graha {
    let a = ahargana(jd);
    let month_start = a - a.rem_euclid(30.0);
    weekday_lord(weekday_of(KALI_EPOCH_JD + month_start))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn j2000_is_saturday() {
        assert_eq!(weekday_of(2_451_545.0), 6);
        assert_eq!(vara_lord(2_451_545.0, 0.2), Graha::Shani);
        // Noon, but the last sunrise was more than half a day back.
        assert_eq!(vara_lord(2_451_545.0, 0.6), Graha::Shukra);
    }

    #[test]
    fn vara_follows_sunrise_not_midnight() {
        // 00:30 on Sunday 2000-01-02, sunrise about 17 hours earlier.
        let jd = 2_451_545.5 + 0.5 / 24.0;
        assert_eq!(vara_lord(jd, 17.5 / 24.0), Graha::Shani);
        // 07:30 the same morning, half an hour after sunrise.
        let jd = 2_451_545.5 + 7.5 / 24.0;
        assert_eq!(vara_lord(jd, 0.5 / 24.0), Graha::Surya);
    }

    #[test]
    fn kali_epoch_is_friday() {
        assert_eq!(weekday_of(KALI_EPOCH_JD), 5);
    }

    #[test]
    fn hora_sequence() {
        // Sunday: Sun, Venus, Mercury, Moon, Saturn, Jupiter, Mars, Sun ...
        assert_eq!(hora_lord(Graha::Surya, 0), Graha::Surya);
        assert_eq!(hora_lord(Graha::Surya, 1), Graha::Shukra);
        assert_eq!(hora_lord(Graha::Surya, 3), Graha::Chandra);
        // 25th hora (next sunrise) is Monday's lord.
        assert_eq!(hora_lord(Graha::Surya, 24), Graha::Chandra);
    }

    #[test]
    fn month_lord_constant_within_month() {
        let a0 = KALI_EPOCH_JD + 30.0 * 60_000.0;
        let lord = masa_lord(a0);
        assert_eq!(masa_lord(a0 + 29.0), lord);
    }

    #[test]
    fn year_lord_is_lord_of_first_day() {
        let y0 = KALI_EPOCH_JD + 360.0 * 5_000.0;
        assert_eq!(abda_lord(y0), weekday_lord(weekday_of(y0)));
        assert_eq!(abda_lord(y0 + 359.0), abda_lord(y0));
    }
}
