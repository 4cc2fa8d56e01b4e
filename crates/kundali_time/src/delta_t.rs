//! ΔT = TT − UT.
//!
//! Piecewise polynomials from Espenak & Meeus (NASA Five Millennium Canon of
//! Solar Eclipses), covering 1800–2050. Outside that span the long-term
//! parabola −20 + 32u² (u in centuries from 1820) is used.

use crate::julian::J2000_JD;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Decimal year for a Julian Day, accurate enough for ΔT lookup.
pub fn decimal_year(jd: f64) -> f64 {
    2000.0 + (jd - J2000_JD) / 365.25
}

/// ΔT in seconds for a decimal year.
pub fn delta_t_seconds(year: f64) -> f64 {
    if !(1800.0..2050.0).contains(&year) {
        let u = (year - 1820.0) / 100.0;
        return -20.0 + 32.0 * u * u;
    }
    if year < 1860.0 {
        let t = year - 1800.0;
        return 13.72 - 0.332_447 * t + 0.006_861_2 * t.powi(2) + 0.004_111_6 * t.powi(3)
            - 0.000_374_36 * t.powi(4)
            + 0.000_012_127_2 * t.powi(5)
            - 0.000_000_169_9 * t.powi(6)
            + 0.000_000_000_875 * t.powi(7);
    }
    if year < 1900.0 {
        let t = year - 1860.0;
        return 7.62 + 0.5737 * t - 0.251_754 * t.powi(2) + 0.016_806_68 * t.powi(3)
            - 0.000_447_362_4 * t.powi(4)
            + t.powi(5) / 233_174.0;
    }
    if year < 1920.0 {
        let t = year - 1900.0;
        return -2.79 + 1.494_119 * t - 0.059_893_9 * t.powi(2) + 0.006_196_6 * t.powi(3)
            - 0.000_197 * t.powi(4);
    }
    if year < 1941.0 {
        let t = year - 1920.0;
        return 21.20 + 0.844_93 * t - 0.076_100 * t.powi(2) + 0.002_093_6 * t.powi(3);
    }
    if year < 1961.0 {
        let t = year - 1950.0;
        return 29.07 + 0.407 * t - t.powi(2) / 233.0 + t.powi(3) / 2547.0;
    }
    if year < 1986.0 {
        let t = year - 1975.0;
        return 45.45 + 1.067 * t - t.powi(2) / 260.0 - t.powi(3) / 718.0;
    }
    if year < 2005.0 {
        let t = year - 2000.0;
        return 63.86 + 0.3345 * t - 0.060_374 * t.powi(2)
            + 0.001_727_5 * t.powi(3)
            + 0.000_651_814 * t.powi(4)
            + 0.000_023_735_99 * t.powi(5);
    }
    let t = year - 2000.0;
    62.92 + 0.322_17 * t + 0.005_589 * t.powi(2)
}

/// Convert a UT Julian Day to TT.
pub fn ut_to_tt(jd_ut: f64) -> f64 {
    jd_ut + delta_t_seconds(decimal_year(jd_ut)) / SECONDS_PER_DAY
}
