//! General precession in longitude and mean obliquity of the ecliptic.
//!
//! Source: Capitaine et al. 2003 (IAU 2006), Eq. 39 and Table 1.

/// Accumulated general precession in ecliptic longitude since J2000.0, arcseconds.
///
/// `t` = Julian centuries of TT since J2000.0.
pub fn general_precession_arcsec(t: f64) -> f64 {
    5028.796_195 * t + 1.105_434_8 * t.powi(2) + 0.000_079_64 * t.powi(3)
        - 0.000_023_857 * t.powi(4)
        - 0.000_000_038_3 * t.powi(5)
}

/// General precession in longitude, degrees.
pub fn general_precession_deg(t: f64) -> f64 {
    general_precession_arcsec(t) / 3600.0
}

/// Mean obliquity of the ecliptic (IAU 2006), degrees.
pub fn mean_obliquity_deg(t: f64) -> f64 {
    let arcsec = 84_381.406 - 46.836_769 * t - 0.000_183_1 * t.powi(2)
        + 0.002_003_40 * t.powi(3)
        - 0.000_000_576 * t.powi(4)
        - 0.000_000_043_4 * t.powi(5);
    arcsec / 3600.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_at_epoch() {
        assert_eq!(general_precession_arcsec(0.0), 0.0);
    }

    #[test]
    fn about_fifty_arcsec_per_year() {
        let per_year = general_precession_arcsec(0.01);
        assert!((per_year - 50.29).abs() < 0.01, "rate = {per_year}");
    }

    #[test]
    fn obliquity_at_j2000() {
        let eps = mean_obliquity_deg(0.0);
        assert!((eps - 23.439_279).abs() < 1e-6, "ε = {eps}");
    }

    #[test]
    fn obliquity_decreases() {
        assert!(mean_obliquity_deg(1.0) < mean_obliquity_deg(0.0));
    }
}
