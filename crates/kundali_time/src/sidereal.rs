//! Earth rotation angle, Greenwich mean sidereal time and local sidereal time.
//!
//! All angles are in degrees in [0, 360). Inputs are UT Julian Days; the
//! UT1−UTC difference (< 0.9 s) is below the resolution a birth time carries.
//!
//! Sources:
//! - ERA: IERS Conventions 2010, Eq. 5.15.
//! - GMST polynomial: Capitaine et al. 2003, Table 2.

use crate::julian::{J2000_JD, julian_centuries};

/// Earth Rotation Angle, θ = 360° × (0.7790572732640 + 1.00273781191135448 × Du).
pub fn earth_rotation_angle_deg(jd_ut: f64) -> f64 {
    let du = jd_ut - J2000_JD;
    // Split the day count so the large integer part does not eat precision.
    let frac = (0.779_057_273_264_0 + 0.002_737_811_911_354_48 * du + du.fract()).rem_euclid(1.0);
    frac * 360.0
}

/// Greenwich Mean Sidereal Time in degrees.
pub fn gmst_deg(jd_ut: f64) -> f64 {
    let t = julian_centuries(jd_ut);
    let poly_arcsec = 0.014_506 + 4612.156_534 * t + 1.391_581_7 * t.powi(2)
        - 0.000_000_44 * t.powi(3)
        - 0.000_029_956 * t.powi(4)
        - 0.000_000_036_8 * t.powi(5);
    (earth_rotation_angle_deg(jd_ut) + poly_arcsec / 3600.0).rem_euclid(360.0)
}

/// Local Sidereal Time for an observer at `longitude_east_deg`.
///
/// Equal to the right ascension of the local meridian (RAMC).
pub fn local_sidereal_time_deg(jd_ut: f64, longitude_east_deg: f64) -> f64 {
    (gmst_deg(jd_ut) + longitude_east_deg).rem_euclid(360.0)
}
