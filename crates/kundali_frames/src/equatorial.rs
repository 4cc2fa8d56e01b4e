//! Ecliptic <-> equatorial conversion and the ecliptic angles of the local
//! horizon and meridian.
//!
//! Angles are degrees. Right ascension and longitude results are in [0, 360).
//!
//! Source: Meeus, *Astronomical Algorithms*, ch. 13 and 14.

/// Equatorial coordinates, degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Equatorial {
    pub right_ascension_deg: f64,
    pub declination_deg: f64,
}

/// Convert ecliptic longitude/latitude to right ascension/declination.
pub fn ecliptic_to_equatorial(lon_deg: f64, lat_deg: f64, obliquity_deg: f64) -> Equatorial {
    let (lon, lat, eps) = (
        lon_deg.to_radians(),
        lat_deg.to_radians(),
        obliquity_deg.to_radians(),
    );
    let ra = (lon.sin() * eps.cos() - lat.tan() * eps.sin()).atan2(lon.cos());
    let dec = (lat.sin() * eps.cos() + lat.cos() * eps.sin() * lon.sin()).asin();
    Equatorial {
        right_ascension_deg: ra.to_degrees().rem_euclid(360.0),
        declination_deg: dec.to_degrees(),
    }
}

/// Declination of the point on the ecliptic at `lon_deg`.
pub fn ecliptic_point_declination_deg(lon_deg: f64, obliquity_deg: f64) -> f64 {
    (obliquity_deg.to_radians().sin() * lon_deg.to_radians().sin())
        .asin()
        .to_degrees()
}

/// Ecliptic longitude of the ecliptic point with right ascension `ra_deg`.
pub fn ecliptic_longitude_of_ra(ra_deg: f64, obliquity_deg: f64) -> f64 {
    let ra = ra_deg.to_radians();
    ra.sin()
        .atan2(ra.cos() * obliquity_deg.to_radians().cos())
        .to_degrees()
        .rem_euclid(360.0)
}

/// Tropical longitude of the Midheaven for a given RAMC.
pub fn midheaven_deg(ramc_deg: f64, obliquity_deg: f64) -> f64 {
    ecliptic_longitude_of_ra(ramc_deg, obliquity_deg)
}

/// Tropical longitude of the Ascendant (eastern horizon on the ecliptic).
pub fn ascendant_deg(ramc_deg: f64, latitude_deg: f64, obliquity_deg: f64) -> f64 {
    let (theta, phi, eps) = (
        ramc_deg.to_radians(),
        latitude_deg.to_radians(),
        obliquity_deg.to_radians(),
    );
    theta
        .cos()
        .atan2(-(theta.sin() * eps.cos() + phi.tan() * eps.sin()))
        .to_degrees()
        .rem_euclid(360.0)
}
