//! Low-precision nutation (four-term series, ~0.5″ in Δψ).
//!
//! Adequate for nutation-corrected ("true") ayanamshas and apparent sidereal
//! positions at birth-chart precision.
//!
//! Source: Meeus, *Astronomical Algorithms*, ch. 22.

/// Nutation in longitude and obliquity, both in arcseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nutation {
    pub longitude_arcsec: f64,
    pub obliquity_arcsec: f64,
}

impl Nutation {
    pub fn longitude_deg(&self) -> f64 {
        self.longitude_arcsec / 3600.0
    }

    pub fn obliquity_deg(&self) -> f64 {
        self.obliquity_arcsec / 3600.0
    }
}

/// Longitude of the Moon's mean ascending node, degrees (unnormalized).
pub fn moon_node_longitude_deg(t: f64) -> f64 {
    125.044_52 - 1934.136_261 * t + 0.002_070_8 * t.powi(2) + t.powi(3) / 450_000.0
}

/// Nutation at `t` Julian centuries of TT since J2000.0.
pub fn nutation(t: f64) -> Nutation {
    let omega = moon_node_longitude_deg(t).to_radians();
    let sun_l = (280.4665 + 36_000.7698 * t).to_radians();
    let moon_l = (218.3165 + 481_267.8813 * t).to_radians();

    let dpsi = -17.20 * omega.sin() - 1.32 * (2.0 * sun_l).sin() - 0.23 * (2.0 * moon_l).sin()
        + 0.21 * (2.0 * omega).sin();
    let deps = 9.20 * omega.cos() + 0.57 * (2.0 * sun_l).cos() + 0.10 * (2.0 * moon_l).cos()
        - 0.09 * (2.0 * omega).cos();

    Nutation {
        longitude_arcsec: dpsi,
        obliquity_arcsec: deps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meeus_example_22a() {
        // 1987-Apr-10 0h TD: Δψ = −3.788″, Δε = +9.443″
        let t = (2_446_895.5 - 2_451_545.0) / 36_525.0;
        let n = nutation(t);
        assert!((n.longitude_arcsec + 3.788).abs() < 0.5, "Δψ = {}", n.longitude_arcsec);
        assert!((n.obliquity_arcsec - 9.443).abs() < 0.2, "Δε = {}", n.obliquity_arcsec);
    }

    #[test]
    fn bounded_amplitude() {
        for i in 0..200 {
            let t = -2.0 + f64::from(i) * 0.02;
            let n = nutation(t);
            assert!(n.longitude_arcsec.abs() < 19.0);
            assert!(n.obliquity_arcsec.abs() < 10.5);
        }
    }
}
