//! House (bhava) division.
//!
//! Whole-sign is the default. Equal, Sripati (Porphyry) and Placidus are
//! alternative variants of the same closed enum and all satisfy the same
//! contract: 12 cusps strictly increasing modulo 360 whose gaps sum to 360.
//! Cusp `k` is the inclusive start of house `k`.

use std::str::FromStr;

use kundali_frames::{ecliptic_longitude_of_ra, ecliptic_point_declination_deg};
use serde::{Deserialize, Serialize};

use crate::error::BaseError;
use crate::rashi::rashi_of;
use crate::util::{arc_forward, normalize_360};

/// Beyond this latitude the ecliptic can coincide with the horizon and the
/// quadrant systems have no solution.
pub const MAX_QUADRANT_LATITUDE: f64 = 66.5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BhavaSystem {
    #[default]
    WholeSign,
    Equal,
    Sripati,
    Placidus,
}

impl BhavaSystem {
    pub const fn key(self) -> &'static str {
        match self {
            Self::WholeSign => "whole_sign",
            Self::Equal => "equal",
            Self::Sripati => "sripati",
            Self::Placidus => "placidus",
        }
    }

    /// Quadrant systems need the meridian and observer latitude.
    pub const fn is_quadrant(self) -> bool {
        matches!(self, Self::Sripati | Self::Placidus)
    }
}

impl FromStr for BhavaSystem {
    type Err = BaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "whole_sign" | "wholesign" | "rashi" => Ok(Self::WholeSign),
            "equal" => Ok(Self::Equal),
            "sripati" | "porphyry" => Ok(Self::Sripati),
            "placidus" | "kp" => Ok(Self::Placidus),
            _ => Err(BaseError::UnsupportedHouseSystem(s.to_string())),
        }
    }
}

/// Local meridian data the quadrant systems need. Longitudes are sidereal;
/// the RAMC is an equatorial angle and is frame independent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeridianAngles {
    pub mc_deg: f64,
    pub ramc_deg: f64,
    pub latitude_deg: f64,
    pub obliquity_deg: f64,
    pub ayanamsha_deg: f64,
}

/// The 12 house cusps of one chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BhavaSet {
    pub system: BhavaSystem,
    pub ascendant_deg: f64,
    pub cusps: [f64; 12],
}

/// Zero-based slot of the 1-based house `house`, counted cyclically so that
/// house 13 is house 1 and house 0 is house 12.
pub fn house_index(house: u8) -> usize {
    (usize::from(house) + 11) % 12
}

impl BhavaSet {
    /// Cusp of house `house` (1-based, cyclic).
    pub fn cusp(&self, house: u8) -> f64 {
        self.cusps[house_index(house)]
    }

    /// `(start, end)` of house `house`; the start is inclusive.
    pub fn span(&self, house: u8) -> (f64, f64) {
        let i = house_index(house);
        (self.cusps[i], self.cusps[(i + 1) % 12])
    }

    /// House (1..=12) containing `lon_deg`.
    ///
    /// The containing house is the one whose cusp is nearest at or before
    /// the longitude, so a body exactly on a cusp belongs to the house that
    /// cusp opens.
    pub fn house_of(&self, lon_deg: f64) -> u8 {
        let lon = normalize_360(lon_deg);
        let mut best = 0usize;
        let mut best_arc = f64::INFINITY;
        for (i, &cusp) in self.cusps.iter().enumerate() {
            let arc = arc_forward(cusp, lon);
            if arc < best_arc {
                best_arc = arc;
                best = i;
            }
        }
        best as u8 + 1
    }

    /// Forward gaps between consecutive cusps.
    pub fn gaps(&self) -> [f64; 12] {
        let mut gaps = [0.0; 12];
        for (i, gap) in gaps.iter_mut().enumerate() {
            *gap = arc_forward(self.cusps[i], self.cusps[(i + 1) % 12]);
        }
        gaps
    }

    /// Every gap positive and the gaps sum to a full circle.
    pub fn is_monotonic(&self) -> bool {
        let gaps = self.gaps();
        gaps.iter().all(|&g| g > 0.0) && (gaps.iter().sum::<f64>() - 360.0).abs() < 1e-9
    }
}

/// Compute the houses for a sidereal Ascendant.
///
/// `meridian` is required by the quadrant systems and ignored otherwise.
pub fn compute_bhavas(
    system: BhavaSystem,
    ascendant_deg: f64,
    meridian: Option<&MeridianAngles>,
) -> Result<BhavaSet, BaseError> {
    assert!(ascendant_deg.is_finite(), "non-finite ascendant");
    let asc = normalize_360(ascendant_deg);
    let cusps = match system {
        BhavaSystem::WholeSign => compute_equal(rashi_of(asc).start_deg()),
        BhavaSystem::Equal => compute_equal(asc),
        BhavaSystem::Sripati => {
            let m = quadrant_meridian(system, meridian)?;
            compute_sripati(asc, normalize_360(m.mc_deg))
        }
        BhavaSystem::Placidus => {
            let m = quadrant_meridian(system, meridian)?;
            compute_placidus(asc, m)?
        }
    };
    Ok(BhavaSet {
        system,
        ascendant_deg: asc,
        cusps,
    })
}

fn quadrant_meridian(
    system: BhavaSystem,
    meridian: Option<&MeridianAngles>,
) -> Result<&MeridianAngles, BaseError> {
    let undefined = |latitude_deg| BaseError::HouseSystemUndefined {
        system: system.key(),
        latitude_deg,
    };
    let m = meridian.ok_or_else(|| undefined(f64::NAN))?;
    if m.latitude_deg.abs() > MAX_QUADRANT_LATITUDE {
        return Err(undefined(m.latitude_deg));
    }
    Ok(m)
}

fn compute_equal(start_deg: f64) -> [f64; 12] {
    std::array::from_fn(|i| normalize_360(start_deg + i as f64 * 30.0))
}

/// Trisect each of the four arcs between the angles.
fn compute_sripati(asc: f64, mc: f64) -> [f64; 12] {
    let angles = [asc, normalize_360(mc + 180.0), normalize_360(asc + 180.0), mc];
    let mut cusps = [0.0; 12];
    for (q, &start) in angles.iter().enumerate() {
        let arc = arc_forward(start, angles[(q + 1) % 4]);
        for k in 0..3 {
            cusps[q * 3 + k] = normalize_360(start + arc * k as f64 / 3.0);
        }
    }
    cusps
}

/// Placidus: cusps 11/12 trisect the diurnal semi-arc above the horizon,
/// cusps 2/3 the nocturnal semi-arc below it, each in time (RA) of the cusp
/// point itself. Solved by fixed-point iteration on tropical longitude.
fn compute_placidus(asc: f64, m: &MeridianAngles) -> Result<[f64; 12], BaseError> {
    let mc = normalize_360(m.mc_deg);
    let to_sidereal = |tropical: f64| normalize_360(tropical - m.ayanamsha_deg);

    let c11 = to_sidereal(placidus_cusp(m, 1.0 / 3.0, true)?);
    let c12 = to_sidereal(placidus_cusp(m, 2.0 / 3.0, true)?);
    let c2 = to_sidereal(placidus_cusp(m, 2.0 / 3.0, false)?);
    let c3 = to_sidereal(placidus_cusp(m, 1.0 / 3.0, false)?);

    let opp = |x: f64| normalize_360(x + 180.0);
    Ok([
        asc,
        c2,
        c3,
        opp(mc),
        opp(c11),
        opp(c12),
        opp(asc),
        opp(c2),
        opp(c3),
        mc,
        c11,
        c12,
    ])
}

/// One intermediate Placidus cusp, tropical degrees.
///
/// Above the horizon the cusp sits `fraction` of its diurnal semi-arc east of
/// the meridian; below it, `fraction` of its nocturnal semi-arc west of the
/// lower meridian.
fn placidus_cusp(m: &MeridianAngles, fraction: f64, above: bool) -> Result<f64, BaseError> {
    let tan_phi = m.latitude_deg.to_radians().tan();
    let target_ra = |semi_arc_diurnal: f64| {
        if above {
            m.ramc_deg + fraction * semi_arc_diurnal
        } else {
            m.ramc_deg + 180.0 - fraction * (180.0 - semi_arc_diurnal)
        }
    };

    let mut lon = ecliptic_longitude_of_ra(target_ra(90.0), m.obliquity_deg);
    for _ in 0..100 {
        let dec = ecliptic_point_declination_deg(lon, m.obliquity_deg).to_radians();
        let x = tan_phi * dec.tan();
        if x.abs() >= 1.0 {
            return Err(BaseError::HouseSystemUndefined {
                system: BhavaSystem::Placidus.key(),
                latitude_deg: m.latitude_deg,
            });
        }
        let semi_arc = 90.0 + x.asin().to_degrees();
        let next = ecliptic_longitude_of_ra(target_ra(semi_arc), m.obliquity_deg);
        let delta = arc_forward(lon, next);
        lon = next;
        if delta.min(360.0 - delta) < 1e-10 {
            break;
        }
    }
    Ok(lon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kundali_frames::{ascendant_deg, midheaven_deg};

    const EPS: f64 = 23.4393;

    fn meridian(ramc: f64, lat: f64, aya: f64) -> (f64, MeridianAngles) {
        let asc = normalize_360(ascendant_deg(ramc, lat, EPS) - aya);
        let mc = normalize_360(midheaven_deg(ramc, EPS) - aya);
        (
            asc,
            MeridianAngles {
                mc_deg: mc,
                ramc_deg: ramc,
                latitude_deg: lat,
                obliquity_deg: EPS,
                ayanamsha_deg: aya,
            },
        )
    }

    #[test]
    fn whole_sign_starts_at_sign_of_ascendant() {
        let set = compute_bhavas(BhavaSystem::WholeSign, 107.3, None).unwrap();
        assert_eq!(set.cusps[0], 90.0);
        assert_eq!(set.cusps[11], 60.0);
        assert_eq!(set.house_of(107.3), 1);
        assert_eq!(set.house_of(89.999), 12);
    }

    #[test]
    fn equal_cusps_30_apart() {
        let set = compute_bhavas(BhavaSystem::Equal, 345.0, None).unwrap();
        assert!((set.cusps[1] - 15.0).abs() < 1e-12);
        assert!(set.is_monotonic());
    }

    #[test]
    fn cusp_is_inclusive_lower_bound() {
        let set = compute_bhavas(BhavaSystem::WholeSign, 15.0, None).unwrap();
        assert_eq!(set.house_of(30.0), 2);
        assert_eq!(set.house_of(0.0), 1);
        assert_eq!(set.house_of(359.999_999), 12);
    }

    #[test]
    fn house_numbers_wrap() {
        assert_eq!(house_index(1), 0);
        assert_eq!(house_index(12), 11);
        assert_eq!(house_index(13), 0);
        assert_eq!(house_index(0), 11);
        let set = compute_bhavas(BhavaSystem::WholeSign, 15.0, None).unwrap();
        assert_eq!(set.cusp(0), set.cusp(12));
        assert_eq!(set.span(0), (330.0, 0.0));
    }

    #[test]
    fn unknown_system_rejected() {
        assert_eq!(
            "koch".parse::<BhavaSystem>(),
            Err(BaseError::UnsupportedHouseSystem("koch".into()))
        );
        assert_eq!("Whole-Sign".parse::<BhavaSystem>(), Ok(BhavaSystem::WholeSign));
    }

    #[test]
    fn quadrant_needs_meridian() {
        let err = compute_bhavas(BhavaSystem::Placidus, 10.0, None).unwrap_err();
        assert!(matches!(err, BaseError::HouseSystemUndefined { .. }));
    }

    #[test]
    fn quadrant_rejected_in_polar_circle() {
        let (asc, m) = meridian(30.0, 70.0, 24.0);
        let err = compute_bhavas(BhavaSystem::Sripati, asc, Some(&m)).unwrap_err();
        assert!(matches!(err, BaseError::HouseSystemUndefined { .. }));
    }

    #[test]
    fn placidus_at_equator_is_ra_thirds() {
        // At the equator every semi-arc is 90°, so cusp 11 sits at RAMC + 30°.
        let (asc, m) = meridian(0.0, 0.0, 0.0);
        let set = compute_bhavas(BhavaSystem::Placidus, asc, Some(&m)).unwrap();
        let expected = ecliptic_longitude_of_ra(30.0, EPS);
        assert!((set.cusp(11) - expected).abs() < 1e-8);
        assert!(set.is_monotonic());
    }

    #[test]
    fn placidus_mid_latitude_ordered() {
        for i in 0..24 {
            let (asc, m) = meridian(f64::from(i) * 15.0, 51.5, 23.85);
            let set = compute_bhavas(BhavaSystem::Placidus, asc, Some(&m)).unwrap();
            assert!(set.is_monotonic(), "ramc {}: {:?}", i * 15, set.cusps);
        }
    }

    #[test]
    fn sripati_angles_in_place() {
        let (asc, m) = meridian(200.0, 28.6, 23.85);
        let set = compute_bhavas(BhavaSystem::Sripati, asc, Some(&m)).unwrap();
        assert!((set.cusp(1) - asc).abs() < 1e-12);
        assert!((set.cusp(10) - m.mc_deg).abs() < 1e-12);
        assert!(set.is_monotonic());
    }
}
