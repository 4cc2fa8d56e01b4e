//! Built-in analytic ephemeris.
//!
//! Planets use the JPL approximate Keplerian elements valid 1800-2050
//! (Standish, "Keplerian Elements for Approximate Positions of the Major
//! Planets"), referred to the J2000 ecliptic, then rotated to the equinox of
//! date by general precession. The Moon and nodes come from [`super::moon`].
//! Daily motion is a central difference over one day.

use kundali_base::{Graha, normalize_360};
use kundali_frames::general_precession_deg;
use kundali_time::julian_centuries;

use super::moon::{mean_node, moon_position, true_node};
use super::{EphemerisProvider, NodeMode, ProviderError, RawPosition};

/// First and last supported TT Julian Day (1800-01-01 to 2050-12-31).
pub const ANALYTIC_RANGE: (f64, f64) = (2_378_496.5, 2_470_171.5);

/// Light travel time for 1 AU, in days.
const LIGHT_DAYS_PER_AU: f64 = 0.005_775_518_3;

/// Elements at J2000 and their rates per century:
/// a (AU), e, I, L, long. perihelion, long. ascending node (degrees).
struct Elements {
    base: [f64; 6],
    rate: [f64; 6],
}

const MERCURY: Elements = Elements {
    base: [0.387_099_27, 0.205_635_93, 7.004_979_02, 252.250_323_50, 77.457_796_28, 48.330_765_93],
    rate: [0.000_000_37, 0.000_019_06, -0.005_947_49, 149_472.674_111_75, 0.160_476_89, -0.125_340_81],
};
const VENUS: Elements = Elements {
    base: [0.723_335_66, 0.006_776_72, 3.394_676_05, 181.979_099_50, 131.602_467_18, 76.679_842_55],
    rate: [0.000_003_90, -0.000_041_07, -0.000_788_90, 58_517.815_387_29, 0.002_683_29, -0.277_694_18],
};
const EARTH_MOON: Elements = Elements {
    base: [1.000_002_61, 0.016_711_23, -0.000_015_31, 100.464_571_66, 102.937_681_93, 0.0],
    rate: [0.000_005_62, -0.000_043_92, -0.012_946_68, 35_999.372_449_81, 0.323_273_64, 0.0],
};
const MARS: Elements = Elements {
    base: [1.523_710_34, 0.093_394_10, 1.849_691_42, -4.553_432_05, -23.943_629_59, 49.559_538_91],
    rate: [0.000_018_47, 0.000_078_82, -0.008_131_31, 19_140.302_684_99, 0.444_410_88, -0.292_573_43],
};
const JUPITER: Elements = Elements {
    base: [5.202_887_00, 0.048_386_24, 1.304_396_95, 34.396_440_51, 14.728_479_83, 100.473_909_09],
    rate: [-0.000_116_07, -0.000_132_53, -0.001_837_14, 3_034.746_127_75, 0.212_526_68, 0.204_691_06],
};
const SATURN: Elements = Elements {
    base: [9.536_675_94, 0.053_861_79, 2.485_991_87, 49.954_244_23, 92.598_878_31, 113.662_424_48],
    rate: [-0.001_250_60, -0.000_509_91, 0.001_936_09, 1_222.493_622_01, -0.418_972_16, -0.288_677_94],
};

/// Heliocentric J2000 ecliptic rectangular coordinates in AU.
fn heliocentric(el: &Elements, t: f64) -> [f64; 3] {
    let v: [f64; 6] = std::array::from_fn(|i| el.base[i] + el.rate[i] * t);
    let [a, e, incl, l, peri, node] = v;
    let omega = peri - node;
    let mean_anomaly = (normalize_360(l - peri) + 180.0).rem_euclid(360.0) - 180.0;

    let m = mean_anomaly.to_radians();
    let mut ecc = m + e * m.sin();
    for _ in 0..30 {
        let delta = (ecc - e * ecc.sin() - m) / (1.0 - e * ecc.cos());
        ecc -= delta;
        if delta.abs() < 1e-12 {
            break;
        }
    }

    let xp = a * (ecc.cos() - e);
    let yp = a * (1.0 - e * e).sqrt() * ecc.sin();
    let (so, co) = omega.to_radians().sin_cos();
    let (sn, cn) = node.to_radians().sin_cos();
    let (si, ci) = incl.to_radians().sin_cos();
    [
        (co * cn - so * sn * ci) * xp + (-so * cn - co * sn * ci) * yp,
        (co * sn + so * cn * ci) * xp + (-so * sn + co * cn * ci) * yp,
        (so * si) * xp + (co * si) * yp,
    ]
}

fn spherical(v: [f64; 3]) -> (f64, f64, f64) {
    let [x, y, z] = v;
    let rho = x.hypot(y);
    (
        normalize_360(y.atan2(x).to_degrees()),
        z.atan2(rho).to_degrees(),
        rho.hypot(z),
    )
}

fn elements_for(graha: Graha) -> Option<&'static Elements> {
    match graha {
        Graha::Buddh => Some(&MERCURY),
        Graha::Shukra => Some(&VENUS),
        Graha::Mangal => Some(&MARS),
        Graha::Guru => Some(&JUPITER),
        Graha::Shani => Some(&SATURN),
        _ => None,
    }
}

/// Mean-element ephemeris with no external data files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalyticEphemeris {
    node_mode: NodeMode,
}

impl AnalyticEphemeris {
    pub fn new(node_mode: NodeMode) -> Self {
        Self { node_mode }
    }

    pub fn node_mode(&self) -> NodeMode {
        self.node_mode
    }

    /// Geocentric (longitude of date, latitude, distance) at `jd_tt`.
    fn point(&self, graha: Graha, jd_tt: f64) -> Result<(f64, f64, f64), ProviderError> {
        let t = julian_centuries(jd_tt);
        let precession = general_precession_deg(t);
        let of_date = |(lon, lat, dist): (f64, f64, f64)| (normalize_360(lon + precession), lat, dist);
        match graha {
            Graha::Chandra => Ok(moon_position(t)),
            Graha::Rahu => Ok(match self.node_mode {
                NodeMode::Mean => (mean_node(t), 0.0, 0.0),
                NodeMode::True => (true_node(t), 0.0, 0.0),
            }),
            Graha::Surya => {
                let earth = heliocentric(&EARTH_MOON, t);
                Ok(of_date(spherical(earth.map(|c| -c))))
            }
            Graha::Ketu => Err(ProviderError::UnsupportedBody(graha)),
            _ => {
                let el = elements_for(graha).ok_or(ProviderError::UnsupportedBody(graha))?;
                let earth = heliocentric(&EARTH_MOON, t);
                let geo = |tp: f64| {
                    let p = heliocentric(el, tp);
                    [p[0] - earth[0], p[1] - earth[1], p[2] - earth[2]]
                };
                // One light-time iteration is plenty at this precision.
                let (_, _, dist) = spherical(geo(t));
                let retarded = t - dist * LIGHT_DAYS_PER_AU / 36_525.0;
                Ok(of_date(spherical(geo(retarded))))
            }
        }
    }
}

impl EphemerisProvider for AnalyticEphemeris {
    fn positions(&self, jd_tt: f64, bodies: &[Graha]) -> Result<Vec<RawPosition>, ProviderError> {
        let (start, end) = ANALYTIC_RANGE;
        if !(start..=end).contains(&jd_tt) {
            return Err(ProviderError::OutOfRange { jd_tt, start, end });
        }
        bodies
            .iter()
            .map(|&graha| {
                let (lon, lat, dist) = self.point(graha, jd_tt)?;
                let (before, _, _) = self.point(graha, jd_tt - 0.5)?;
                let (after, _, _) = self.point(graha, jd_tt + 0.5)?;
                let speed = normalize_360(after - before + 180.0) - 180.0;
                Ok(RawPosition {
                    graha,
                    longitude_deg: lon,
                    latitude_deg: lat,
                    distance_au: dist,
                    speed_deg_per_day: speed,
                })
            })
            .collect()
    }

    fn supported_range(&self) -> (f64, f64) {
        ANALYTIC_RANGE
    }

    fn version(&self) -> String {
        let node = match self.node_mode {
            NodeMode::Mean => "mean-node",
            NodeMode::True => "true-node",
        };
        format!("analytic-kepler-1800-2050+meeus47/{node}/v1")
    }
}
