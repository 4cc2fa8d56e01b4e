//! Truncated lunar theory (Meeus, *Astronomical Algorithms*, ch. 47) and
//! the lunar nodes.
//!
//! Longitudes are referred to the mean equinox of date. The retained terms
//! keep the longitude error near 10 arcseconds for centuries around J2000.

use kundali_base::normalize_360;

/// Fundamental arguments in degrees.
struct Arguments {
    /// Mean longitude.
    l: f64,
    /// Mean elongation.
    d: f64,
    /// Sun's mean anomaly.
    m: f64,
    /// Moon's mean anomaly.
    mp: f64,
    /// Argument of latitude.
    f: f64,
    /// Eccentricity factor for terms in `m`.
    e: f64,
}

fn arguments(t: f64) -> Arguments {
    let t2 = t * t;
    let t3 = t2 * t;
    let t4 = t3 * t;
    Arguments {
        l: 218.316_447_7 + 481_267.881_234_21 * t - 0.001_578_6 * t2 + t3 / 538_841.0
            - t4 / 65_194_000.0,
        d: 297.850_192_1 + 445_267.111_403_4 * t - 0.001_881_9 * t2 + t3 / 545_868.0
            - t4 / 113_065_000.0,
        m: 357.529_109_2 + 35_999.050_290_9 * t - 0.000_153_6 * t2 + t3 / 24_490_000.0,
        mp: 134.963_396_4 + 477_198.867_505_5 * t + 0.008_741_4 * t2 + t3 / 69_699.0
            - t4 / 14_712_000.0,
        f: 93.272_095_0 + 483_202.017_523_3 * t - 0.003_653_9 * t2 - t3 / 3_526_000.0
            + t4 / 863_310_000.0,
        e: 1.0 - 0.002_516 * t - 0.000_007_4 * t2,
    }
}

/// (D, M, M', F, longitude 1e-6 deg, distance 1e-3 km)
const LR_TERMS: [(i8, i8, i8, i8, f64, f64); 34] = [
    (0, 0, 1, 0, 6_288_774.0, -20_905_355.0),
    (2, 0, -1, 0, 1_274_027.0, -3_699_111.0),
    (2, 0, 0, 0, 658_314.0, -2_955_968.0),
    (0, 0, 2, 0, 213_618.0, -569_925.0),
    (0, 1, 0, 0, -185_116.0, 48_888.0),
    (0, 0, 0, 2, -114_332.0, -3_149.0),
    (2, 0, -2, 0, 58_793.0, 246_158.0),
    (2, -1, -1, 0, 57_066.0, -152_138.0),
    (2, 0, 1, 0, 53_322.0, -170_733.0),
    (2, -1, 0, 0, 45_758.0, -204_586.0),
    (0, 1, -1, 0, -40_923.0, -129_620.0),
    (1, 0, 0, 0, -34_720.0, 108_743.0),
    (0, 1, 1, 0, -30_383.0, 104_755.0),
    (2, 0, 0, -2, 15_327.0, 10_321.0),
    (0, 0, 1, 2, -12_528.0, 0.0),
    (0, 0, 1, -2, 10_980.0, 79_661.0),
    (4, 0, -1, 0, 10_675.0, -34_782.0),
    (0, 0, 3, 0, 10_034.0, -23_210.0),
    (4, 0, -2, 0, 8_548.0, -21_636.0),
    (2, 1, -1, 0, -7_888.0, 24_208.0),
    (2, 1, 0, 0, -6_766.0, 30_824.0),
    (1, 0, -1, 0, -5_163.0, -8_379.0),
    (1, 1, 0, 0, 4_987.0, -16_675.0),
    (2, -1, 1, 0, 4_036.0, -12_831.0),
    (2, 0, 2, 0, 3_994.0, -10_445.0),
    (4, 0, 0, 0, 3_861.0, -11_650.0),
    (2, 0, -3, 0, 3_665.0, 14_403.0),
    (0, 1, -2, 0, -2_689.0, -7_003.0),
    (2, 0, -1, 2, -2_602.0, 0.0),
    (2, -1, -2, 0, 2_390.0, 10_056.0),
    (1, 0, 1, 0, -2_348.0, 6_322.0),
    (2, -2, 0, 0, 2_236.0, -9_884.0),
    (0, 1, 2, 0, -2_120.0, 5_751.0),
    (0, 2, 0, 0, -2_069.0, 0.0),
];

/// (D, M, M', F, latitude 1e-6 deg)
const B_TERMS: [(i8, i8, i8, i8, f64); 20] = [
    (0, 0, 0, 1, 5_128_122.0),
    (0, 0, 1, 1, 280_602.0),
    (0, 0, 1, -1, 277_693.0),
    (2, 0, 0, -1, 173_237.0),
    (2, 0, -1, 1, 55_413.0),
    (2, 0, -1, -1, 46_271.0),
    (2, 0, 0, 1, 32_573.0),
    (0, 0, 2, 1, 17_198.0),
    (2, 0, 1, -1, 9_266.0),
    (0, 0, 2, -1, 8_822.0),
    (2, -1, 0, -1, 8_216.0),
    (2, 0, -2, -1, 4_324.0),
    (2, 0, 1, 1, 4_200.0),
    (2, 1, 0, -1, -3_359.0),
    (2, -1, -1, 1, 2_463.0),
    (2, -1, 0, 1, 2_211.0),
    (2, -1, -1, -1, 2_065.0),
    (0, 1, -1, -1, -1_870.0),
    (4, 0, -1, -1, 1_828.0),
    (0, 1, 0, 1, -1_794.0),
];

const KM_PER_AU: f64 = 149_597_870.7;

/// Geocentric ecliptic longitude, latitude (degrees, mean equinox of date)
/// and distance (AU) of the Moon at `t` Julian centuries TT from J2000.
pub(crate) fn moon_position(t: f64) -> (f64, f64, f64) {
    let a = arguments(t);
    let angle = |d: i8, m: i8, mp: i8, f: i8| {
        (f64::from(d) * a.d + f64::from(m) * a.m + f64::from(mp) * a.mp + f64::from(f) * a.f)
            .to_radians()
    };
    let e_factor = |m: i8| match m.abs() {
        0 => 1.0,
        1 => a.e,
        _ => a.e * a.e,
    };

    let mut sum_l = 0.0;
    let mut sum_r = 0.0;
    for &(d, m, mp, f, l, r) in &LR_TERMS {
        let arg = angle(d, m, mp, f);
        let e = e_factor(m);
        sum_l += l * e * arg.sin();
        sum_r += r * e * arg.cos();
    }
    let mut sum_b = 0.0;
    for &(d, m, mp, f, b) in &B_TERMS {
        sum_b += b * e_factor(m) * angle(d, m, mp, f).sin();
    }

    let a1 = (119.75 + 131.849 * t).to_radians();
    let a2 = (53.09 + 479_264.290 * t).to_radians();
    let a3 = (313.45 + 481_266.484 * t).to_radians();
    let (l, mp, f) = (a.l.to_radians(), a.mp.to_radians(), a.f.to_radians());
    sum_l += 3958.0 * a1.sin() + 1962.0 * (l - f).sin() + 318.0 * a2.sin();
    sum_b += -2235.0 * l.sin() + 382.0 * a3.sin() + 175.0 * (a1 - f).sin()
        + 175.0 * (a1 + f).sin()
        + 127.0 * (l - mp).sin()
        - 115.0 * (l + mp).sin();

    let lon = normalize_360(a.l + sum_l / 1e6);
    let lat = sum_b / 1e6;
    let distance_km = 385_000.56 + sum_r / 1000.0;
    (lon, lat, distance_km / KM_PER_AU)
}

/// Mean longitude of the Moon's ascending node.
pub(crate) fn mean_node(t: f64) -> f64 {
    let t2 = t * t;
    let t3 = t2 * t;
    normalize_360(
        125.044_547_9 - 1934.136_289_1 * t + 0.002_075_4 * t2 + t3 / 467_441.0
            - t2 * t2 / 60_616_000.0,
    )
}

/// True (osculating) node: the mean node plus its principal periodic terms.
pub(crate) fn true_node(t: f64) -> f64 {
    let a = arguments(t);
    let r = |deg: f64| deg.to_radians().sin();
    normalize_360(
        mean_node(t) - 1.4979 * r(2.0 * (a.d - a.f)) - 0.1500 * r(a.m) - 0.1226 * r(2.0 * a.d)
            + 0.1176 * r(2.0 * a.f)
            - 0.0801 * r(2.0 * (a.mp - a.f)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Meeus example 47.a: 1992 April 12, 0h TD.
    #[test]
    fn meeus_example_47a() {
        let t = (2_448_724.5 - 2_451_545.0) / 36_525.0;
        let (lon, lat, dist_au) = moon_position(t);
        assert!((lon - 133.162_655).abs() < 0.02, "lon {lon}");
        assert!((lat - -3.229_126).abs() < 0.02, "lat {lat}");
        assert!((dist_au * KM_PER_AU - 368_409.7).abs() < 100.0);
    }

    #[test]
    fn node_regresses() {
        let a = mean_node(0.0);
        let b = mean_node(1.0 / 36_525.0);
        let step = normalize_360(b - a + 180.0) - 180.0;
        assert!(step < 0.0 && step > -0.06, "{step}");
        assert!((a - 125.044_547_9).abs() < 1e-9);
    }

    #[test]
    fn true_node_close_to_mean() {
        for k in 0..50 {
            let t = k as f64 * 0.01;
            let diff = normalize_360(true_node(t) - mean_node(t) + 180.0) - 180.0;
            assert!(diff.abs() < 2.0, "{diff}");
        }
    }
}
