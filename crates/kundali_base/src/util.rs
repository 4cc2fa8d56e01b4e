//! Shared angle helpers.

/// Normalize an angle to [0, 360) degrees.
pub fn normalize_360(deg: f64) -> f64 {
    let r = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs.
    if r >= 360.0 { 0.0 } else { r }
}

/// Forward (counter-clockwise) arc from `from` to `to`, in [0, 360).
pub fn arc_forward(from: f64, to: f64) -> f64 {
    normalize_360(to - from)
}

/// Shortest angular distance between two longitudes, in [0, 180].
pub fn angular_distance(a: f64, b: f64) -> f64 {
    let d = arc_forward(a, b);
    if d > 180.0 { 360.0 - d } else { d }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_wraps_both_ways() {
        assert!((normalize_360(370.0) - 10.0).abs() < 1e-12);
        assert!((normalize_360(-10.0) - 350.0).abs() < 1e-12);
        assert_eq!(normalize_360(360.0), 0.0);
    }

    #[test]
    fn normalize_tiny_negative_stays_below_360() {
        let r = normalize_360(-1e-17);
        assert!((0.0..360.0).contains(&r), "got {r}");
    }

    #[test]
    fn arc_forward_crosses_zero() {
        assert!((arc_forward(350.0, 10.0) - 20.0).abs() < 1e-12);
        assert!((arc_forward(10.0, 350.0) - 340.0).abs() < 1e-12);
    }

    #[test]
    fn distance_is_symmetric() {
        assert!((angular_distance(350.0, 10.0) - 20.0).abs() < 1e-12);
        assert!((angular_distance(10.0, 350.0) - 20.0).abs() < 1e-12);
        assert!((angular_distance(0.0, 180.0) - 180.0).abs() < 1e-12);
    }
}
