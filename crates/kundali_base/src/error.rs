//! Error types for chart-math calculations.

use thiserror::Error;

/// Errors from the pure chart-math layer.
///
/// Every variant is detectable from the request alone, before any
/// ephemeris work is done.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum BaseError {
    #[error("unsupported division: D{0}")]
    UnsupportedDivision(u16),
    #[error("unsupported ayanamsha: {0}")]
    UnsupportedAyanamsha(String),
    #[error("unsupported house system: {0}")]
    UnsupportedHouseSystem(String),
    /// Quadrant house systems have no solution inside the polar circles.
    #[error("house system {system} undefined at latitude {latitude_deg}")]
    HouseSystemUndefined {
        system: &'static str,
        latitude_deg: f64,
    },
    #[error("dasha depth {requested} outside 1..={max}")]
    DashaDepth { requested: u8, max: u8 },
    #[error("invalid dasha window: {0}")]
    DashaWindow(&'static str),
    /// The requested window/depth would materialize more periods than allowed.
    #[error("dasha expansion exceeds {limit} periods")]
    DashaTooLarge { limit: usize },
}
