//! Ephemeris provider seam.
//!
//! The engine asks a provider for geocentric tropical positions (ecliptic
//! and equinox of date) of several bodies at one TT Julian Day in a single
//! call. Ketu is never requested; the engine places it opposite Rahu.

mod analytic;
mod moon;

pub use analytic::AnalyticEphemeris;

use kundali_base::Graha;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which lunar node stands for Rahu.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeMode {
    #[default]
    Mean,
    True,
}

/// One body as returned by a provider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawPosition {
    pub graha: Graha,
    /// Tropical ecliptic longitude of date, [0, 360).
    pub longitude_deg: f64,
    pub latitude_deg: f64,
    /// Geocentric distance in AU; 0 for the nodes.
    pub distance_au: f64,
    /// Longitude rate in degrees per day; negative when retrograde.
    pub speed_deg_per_day: f64,
}

#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ProviderError {
    /// Transient failure; the request may be retried.
    #[error("ephemeris unavailable: {0}")]
    Unavailable(String),
    /// The instant lies outside the data the provider covers.
    #[error("epoch {jd_tt} outside provider range [{start}, {end}]")]
    OutOfRange { jd_tt: f64, start: f64, end: f64 },
    #[error("body not supported: {0}")]
    UnsupportedBody(Graha),
}

/// Source of planetary positions.
pub trait EphemerisProvider: Send + Sync {
    /// Positions of `bodies` at `jd_tt`, in request order.
    fn positions(&self, jd_tt: f64, bodies: &[Graha]) -> Result<Vec<RawPosition>, ProviderError>;

    /// Inclusive TT Julian Day range the provider serves.
    fn supported_range(&self) -> (f64, f64);

    /// Identifies the data and model; part of the reproducibility contract.
    fn version(&self) -> String;
}
