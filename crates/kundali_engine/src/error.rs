//! Engine error taxonomy.

use kundali_base::BaseError;
use kundali_time::TimeError;
use thiserror::Error;

/// Every way a chart request can fail.
///
/// Request-shape errors (`Unsupported*`, `InvalidInstant`,
/// `UnresolvedTimezone`) are raised before the ephemeris is consulted.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ChartError {
    #[error("invalid instant: {0}")]
    InvalidInstant(String),
    #[error("unresolved timezone: {0}")]
    UnresolvedTimezone(String),
    #[error("unsupported division: D{0}")]
    UnsupportedDivision(u16),
    #[error("unsupported ayanamsha: {0}")]
    UnsupportedAyanamsha(String),
    #[error("unsupported house system: {0}")]
    UnsupportedHouseSystem(String),
    /// The ephemeris stayed unavailable through every retry.
    #[error("calculation unavailable after {attempts} attempt(s): {reason}")]
    CalculationUnavailable { attempts: u32, reason: String },
    /// A valid request the chart math cannot satisfy (polar quadrant houses,
    /// oversized dasha windows).
    #[error(transparent)]
    Calculation(BaseError),
    #[error("request timed out after {0} ms")]
    Timeout(u64),
    #[error("worker pool is shut down")]
    PoolClosed,
    #[error("invalid config: {0}")]
    Config(String),
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl From<TimeError> for ChartError {
    fn from(e: TimeError) -> Self {
        match e {
            TimeError::InvalidInstant(msg) => Self::InvalidInstant(msg),
            TimeError::UnresolvedTimezone(msg) => Self::UnresolvedTimezone(msg),
            other => Self::InvalidInstant(other.to_string()),
        }
    }
}

impl From<BaseError> for ChartError {
    fn from(e: BaseError) -> Self {
        match e {
            BaseError::UnsupportedDivision(d) => Self::UnsupportedDivision(d),
            BaseError::UnsupportedAyanamsha(s) => Self::UnsupportedAyanamsha(s),
            BaseError::UnsupportedHouseSystem(s) => Self::UnsupportedHouseSystem(s),
            other => Self::Calculation(other),
        }
    }
}

impl ChartError {
    /// Caller-side fault in the request; retrying cannot help.
    pub fn is_request_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidInstant(_)
                | Self::UnresolvedTimezone(_)
                | Self::UnsupportedDivision(_)
                | Self::UnsupportedAyanamsha(_)
                | Self::UnsupportedHouseSystem(_)
                | Self::Config(_)
        )
    }
}
