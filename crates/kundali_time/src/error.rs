//! Error types for instant normalization.

use thiserror::Error;

/// Errors raised while turning civil birth data into an astronomical instant.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum TimeError {
    /// Malformed civil fields, impossible coordinates, or a date outside
    /// the supported calendar range.
    #[error("invalid instant: {0}")]
    InvalidInstant(String),
    /// No UTC offset could be determined for the date and coordinates.
    #[error("unresolved timezone: {0}")]
    UnresolvedTimezone(String),
}

impl TimeError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInstant(msg.into())
    }
}
