//! Bounded exponential backoff around provider calls.

use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

use crate::ephemeris::ProviderError;
use crate::error::ChartError;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetryPolicy {
    /// Total attempts including the first.
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff_ms: 50,
            max_backoff_ms: 1_000,
            multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    /// Single attempt, no sleeping.
    pub const NONE: Self = Self {
        max_attempts: 1,
        initial_backoff_ms: 0,
        max_backoff_ms: 0,
        multiplier: 1.0,
    };

    pub fn validate(&self) -> Result<(), ChartError> {
        if self.max_attempts == 0 {
            return Err(ChartError::Config("retry.max_attempts must be at least 1".into()));
        }
        if !(self.multiplier.is_finite() && self.multiplier >= 1.0) {
            return Err(ChartError::Config("retry.multiplier must be >= 1".into()));
        }
        if self.max_backoff_ms < self.initial_backoff_ms {
            return Err(ChartError::Config(
                "retry.max_backoff_ms must not be below initial_backoff_ms".into(),
            ));
        }
        Ok(())
    }

    /// Delay before retry number `retry` (0-based), capped at the maximum.
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = self.multiplier.powi(retry.min(63) as i32);
        let ms = (self.initial_backoff_ms as f64 * factor).min(self.max_backoff_ms as f64);
        Duration::from_millis(ms as u64)
    }

    /// Run `op`, retrying transient failures.
    ///
    /// Out-of-range epochs map to `InvalidInstant` immediately; an
    /// unavailable provider is retried until attempts run out, then
    /// reported as `CalculationUnavailable`.
    pub fn run<T>(&self, mut op: impl FnMut() -> Result<T, ProviderError>) -> Result<T, ChartError> {
        let attempts = self.max_attempts.max(1);
        let mut last = String::new();
        for attempt in 0..attempts {
            match op() {
                Ok(v) => return Ok(v),
                Err(ProviderError::Unavailable(reason)) => {
                    last = reason;
                    if attempt + 1 < attempts {
                        let delay = self.backoff(attempt);
                        warn!(attempt = attempt + 1, ?delay, reason = %last, "ephemeris unavailable, retrying");
                        std::thread::sleep(delay);
                    }
                }
                Err(e @ ProviderError::OutOfRange { .. }) => {
                    return Err(ChartError::InvalidInstant(e.to_string()));
                }
                Err(e) => {
                    return Err(ChartError::CalculationUnavailable {
                        attempts: attempt + 1,
                        reason: e.to_string(),
                    });
                }
            }
        }
        Err(ChartError::CalculationUnavailable { attempts, reason: last })
    }
}
