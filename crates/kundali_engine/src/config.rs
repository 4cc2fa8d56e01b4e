//! TOML engine configuration.
//!
//! ```toml
//! [chart]
//! ayanamsha = "lahiri"
//! house_system = "whole_sign"
//! divisions = [1, 9, 10]
//! node_mode = "mean"
//!
//! [dasha]
//! max_depth = 3
//! window_years = 120.0
//!
//! [retry]
//! max_attempts = 3
//!
//! [pool]
//! workers = 4
//! cache_capacity = 256
//! timeout_ms = 30000
//! ```

use std::path::Path;

use kundali_base::dasha::MAX_DASHA_DEPTH;
use serde::Deserialize;

use crate::ephemeris::NodeMode;
use crate::error::ChartError;
use crate::options::ChartOptions;
use crate::retry::RetryPolicy;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChartSection {
    pub ayanamsha: String,
    pub house_system: String,
    pub divisions: Vec<u16>,
    pub node_mode: NodeMode,
}

impl Default for ChartSection {
    fn default() -> Self {
        Self {
            ayanamsha: "lahiri".to_string(),
            house_system: "whole_sign".to_string(),
            divisions: vec![1, 9],
            node_mode: NodeMode::Mean,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashaSection {
    pub max_depth: u8,
    /// Window length from birth.
    pub window_years: f64,
}

impl Default for DashaSection {
    fn default() -> Self {
        Self {
            max_depth: 3,
            window_years: 120.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PoolSection {
    pub workers: usize,
    /// Zero disables the chart cache.
    pub cache_capacity: usize,
    pub timeout_ms: u64,
}

impl Default for PoolSection {
    fn default() -> Self {
        Self {
            workers: 4,
            cache_capacity: 256,
            timeout_ms: 30_000,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub chart: ChartSection,
    pub dasha: DashaSection,
    pub retry: RetryPolicy,
    pub pool: PoolSection,
}

impl EngineConfig {
    pub fn from_file(path: &Path) -> Result<Self, ChartError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ChartError::Config(format!("failed to read {}: {e}", path.display())))?;
        Self::parse(&content)
    }

    /// Parse and validate.
    pub fn parse(content: &str) -> Result<Self, ChartError> {
        let config: Self = toml::from_str(content).map_err(|e| ChartError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ChartError> {
        self.chart_options()?;
        if self.dasha.max_depth == 0 || self.dasha.max_depth > MAX_DASHA_DEPTH {
            return Err(ChartError::Config(format!(
                "dasha.max_depth must be in 1..={MAX_DASHA_DEPTH}"
            )));
        }
        if !(self.dasha.window_years.is_finite() && self.dasha.window_years > 0.0) {
            return Err(ChartError::Config("dasha.window_years must be positive".into()));
        }
        self.retry.validate()?;
        if self.pool.workers == 0 {
            return Err(ChartError::Config("pool.workers must be greater than zero".into()));
        }
        if self.pool.timeout_ms == 0 {
            return Err(ChartError::Config("pool.timeout_ms must be greater than zero".into()));
        }
        Ok(())
    }

    /// `[chart]` as typed options; unsupported names surface as the
    /// matching `Unsupported*` error.
    pub fn chart_options(&self) -> Result<ChartOptions, ChartError> {
        ChartOptions::parse(&self.chart.ayanamsha, &self.chart.house_system, &self.chart.divisions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_default() {
        let c = EngineConfig::parse("").unwrap();
        assert_eq!(c, EngineConfig::default());
        assert_eq!(c.chart_options().unwrap(), ChartOptions::default());
    }

    #[test]
    fn parse_full_document() {
        let c = EngineConfig::parse(
            r#"
[chart]
ayanamsha = "raman"
house_system = "placidus"
divisions = [1, 9, 60]
node_mode = "true"

[dasha]
max_depth = 2
window_years = 40.0

[retry]
max_attempts = 5
initial_backoff_ms = 10

[pool]
workers = 2
cache_capacity = 0
timeout_ms = 500
"#,
        )
        .unwrap();
        assert_eq!(c.chart.node_mode, NodeMode::True);
        assert_eq!(c.chart_options().unwrap().division_numbers(), vec![1, 9, 60]);
        assert_eq!(c.dasha.max_depth, 2);
        assert_eq!(c.retry.max_attempts, 5);
        assert_eq!(c.retry.max_backoff_ms, RetryPolicy::default().max_backoff_ms);
        assert_eq!(c.pool.cache_capacity, 0);
    }

    #[test]
    fn unknown_key_rejected() {
        let err = EngineConfig::parse("[pool]\nthreads = 3\n").unwrap_err();
        assert!(matches!(err, ChartError::Config(_)));
    }

    #[test]
    fn unsupported_division_rejected() {
        let err = EngineConfig::parse("[chart]\ndivisions = [13]\n").unwrap_err();
        assert_eq!(err, ChartError::UnsupportedDivision(13));
    }

    #[test]
    fn out_of_range_numbers_rejected() {
        assert!(EngineConfig::parse("[dasha]\nmax_depth = 9\n").is_err());
        assert!(EngineConfig::parse("[pool]\nworkers = 0\n").is_err());
        assert!(EngineConfig::parse("[retry]\nmax_attempts = 0\n").is_err());
    }
}
