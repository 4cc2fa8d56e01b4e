//! Birth-chart engine.
//!
//! Wires the pure chart math in `kundali_base` to an ephemeris provider:
//! - [`compute_chart`]: positions, houses, divisional charts and aspects
//! - [`dasha_tree`]: Vimshottari periods for a window
//! - [`strength()`]: shadbala and ashtakavarga
//! - [`yogas()`]: catalog matches with a strength tag
//!
//! [`ChartEngine`] adds retries and a cache on top; [`ChartPool`] runs
//! independent charts on worker threads. [`ChartReport`] is the serialized
//! form with explicit units.

pub mod cache;
pub mod chart;
pub mod config;
pub mod dasha;
pub mod engine;
pub mod ephemeris;
pub mod error;
pub mod options;
pub mod pool;
pub mod report;
pub mod retry;
pub mod strength;
pub mod yogas;

pub use cache::{CacheStats, ChartCache};
pub use chart::{Angles, BodyPosition, ChartResult, Motion, compute_chart};
pub use config::EngineConfig;
pub use dasha::{active_periods, dasha_from_birth, dasha_tree};
pub use engine::ChartEngine;
pub use ephemeris::{AnalyticEphemeris, EphemerisProvider, NodeMode, ProviderError, RawPosition};
pub use error::ChartError;
pub use options::ChartOptions;
pub use pool::{ChartPool, ChartRequest, Ticket};
pub use report::{ChartReport, Measure, Unit};
pub use retry::RetryPolicy;
pub use strength::{StrengthReport, strength};
pub use yogas::yogas;
