//! High-level chart engine.
//!
//! [`ChartEngine`] owns an ephemeris provider, the retry policy around it and
//! an optional chart cache. It is [`Send`] + [`Sync`]; share it through
//! `Arc<ChartEngine>` (the [`crate::pool::ChartPool`] does exactly that).

use std::sync::Arc;

use kundali_base::dasha::DashaTree;
use kundali_base::yoga::YogaMatch;
use kundali_time::Instant;
use tracing::info;

use crate::cache::{CacheStats, ChartCache, ChartKey};
use crate::chart::{ChartResult, compute_chart};
use crate::config::{DashaSection, EngineConfig};
use crate::dasha;
use crate::ephemeris::{AnalyticEphemeris, EphemerisProvider};
use crate::error::ChartError;
use crate::options::ChartOptions;
use crate::report::ChartReport;
use crate::retry::RetryPolicy;
use crate::strength::{StrengthReport, strength};
use crate::yogas::yogas;

pub struct ChartEngine {
    provider: Arc<dyn EphemerisProvider>,
    retry: RetryPolicy,
    cache: Option<ChartCache>,
    dasha: DashaSection,
}

impl std::fmt::Debug for ChartEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChartEngine")
            .field("provider", &self.provider.version())
            .field("retry", &self.retry)
            .field("cache_capacity", &self.cache.as_ref().map(ChartCache::capacity))
            .finish()
    }
}

impl ChartEngine {
    pub fn new(provider: Arc<dyn EphemerisProvider>, retry: RetryPolicy) -> Result<Self, ChartError> {
        retry.validate()?;
        Ok(Self {
            provider,
            retry,
            cache: None,
            dasha: DashaSection::default(),
        })
    }

    /// Engine over the built-in analytic provider, configured from `config`.
    pub fn from_config(config: &EngineConfig) -> Result<Self, ChartError> {
        config.validate()?;
        let provider = Arc::new(AnalyticEphemeris::new(config.chart.node_mode));
        let mut engine = Self::new(provider, config.retry)?;
        engine.dasha = config.dasha;
        if config.pool.cache_capacity > 0 {
            engine.cache = Some(ChartCache::new(config.pool.cache_capacity));
        }
        info!(
            provider = engine.provider.version(),
            cache_capacity = config.pool.cache_capacity,
            "chart engine ready"
        );
        Ok(engine)
    }

    /// Put a read-through cache of `capacity` charts in front of the provider.
    pub fn with_cache(mut self, capacity: usize) -> Self {
        self.cache = (capacity > 0).then(|| ChartCache::new(capacity));
        self
    }

    pub fn provider(&self) -> &dyn EphemerisProvider {
        self.provider.as_ref()
    }

    pub fn provider_arc(&self) -> &Arc<dyn EphemerisProvider> {
        &self.provider
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    pub fn dasha_defaults(&self) -> DashaSection {
        self.dasha
    }

    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(ChartCache::stats)
    }

    /// Compute (or fetch from cache) the chart for `instant`.
    pub fn compute_chart(
        &self,
        instant: &Instant,
        options: &ChartOptions,
    ) -> Result<Arc<ChartResult>, ChartError> {
        let Some(cache) = &self.cache else {
            return Ok(Arc::new(self.compute_uncached(instant, options)?));
        };
        let key = ChartKey::new(instant, options);
        if let Some(hit) = cache.get(&key) {
            return Ok(hit);
        }
        let chart = Arc::new(self.compute_uncached(instant, options)?);
        Ok(cache.insert(key, chart))
    }

    fn compute_uncached(&self, instant: &Instant, options: &ChartOptions) -> Result<ChartResult, ChartError> {
        compute_chart(self.provider.as_ref(), &self.retry, instant, options)
    }

    pub fn strength(&self, chart: &ChartResult) -> StrengthReport {
        strength(chart)
    }

    pub fn yogas(&self, chart: &ChartResult, strengths: &StrengthReport) -> Vec<YogaMatch> {
        yogas(chart, strengths)
    }

    /// Dasha tree for `chart` over `[window_start, window_end)` UT Julian Days.
    pub fn dasha_tree(
        &self,
        chart: &ChartResult,
        max_depth: u8,
        window_start: f64,
        window_end: f64,
    ) -> Result<DashaTree, ChartError> {
        dasha::dasha_tree(chart.moon_sidereal_deg(), &chart.instant, max_depth, window_start, window_end)
    }

    /// Dasha tree from birth using the configured depth and window length.
    pub fn default_dasha(&self, chart: &ChartResult) -> Result<DashaTree, ChartError> {
        dasha::dasha_from_birth(
            chart.moon_sidereal_deg(),
            &chart.instant,
            self.dasha.max_depth,
            self.dasha.window_years,
        )
    }

    /// Chart, dasha, strength and yogas in one serializable report.
    pub fn full_report(&self, instant: &Instant, options: &ChartOptions) -> Result<ChartReport, ChartError> {
        let chart = self.compute_chart(instant, options)?;
        let tree = self.default_dasha(&chart)?;
        let strengths = self.strength(&chart);
        let matches = self.yogas(&chart, &strengths);
        Ok(ChartReport::new(&chart)
            .with_dasha(&tree)
            .with_strength(&strengths)
            .with_yogas(matches))
    }
}
