//! Bounded memo of computed charts.
//!
//! Keys use the `to_bits()` of the UT Julian Day and coordinates: two
//! requests share an entry only when they resolve to bit-identical inputs.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use kundali_time::Instant;
use parking_lot::Mutex;
use tracing::debug;

use crate::chart::ChartResult;
use crate::options::ChartOptions;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChartKey {
    jd_ut_bits: u64,
    latitude_bits: u64,
    longitude_bits: u64,
    offset_seconds: i32,
    time_unknown: bool,
    options: ChartOptions,
}

impl ChartKey {
    pub fn new(instant: &Instant, options: &ChartOptions) -> Self {
        let loc = instant.location();
        Self {
            jd_ut_bits: instant.jd_ut().to_bits(),
            latitude_bits: loc.latitude_deg.to_bits(),
            longitude_bits: loc.longitude_deg.to_bits(),
            offset_seconds: instant.offset().seconds(),
            time_unknown: instant.is_approximate(),
            options: options.clone(),
        }
    }
}

/// Hit/miss counters since construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub len: usize,
}

struct Inner {
    map: HashMap<ChartKey, Arc<ChartResult>>,
    /// Insertion order; the front is evicted first.
    order: VecDeque<ChartKey>,
    hits: u64,
    misses: u64,
}

/// FIFO-evicting chart cache shared by every worker.
pub struct ChartCache {
    capacity: usize,
    inner: Mutex<Inner>,
}

impl ChartCache {
    /// `capacity` must be non-zero; the config layer enforces it.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            inner: Mutex::new(Inner {
                map: HashMap::with_capacity(capacity.min(1024)),
                order: VecDeque::new(),
                hits: 0,
                misses: 0,
            }),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn get(&self, key: &ChartKey) -> Option<Arc<ChartResult>> {
        let mut inner = self.inner.lock();
        match inner.map.get(key).cloned() {
            Some(hit) => {
                inner.hits += 1;
                debug!(jd_ut = f64::from_bits(key.jd_ut_bits), "chart cache hit");
                Some(hit)
            }
            None => {
                inner.misses += 1;
                debug!(jd_ut = f64::from_bits(key.jd_ut_bits), "chart cache miss");
                None
            }
        }
    }

    /// Store `chart`, evicting the oldest entry when full. An existing entry
    /// for the same key is kept, so concurrent computations of one chart
    /// converge on a single `Arc`.
    pub fn insert(&self, key: ChartKey, chart: Arc<ChartResult>) -> Arc<ChartResult> {
        let mut inner = self.inner.lock();
        if let Some(existing) = inner.map.get(&key) {
            return Arc::clone(existing);
        }
        while inner.map.len() >= self.capacity {
            let Some(oldest) = inner.order.pop_front() else {
                break;
            };
            inner.map.remove(&oldest);
        }
        inner.order.push_back(key.clone());
        inner.map.insert(key, Arc::clone(&chart));
        chart
    }

    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        CacheStats {
            hits: inner.hits,
            misses: inner.misses,
            len: inner.map.len(),
        }
    }

    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.map.clear();
        inner.order.clear();
    }
}
