//! Worker pool behavior: batches, per-request errors and timeouts.

use std::sync::Arc;
use std::time::Duration;

use kundali_base::Graha;
use kundali_engine::{
    AnalyticEphemeris, ChartEngine, ChartError, ChartOptions, ChartPool, ChartRequest,
    EngineConfig, EphemerisProvider, ProviderError, RawPosition, RetryPolicy,
};
use kundali_time::{CivilDate, GeoLocation, Instant, TimeOfDay, UtcOffset};

fn request(year: i32) -> ChartRequest {
    ChartRequest {
        instant: Instant::new(
            CivilDate::new(year, 4, 14).unwrap(),
            Some(TimeOfDay::new(6, 0, 0.0).unwrap()),
            UtcOffset::from_hours(1.0).unwrap(),
            GeoLocation::new(51.5, -0.1).unwrap(),
        ),
        options: ChartOptions::default(),
    }
}

/// Answers correctly, but only after a fixed delay.
struct SlowProvider {
    inner: AnalyticEphemeris,
    delay: Duration,
}

impl EphemerisProvider for SlowProvider {
    fn positions(&self, jd_tt: f64, bodies: &[Graha]) -> Result<Vec<RawPosition>, ProviderError> {
        std::thread::sleep(self.delay);
        self.inner.positions(jd_tt, bodies)
    }

    fn supported_range(&self) -> (f64, f64) {
        self.inner.supported_range()
    }

    fn version(&self) -> String {
        "slow".to_string()
    }
}

/// Results come back in submission order, one per request.
#[test]
fn batch_returns_in_order() {
    let pool = ChartPool::from_config(&EngineConfig::default()).unwrap();
    let years = [1950, 1975, 2000, 2025];
    let replies = pool.run_batch(years.iter().map(|&y| request(y)).collect());
    assert_eq!(replies.len(), years.len());
    for (reply, year) in replies.into_iter().zip(years) {
        let chart = reply.unwrap();
        assert_eq!(chart.instant.date().year, year);
    }
}

/// One bad request fails alone; its neighbours still succeed.
#[test]
fn failures_are_per_request() {
    let pool = ChartPool::from_config(&EngineConfig::default()).unwrap();
    let replies = pool.run_batch(vec![request(2000), request(1700), request(2010)]);
    assert!(replies[0].is_ok());
    assert!(matches!(replies[1], Err(ChartError::InvalidInstant(_))));
    assert!(replies[2].is_ok());
}

/// A ticket gives up after its timeout while the worker is still busy.
#[test]
fn slow_request_times_out() {
    let provider = Arc::new(SlowProvider {
        inner: AnalyticEphemeris::default(),
        delay: Duration::from_millis(500),
    });
    let engine = Arc::new(ChartEngine::new(provider, RetryPolicy::NONE).unwrap());
    let pool = ChartPool::new(engine, 1, Duration::from_millis(20)).unwrap();
    let ticket = pool.submit(request(2000)).unwrap();
    assert_eq!(ticket.wait(), Err(ChartError::Timeout(20)));
}

/// The same slow request completes when given enough time.
#[test]
fn explicit_wait_overrides_pool_timeout() {
    let provider = Arc::new(SlowProvider {
        inner: AnalyticEphemeris::default(),
        delay: Duration::from_millis(10),
    });
    let engine = Arc::new(ChartEngine::new(provider, RetryPolicy::NONE).unwrap());
    let pool = ChartPool::new(engine, 2, Duration::from_millis(1)).unwrap();
    let ticket = pool.submit(request(2000)).unwrap();
    assert!(ticket.wait_for(Duration::from_secs(30)).is_ok());
}

/// Workers count matches the config.
#[test]
fn pool_size_from_config() {
    let config = EngineConfig::parse("[pool]\nworkers = 3\n").unwrap();
    let pool = ChartPool::from_config(&config).unwrap();
    assert_eq!(pool.workers(), 3);
}
