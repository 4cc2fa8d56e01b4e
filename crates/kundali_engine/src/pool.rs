//! Fixed-size worker pool for independent chart requests.
//!
//! Workers share one [`ChartEngine`] and pull jobs from a single queue. Each
//! submission returns a [`Ticket`]; waiting on it is bounded by the pool's
//! timeout. A chart that times out is abandoned by the caller, not cancelled:
//! its worker finishes it and drops the result.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

use kundali_time::Instant;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::chart::ChartResult;
use crate::config::EngineConfig;
use crate::engine::ChartEngine;
use crate::error::ChartError;
use crate::options::ChartOptions;

/// One chart request.
#[derive(Debug, Clone)]
pub struct ChartRequest {
    pub instant: Instant,
    pub options: ChartOptions,
}

type ChartReply = Result<Arc<ChartResult>, ChartError>;

struct Job {
    id: u64,
    request: ChartRequest,
    reply: Sender<ChartReply>,
}

/// Handle to one submitted request.
#[derive(Debug)]
pub struct Ticket {
    id: u64,
    timeout: Duration,
    rx: Receiver<ChartReply>,
}

impl Ticket {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Block until the chart is ready or the pool timeout elapses.
    pub fn wait(self) -> ChartReply {
        let timeout = self.timeout;
        self.wait_for(timeout)
    }

    pub fn wait_for(self, timeout: Duration) -> ChartReply {
        match self.rx.recv_timeout(timeout) {
            Ok(reply) => reply,
            Err(RecvTimeoutError::Timeout) => {
                warn!(ticket = self.id, timeout_ms = timeout.as_millis() as u64, "chart request timed out");
                Err(ChartError::Timeout(timeout.as_millis() as u64))
            }
            Err(RecvTimeoutError::Disconnected) => Err(ChartError::PoolClosed),
        }
    }
}

#[derive(Debug)]
pub struct ChartPool {
    engine: Arc<ChartEngine>,
    sender: Option<Sender<Job>>,
    workers: Vec<JoinHandle<()>>,
    timeout: Duration,
    next_id: Mutex<u64>,
}

impl ChartPool {
    pub fn new(engine: Arc<ChartEngine>, workers: usize, timeout: Duration) -> Result<Self, ChartError> {
        if workers == 0 {
            return Err(ChartError::Config("pool.workers must be greater than zero".into()));
        }
        let (sender, receiver) = mpsc::channel::<Job>();
        let receiver = Arc::new(Mutex::new(receiver));
        let mut handles = Vec::with_capacity(workers);
        for index in 0..workers {
            let engine = Arc::clone(&engine);
            let receiver = Arc::clone(&receiver);
            let handle = std::thread::Builder::new()
                .name(format!("kundali-worker-{index}"))
                .spawn(move || worker_loop(index, &engine, &receiver))
                .map_err(|e| ChartError::Config(format!("failed to spawn worker: {e}")))?;
            handles.push(handle);
        }
        info!(workers, timeout_ms = timeout.as_millis() as u64, "chart pool started");
        Ok(Self {
            engine,
            sender: Some(sender),
            workers: handles,
            timeout,
            next_id: Mutex::new(0),
        })
    }

    /// Engine, worker count and timeout all taken from `config`.
    pub fn from_config(config: &EngineConfig) -> Result<Self, ChartError> {
        let engine = Arc::new(ChartEngine::from_config(config)?);
        Self::new(engine, config.pool.workers, Duration::from_millis(config.pool.timeout_ms))
    }

    pub fn engine(&self) -> &Arc<ChartEngine> {
        &self.engine
    }

    pub fn workers(&self) -> usize {
        self.workers.len()
    }

    pub fn submit(&self, request: ChartRequest) -> Result<Ticket, ChartError> {
        let id = {
            let mut next = self.next_id.lock();
            *next += 1;
            *next
        };
        let (reply, rx) = mpsc::channel();
        let sender = self.sender.as_ref().ok_or(ChartError::PoolClosed)?;
        sender
            .send(Job { id, request, reply })
            .map_err(|_| ChartError::PoolClosed)?;
        Ok(Ticket {
            id,
            timeout: self.timeout,
            rx,
        })
    }

    /// Submit every request, then wait on each in order.
    pub fn run_batch(&self, requests: Vec<ChartRequest>) -> Vec<ChartReply> {
        let tickets: Vec<Result<Ticket, ChartError>> =
            requests.into_iter().map(|r| self.submit(r)).collect();
        tickets
            .into_iter()
            .map(|t| t.and_then(Ticket::wait))
            .collect()
    }
}

fn worker_loop(index: usize, engine: &ChartEngine, receiver: &Mutex<Receiver<Job>>) {
    loop {
        // The lock is released before the job runs.
        let job = receiver.lock().recv();
        let Ok(job) = job else {
            debug!(worker = index, "queue closed, worker exiting");
            return;
        };
        debug!(worker = index, ticket = job.id, "chart job started");
        let result = engine.compute_chart(&job.request.instant, &job.request.options);
        if job.reply.send(result).is_err() {
            debug!(worker = index, ticket = job.id, "requester gone, result dropped");
        }
    }
}

impl Drop for ChartPool {
    fn drop(&mut self) {
        drop(self.sender.take());
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                warn!("chart worker panicked");
            }
        }
        info!("chart pool stopped");
    }
}
