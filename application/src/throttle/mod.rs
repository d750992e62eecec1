//! Request throttle - bounded, paced, retrying queue for generation calls.
//!
//! The generation API behind the gateway is quota-constrained, so every
//! call goes through a [`Throttle`]: jobs are admitted into a FIFO queue
//! and a single dispatch task feeds them to a bounded worker pool.
//!
//! Guarantees:
//!
//! - at most `max_concurrent_requests` jobs are in flight at any instant
//!   (semaphore permits, released on every exit path)
//! - consecutive dispatch starts are separated by the pacing interval
//!   `1000 / max_requests_per_second` ms, globally across all slots
//! - transient rate-limit failures (HTTP 429, `RESOURCE_EXHAUSTED`, or
//!   "rate limit" in the message) are retried in place with exponential
//!   backoff, holding the same slot; other failures surface immediately
//! - [`Throttle::clear`] rejects every job still waiting in the queue;
//!   in-flight jobs run to their natural conclusion
//!
//! FIFO governs dispatch *start* order only: a job retrying under backoff
//! may finish after jobs admitted later.

use crate::ports::gateway::GatewayError;
use futures::future::BoxFuture;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{OwnedSemaphorePermit, Semaphore, mpsc, oneshot};
use tokio::time::Instant;
use tracing::{debug, warn};

/// Throttle tuning. All fields are externally settable.
#[derive(Debug, Clone)]
pub struct ThrottleConfig {
    /// Dispatch rate ceiling; pacing interval is `1 / max_requests_per_second`
    pub max_requests_per_second: f64,
    /// Hard cap on concurrently in-flight jobs
    pub max_concurrent_requests: usize,
    /// Base of the exponential backoff, in seconds
    pub backoff_multiplier: f64,
    /// Retries after the initial attempt before giving up
    pub max_retries: u32,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            max_requests_per_second: 2.0,
            max_concurrent_requests: 3,
            backoff_multiplier: 2.0,
            max_retries: 3,
        }
    }
}

impl ThrottleConfig {
    /// Minimum interval between dispatch starts
    pub fn pacing_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.max_requests_per_second)
    }
}

/// Errors surfaced to throttle callers
#[derive(Error, Debug)]
pub enum ThrottleError {
    /// The job kept hitting the rate limit through every allowed retry
    #[error("retries exhausted after {attempts} retries: {source}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: GatewayError,
    },

    /// Non-retryable upstream failure, surfaced immediately
    #[error("upstream failure: {0}")]
    Upstream(#[from] GatewayError),

    /// The queue was cleared before this job was dispatched
    #[error("cancelled: queue cleared before dispatch")]
    QueueCleared,

    /// The dispatch task is gone; no result will ever arrive
    #[error("throttle closed")]
    Closed,
}

/// A unit of throttled work. Must be safe to invoke more than once: it is
/// replayed verbatim on retry, not resumed.
pub type ThrottledWork<T> =
    Box<dyn Fn() -> BoxFuture<'static, Result<T, GatewayError>> + Send + Sync>;

struct Job<T> {
    work: ThrottledWork<T>,
    reply: oneshot::Sender<Result<T, ThrottleError>>,
}

enum Command<T> {
    Submit(Job<T>),
    Clear,
}

/// Handle to a running throttle. Cloneable; all clones feed one queue.
pub struct Throttle<T> {
    tx: mpsc::UnboundedSender<Command<T>>,
}

impl<T> Clone for Throttle<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T: Send + 'static> Throttle<T> {
    /// Spawn the dispatch task and return a handle to it.
    pub fn new(config: ThrottleConfig) -> Self {
        assert!(
            config.max_requests_per_second > 0.0,
            "max_requests_per_second must be positive"
        );
        assert!(
            config.max_concurrent_requests > 0,
            "max_concurrent_requests must be at least 1"
        );

        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(
            Dispatcher {
                config,
                rx,
                queue: VecDeque::new(),
            }
            .run(),
        );
        Self { tx }
    }

    /// Admit a job. Returns immediately; the future resolves when the job
    /// reaches a terminal state. The future does not borrow the throttle.
    pub fn submit<F>(
        &self,
        work: F,
    ) -> impl Future<Output = Result<T, ThrottleError>> + Send + use<T, F>
    where
        F: Fn() -> BoxFuture<'static, Result<T, GatewayError>> + Send + Sync + 'static,
    {
        let (reply_tx, reply_rx) = oneshot::channel();
        // If the dispatcher is gone the command (and its reply sender) is
        // dropped, which resolves the receiver below with Closed.
        let _ = self.tx.send(Command::Submit(Job {
            work: Box::new(work),
            reply: reply_tx,
        }));
        async move {
            match reply_rx.await {
                Ok(result) => result,
                Err(_) => Err(ThrottleError::Closed),
            }
        }
    }

    /// Reject every job still waiting in the queue with
    /// [`ThrottleError::QueueCleared`]. In-flight jobs are unaffected.
    pub fn clear(&self) {
        let _ = self.tx.send(Command::Clear);
    }
}

/// Classify a gateway failure against the fixed transient-rate-limit
/// signature set: HTTP 429, `RESOURCE_EXHAUSTED`, or "rate limit" in the
/// message. This exact set is part of the gateway contract.
pub(crate) fn is_transient_rate_limit(err: &GatewayError) -> bool {
    if err.status() == Some(429) {
        return true;
    }
    let text = err.to_string();
    text.contains("RESOURCE_EXHAUSTED") || text.to_ascii_lowercase().contains("rate limit")
}

/// The single dispatch authority: owns the FIFO queue and the pacing clock.
struct Dispatcher<T> {
    config: ThrottleConfig,
    rx: mpsc::UnboundedReceiver<Command<T>>,
    queue: VecDeque<Job<T>>,
}

impl<T: Send + 'static> Dispatcher<T> {
    async fn run(mut self) {
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_requests));
        let mut last_dispatch: Option<Instant> = None;
        let mut open = true;

        loop {
            if self.queue.is_empty() {
                if !open {
                    break;
                }
                match self.rx.recv().await {
                    Some(cmd) => self.handle(cmd),
                    None => open = false,
                }
            } else if open {
                tokio::select! {
                    // Commands take priority so a clear() cannot be overtaken
                    // by the dispatch it was meant to prevent.
                    biased;
                    cmd = self.rx.recv() => match cmd {
                        Some(cmd) => self.handle(cmd),
                        None => open = false,
                    },
                    permit = Arc::clone(&semaphore).acquire_owned() => {
                        let permit = permit.expect("throttle semaphore is never closed");
                        self.dispatch_head(permit, &mut last_dispatch).await;
                    }
                }
            } else {
                // Channel closed with work still queued: drain it.
                let permit = Arc::clone(&semaphore)
                    .acquire_owned()
                    .await
                    .expect("throttle semaphore is never closed");
                self.dispatch_head(permit, &mut last_dispatch).await;
            }
        }
    }

    fn handle(&mut self, cmd: Command<T>) {
        match cmd {
            Command::Submit(job) => self.queue.push_back(job),
            Command::Clear => {
                let rejected = self.queue.len();
                for job in self.queue.drain(..) {
                    let _ = job.reply.send(Err(ThrottleError::QueueCleared));
                }
                debug!(rejected, "queue cleared");
            }
        }
    }

    /// Pace, pop the queue head, and hand it to a worker holding `permit`.
    async fn dispatch_head(
        &mut self,
        permit: OwnedSemaphorePermit,
        last_dispatch: &mut Option<Instant>,
    ) {
        // Pacing is global: the dispatcher sleeps here, before occupying the
        // slot, so starts are spaced regardless of how many slots are free.
        let interval = self.config.pacing_interval();
        if let Some(last) = *last_dispatch {
            let next = last + interval;
            if next > Instant::now() {
                tokio::time::sleep_until(next).await;
            }
        }
        *last_dispatch = Some(Instant::now());

        let job = self.queue.pop_front().expect("dispatch on non-empty queue");
        let config = self.config.clone();
        tokio::spawn(async move {
            let result = run_with_retries(&job.work, &config).await;
            let _ = job.reply.send(result);
            // Slot released on every exit path, including retry exhaustion.
            drop(permit);
        });
    }
}

/// Execute one job, retrying transient rate limits in place.
///
/// The nth retry (0-based) sleeps `backoff_multiplier^n` seconds, so the
/// total wait before giving up is the geometric sum over the allowed
/// retries. The attempt counter lives here, on the worker's stack: it
/// cannot leak past any terminal path.
async fn run_with_retries<T>(
    work: &ThrottledWork<T>,
    config: &ThrottleConfig,
) -> Result<T, ThrottleError> {
    let mut attempt: u32 = 0;
    loop {
        match (work)().await {
            Ok(value) => return Ok(value),
            Err(err) if is_transient_rate_limit(&err) => {
                if attempt >= config.max_retries {
                    warn!(attempts = attempt, "rate-limit retries exhausted");
                    return Err(ThrottleError::RetriesExhausted {
                        attempts: attempt,
                        source: err,
                    });
                }
                let delay =
                    Duration::from_secs_f64(config.backoff_multiplier.powi(attempt as i32));
                debug!(
                    attempt,
                    delay_secs = delay.as_secs_f64(),
                    "rate limited, backing off"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(ThrottleError::Upstream(err)),
        }
    }
}
