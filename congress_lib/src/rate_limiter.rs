//! Token-bucket rate limiting and the retrying request executor.
//!
//! Two buckets exist per process: one paces the Congress.gov JSON API, the
//! other caps how many XML feed documents are requested per second. Both are
//! built once from [`crate::Config`] and shared by reference.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use congress_api::RetryClass;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};

use crate::error::CongressError;

/// Minimum burst capacity for the JSON API bucket.
const MIN_API_CAPACITY: f64 = 10.0;

struct BucketState {
    tokens: f64,
    last_refill: Instant,
}

/// Token bucket refilled lazily on each acquisition.
///
/// Tokens accrue at `rate` per second up to `capacity`. There is no
/// background timer: elapsed time is credited when `acquire()` takes the lock.
pub struct TokenBucket {
    rate: f64,
    capacity: f64,
    state: Mutex<BucketState>,
    tracker: RequestTracker,
}

impl TokenBucket {
    /// Creates a full bucket. Fails unless both values are finite and > 0.
    pub fn new(rate: f64, capacity: f64) -> Result<Self, CongressError> {
        if !(rate.is_finite() && rate > 0.0) || !(capacity.is_finite() && capacity > 0.0) {
            return Err(CongressError::Limiter(format!(
                "rate and capacity must be positive (rate={}, capacity={})",
                rate, capacity
            )));
        }
        Ok(Self {
            rate,
            capacity,
            state: Mutex::new(BucketState {
                tokens: capacity,
                last_refill: Instant::now(),
            }),
            tracker: RequestTracker::new(),
        })
    }

    /// Bucket for the JSON API: sustained `requests_per_second`, burst of
    /// five seconds' worth (at least ten).
    pub fn for_congress_api(requests_per_second: f64) -> Result<Self, CongressError> {
        Self::new(
            requests_per_second,
            (requests_per_second * 5.0).max(MIN_API_CAPACITY),
        )
    }

    /// Bucket for XML feeds: `max_concurrency` tokens refilled at
    /// `max_concurrency` per second, which approximates a semaphore.
    pub fn for_xml_feeds(max_concurrency: u32) -> Result<Self, CongressError> {
        let n = f64::from(max_concurrency);
        Self::new(n, n)
    }

    /// Waits until a token is available, then consumes it.
    ///
    /// The refill and decrement happen under the lock. A caller that finds
    /// the bucket empty reserves the next token (the count goes negative),
    /// releases the lock, and sleeps for the deficit, so later callers queue
    /// behind it instead of all waking at once.
    pub async fn acquire(&self) {
        let wait = {
            let mut state = self.state.lock().await;
            let now = Instant::now();
            let elapsed = now.duration_since(state.last_refill).as_secs_f64();
            state.tokens = (state.tokens + elapsed * self.rate).min(self.capacity);
            state.last_refill = now;
            state.tokens -= 1.0;
            if state.tokens >= 0.0 {
                None
            } else {
                // Deficits too large for a Duration wait forever.
                let secs = -state.tokens / self.rate;
                Some(Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX))
            }
        };

        if let Some(wait) = wait {
            tracing::debug!("Rate limiter waiting {:.3}s for a token", wait.as_secs_f64());
            sleep(wait).await;
        }
    }

    /// Non-blocking snapshot of tokens currently in the bucket, without
    /// crediting time since the last acquisition.
    ///
    /// Returns `None` if the lock is contended.
    pub fn available_tokens(&self) -> Option<f64> {
        self.state.try_lock().ok().map(|s| s.tokens)
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    /// Access the request tracker for recording outcomes.
    pub fn tracker(&self) -> &RequestTracker {
        &self.tracker
    }
}

/// Attempt outcomes seen by [`with_retry`] for every call through one bucket.
///
/// Every attempt is counted once, under the outcome that ended it.
pub struct RequestTracker {
    attempts: AtomicU64,
    successes: AtomicU64,
    retries: AtomicU64,
    failed_calls: AtomicU64,
    backoff_ms: AtomicU64,
}

impl RequestTracker {
    fn new() -> Self {
        Self {
            attempts: AtomicU64::new(0),
            successes: AtomicU64::new(0),
            retries: AtomicU64::new(0),
            failed_calls: AtomicU64::new(0),
            backoff_ms: AtomicU64::new(0),
        }
    }

    fn count(&self, outcome: &AtomicU64) {
        self.attempts.fetch_add(1, Ordering::Relaxed);
        outcome.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_success(&self) {
        self.count(&self.successes);
    }

    pub fn record_retry(&self) {
        self.count(&self.retries);
    }

    /// A call that ended in an error, whether fatal or out of attempts.
    pub fn record_failure(&self) {
        self.count(&self.failed_calls);
    }

    pub fn record_backoff(&self, delay: Duration) {
        let ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self.backoff_ms.fetch_add(ms, Ordering::Relaxed);
    }

    pub fn summary(&self) -> TrackerSummary {
        TrackerSummary {
            attempts: self.attempts.load(Ordering::Relaxed),
            successes: self.successes.load(Ordering::Relaxed),
            retries: self.retries.load(Ordering::Relaxed),
            failed_calls: self.failed_calls.load(Ordering::Relaxed),
            backoff_secs: self.backoff_ms.load(Ordering::Relaxed) as f64 / 1000.0,
        }
    }
}

/// Point-in-time copy of a [`RequestTracker`].
#[derive(Debug, Clone, serde::Serialize)]
pub struct TrackerSummary {
    /// Upstream calls issued, retries included.
    pub attempts: u64,
    pub successes: u64,
    /// Attempts that failed and were followed by another.
    pub retries: u64,
    /// Calls that returned an error to the caller.
    pub failed_calls: u64,
    /// Time slept between attempts.
    pub backoff_secs: f64,
}

/// Attempt budget and backoff schedule for [`with_retry`].
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total calls allowed, including the first.
    pub max_attempts: u32,
    /// Sleep before the second attempt.
    pub initial_delay: Duration,
    /// Factor applied to the delay after each retry.
    pub backoff: f64,
    /// Optional ceiling on a single delay. `None` lets the delay grow
    /// without bound.
    pub max_delay: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(1),
            backoff: 2.0,
            max_delay: None,
        }
    }
}

impl RetryPolicy {
    /// Sleep taken before `attempt` (1-based). Zero for the first attempt,
    /// `initial_delay * backoff^(attempt - 2)` afterwards.
    pub fn delay_before_attempt(&self, attempt: u32) -> Duration {
        if attempt < 2 {
            return Duration::ZERO;
        }
        let exp = i32::try_from(attempt - 2).unwrap_or(i32::MAX);
        let secs = self.initial_delay.as_secs_f64() * self.backoff.powi(exp);
        self.cap(Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX))
    }

    fn cap(&self, delay: Duration) -> Duration {
        match self.max_delay {
            Some(max) => delay.min(max),
            None => delay,
        }
    }
}

/// Runs `operation` through `limiter` with retries and exponential backoff.
///
/// - Acquires a token before every attempt.
/// - HTTP 5xx/429 and network failures are retried, as are decode failures
///   (logged separately as unexpected).
/// - Any other HTTP 4xx aborts immediately with [`CongressError::Permanent`].
/// - When attempts run out the last failure is returned as
///   [`CongressError::Transient`].
///
/// `call` labels the request in logs and in the returned error.
pub async fn with_retry<T, F, Fut>(
    limiter: &TokenBucket,
    policy: &RetryPolicy,
    call: &str,
    mut operation: F,
) -> Result<T, CongressError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, congress_api::Error>>,
{
    let tracker = limiter.tracker();
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1u32;

    loop {
        limiter.acquire().await;
        tracing::debug!("Executing {} (attempt {}/{})", call, attempt, max_attempts);

        let err = match operation().await {
            Ok(value) => {
                tracker.record_success();
                return Ok(value);
            }
            Err(err) => err,
        };

        let class = err.retry_class();
        if class == RetryClass::Fatal {
            tracker.record_failure();
            tracing::error!("{} | {} | attempt={}/{} | not retrying", call, err, attempt, max_attempts);
            return Err(CongressError::Permanent {
                call: call.to_string(),
                attempts: attempt,
                source: err,
            });
        }

        if attempt >= max_attempts {
            tracker.record_failure();
            tracing::error!(
                "{} | {} | attempt={}/{} | giving up",
                call,
                err,
                attempt,
                max_attempts
            );
            return Err(CongressError::Transient {
                call: call.to_string(),
                attempts: attempt,
                source: err,
            });
        }

        attempt += 1;
        let delay = policy.delay_before_attempt(attempt);
        match class {
            RetryClass::Http => tracing::warn!(
                "HTTP {} on {} | call={} | attempt={}/{} | retrying in {:.2}s",
                err.status().unwrap_or_default(),
                err.url(),
                call,
                attempt - 1,
                max_attempts,
                delay.as_secs_f64()
            ),
            RetryClass::Network => tracing::warn!(
                "Network error calling {} | call={} | attempt={}/{} | retrying in {:.2}s",
                err.url(),
                call,
                attempt - 1,
                max_attempts,
                delay.as_secs_f64()
            ),
            _ => tracing::error!(
                "Unexpected error in {} attempt {}/{}: {} | retrying in {:.2}s",
                call,
                attempt - 1,
                max_attempts,
                err,
                delay.as_secs_f64()
            ),
        }

        tracker.record_retry();
        tracker.record_backoff(delay);
        sleep(delay).await;
    }
}
