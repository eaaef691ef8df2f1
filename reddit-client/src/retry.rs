use async_trait::async_trait;
use extractor_core::{ErrorExt, ExtractionError};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Configuration for retry behavior
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Retries allowed after the first attempt
    pub max_retries: u32,
    /// Wait before the first retry
    pub initial_delay: Duration,
    /// Multiplier applied to the wait after every retry
    pub backoff_multiplier: f64,
    /// Upper bound for a single wait, unbounded by default
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 4,
            initial_delay: Duration::from_secs(1),
            backoff_multiplier: 2.0,
            max_delay: Duration::MAX,
        }
    }
}

/// Exponential backoff as a plain state machine: it only counts attempts and
/// computes waits, the caller decides how to sleep.
#[derive(Debug, Clone)]
pub struct Backoff {
    retries_used: u32,
    max_retries: u32,
    next_wait: Duration,
    multiplier: f64,
    max_delay: Duration,
}

impl Backoff {
    pub fn new(config: &RetryConfig) -> Self {
        Self {
            retries_used: 0,
            max_retries: config.max_retries,
            next_wait: config.initial_delay.min(config.max_delay),
            multiplier: config.backoff_multiplier,
            max_delay: config.max_delay,
        }
    }

    /// Attempts made so far, counting the one in flight.
    pub fn attempts(&self) -> u32 {
        self.retries_used + 1
    }

    pub fn retries_used(&self) -> u32 {
        self.retries_used
    }

    pub fn is_exhausted(&self) -> bool {
        self.retries_used >= self.max_retries
    }

    /// Wait before the next attempt, or `None` once every retry is spent.
    pub fn next_delay(&mut self) -> Option<Duration> {
        if self.is_exhausted() {
            return None;
        }
        let delay = self.next_wait;
        self.retries_used += 1;
        self.next_wait = Duration::try_from_secs_f64(delay.as_secs_f64() * self.multiplier)
            .unwrap_or(Duration::MAX)
            .min(self.max_delay);
        Some(delay)
    }
}

impl Iterator for Backoff {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        self.next_delay()
    }
}

/// Retry strategy based on error type
#[derive(Debug, Clone, PartialEq)]
pub enum RetryStrategy {
    /// Retry after the next backoff delay
    Retry,
    /// Don't retry (for permanent failures)
    NoRetry,
}

/// Transient statuses and network errors are retried, everything else
/// (bad URL, other statuses, malformed payloads, IO) surfaces at once.
pub fn get_retry_strategy(error: &ExtractionError) -> RetryStrategy {
    if error.is_retryable() {
        RetryStrategy::Retry
    } else {
        RetryStrategy::NoRetry
    }
}

/// Suspends the retry loop between attempts.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, delay: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}

/// Retry metrics for monitoring
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RetryMetrics {
    pub total_retries: u64,
    pub successful_retries: u64,
    pub failed_operations: u64,
    pub total_delay: Duration,
}

/// Retry executor that wraps operations with retry logic
#[derive(Debug)]
pub struct RetryExecutor<S = TokioSleeper> {
    config: RetryConfig,
    sleeper: S,
    metrics: RetryMetrics,
}

impl RetryExecutor<TokioSleeper> {
    pub fn new(config: RetryConfig) -> Self {
        Self::with_sleeper(config, TokioSleeper)
    }
}

impl<S: Sleeper> RetryExecutor<S> {
    pub fn with_sleeper(config: RetryConfig, sleeper: S) -> Self {
        Self {
            config,
            sleeper,
            metrics: RetryMetrics::default(),
        }
    }

    /// Runs `operation` until it succeeds, fails permanently, or the backoff
    /// runs out. `target` names the resource in logs and in the exhaustion
    /// error.
    pub async fn execute<F, Fut, T>(
        &mut self,
        target: &str,
        mut operation: F,
    ) -> Result<T, ExtractionError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ExtractionError>>,
    {
        let mut backoff = Backoff::new(&self.config);
        let mut total_delay = Duration::ZERO;

        loop {
            let attempt = backoff.attempts();
            if attempt > 1 {
                debug!("Retry attempt {} for {}", attempt - 1, target);
            }

            let error = match operation().await {
                Ok(result) => {
                    if attempt > 1 {
                        self.metrics.successful_retries += 1;
                        info!(
                            "Fetch of {} succeeded after {} retries (total delay: {:?})",
                            target,
                            attempt - 1,
                            total_delay
                        );
                    }
                    return Ok(result);
                }
                Err(error) => error,
            };

            debug!("Attempt {} failed for {}: {}", attempt, target, error);

            if get_retry_strategy(&error) == RetryStrategy::NoRetry {
                debug!("Not retrying {} due to error type: {}", target, error);
                self.metrics.failed_operations += 1;
                return Err(error);
            }

            match backoff.next_delay() {
                Some(delay) => {
                    info!("Retrying {} in {:?} due to: {}", target, delay, error);
                    total_delay = total_delay.saturating_add(delay);
                    self.metrics.total_retries += 1;
                    self.metrics.total_delay = self.metrics.total_delay.saturating_add(delay);
                    self.sleeper.sleep(delay).await;
                }
                None => {
                    warn!(
                        "Giving up on {} after {} attempts (total delay: {:?})",
                        target, attempt, total_delay
                    );
                    self.metrics.failed_operations += 1;
                    return Err(ExtractionError::RetriesExhausted {
                        attempts: attempt,
                        url: target.to_string(),
                        last_error: error.to_string(),
                    });
                }
            }
        }
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    pub fn metrics(&self) -> &RetryMetrics {
        &self.metrics
    }

}
