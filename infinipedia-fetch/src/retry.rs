//! Retry policy for provider calls.
//!
//! Only transient failures (`RateLimited`, `Overloaded`) are retried. The
//! delay before retry `k` (0-indexed) is `base_delay * 2^k`, capped at
//! `max_delay`, plus a uniform random jitter in `[0, jitter_max]` so that
//! concurrent tasks do not retry in lockstep.

use std::future::Future;
use std::time::Duration;

use infinipedia_core::ProviderError;
use rand::Rng;
use tracing::{debug, warn};

/// Default number of retries after the first attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 3;
/// Default base delay.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(2000);
/// Default upper bound of the random jitter.
pub const DEFAULT_JITTER_MAX: Duration = Duration::from_millis(500);
/// Default cap on the exponential part of the delay.
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(30);

/// Bounded exponential backoff for transient provider failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt. Total attempts = `max_retries + 1`.
    pub max_retries: u32,
    /// Delay before the first retry.
    pub base_delay: Duration,
    /// Upper bound of the random jitter added to every delay.
    pub jitter_max: Duration,
    /// Cap on the exponential part of the delay.
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// Creates a policy with the given number of retries and default delays.
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            base_delay: DEFAULT_BASE_DELAY,
            jitter_max: DEFAULT_JITTER_MAX,
            max_delay: DEFAULT_MAX_DELAY,
        }
    }

    /// Disables retries.
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::ZERO,
            jitter_max: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Sets the base delay.
    #[must_use]
    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Sets the jitter upper bound.
    #[must_use]
    pub fn with_jitter(mut self, jitter_max: Duration) -> Self {
        self.jitter_max = jitter_max;
        self
    }

    /// Sets the delay cap.
    #[must_use]
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Exponential part of the delay before retry `retry` (0-indexed).
    pub fn backoff_for(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }

    /// Full delay before retry `retry`, including jitter.
    pub fn delay_for_attempt(&self, retry: u32) -> Duration {
        let backoff = self.backoff_for(retry);
        let jitter_ms = u64::try_from(self.jitter_max.as_millis()).unwrap_or(u64::MAX);
        if jitter_ms == 0 {
            return backoff;
        }
        let jitter = rand::thread_rng().gen_range(0..=jitter_ms);
        backoff.saturating_add(Duration::from_millis(jitter))
    }

    /// Determines if an error should be retried.
    pub fn should_retry(&self, error: &ProviderError) -> bool {
        error.is_transient()
    }

    /// Runs `operation`, retrying transient failures.
    ///
    /// Non-transient errors propagate immediately. When retries run out the
    /// last error is returned annotated with the number of attempts made.
    pub async fn run<T, F, Fut>(&self, label: &str, mut operation: F) -> Result<T, ProviderError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        let mut retry = 0u32;
        loop {
            match operation().await {
                Ok(value) => {
                    if retry > 0 {
                        debug!(operation = label, attempts = retry + 1, "Succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(error) if !self.should_retry(&error) => return Err(error),
                Err(error) if retry >= self.max_retries => {
                    let attempts = retry + 1;
                    warn!(operation = label, attempts, error = %error, "Retries exhausted");
                    return Err(error.retry_exhausted(attempts));
                }
                Err(error) => {
                    let delay = self.delay_for_attempt(retry);
                    warn!(
                        operation = label,
                        attempt = retry + 1,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %error,
                        "Transient provider failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    retry += 1;
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RETRIES)
    }
}

/// Runs `operation` with `max_retries` retries starting at `base_delay`.
///
/// Shorthand for [`RetryPolicy::run`] with the default jitter and cap.
pub async fn with_retry<T, F, Fut>(
    operation: F,
    max_retries: u32,
    base_delay: Duration,
) -> Result<T, ProviderError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ProviderError>>,
{
    RetryPolicy::new(max_retries)
        .with_base_delay(base_delay)
        .run("provider call", operation)
        .await
}
