//! Retry policy for the request executor.

use std::collections::HashSet;
use std::time::Duration;

use rand::Rng;

/// Statuses retried by default.
pub const DEFAULT_RETRYABLE_STATUSES: [u16; 6] = [408, 429, 500, 502, 503, 504];

/// Upper bound of the random jitter, as a fraction of the computed delay.
const MAX_JITTER: f64 = 0.25;

/// Retry policy configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first attempt (total attempts = max_retries + 1).
    pub max_retries: u32,
    /// Delay before the first retry; doubles per attempt.
    pub base_delay: Duration,
    /// HTTP statuses considered transient.
    pub retryable_statuses: HashSet<u16>,
}

impl RetryPolicy {
    /// Create a policy with the default retryable statuses.
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
            retryable_statuses: DEFAULT_RETRYABLE_STATUSES.into_iter().collect(),
        }
    }

    /// A policy that never retries.
    pub fn none() -> Self {
        Self::new(0, Duration::from_millis(500))
    }

    /// Set retryable statuses.
    pub fn with_statuses(mut self, statuses: impl IntoIterator<Item = u16>) -> Self {
        self.retryable_statuses = statuses.into_iter().collect();
        self
    }

    pub fn is_retryable_status(&self, status: u16) -> bool {
        self.retryable_statuses.contains(&status)
    }

    /// True while `attempt` (0-based) still has a retry left after it.
    pub fn has_attempts_left(&self, attempt: u32) -> bool {
        attempt < self.max_retries
    }

    /// `base_delay * 2^attempt`, no jitter.
    pub fn backoff_for_attempt(&self, attempt: u32) -> Duration {
        let multiplier = 2u32.saturating_pow(attempt);
        self.base_delay.saturating_mul(multiplier)
    }

    /// Backoff plus up to 25% random jitter.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let backoff = self.backoff_for_attempt(attempt);
        let jitter = rand::thread_rng().gen_range(0.0..=MAX_JITTER);
        backoff + backoff.mul_f64(jitter)
    }

    /// Delay before the next attempt. A numeric `Retry-After` (seconds) wins
    /// over the computed backoff.
    pub fn delay_with_retry_after(&self, attempt: u32, retry_after: Option<&str>) -> Duration {
        retry_after
            .and_then(parse_retry_after)
            .unwrap_or_else(|| self.delay_for_attempt(attempt))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(1, Duration::from_millis(500))
    }
}

/// Parse a `Retry-After` header given in seconds. HTTP-date values and
/// numbers a `Duration` cannot hold are ignored.
pub fn parse_retry_after(value: &str) -> Option<Duration> {
    let secs: f64 = value.trim().parse().ok()?;
    Duration::try_from_secs_f64(secs).ok()
}
