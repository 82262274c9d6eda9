//! Retry policy for retryable transport failures.

use crate::config::Config;
use std::time::Duration;

/// Exponential backoff for transport failures that may succeed later
/// (rate limiting, timeouts, provider 5xx).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first one
    pub max_retries: u32,

    /// Wait before the first retry, doubled for each later one
    pub initial_backoff: Duration,

    /// Upper bound on any single wait, including provider hints
    pub max_backoff: Duration,
}

impl RetryPolicy {
    /// Try exactly once.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            max_retries: config.max_retries,
            initial_backoff: Duration::from_millis(config.retry_backoff_ms),
            ..Self::default()
        }
    }

    /// Delay before retrying after `failed_attempts` failures.
    ///
    /// A provider `Retry-After` hint wins over the computed backoff.
    pub fn delay_for(&self, failed_attempts: u32, hint: Option<Duration>) -> Duration {
        let delay = hint.unwrap_or_else(|| {
            let exponent = failed_attempts.saturating_sub(1).min(16);
            self.initial_backoff.saturating_mul(1 << exponent)
        });
        delay.min(self.max_backoff)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(30),
        }
    }
}
