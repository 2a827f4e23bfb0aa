//! Retry policy for transient failures.

use crate::Error;
use std::time::Duration;

/// Upper bound applied to a server-provided `Retry-After`.
const MAX_RETRY_AFTER: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub min_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            min_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(4),
        }
    }
}

impl RetryConfig {
    pub fn with_max_retries(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    /// Exponential backoff: min_delay * 2^attempt, capped at max_delay.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let base = self.min_delay.as_millis() as u64;
        let cap = self.max_delay.as_millis() as u64;
        let delay = base.saturating_mul(1u64 << attempt.min(20)).min(cap);
        Duration::from_millis(delay)
    }

    /// Delay before the next attempt, or `None` when the error is final.
    ///
    /// `attempt` counts failed attempts so far, starting at 0.
    pub fn should_retry(&self, attempt: u32, error: &Error) -> Option<Duration> {
        if attempt >= self.max_retries {
            return None;
        }
        match error {
            Error::Remote {
                class,
                retry_after_ms,
                ..
            } if class.retryable() => Some(
                retry_after_ms
                    .map(Duration::from_millis)
                    .map(|d| d.min(MAX_RETRY_AFTER))
                    .unwrap_or_else(|| self.backoff(attempt)),
            ),
            Error::Transport(e) if e.is_transient() => Some(self.backoff(attempt)),
            _ => None,
        }
    }
}
