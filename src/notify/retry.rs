//! Bounded exponential backoff for notification delivery.

use std::time::Duration;

/// Attempts beyond this are ignored, whatever the configuration asks for.
pub const MAX_ATTEMPTS_CEILING: u32 = 10;

/// Longest single wait between two delivery attempts.
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(60);

/// How often and how patiently delivery is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    initial_delay: Duration,
    max_delay: Duration,
}

impl RetryPolicy {
    /// Creates a policy; at least one attempt and at most
    /// [`MAX_ATTEMPTS_CEILING`] attempts are made, and no single wait exceeds
    /// [`DEFAULT_MAX_DELAY`].
    #[must_use]
    pub fn new(max_attempts: u32, initial_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.clamp(1, MAX_ATTEMPTS_CEILING),
            initial_delay,
            max_delay: DEFAULT_MAX_DELAY,
        }
    }

    /// Replaces the ceiling applied to each wait.
    #[must_use]
    pub const fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Total attempts, including the first.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay to wait after failed attempt `attempt` (1-based); doubles each
    /// time up to the configured ceiling.
    #[must_use]
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let factor = 2_u32.saturating_pow(attempt.saturating_sub(1));
        self.initial_delay
            .saturating_mul(factor)
            .min(self.max_delay)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1))
    }
}
