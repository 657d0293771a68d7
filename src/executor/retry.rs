//! Retry configuration for transport-level failures.

use std::time::Duration;

/// Configuration for the executor's retry behavior.
///
/// Only transport-level failures (no response obtained) are retried;
/// timeouts, API errors, and circuit denials are surfaced immediately.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Additional attempts after the first one fails.
    pub max_retries: u32,

    /// Base inter-attempt delay; grows linearly with the attempt index.
    pub base_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_millis(100),
        }
    }
}

impl RetryConfig {
    /// Creates a new retry configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Disables retries.
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Sets the number of additional attempts.
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Sets the base delay.
    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Returns the delay to wait after attempt `attempt` (0-indexed) fails.
    ///
    /// The delay is `base_delay * (attempt + 1)`, so successive waits are
    /// strictly increasing.
    pub fn delay_after_attempt(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt + 1)
    }

    /// Returns whether another attempt remains after `attempt` failed.
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_retries
    }

    /// Total attempts this configuration permits.
    pub fn total_attempts(&self) -> u32 {
        self.max_retries + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RetryConfig::default();
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.base_delay, Duration::from_millis(100));
        assert_eq!(config.total_attempts(), 3);
    }

    #[test]
    fn test_no_retry() {
        let config = RetryConfig::no_retry();
        assert_eq!(config.total_attempts(), 1);
        assert!(!config.should_retry(0));
    }

    #[test]
    fn test_delays_strictly_increase() {
        let config = RetryConfig::new().with_base_delay(Duration::from_millis(100));
        assert_eq!(config.delay_after_attempt(0), Duration::from_millis(100));
        assert_eq!(config.delay_after_attempt(1), Duration::from_millis(200));
        assert_eq!(config.delay_after_attempt(2), Duration::from_millis(300));
    }

    #[test]
    fn test_should_retry_respects_budget() {
        let config = RetryConfig::new().with_max_retries(2);
        assert!(config.should_retry(0));
        assert!(config.should_retry(1));
        assert!(!config.should_retry(2));
    }
}
