//! Circuit breaker configuration.

use std::time::Duration;

/// Configuration for the circuit breaker registry.
///
/// One configuration applies to every endpoint tracked by a registry;
/// per-endpoint state is accumulated separately.
#[derive(Debug, Clone)]
pub struct BreakerConfig {
    /// Consecutive qualifying failures before opening the circuit.
    pub failure_threshold: u32,

    /// Consecutive successes in half-open state to close the circuit.
    pub success_threshold: u32,

    /// How long an open circuit waits before admitting a probe.
    pub recovery_timeout: Duration,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            success_threshold: 2,
            recovery_timeout: Duration::from_secs(30),
        }
    }
}

impl BreakerConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the failure threshold.
    pub fn with_failure_threshold(mut self, threshold: u32) -> Self {
        self.failure_threshold = threshold.max(1);
        self
    }

    /// Sets the success threshold.
    pub fn with_success_threshold(mut self, threshold: u32) -> Self {
        self.success_threshold = threshold.max(1);
        self
    }

    /// Sets the recovery timeout.
    pub fn with_recovery_timeout(mut self, timeout: Duration) -> Self {
        self.recovery_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BreakerConfig::default();
        assert_eq!(config.failure_threshold, 5);
        assert_eq!(config.success_threshold, 2);
        assert_eq!(config.recovery_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_config_builder() {
        let config = BreakerConfig::new()
            .with_failure_threshold(3)
            .with_success_threshold(1)
            .with_recovery_timeout(Duration::from_secs(60));

        assert_eq!(config.failure_threshold, 3);
        assert_eq!(config.success_threshold, 1);
        assert_eq!(config.recovery_timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_thresholds_clamped_to_one() {
        let config = BreakerConfig::new()
            .with_failure_threshold(0)
            .with_success_threshold(0);

        assert_eq!(config.failure_threshold, 1);
        assert_eq!(config.success_threshold, 1);
    }
}
