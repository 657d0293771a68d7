//! Per-endpoint circuit breaker registry.
//!
//! The registry owns the breaker records for every endpoint the process
//! talks to. It is constructed explicitly and threaded into the request
//! executor as a dependency, so tests can build isolated instances.

use crate::circuit_breaker::config::BreakerConfig;
use crate::circuit_breaker::state::{BreakerRecord, BreakerSnapshot, CircuitState};
use crate::core::SearchError;

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// A registry of per-endpoint circuit breakers.
///
/// Decides, per endpoint, whether a new call may proceed, and accumulates
/// evidence of endpoint health. Records are created lazily on the first
/// admission check or failure report for an endpoint.
///
/// All compound check-then-act sequences run under one mutex, so admission
/// and the lazy `Open -> HalfOpen` transition are atomic with respect to
/// concurrent callers. The lock is only held for bookkeeping; it never
/// spans a network call, so admission latency is O(1).
///
/// # States
///
/// - **Closed**: requests pass through; consecutive failures are counted.
/// - **Open**: requests are rejected until the recovery timeout elapses.
/// - **Half-Open**: trial requests pass through; consecutive successes
///   close the circuit, any failure reopens it.
#[derive(Debug)]
pub struct BreakerRegistry {
    records: Mutex<HashMap<String, BreakerRecord>>,
    config: BreakerConfig,
}

impl BreakerRegistry {
    /// Creates a new registry with the given configuration.
    pub fn new(config: BreakerConfig) -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            config,
        }
    }

    /// Creates a new registry with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(BreakerConfig::default())
    }

    /// Returns a reference to the configuration.
    pub fn config(&self) -> &BreakerConfig {
        &self.config
    }

    /// Checks whether a request to `endpoint` may proceed.
    ///
    /// `Closed` and `HalfOpen` allow. `Open` allows only once the recovery
    /// timeout has elapsed since the last failure, performing the
    /// `Open -> HalfOpen` transition as a side effect of this check; there
    /// is no background timer. Denials carry the failure count, last error
    /// text, and remaining wait.
    pub fn can_request(&self, endpoint: &str) -> Result<(), SearchError> {
        let mut records = self.lock();
        let record = records
            .entry(endpoint.to_string())
            .or_insert_with(BreakerRecord::new);

        match record.state {
            CircuitState::Closed | CircuitState::HalfOpen => Ok(()),
            CircuitState::Open => {
                let since_failure = record
                    .last_failure_at
                    .map(|t| t.elapsed())
                    .unwrap_or(Duration::ZERO);

                if since_failure >= self.config.recovery_timeout {
                    record.state = CircuitState::HalfOpen;
                    record.success_count = 0;
                    tracing::debug!(endpoint, "circuit transitioning open -> half-open");
                    Ok(())
                } else {
                    Err(SearchError::CircuitOpen {
                        endpoint: endpoint.to_string(),
                        failures: record.failure_count,
                        last_error: record
                            .last_error
                            .clone()
                            .unwrap_or_else(|| "unknown".to_string()),
                        retry_after: self.config.recovery_timeout - since_failure,
                    })
                }
            }
        }
    }

    /// Records a successful call to `endpoint`.
    ///
    /// In `HalfOpen`, counts toward closing the circuit; in `Closed`,
    /// resets the failure count. A success while `Open` is ignored, since
    /// `Open` denies admission in the first place.
    pub fn record_success(&self, endpoint: &str) {
        let mut records = self.lock();
        let record = records
            .entry(endpoint.to_string())
            .or_insert_with(BreakerRecord::new);

        match record.state {
            CircuitState::Closed => {
                record.failure_count = 0;
                record.success_count = 0;
            }
            CircuitState::HalfOpen => {
                record.success_count += 1;
                if record.success_count >= self.config.success_threshold {
                    record.reset();
                    tracing::debug!(endpoint, "circuit closed after successful probes");
                }
            }
            CircuitState::Open => {}
        }
    }

    /// Records a qualifying failure for `endpoint`.
    ///
    /// Only server-side failures qualify: transport failures, timeouts,
    /// and 5xx responses. The request executor enforces that rule; 4xx
    /// responses are never reported here.
    pub fn record_failure(&self, endpoint: &str, message: &str) {
        let mut records = self.lock();
        let record = records
            .entry(endpoint.to_string())
            .or_insert_with(BreakerRecord::new);

        record.failure_count += 1;
        record.success_count = 0;
        record.last_failure_at = Some(std::time::Instant::now());
        record.last_error = Some(message.to_string());

        match record.state {
            CircuitState::Closed => {
                if record.failure_count >= self.config.failure_threshold {
                    record.state = CircuitState::Open;
                    tracing::warn!(
                        endpoint,
                        failures = record.failure_count,
                        error = message,
                        "circuit opened"
                    );
                }
            }
            CircuitState::HalfOpen => {
                record.state = CircuitState::Open;
                tracing::warn!(endpoint, error = message, "probe failed, circuit reopened");
            }
            CircuitState::Open => {}
        }
    }

    /// Returns the current state for `endpoint`.
    ///
    /// Reports `Closed` for endpoints that have never been referenced,
    /// without creating a record.
    pub fn state(&self, endpoint: &str) -> CircuitState {
        self.lock()
            .get(endpoint)
            .map(|record| record.state)
            .unwrap_or_default()
    }

    /// Returns a point-in-time snapshot of every tracked endpoint.
    pub fn snapshot(&self) -> HashMap<String, BreakerSnapshot> {
        self.lock()
            .iter()
            .map(|(endpoint, record)| (endpoint.clone(), BreakerSnapshot::from_record(record)))
            .collect()
    }

    /// Resets one endpoint's record to a pristine closed state.
    pub fn reset(&self, endpoint: &str) {
        if let Some(record) = self.lock().get_mut(endpoint) {
            record.reset();
            tracing::debug!(endpoint, "circuit breaker reset");
        }
    }

    /// Resets every endpoint's record.
    pub fn reset_all(&self) {
        self.lock().clear();
        tracing::debug!("all circuit breakers reset");
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, BreakerRecord>> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for BreakerRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
