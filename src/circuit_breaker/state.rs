//! Circuit breaker state machine types.

use serde::{Deserialize, Serialize};
use std::time::Instant;

/// The state of one endpoint's circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CircuitState {
    /// Normal operation; requests pass through, failures are counted.
    Closed,

    /// The endpoint is failing; requests are rejected immediately.
    Open,

    /// Probing; trial requests are allowed through to test recovery.
    HalfOpen,
}

impl CircuitState {
    /// Returns `true` if the circuit is closed.
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }

    /// Returns `true` if the circuit is open.
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }

    /// Returns `true` if the circuit is half-open.
    pub fn is_half_open(&self) -> bool {
        matches!(self, Self::HalfOpen)
    }

    /// Returns the name of the state.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Open => "open",
            Self::HalfOpen => "half_open",
        }
    }
}

impl Default for CircuitState {
    fn default() -> Self {
        Self::Closed
    }
}

impl std::fmt::Display for CircuitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Accumulated health evidence for one endpoint.
///
/// Records are created lazily on first reference and live for the life
/// of the registry, or until an administrative reset.
#[derive(Debug, Clone)]
pub(crate) struct BreakerRecord {
    /// Current circuit state.
    pub state: CircuitState,
    /// Consecutive qualifying failures.
    pub failure_count: u32,
    /// Consecutive successes while half-open.
    pub success_count: u32,
    /// When the most recent qualifying failure was observed.
    pub last_failure_at: Option<Instant>,
    /// Text of the most recent qualifying failure.
    pub last_error: Option<String>,
}

impl BreakerRecord {
    pub fn new() -> Self {
        Self {
            state: CircuitState::Closed,
            failure_count: 0,
            success_count: 0,
            last_failure_at: None,
            last_error: None,
        }
    }

    /// Returns the record to a pristine closed state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

/// A point-in-time view of one endpoint's breaker record, for the
/// administrative/observability surface.
#[derive(Debug, Clone, Serialize)]
pub struct BreakerSnapshot {
    /// Current circuit state.
    pub state: CircuitState,
    /// Consecutive qualifying failures.
    pub failure_count: u32,
    /// Consecutive successes while half-open.
    pub success_count: u32,
    /// Text of the most recent qualifying failure.
    pub last_error: Option<String>,
    /// Seconds elapsed since the most recent qualifying failure.
    pub seconds_since_last_failure: Option<u64>,
}

impl BreakerSnapshot {
    pub(crate) fn from_record(record: &BreakerRecord) -> Self {
        Self {
            state: record.state,
            failure_count: record.failure_count,
            success_count: record.success_count,
            last_error: record.last_error.clone(),
            seconds_since_last_failure: record.last_failure_at.map(|t| t.elapsed().as_secs()),
        }
    }
}
