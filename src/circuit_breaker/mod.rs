//! Per-endpoint circuit breakers.
//!
//! A circuit breaker stops issuing calls to a backend once it appears
//! unhealthy, then periodically probes it for recovery. This module
//! provides a registry of breakers keyed by endpoint identity, consumed
//! by the request executor for admission control and failure reporting.

mod config;
mod registry;
mod state;

pub use config::BreakerConfig;
pub use registry::BreakerRegistry;
pub use state::{BreakerSnapshot, CircuitState};
