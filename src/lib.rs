//! # Searchbridge
//!
//! A resilient client layer that mediates every outbound call from a
//! data-access layer to a remote search backend.
//!
//! ## Overview
//!
//! Searchbridge protects a search backend from cascading failure and
//! gives callers precise failure classification:
//!
//! - Per-endpoint **circuit breakers** stop issuing calls to an
//!   unhealthy backend and lazily probe it for recovery
//! - A **request executor** enforces a deadline per attempt with active
//!   cancellation and retries transport-level failures with a bounded,
//!   linearly growing backoff
//! - A **client cache** bounds memory while avoiding reconstruction of
//!   client handles for configurations that repeat across calls
//! - A closed, tagged [`SearchError`] lets callers distinguish "backend
//!   is unhealthy, don't bother" from "backend rejected the request"
//!   from "we gave up after retries" from "took too long"
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use searchbridge::prelude::*;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), SearchError> {
//!     let config = SearchConfig::new("http://search.example.com:9200")
//!         .with_api_key("key-material");
//!     let client = SearchClient::new(&config)?;
//!
//!     let status = client.test_connection().await;
//!     println!("connected: {} ({})", status.connected, status.circuit_state);
//!
//!     let response = client
//!         .search("logs-*", &json!({"query": {"match_all": {}}}), None)
//!         .await?;
//!     println!("{} hits", response.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! The library is organized into layers, leaves first:
//!
//! - **Core**: error classification and typed response envelopes
//! - **Circuit Breaker**: per-endpoint failure/recovery state machine
//! - **Executor**: deadline, retry, and classification for one logical
//!   call; the [`Transport`](executor::Transport) trait is the seam to
//!   the network
//! - **Client**: the facade composing one executor per backend, plus
//!   the TTL+LRU cache of constructed clients

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod circuit_breaker;
pub mod client;
pub mod core;
pub mod executor;

// Re-export commonly used types at the crate root
pub use crate::circuit_breaker::{BreakerConfig, BreakerRegistry, BreakerSnapshot, CircuitState};
pub use crate::client::{
    fingerprint, CacheStats, ClientCache, ConnectionStatus, SearchClient, SearchConfig,
    SharedClient,
};
pub use crate::core::{MappingResponse, SearchError, SearchResponse, SearchResult};
pub use crate::executor::{Method, RequestExecutor, RetryConfig};

/// Prelude module for convenient imports.
///
/// ```rust
/// use searchbridge::prelude::*;
/// ```
pub mod prelude {
    pub use crate::circuit_breaker::{
        BreakerConfig, BreakerRegistry, BreakerSnapshot, CircuitState,
    };
    pub use crate::client::{
        fingerprint, ClientCache, ConnectionStatus, SearchClient, SearchConfig, SharedClient,
    };
    pub use crate::core::{MappingResponse, SearchError, SearchResponse, SearchResult};
    pub use crate::executor::{Method, RequestExecutor, RetryConfig};
}
