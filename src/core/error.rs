//! Error types for the searchbridge library.
//!
//! Every failure mode is represented by an explicitly tagged variant of
//! [`SearchError`], so callers can pattern-match instead of inspecting
//! strings or status codes. The library never panics; all errors are
//! returned as `Result` values.

use std::time::Duration;
use thiserror::Error;

/// The main error type for backend operations.
///
/// The variants form a closed classification:
///
/// - [`Configuration`](SearchError::Configuration) - the client could not
///   be constructed; fatal, never retried.
/// - [`CircuitOpen`](SearchError::CircuitOpen) - admission was denied by
///   the circuit breaker; no network attempt was made.
/// - [`Timeout`](SearchError::Timeout) - the per-attempt deadline elapsed;
///   the in-flight attempt was cancelled.
/// - [`Api`](SearchError::Api) - the backend answered with a non-2xx
///   status; carries the status and a best-effort reason.
/// - [`Transport`](SearchError::Transport) - no response could be obtained
///   after exhausting the retry budget.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The client configuration is invalid or incomplete.
    #[error("configuration error: {message}")]
    Configuration {
        /// Description of what is wrong with the configuration.
        message: String,
    },

    /// The circuit breaker denied the request before any network attempt.
    #[error(
        "circuit OPEN for endpoint '{endpoint}': {failures} consecutive failures \
         (last error: {last_error}); retry in {}s",
        .retry_after.as_secs()
    )]
    CircuitOpen {
        /// Endpoint whose circuit is open.
        endpoint: String,
        /// Consecutive qualifying failures observed for the endpoint.
        failures: u32,
        /// Text of the most recent failure.
        last_error: String,
        /// Estimated wait until the breaker will admit a probe.
        retry_after: Duration,
    },

    /// The per-attempt deadline elapsed before a response arrived.
    #[error("request to endpoint '{endpoint}' timed out after {elapsed:?}")]
    Timeout {
        /// Endpoint the request was issued against.
        endpoint: String,
        /// The deadline that was exceeded.
        elapsed: Duration,
    },

    /// The backend answered with a non-2xx status.
    #[error("search backend returned HTTP {status}: {reason}")]
    Api {
        /// HTTP status code of the response.
        status: u16,
        /// Human-readable reason extracted from the response.
        reason: String,
        /// Backend error classification, when the response carried one.
        error_type: Option<String>,
    },

    /// No response could be obtained after exhausting the retry budget.
    #[error("transport to endpoint '{endpoint}' failed after {attempts} attempts: {message}")]
    Transport {
        /// Endpoint the request was issued against.
        endpoint: String,
        /// Total attempts made, including the first.
        attempts: u32,
        /// Text of the last underlying transport failure.
        message: String,
    },
}

impl SearchError {
    /// Returns `true` if this error counts as a circuit-breaker failure.
    ///
    /// Transport failures and timeouts always qualify; API errors qualify
    /// only for server-side (5xx) statuses. Client errors (4xx) and
    /// configuration or admission errors never qualify.
    pub fn is_circuit_failure(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Transport { .. } => true,
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns the HTTP status code if this is an API error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the endpoint identity if this error is associated with one.
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            Self::CircuitOpen { endpoint, .. }
            | Self::Timeout { endpoint, .. }
            | Self::Transport { endpoint, .. } => Some(endpoint),
            _ => None,
        }
    }

    /// Creates a `Configuration` error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a `Timeout` error.
    pub fn timeout(endpoint: impl Into<String>, elapsed: Duration) -> Self {
        Self::Timeout {
            endpoint: endpoint.into(),
            elapsed,
        }
    }

    /// Creates a `Transport` error.
    pub fn transport(
        endpoint: impl Into<String>,
        attempts: u32,
        message: impl Into<String>,
    ) -> Self {
        Self::Transport {
            endpoint: endpoint.into(),
            attempts,
            message: message.into(),
        }
    }
}

/// A specialized `Result` type for backend operations.
pub type SearchResult<T> = Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circuit_open_display() {
        let err = SearchError::CircuitOpen {
            endpoint: "search.example.com:9200".into(),
            failures: 5,
            last_error: "connection refused".into(),
            retry_after: Duration::from_secs(20),
        };
        let text = err.to_string();
        assert!(text.contains("OPEN"));
        assert!(text.contains("5 consecutive failures"));
        assert!(text.contains("connection refused"));
        assert!(text.contains("20s"));
    }

    #[test]
    fn test_is_circuit_failure() {
        assert!(SearchError::timeout("host", Duration::from_secs(30)).is_circuit_failure());
        assert!(SearchError::transport("host", 3, "reset").is_circuit_failure());
        assert!(SearchError::Api {
            status: 503,
            reason: "unavailable".into(),
            error_type: None,
        }
        .is_circuit_failure());

        assert!(!SearchError::Api {
            status: 404,
            reason: "index not found".into(),
            error_type: Some("index_not_found_exception".into()),
        }
        .is_circuit_failure());
        assert!(!SearchError::configuration("no base url").is_circuit_failure());
    }

    #[test]
    fn test_status_and_endpoint_accessors() {
        let api = SearchError::Api {
            status: 400,
            reason: "bad query".into(),
            error_type: None,
        };
        assert_eq!(api.status(), Some(400));
        assert_eq!(api.endpoint(), None);

        let transport = SearchError::transport("backend:9200", 3, "dns failure");
        assert_eq!(transport.status(), None);
        assert_eq!(transport.endpoint(), Some("backend:9200"));
    }
}
