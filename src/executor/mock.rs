//! Scripted transport for testing.
//!
//! [`MockTransport`] replays a queue of scripted outcomes, one per
//! attempt, so tests can exercise retry, timeout, and classification
//! behavior without a network.

use crate::executor::transport::{ApiRequest, RawResponse, Transport, TransportFailure};

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// One scripted attempt outcome.
#[derive(Debug, Clone)]
enum MockOutcome {
    /// Produce a response with this status and body.
    Respond { status: u16, body: String },
    /// Fail at the connection level with this message.
    Fail(String),
    /// Never complete, until the caller cancels the attempt.
    Hang,
}

/// A transport that replays scripted outcomes.
///
/// Outcomes are consumed in order, one per `send` call; once the script
/// is exhausted, every further call returns the default response
/// (`200` with an empty JSON object).
///
/// # Examples
///
/// ```rust
/// use searchbridge::executor::MockTransport;
///
/// let transport = MockTransport::new()
///     .respond(503, r#"{"error":{"reason":"overloaded"}}"#)
///     .fail("connection refused")
///     .respond(200, r#"{"ok":true}"#);
/// ```
#[derive(Debug)]
pub struct MockTransport {
    script: Mutex<VecDeque<MockOutcome>>,
    default_response: RawResponse,
    latency: Option<Duration>,
    calls: AtomicU32,
    requests: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    /// Creates a new mock transport with an empty script.
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            default_response: RawResponse {
                status: 200,
                body: "{}".to_string(),
            },
            latency: None,
            calls: AtomicU32::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Scripts a response with the given status and body.
    pub fn respond(self, status: u16, body: impl Into<String>) -> Self {
        self.lock_script().push_back(MockOutcome::Respond {
            status,
            body: body.into(),
        });
        self
    }

    /// Scripts a connection-level failure.
    pub fn fail(self, message: impl Into<String>) -> Self {
        self.lock_script()
            .push_back(MockOutcome::Fail(message.into()));
        self
    }

    /// Scripts an attempt that never completes until cancelled.
    pub fn hang(self) -> Self {
        self.lock_script().push_back(MockOutcome::Hang);
        self
    }

    /// Sets the response returned once the script is exhausted.
    pub fn with_default_response(mut self, status: u16, body: impl Into<String>) -> Self {
        self.default_response = RawResponse {
            status,
            body: body.into(),
        };
        self
    }

    /// Adds simulated latency before every outcome.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Returns how many attempts have been made.
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::Relaxed)
    }

    /// Returns the most recent request, if any attempt was made.
    pub fn last_request(&self) -> Option<ApiRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .last()
            .cloned()
    }

    fn lock_script(&self) -> std::sync::MutexGuard<'_, VecDeque<MockOutcome>> {
        self.script.lock().unwrap_or_else(|p| p.into_inner())
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: &ApiRequest) -> Result<RawResponse, TransportFailure> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.requests
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(request.clone());

        let outcome = self.lock_script().pop_front();

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        match outcome {
            Some(MockOutcome::Respond { status, body }) => Ok(RawResponse { status, body }),
            Some(MockOutcome::Fail(message)) => Err(TransportFailure::new(message)),
            Some(MockOutcome::Hang) => {
                std::future::pending::<()>().await;
                unreachable!("pending future completed")
            }
            None => Ok(self.default_response.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::transport::Method;

    fn request() -> ApiRequest {
        ApiRequest {
            method: Method::Get,
            url: "http://search.test:9200/".to_string(),
            headers: vec![],
            body: None,
        }
    }

    #[tokio::test]
    async fn test_script_consumed_in_order() {
        let transport = MockTransport::new()
            .respond(503, "busy")
            .fail("connection refused")
            .respond(200, r#"{"ok":true}"#);

        let first = transport.send(&request()).await.unwrap();
        assert_eq!(first.status, 503);

        let second = transport.send(&request()).await.unwrap_err();
        assert_eq!(second.message, "connection refused");

        let third = transport.send(&request()).await.unwrap();
        assert_eq!(third.status, 200);
        assert_eq!(transport.calls(), 3);
    }

    #[tokio::test]
    async fn test_default_response_after_script() {
        let transport = MockTransport::new();
        let response = transport.send(&request()).await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.body, "{}");
    }

    #[tokio::test]
    async fn test_records_requests() {
        let transport = MockTransport::new();
        assert!(transport.last_request().is_none());

        transport.send(&request()).await.unwrap();
        let seen = transport.last_request().unwrap();
        assert_eq!(seen.url, "http://search.test:9200/");
        assert_eq!(seen.method, Method::Get);
    }
}
