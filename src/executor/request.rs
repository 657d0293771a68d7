//! The request executor.
//!
//! Executes one logical call against an endpoint: admission control via
//! the circuit breaker, a deadline per attempt with active cancellation,
//! bounded retries for transport failures only, and classification of
//! every outcome into [`SearchError`].

use crate::circuit_breaker::BreakerRegistry;
use crate::core::{SearchError, SearchResult};
use crate::executor::retry::RetryConfig;
use crate::executor::transport::{ApiRequest, Method, RawResponse, Transport};

use std::sync::Arc;
use std::time::Duration;

/// Executes logical calls against one endpoint.
///
/// The executor is the only component that reports outcomes to the
/// circuit breaker, which keeps the qualification rule (transport
/// failures, timeouts, and 5xx only) in one place.
///
/// # Outcome classification
///
/// | Attempt outcome           | Result                  | Breaker | Retried |
/// |---------------------------|-------------------------|---------|---------|
/// | admission denied          | `CircuitOpen`           | -       | no      |
/// | deadline elapsed          | `Timeout`               | failure | no      |
/// | 2xx response              | parsed body             | success | -       |
/// | non-2xx response          | `Api`                   | 5xx only| no      |
/// | no response (connection)  | retry, then `Transport` | failure | yes     |
#[derive(Debug)]
pub struct RequestExecutor {
    endpoint: String,
    base_url: String,
    headers: Vec<(String, String)>,
    transport: Arc<dyn Transport>,
    breakers: Arc<BreakerRegistry>,
    retry: RetryConfig,
    request_timeout: Duration,
}

impl RequestExecutor {
    /// Creates a new executor bound to one endpoint.
    ///
    /// `endpoint` is the breaker identity (host:port); `base_url` is the
    /// address requests are issued against, without a trailing slash.
    pub fn new(
        endpoint: impl Into<String>,
        base_url: impl Into<String>,
        headers: Vec<(String, String)>,
        transport: Arc<dyn Transport>,
        breakers: Arc<BreakerRegistry>,
        retry: RetryConfig,
        request_timeout: Duration,
    ) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            endpoint: endpoint.into(),
            base_url,
            headers,
            transport,
            breakers,
            retry,
            request_timeout,
        }
    }

    /// Returns the breaker identity this executor reports under.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the shared breaker registry.
    pub fn breakers(&self) -> &Arc<BreakerRegistry> {
        &self.breakers
    }

    /// Executes one logical call and returns the parsed JSON body.
    ///
    /// `path` must start with `/`. The deadline is `timeout_override` or
    /// the executor's default; an attempt whose deadline elapses is
    /// cancelled by dropping its future, which releases the connection
    /// and timer before the outcome is classified.
    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
        timeout_override: Option<Duration>,
    ) -> SearchResult<serde_json::Value> {
        self.breakers.can_request(&self.endpoint)?;

        let deadline = timeout_override.unwrap_or(self.request_timeout);
        let request = ApiRequest {
            method,
            url: format!("{}{}", self.base_url, path),
            headers: self.headers.clone(),
            body: body.cloned(),
        };

        let mut attempt: u32 = 0;
        loop {
            match tokio::time::timeout(deadline, self.transport.send(&request)).await {
                // Deadline elapsed; the attempt future was dropped, which
                // cancels the in-flight call. Not retried.
                Err(_) => {
                    self.breakers.record_failure(&self.endpoint, "timeout");
                    tracing::warn!(
                        endpoint = %self.endpoint,
                        method = %method,
                        path,
                        deadline_ms = deadline.as_millis() as u64,
                        "request timed out"
                    );
                    return Err(SearchError::timeout(&self.endpoint, deadline));
                }

                Ok(Ok(response)) => return self.classify_response(method, path, response),

                Ok(Err(failure)) => {
                    if self.retry.should_retry(attempt) {
                        let delay = self.retry.delay_after_attempt(attempt);
                        tracing::debug!(
                            endpoint = %self.endpoint,
                            attempt,
                            delay_ms = delay.as_millis() as u64,
                            error = %failure,
                            "transport failure, retrying"
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                    } else {
                        let attempts = attempt + 1;
                        self.breakers
                            .record_failure(&self.endpoint, &failure.message);
                        tracing::warn!(
                            endpoint = %self.endpoint,
                            attempts,
                            error = %failure,
                            "transport failed, retry budget exhausted"
                        );
                        return Err(SearchError::transport(
                            &self.endpoint,
                            attempts,
                            failure.message,
                        ));
                    }
                }
            }
        }
    }

    fn classify_response(
        &self,
        method: Method,
        path: &str,
        response: RawResponse,
    ) -> SearchResult<serde_json::Value> {
        if response.is_success() {
            self.breakers.record_success(&self.endpoint);
            if response.body.trim().is_empty() {
                return Ok(serde_json::Value::Null);
            }
            return serde_json::from_str(&response.body).map_err(|e| SearchError::Api {
                status: response.status,
                reason: format!("unparseable response body: {e}"),
                error_type: Some("invalid_response".to_string()),
            });
        }

        let (reason, error_type) = extract_error_reason(response.status, &response.body);
        if response.status >= 500 {
            self.breakers.record_failure(&self.endpoint, &reason);
        }
        tracing::debug!(
            endpoint = %self.endpoint,
            method = %method,
            path,
            status = response.status,
            reason = %reason,
            "backend returned error status"
        );
        Err(SearchError::Api {
            status: response.status,
            reason,
            error_type,
        })
    }
}

/// Extracts a human-readable reason and optional error type from a
/// non-2xx response body.
///
/// Fallback order: structured `error.reason`, then a top-level `message`,
/// then the raw body text, then a synthetic `HTTP <status>` message.
fn extract_error_reason(status: u16, body: &str) -> (String, Option<String>) {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    let error_type = parsed
        .as_ref()
        .and_then(|v| v.pointer("/error/type"))
        .and_then(|v| v.as_str())
        .map(String::from);

    if let Some(value) = &parsed {
        if let Some(reason) = value.pointer("/error/reason").and_then(|v| v.as_str()) {
            return (reason.to_string(), error_type);
        }
        if let Some(message) = value.get("message").and_then(|v| v.as_str()) {
            return (message.to_string(), error_type);
        }
    }

    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return (trimmed.to_string(), error_type);
    }
    (format!("HTTP {status}"), error_type)
}
