//! The transport seam between the executor and the network.
//!
//! The executor classifies outcomes and enforces deadlines; a
//! [`Transport`] only moves one request to the backend and brings back
//! whatever happened, without retrying, timing out, or interpreting
//! statuses. That keeps every resilience decision in one place and lets
//! tests substitute a scripted transport.

use crate::core::{SearchError, SearchResult};

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// HTTP method for a backend request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET request.
    Get,
    /// POST request.
    Post,
    /// PUT request.
    Put,
    /// DELETE request.
    Delete,
    /// HEAD request.
    Head,
}

impl Method {
    /// Returns the method as an uppercase token.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One request as handed to the transport: fully resolved URL, fixed
/// headers, optional JSON body.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute URL, base address already applied.
    pub url: String,
    /// Header name/value pairs, auth header included.
    pub headers: Vec<(String, String)>,
    /// JSON body, when the method carries one.
    pub body: Option<serde_json::Value>,
}

/// A raw response: status plus unparsed body text.
///
/// Interpretation (2xx vs error envelope) belongs to the executor.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

impl RawResponse {
    /// Returns `true` for a 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A connection-level failure: the request never produced a response.
///
/// Connection refused, DNS failure, reset mid-stream, and the like. These
/// are the only failures the executor retries.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct TransportFailure {
    /// Description of the underlying failure.
    pub message: String,
}

impl TransportFailure {
    /// Creates a new transport failure.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Moves one request to the backend and returns the raw outcome.
///
/// Implementations must be cancel-safe: dropping the `send` future must
/// release the underlying connection and any timers it holds, because the
/// executor cancels attempts whose deadline elapses.
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    /// Sends one request and returns the raw response, or a
    /// [`TransportFailure`] if no response could be obtained.
    async fn send(&self, request: &ApiRequest) -> Result<RawResponse, TransportFailure>;
}

/// reqwest-backed transport.
///
/// The underlying client deliberately carries no request timeout; the
/// executor enforces deadlines so that cancellation semantics live in one
/// place.
#[derive(Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Creates a new HTTP transport.
    pub fn new() -> SearchResult<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| SearchError::configuration(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    fn method_for(method: Method) -> reqwest::Method {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
            Method::Head => reqwest::Method::HEAD,
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &ApiRequest) -> Result<RawResponse, TransportFailure> {
        let mut builder = self
            .client
            .request(Self::method_for(request.method), &request.url);

        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TransportFailure::new(e.to_string()))?;

        let status = response.status().as_u16();
        // A body read that dies mid-stream never yielded a usable
        // response, so it classifies as a transport failure too.
        let body = response
            .text()
            .await
            .map_err(|e| TransportFailure::new(format!("failed to read response body: {e}")))?;

        Ok(RawResponse { status, body })
    }
}
