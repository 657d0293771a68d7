//! The resilient client facade.
//!
//! A [`SearchClient`] binds one request executor to one backend address
//! and header set, and exposes the domain-agnostic operations the
//! domain layers build on: generic search, mapping fetch, and a
//! connectivity probe. Domain-specific callers compose a client rather
//! than extending one; the raw [`execute`](SearchClient::execute)
//! passthrough is their uniform contract.

use crate::circuit_breaker::{BreakerRegistry, BreakerSnapshot, CircuitState};
use crate::client::config::SearchConfig;
use crate::core::{MappingResponse, SearchError, SearchResponse, SearchResult};
use crate::executor::{HttpTransport, Method, RequestExecutor, Transport};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use secrecy::ExposeSecret;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Outcome of a connectivity probe.
///
/// The probe never fails; failures are folded into the returned status
/// alongside the current breaker state for the endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionStatus {
    /// Whether the backend answered the probe.
    pub connected: bool,
    /// Cluster name reported by the backend, when connected.
    pub cluster_name: Option<String>,
    /// Failure description, when not connected.
    pub error: Option<String>,
    /// Current circuit state for the probed endpoint.
    pub circuit_state: CircuitState,
}

/// A resilient client for one search backend.
///
/// Construction derives the header map once from process-wide
/// configuration: an API key header is preferred, else a basic-auth
/// header from username/password, else no auth header. Construction
/// fails with [`SearchError::Configuration`] when no base address is
/// configured.
///
/// # Examples
///
/// ```rust,no_run
/// use searchbridge::client::{SearchClient, SearchConfig};
/// use serde_json::json;
///
/// # async fn run() -> Result<(), searchbridge::SearchError> {
/// let config = SearchConfig::new("http://search.example.com:9200")
///     .with_api_key("key-material");
/// let client = SearchClient::new(&config)?;
///
/// let response = client
///     .search("logs-*", &json!({"query": {"match_all": {}}}), None)
///     .await?;
/// println!("{} hits", response.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SearchClient {
    endpoint: String,
    executor: RequestExecutor,
}

impl SearchClient {
    /// Creates a client over the real HTTP transport with its own
    /// breaker registry.
    pub fn new(config: &SearchConfig) -> SearchResult<Self> {
        let breakers = Arc::new(BreakerRegistry::new(config.breaker.clone()));
        Self::with_transport(config, Arc::new(HttpTransport::new()?), breakers)
    }

    /// Creates a client over an explicit transport and breaker registry.
    ///
    /// This is how clients share one registry per remote endpoint, and
    /// how tests substitute a scripted transport.
    pub fn with_transport(
        config: &SearchConfig,
        transport: Arc<dyn Transport>,
        breakers: Arc<BreakerRegistry>,
    ) -> SearchResult<Self> {
        if config.base_url.trim().is_empty() {
            return Err(SearchError::configuration(
                "no backend base address configured",
            ));
        }

        let endpoint = endpoint_identity(&config.base_url);
        let executor = RequestExecutor::new(
            endpoint.clone(),
            config.base_url.clone(),
            build_headers(config),
            transport,
            breakers,
            config.retry.clone(),
            config.request_timeout,
        );

        Ok(Self { endpoint, executor })
    }

    /// Returns the endpoint identity (host:port) this client reports
    /// breaker outcomes under.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Executes a raw request against the backend.
    ///
    /// The uniform contract consumed by domain collaborators: either a
    /// parsed JSON body or a classified [`SearchError`].
    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
        timeout_override: Option<Duration>,
    ) -> SearchResult<serde_json::Value> {
        self.executor.execute(method, path, body, timeout_override).await
    }

    /// Runs a search against the given index pattern.
    pub async fn search(
        &self,
        index: &str,
        query: &serde_json::Value,
        timeout_override: Option<Duration>,
    ) -> SearchResult<SearchResponse> {
        let path = format!("/{index}/_search");
        let body = self
            .executor
            .execute(Method::Post, &path, Some(query), timeout_override)
            .await?;
        parse_body(body, "search response")
    }

    /// Fetches field mappings for the given index pattern.
    pub async fn get_mapping(&self, index: &str) -> SearchResult<MappingResponse> {
        let path = format!("/{index}/_mapping");
        let body = self.executor.execute(Method::Get, &path, None, None).await?;
        parse_body(body, "mapping response")
    }

    /// Probes the backend root endpoint.
    ///
    /// Never fails: connection problems, error statuses, and circuit
    /// denials all fold into the returned [`ConnectionStatus`].
    pub async fn test_connection(&self) -> ConnectionStatus {
        match self.executor.execute(Method::Get, "/", None, None).await {
            Ok(body) => ConnectionStatus {
                connected: true,
                cluster_name: body
                    .get("cluster_name")
                    .and_then(|v| v.as_str())
                    .map(String::from),
                error: None,
                circuit_state: self.circuit_state(),
            },
            Err(e) => ConnectionStatus {
                connected: false,
                cluster_name: None,
                error: Some(e.to_string()),
                circuit_state: self.circuit_state(),
            },
        }
    }

    /// Returns the current circuit state for this client's endpoint.
    pub fn circuit_state(&self) -> CircuitState {
        self.executor.breakers().state(&self.endpoint)
    }

    /// Returns a snapshot of every endpoint tracked by the shared
    /// breaker registry.
    pub fn breaker_snapshot(&self) -> HashMap<String, BreakerSnapshot> {
        self.executor.breakers().snapshot()
    }

    /// Resets one endpoint's breaker record, or all of them.
    pub fn reset_breaker(&self, endpoint: Option<&str>) {
        match endpoint {
            Some(endpoint) => self.executor.breakers().reset(endpoint),
            None => self.executor.breakers().reset_all(),
        }
    }

    /// Returns the shared breaker registry.
    pub fn breakers(&self) -> &Arc<BreakerRegistry> {
        self.executor.breakers()
    }
}

fn parse_body<T: serde::de::DeserializeOwned>(
    body: serde_json::Value,
    what: &str,
) -> SearchResult<T> {
    serde_json::from_value(body).map_err(|e| SearchError::Api {
        status: 200,
        reason: format!("unexpected {what} shape: {e}"),
        error_type: Some("invalid_response".to_string()),
    })
}

/// Extracts the breaker identity (host:port) from a base address.
fn endpoint_identity(base_url: &str) -> String {
    let rest = base_url
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(base_url);
    let authority = rest.split(['/', '?']).next().unwrap_or(rest);
    let host = authority
        .rsplit_once('@')
        .map(|(_, host)| host)
        .unwrap_or(authority);
    host.to_string()
}

fn build_headers(config: &SearchConfig) -> Vec<(String, String)> {
    let mut headers = vec![(
        "content-type".to_string(),
        "application/json".to_string(),
    )];

    if let Some(key) = &config.api_key {
        headers.push((
            "authorization".to_string(),
            format!("ApiKey {}", key.expose_secret()),
        ));
    } else if let (Some(username), Some(password)) = (&config.username, &config.password) {
        let token = BASE64.encode(format!("{}:{}", username, password.expose_secret()));
        headers.push(("authorization".to_string(), format!("Basic {token}")));
    }

    headers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit_breaker::BreakerConfig;
    use crate::executor::MockTransport;
    use serde_json::json;

    fn client_over(transport: MockTransport, config: SearchConfig) -> (SearchClient, Arc<MockTransport>) {
        let transport = Arc::new(transport);
        let breakers = Arc::new(BreakerRegistry::new(config.breaker.clone()));
        let client = SearchClient::with_transport(&config, transport.clone(), breakers).unwrap();
        (client, transport)
    }

    fn config() -> SearchConfig {
        SearchConfig::new("http://search.test:9200")
    }

    #[test]
    fn test_construction_requires_base_url() {
        let err = SearchClient::new(&SearchConfig::default()).unwrap_err();
        assert!(matches!(err, SearchError::Configuration { .. }));
    }

    #[test]
    fn test_endpoint_identity() {
        assert_eq!(endpoint_identity("http://host:9200"), "host:9200");
        assert_eq!(endpoint_identity("https://host:9200/prefix"), "host:9200");
        assert_eq!(endpoint_identity("https://user:pw@host:9200/"), "host:9200");
        assert_eq!(endpoint_identity("host:9200"), "host:9200");
    }

    #[test]
    fn test_api_key_preferred_over_basic_auth() {
        let config = config()
            .with_api_key("key-material")
            .with_basic_auth("user", "pass");
        let headers = build_headers(&config);

        let auth: Vec<_> = headers
            .iter()
            .filter(|(name, _)| name == "authorization")
            .collect();
        assert_eq!(auth.len(), 1);
        assert_eq!(auth[0].1, "ApiKey key-material");
    }

    #[test]
    fn test_basic_auth_header_is_base64() {
        let config = config().with_basic_auth("user", "pass");
        let headers = build_headers(&config);
        let auth = headers
            .iter()
            .find(|(name, _)| name == "authorization")
            .unwrap();
        // base64("user:pass")
        assert_eq!(auth.1, "Basic dXNlcjpwYXNz");
    }

    #[test]
    fn test_no_credentials_means_no_auth_header() {
        let headers = build_headers(&config());
        assert!(headers.iter().all(|(name, _)| name != "authorization"));
        assert!(headers
            .iter()
            .any(|(name, value)| name == "content-type" && value == "application/json"));
    }

    #[tokio::test]
    async fn test_search_posts_to_index_search_path() {
        let body = json!({
            "took": 4,
            "timed_out": false,
            "hits": {
                "total": { "value": 1, "relation": "eq" },
                "hits": [
                    { "_index": "logs", "_id": "x", "_score": 1.0, "_source": {"ok": true} }
                ]
            }
        });
        let (client, transport) =
            client_over(MockTransport::new().respond(200, body.to_string()), config());

        let query = json!({"query": {"term": {"level": "error"}}});
        let response = client.search("logs-*", &query, None).await.unwrap();

        assert_eq!(response.len(), 1);
        assert_eq!(response.total(), Some(1));

        let request = transport.last_request().unwrap();
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.url, "http://search.test:9200/logs-*/_search");
        assert_eq!(request.body.unwrap(), query);
    }

    #[tokio::test]
    async fn test_get_mapping_path() {
        let body = json!({
            "logs": { "mappings": { "properties": { "level": { "type": "keyword" } } } }
        });
        let (client, transport) =
            client_over(MockTransport::new().respond(200, body.to_string()), config());

        let mapping = client.get_mapping("logs").await.unwrap();
        assert_eq!(mapping.index_names(), vec!["logs"]);

        let request = transport.last_request().unwrap();
        assert_eq!(request.method, Method::Get);
        assert_eq!(request.url, "http://search.test:9200/logs/_mapping");
    }

    #[tokio::test]
    async fn test_search_rejects_unexpected_shape() {
        let (client, _) =
            client_over(MockTransport::new().respond(200, r#"{"hits": 42}"#), config());

        let err = client.search("logs", &json!({}), None).await.unwrap_err();
        match err {
            SearchError::Api { error_type, .. } => {
                assert_eq!(error_type.as_deref(), Some("invalid_response"));
            }
            other => panic!("expected Api, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_connection_probe_success() {
        let (client, transport) = client_over(
            MockTransport::new().respond(200, r#"{"cluster_name":"test-cluster"}"#),
            config(),
        );

        let status = client.test_connection().await;
        assert!(status.connected);
        assert_eq!(status.cluster_name.as_deref(), Some("test-cluster"));
        assert!(status.error.is_none());
        assert!(status.circuit_state.is_closed());

        let request = transport.last_request().unwrap();
        assert_eq!(request.url, "http://search.test:9200/");
    }

    #[tokio::test]
    async fn test_connection_probe_failure_never_panics() {
        let (client, _) = client_over(
            MockTransport::new().respond(500, r#"{"message":"broken"}"#),
            config(),
        );

        let status = client.test_connection().await;
        assert!(!status.connected);
        assert!(status.error.unwrap().contains("broken"));
        assert!(status.circuit_state.is_closed());
    }

    #[tokio::test]
    async fn test_connection_probe_reports_open_circuit() {
        let (client, transport) = client_over(
            MockTransport::new(),
            config().with_breaker(BreakerConfig::new().with_failure_threshold(1)),
        );
        client.breakers().record_failure(client.endpoint(), "down");

        let status = client.test_connection().await;
        assert!(!status.connected);
        assert!(status.error.unwrap().contains("OPEN"));
        assert!(status.circuit_state.is_open());
        // Denied before any network attempt.
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_admin_surface_round_trip() {
        let (client, _) = client_over(MockTransport::new(), config());
        client.breakers().record_failure("other:9200", "down");

        let snapshot = client.breaker_snapshot();
        assert_eq!(snapshot["other:9200"].failure_count, 1);

        client.reset_breaker(Some("other:9200"));
        assert_eq!(client.breaker_snapshot()["other:9200"].failure_count, 0);

        client.reset_breaker(None);
        assert!(client.breaker_snapshot().is_empty());
    }
}
