//! Client configuration.
//!
//! Configuration carries values only; all behavior lives in the breaker,
//! executor, and cache implementations.

use crate::circuit_breaker::BreakerConfig;
use crate::core::{SearchError, SearchResult};
use crate::executor::RetryConfig;

use secrecy::SecretString;
use std::time::Duration;

/// Environment variable for the backend base address.
pub const ENV_URL: &str = "SEARCHBRIDGE_URL";
/// Environment variable for the API key.
pub const ENV_API_KEY: &str = "SEARCHBRIDGE_API_KEY";
/// Environment variable for the basic-auth username.
pub const ENV_USERNAME: &str = "SEARCHBRIDGE_USERNAME";
/// Environment variable for the basic-auth password.
pub const ENV_PASSWORD: &str = "SEARCHBRIDGE_PASSWORD";

/// Configuration for a [`SearchClient`](crate::client::SearchClient).
///
/// Credentials are process-wide: an API key is preferred, else a
/// username/password pair, else no auth header at all. Secrets are held
/// behind [`SecretString`] so they never appear in debug output.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Base address of the backend (required).
    pub base_url: String,

    /// API key, attached as `Authorization: ApiKey <key>` when present.
    pub api_key: Option<SecretString>,

    /// Basic-auth username, used only when no API key is configured.
    pub username: Option<String>,

    /// Basic-auth password.
    pub password: Option<SecretString>,

    /// Default per-request deadline.
    pub request_timeout: Duration,

    /// Circuit breaker thresholds and recovery timeout.
    pub breaker: BreakerConfig,

    /// Transport retry budget and backoff.
    pub retry: RetryConfig,

    /// Maximum live entries in the client cache.
    pub cache_max_size: usize,

    /// Client cache entry TTL; zero disables expiry.
    pub cache_ttl: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: None,
            username: None,
            password: None,
            request_timeout: Duration::from_secs(30),
            breaker: BreakerConfig::default(),
            retry: RetryConfig::default(),
            cache_max_size: 10,
            cache_ttl: Duration::from_secs(300),
        }
    }
}

impl SearchConfig {
    /// Creates a configuration for the given base address.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Reads configuration from the environment.
    ///
    /// Fails with a `Configuration` error when `SEARCHBRIDGE_URL` is not
    /// set; credentials are optional.
    pub fn from_env() -> SearchResult<Self> {
        let base_url = std::env::var(ENV_URL)
            .map_err(|_| SearchError::configuration(format!("{ENV_URL} is not set")))?;

        Ok(Self {
            api_key: std::env::var(ENV_API_KEY).ok().map(SecretString::from),
            username: std::env::var(ENV_USERNAME).ok(),
            password: std::env::var(ENV_PASSWORD).ok().map(SecretString::from),
            ..Self::new(base_url)
        })
    }

    /// Sets the API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::from(key.into()));
        self
    }

    /// Sets the basic-auth credentials.
    pub fn with_basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(SecretString::from(password.into()));
        self
    }

    /// Sets the default per-request deadline.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Sets the circuit breaker configuration.
    pub fn with_breaker(mut self, breaker: BreakerConfig) -> Self {
        self.breaker = breaker;
        self
    }

    /// Sets the retry configuration.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Sets the client cache capacity.
    pub fn with_cache_max_size(mut self, max_size: usize) -> Self {
        self.cache_max_size = max_size.max(1);
        self
    }

    /// Sets the client cache TTL; zero disables expiry.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SearchConfig::default();
        assert!(config.base_url.is_empty());
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.cache_max_size, 10);
        assert_eq!(config.cache_ttl, Duration::from_secs(300));
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_config_builder() {
        let config = SearchConfig::new("http://search.test:9200")
            .with_api_key("key-material")
            .with_request_timeout(Duration::from_secs(10))
            .with_cache_max_size(0)
            .with_cache_ttl(Duration::ZERO);

        assert_eq!(config.base_url, "http://search.test:9200");
        assert!(config.api_key.is_some());
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        // Capacity is clamped to at least one entry.
        assert_eq!(config.cache_max_size, 1);
        assert_eq!(config.cache_ttl, Duration::ZERO);
    }

    #[test]
    fn test_from_env_requires_url() {
        std::env::remove_var(ENV_URL);
        let err = SearchConfig::from_env().unwrap_err();
        assert!(matches!(err, SearchError::Configuration { .. }));

        std::env::set_var(ENV_URL, "http://search.test:9200");
        let config = SearchConfig::from_env().unwrap();
        assert_eq!(config.base_url, "http://search.test:9200");
        std::env::remove_var(ENV_URL);
    }
}
