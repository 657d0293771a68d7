//! The resilient client facade and the client cache.
//!
//! [`SearchClient`] composes one request executor bound to one backend
//! address; [`ClientCache`] hands out existing client handles for
//! configurations that repeat across calls.

mod cache;
mod config;
mod search_client;

pub use cache::{fingerprint, CacheStats, ClientCache};
pub use config::{SearchConfig, ENV_API_KEY, ENV_PASSWORD, ENV_URL, ENV_USERNAME};
pub use search_client::{ConnectionStatus, SearchClient};

use std::sync::Arc;

/// A shared client handle, as stored in the [`ClientCache`].
pub type SharedClient = Arc<SearchClient>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit_breaker::BreakerRegistry;
    use crate::executor::MockTransport;
    use std::time::Duration;

    /// Clients for repeating fingerprints come out of the cache instead
    /// of being reconstructed.
    #[test]
    fn test_cache_hands_out_shared_clients() {
        let config = SearchConfig::new("http://search.test:9200");
        let breakers = Arc::new(BreakerRegistry::new(config.breaker.clone()));
        let cache: ClientCache<SharedClient> = ClientCache::new(2, Duration::from_secs(300));

        let key = fingerprint(["logs-*"]);
        let make = || {
            SearchClient::with_transport(
                &config,
                Arc::new(MockTransport::new()),
                breakers.clone(),
            )
            .map(Arc::new)
        };

        let first = cache.get_or_create(&key, make).unwrap();
        let second = cache
            .get_or_create(&key, || unreachable!("expected a cache hit"))
            .unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.stats().size, 1);
    }
}
