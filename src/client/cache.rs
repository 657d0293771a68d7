//! Bounded, TTL-expiring, LRU-evicting cache of client handles.
//!
//! Constructing a client derives headers and state from configuration;
//! the cache hands out existing handles for configurations that repeat
//! across calls, keyed by a fingerprint, while bounding memory.

use crate::core::SearchResult;

use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Derives a cache fingerprint from configuration parts.
///
/// Only configuration that legitimately varies per logical caller (an
/// index pattern, for instance) belongs in the fingerprint. Credentials
/// are process-wide and must never participate.
pub fn fingerprint<I, S>(parts: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::new();
    for part in parts {
        if !out.is_empty() {
            out.push('|');
        }
        out.push_str(part.as_ref());
    }
    out
}

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    handle: V,
    created_at: Instant,
    last_used_at: Instant,
    /// Insertion order, used as a deterministic LRU tie-break.
    seq: u64,
}

#[derive(Debug)]
struct CacheInner<V> {
    entries: HashMap<String, CacheEntry<V>>,
    next_seq: u64,
}

/// Point-in-time cache statistics.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    /// Current number of live entries.
    pub size: usize,
    /// Maximum number of live entries.
    pub max_size: usize,
    /// Entry TTL in seconds; zero means entries never expire.
    pub ttl_secs: u64,
}

/// A bounded cache of constructed client handles.
///
/// Lookup, expiry removal, eviction, and insertion run as one atomic
/// sequence under a single mutex. The factory passed to
/// [`get_or_create`](ClientCache::get_or_create) is synchronous, so the
/// lock never spans I/O.
///
/// # Examples
///
/// ```rust
/// use searchbridge::client::{fingerprint, ClientCache};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// let cache: ClientCache<Arc<String>> = ClientCache::new(2, Duration::from_secs(300));
/// let key = fingerprint(["logs-*"]);
/// let handle = cache
///     .get_or_create(&key, || Ok(Arc::new("client".to_string())))
///     .unwrap();
/// assert_eq!(*handle, "client");
/// ```
#[derive(Debug)]
pub struct ClientCache<V> {
    inner: Mutex<CacheInner<V>>,
    max_size: usize,
    ttl: Duration,
}

impl<V: Clone> ClientCache<V> {
    /// Creates a cache holding at most `max_size` entries, each living
    /// for `ttl` (zero disables expiry).
    pub fn new(max_size: usize, ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(CacheInner {
                entries: HashMap::new(),
                next_seq: 0,
            }),
            max_size: max_size.max(1),
            ttl,
        }
    }

    /// Returns the cached handle for `fingerprint`, constructing one via
    /// `factory` on a miss.
    ///
    /// A hit refreshes the entry's last-used stamp. An entry older than
    /// the TTL is removed and treated as a miss. When the cache is full,
    /// the least recently used entry (insertion order breaking ties) is
    /// evicted before the new one is inserted.
    pub fn get_or_create<F>(&self, fingerprint: &str, factory: F) -> SearchResult<V>
    where
        F: FnOnce() -> SearchResult<V>,
    {
        let mut inner = self.lock();
        let now = Instant::now();

        if let Some(entry) = inner.entries.get_mut(fingerprint) {
            let fresh =
                self.ttl.is_zero() || now.duration_since(entry.created_at) < self.ttl;
            if fresh {
                entry.last_used_at = now;
                return Ok(entry.handle.clone());
            }
            inner.entries.remove(fingerprint);
            tracing::debug!(fingerprint, "cached client expired");
        }

        if inner.entries.len() >= self.max_size {
            let victim = inner
                .entries
                .iter()
                .min_by_key(|(_, entry)| (entry.last_used_at, entry.seq))
                .map(|(key, _)| key.clone());
            if let Some(victim) = victim {
                inner.entries.remove(&victim);
                tracing::debug!(evicted = %victim, "client cache full, evicted LRU entry");
            }
        }

        let handle = factory()?;
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.entries.insert(
            fingerprint.to_string(),
            CacheEntry {
                handle: handle.clone(),
                created_at: now,
                last_used_at: now,
                seq,
            },
        );
        Ok(handle)
    }

    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            size: self.lock().entries.len(),
            max_size: self.max_size,
            ttl_secs: self.ttl.as_secs(),
        }
    }

    /// Returns the number of live entries.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Returns `true` when the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` when `fingerprint` currently has a live entry.
    ///
    /// Purely observational: does not refresh the entry or remove an
    /// expired one.
    pub fn contains(&self, fingerprint: &str) -> bool {
        let inner = self.lock();
        match inner.entries.get(fingerprint) {
            Some(entry) => {
                self.ttl.is_zero() || entry.created_at.elapsed() < self.ttl
            }
            None => false,
        }
    }

    /// Removes all entries.
    pub fn clear(&self) {
        self.lock().entries.clear();
        tracing::debug!("client cache cleared");
    }

    fn lock(&self) -> MutexGuard<'_, CacheInner<V>> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
