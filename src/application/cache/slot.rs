//! Double-checked TTL refresh, shared by every tiered cache.
//!
//! A [`TtlSlot`] holds one value together with the key it was fetched for
//! and the instant of its last refresh. Reads take the read lock and return
//! the cached value while `now - refreshed_at < ttl` and the key matches.
//! Otherwise the caller takes the write lock, checks again (another caller
//! may have refreshed in the meantime) and only then runs the fetch. The
//! write lock is held across the fetch, so concurrent stale readers trigger
//! a single request.

use std::fmt::Debug;
use std::future::Future;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::error::FetchError;

/// A cached value and the moment it was fetched.
#[derive(Debug, Clone)]
pub struct CacheEntry<K, V> {
    pub key: K,
    pub value: V,
    pub refreshed_at: Instant,
}

impl<K: PartialEq, V> CacheEntry<K, V> {
    /// Validity is purely time-derived: the key must match and the entry
    /// must be younger than `ttl`.
    #[must_use]
    pub fn is_fresh(&self, key: &K, ttl: Duration, now: Instant) -> bool {
        self.key == *key && now.saturating_duration_since(self.refreshed_at) < ttl
    }
}

/// Single-value cache with a time-to-live and single-flight refresh.
///
/// `K` distinguishes what the value was fetched for; asking for a different
/// key forces a refetch and replaces the entry. Use `()` for unkeyed
/// resources.
#[derive(Debug)]
pub struct TtlSlot<K, V> {
    name: &'static str,
    ttl: Duration,
    entry: RwLock<Option<CacheEntry<K, V>>>,
}

impl<K, V> TtlSlot<K, V>
where
    K: PartialEq + Clone + Debug,
    V: Clone,
{
    #[must_use]
    pub fn new(name: &'static str, ttl: Duration) -> Self {
        Self {
            name,
            ttl,
            entry: RwLock::new(None),
        }
    }

    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the cached value for `key`, refreshing it with `fetch` if it
    /// is missing, stale, or was fetched for another key.
    ///
    /// A failed refresh returns the error and leaves the previous entry in
    /// place; it is not extended, so the next call tries again.
    pub async fn get_or_refresh<F, Fut>(&self, key: K, fetch: F) -> Result<V, FetchError>
    where
        F: FnOnce(K) -> Fut,
        Fut: Future<Output = Result<V, FetchError>>,
    {
        {
            let guard = self.entry.read().await;
            if let Some(entry) = guard.as_ref() {
                if entry.is_fresh(&key, self.ttl, Instant::now()) {
                    debug!(cache = self.name, key = ?key, "Cache hit");
                    return Ok(entry.value.clone());
                }
            }
        }

        let mut guard = self.entry.write().await;
        if let Some(entry) = guard.as_ref() {
            if entry.is_fresh(&key, self.ttl, Instant::now()) {
                debug!(cache = self.name, key = ?key, "Refreshed by another caller");
                return Ok(entry.value.clone());
            }
        }

        match fetch(key.clone()).await {
            Ok(value) => {
                info!(cache = self.name, key = ?key, "Cache refreshed");
                *guard = Some(CacheEntry {
                    key,
                    value: value.clone(),
                    refreshed_at: Instant::now(),
                });
                Ok(value)
            }
            Err(err) => {
                warn!(cache = self.name, key = ?key, error = %err, "Cache refresh failed");
                Err(err)
            }
        }
    }

    /// The last stored value, fresh or not.
    pub async fn peek(&self) -> Option<CacheEntry<K, V>> {
        self.entry.read().await.clone()
    }
}
