//! TTL-bounded memoization of idempotent reads over a [`KeyValueStore`].

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::KeyValueStore;

/// Caches JSON-serialized results in a store and deletes them after a TTL.
///
/// Expiry is lazy: a deletion task is scheduled on the ambient tokio runtime
/// when an entry is written, and the entry is served until that task runs.
#[derive(Clone)]
pub struct TtlCache {
    store: Arc<dyn KeyValueStore>,
    ttl: Duration,
}

impl TtlCache {
    pub fn new(store: Arc<dyn KeyValueStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the cached value at `key` if it has the expected shape;
    /// otherwise run `fetch` and cache a `Some` result.
    pub async fn get_or_fetch<T, F, Fut>(&self, key: &str, fetch: F) -> Option<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Option<T>>,
    {
        if let Some(raw) = self.store.get(key) {
            match serde_json::from_str::<T>(&raw) {
                Ok(value) => {
                    debug!(key, "cache hit");
                    return Some(value);
                }
                Err(e) => debug!(key, error = %e, "cached entry has unexpected shape"),
            }
        }

        let value = fetch().await?;
        match serde_json::to_string(&value) {
            Ok(raw) if self.store.set(key, &raw) => self.schedule_expiry(key),
            Ok(_) => warn!(key, "store rejected cache entry"),
            Err(e) => warn!(key, error = %e, "could not serialize value for caching"),
        }
        Some(value)
    }

    fn schedule_expiry(&self, key: &str) {
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let store = self.store.clone();
                let key = key.to_string();
                let ttl = self.ttl;
                handle.spawn(async move {
                    tokio::time::sleep(ttl).await;
                    debug!(key = %key, "cache entry expired");
                    store.delete(&key);
                });
            }
            Err(_) => warn!(key, "no tokio runtime; cache entry will not expire"),
        }
    }
}
