/// Refresh cache with a fixed time-to-live
///
/// Memoizes acquisition + transform results per key so repeated dashboard
/// refreshes inside the TTL do not hit the upstream data source.
use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

use crate::data::Timeframe;

/// Cache key for one refresh result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RefreshKey {
    pub window: usize,
    pub timeframe: Timeframe,
}

impl RefreshKey {
    pub fn new(window: usize, timeframe: Timeframe) -> Self {
        RefreshKey { window, timeframe }
    }
}

#[derive(Debug)]
struct CacheEntry<V> {
    value: Arc<V>,
    inserted_at: Instant,
}

pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: RwLock<HashMap<K, CacheEntry<V>>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
{
    pub fn new(ttl: Duration) -> Self {
        TtlCache {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Get a live entry; expired entries are treated as absent
    pub async fn get(&self, key: &K) -> Option<Arc<V>> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| entry.inserted_at.elapsed() < self.ttl)
            .map(|entry| Arc::clone(&entry.value))
    }

    pub async fn insert(&self, key: K, value: V) -> Arc<V> {
        let value = Arc::new(value);
        let mut entries = self.entries.write().await;
        entries.insert(
            key,
            CacheEntry {
                value: Arc::clone(&value),
                inserted_at: Instant::now(),
            },
        );
        value
    }

    /// Return the live entry or compute, store and return a fresh one.
    ///
    /// Errors from `f` are returned as-is and nothing is stored.
    pub async fn try_get_or_insert_with<E, F, Fut>(&self, key: K, f: F) -> Result<Arc<V>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(cached) = self.get(&key).await {
            debug!("Cache hit: {:?}", key);
            return Ok(cached);
        }

        debug!("Cache miss: {:?}", key);
        let value = f().await?;
        Ok(self.insert(key, value).await)
    }

    /// Drop all entries, returning how many there were
    pub async fn invalidate(&self) -> usize {
        let mut entries = self.entries.write().await;
        let dropped = entries.len();
        entries.clear();
        dropped
    }
}
