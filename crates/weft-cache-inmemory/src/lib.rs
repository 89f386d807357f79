//! In-memory implementation of the cache store interface
//!
//! Provides a bounded in-process cache with time-to-live and max-size
//! eviction, primarily used for single-instance deployments and testing.
//! A remote key-value store is the other reference implementation of the
//! contract and lives outside this repository.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;
use weft_core::{Cache, CacheError};

/// Configuration of the in-memory cache
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InMemoryCacheOptions {
    /// Maximum number of entries held at once
    pub maximum_size: usize,
    /// Time-to-live of an entry, in milliseconds
    pub ttl_ms: u64,
}

impl Default for InMemoryCacheOptions {
    fn default() -> Self {
        Self {
            maximum_size: 1000,
            ttl_ms: 5000,
        }
    }
}

/// A value with its insertion and expiration times
struct ValueWithExpiry {
    /// The stored JSON value
    value: Value,
    /// Insertion time, used for max-size eviction
    inserted_at: Instant,
    /// Expiration time
    expires_at: Instant,
}

/// Bounded in-memory cache with TTL eviction
///
/// Expired entries are invisible to lookups immediately and swept by a
/// background task; when the cache is full, the oldest-inserted entry is
/// evicted. Safe for concurrent access from multiple task runs.
pub struct InMemoryCache {
    entries: Arc<RwLock<HashMap<String, ValueWithExpiry>>>,
    options: InMemoryCacheOptions,
}

impl InMemoryCache {
    /// Create a cache with the given options
    pub fn new(options: InMemoryCacheOptions) -> Self {
        let entries = Arc::new(RwLock::new(HashMap::new()));
        Self::start_sweeper_task(entries.clone());
        Self { entries, options }
    }

    /// Sweep expired entries in the background
    fn start_sweeper_task(entries: Arc<RwLock<HashMap<String, ValueWithExpiry>>>) {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(60));
            loop {
                interval.tick().await;

                let now = Instant::now();
                let mut entries = entries.write().await;
                let before = entries.len();
                entries.retain(|_, entry| entry.expires_at > now);
                let swept = before - entries.len();
                if swept > 0 {
                    debug!(swept, "removed expired cache entries");
                }
            }
        });
    }

    /// Number of live (unexpired) entries
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        let entries = self.entries.read().await;
        entries.values().filter(|e| e.expires_at > now).count()
    }

    /// Check whether the cache holds no live entries
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new(InMemoryCacheOptions::default())
    }
}

#[async_trait]
impl Cache for InMemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Value>, CacheError> {
        let entries = self.entries.read().await;
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Ok(Some(entry.value.clone())),
            // Expired values are invisible even before the sweeper runs.
            _ => Ok(None),
        }
    }

    async fn put(&self, key: &str, value: Value) -> Result<(), CacheError> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;

        if !entries.contains_key(key) && entries.len() >= self.options.maximum_size {
            let oldest = entries
                .iter()
                .min_by_key(|(_, entry)| entry.inserted_at)
                .map(|(key, _)| key.clone());
            if let Some(oldest) = oldest {
                debug!(key = %oldest, "cache full, evicting oldest entry");
                entries.remove(&oldest);
            }
        }

        entries.insert(
            key.to_string(),
            ValueWithExpiry {
                value,
                inserted_at: now,
                expires_at: now + Duration::from_millis(self.options.ttl_ms),
            },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::time::sleep;

    #[tokio::test]
    async fn test_basic_operations() {
        let cache = InMemoryCache::default();

        assert_eq!(cache.get("missing").await.unwrap(), None);
        assert!(cache.is_empty().await);

        cache.put("key", json!({"id": 1})).await.unwrap();
        assert_eq!(cache.get("key").await.unwrap(), Some(json!({"id": 1})));
        assert_eq!(cache.len().await, 1);

        cache.put("key", json!({"id": 2})).await.unwrap();
        assert_eq!(cache.get("key").await.unwrap(), Some(json!({"id": 2})));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_ttl_expiry() {
        let cache = InMemoryCache::new(InMemoryCacheOptions {
            ttl_ms: 80,
            ..InMemoryCacheOptions::default()
        });

        cache.put("short-lived", json!("value")).await.unwrap();
        assert_eq!(
            cache.get("short-lived").await.unwrap(),
            Some(json!("value"))
        );

        sleep(Duration::from_millis(120)).await;

        assert_eq!(cache.get("short-lived").await.unwrap(), None);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_max_size_evicts_oldest() {
        let cache = InMemoryCache::new(InMemoryCacheOptions {
            maximum_size: 2,
            ttl_ms: 60_000,
        });

        cache.put("first", json!(1)).await.unwrap();
        sleep(Duration::from_millis(5)).await;
        cache.put("second", json!(2)).await.unwrap();
        sleep(Duration::from_millis(5)).await;
        cache.put("third", json!(3)).await.unwrap();

        assert_eq!(cache.get("first").await.unwrap(), None);
        assert_eq!(cache.get("second").await.unwrap(), Some(json!(2)));
        assert_eq!(cache.get("third").await.unwrap(), Some(json!(3)));
        assert_eq!(cache.len().await, 2);
    }

    #[tokio::test]
    async fn test_overwrite_does_not_evict() {
        let cache = InMemoryCache::new(InMemoryCacheOptions {
            maximum_size: 2,
            ttl_ms: 60_000,
        });

        cache.put("first", json!(1)).await.unwrap();
        cache.put("second", json!(2)).await.unwrap();
        cache.put("second", json!(22)).await.unwrap();

        assert_eq!(cache.get("first").await.unwrap(), Some(json!(1)));
        assert_eq!(cache.get("second").await.unwrap(), Some(json!(22)));
    }

    #[tokio::test]
    async fn test_concurrent_access() {
        let cache = Arc::new(InMemoryCache::default());

        let writers: Vec<_> = (0..8)
            .map(|i| {
                let cache = cache.clone();
                tokio::spawn(async move {
                    cache.put(&format!("key-{i}"), json!(i)).await.unwrap();
                })
            })
            .collect();
        for writer in writers {
            writer.await.unwrap();
        }

        for i in 0..8 {
            assert_eq!(cache.get(&format!("key-{i}")).await.unwrap(), Some(json!(i)));
        }
    }

    #[test]
    fn test_options_defaults() {
        let options: InMemoryCacheOptions = serde_json::from_value(json!({})).unwrap();
        assert_eq!(options.maximum_size, 1000);
        assert_eq!(options.ttl_ms, 5000);
    }
}
