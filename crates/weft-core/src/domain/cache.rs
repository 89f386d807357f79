//! Cache store contract for the cache-aside action decorator
//!
//! Implementations are shared across concurrently running tasks and must be
//! safe for concurrent access; no transactional guarantee is provided across
//! a get/put pair, so concurrent misses on the same key may both compute.

use crate::error::CacheError;
use async_trait::async_trait;
use serde_json::Value;

/// A pluggable key-value store consulted before invoking a wrapped action
///
/// Reference implementations are a bounded in-process store with TTL
/// eviction and a remote key-value store accessed over the network; the
/// engine treats transient connectivity failures of the latter as ordinary
/// lookup/store errors, never as fatal ones.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Look up a value by key; `None` when the key is absent or expired
    async fn get(&self, key: &str) -> Result<Option<Value>, CacheError>;

    /// Store a value under a key, overwriting any previous value
    async fn put(&self, key: &str, value: Value) -> Result<(), CacheError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct MapCache {
        entries: Mutex<HashMap<String, Value>>,
    }

    #[async_trait]
    impl Cache for MapCache {
        async fn get(&self, key: &str) -> Result<Option<Value>, CacheError> {
            Ok(self.entries.lock().unwrap().get(key).cloned())
        }

        async fn put(&self, key: &str, value: Value) -> Result<(), CacheError> {
            self.entries.lock().unwrap().insert(key.to_string(), value);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_cache_contract() {
        let cache = MapCache {
            entries: Mutex::new(HashMap::new()),
        };

        assert_eq!(cache.get("missing").await.unwrap(), None);

        cache.put("key", json!({"id": 1})).await.unwrap();
        assert_eq!(cache.get("key").await.unwrap(), Some(json!({"id": 1})));

        cache.put("key", json!({"id": 2})).await.unwrap();
        assert_eq!(cache.get("key").await.unwrap(), Some(json!({"id": 2})));
    }
}
