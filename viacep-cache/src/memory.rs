//! In-memory TTL cache.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::debug;

use viacep_core::constants::DEFAULT_MEMORY_CACHE_ENTRIES;
use viacep_core::error::{Result, ViaCepError};
use viacep_core::traits::Cache;

/// Cache entry with optional TTL.
#[derive(Clone)]
struct CacheEntry {
    value: Vec<u8>,
    inserted_at: Instant,
    ttl: Option<Duration>,
}

impl CacheEntry {
    fn is_expired(&self) -> bool {
        match self.ttl {
            Some(ttl) => self.inserted_at.elapsed() >= ttl,
            None => false,
        }
    }
}

/// In-memory cache configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MemoryCacheConfig {
    /// Maximum number of entries
    pub max_entries: usize,
    /// Whether to purge expired entries before evicting live ones
    pub auto_cleanup: bool,
}

impl Default for MemoryCacheConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MEMORY_CACHE_ENTRIES,
            auto_cleanup: true,
        }
    }
}

/// In-process cache backend.
///
/// One map behind one `RwLock`: reads share the lock, writes take it
/// exclusively. Expiry is lazy. Each entry records when it was written and
/// for how long it lives, an expired entry reads as a miss, and a later `set`
/// replaces the entry together with its TTL. Expired entries are reclaimed by
/// [`cleanup_expired`](Self::cleanup_expired), by `set` when the cache is
/// full, or by a [sweeper](Self::spawn_sweeper).
pub struct MemoryCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    config: MemoryCacheConfig,
}

impl MemoryCache {
    /// Creates a new cache with default configuration.
    pub fn new() -> Self {
        Self::with_config(MemoryCacheConfig::default())
    }

    /// Creates a cache with custom configuration.
    pub fn with_config(config: MemoryCacheConfig) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            config,
        }
    }

    fn lookup(&self, key: &str) -> Option<Vec<u8>> {
        let entries = self.entries.read();
        entries
            .get(key)
            .filter(|e| !e.is_expired())
            .map(|e| e.value.clone())
    }

    fn insert(&self, key: &str, value: Vec<u8>, ttl: Duration) {
        let mut entries = self.entries.write();

        if !entries.contains_key(key) && entries.len() >= self.config.max_entries {
            if self.config.auto_cleanup {
                entries.retain(|_, e| !e.is_expired());
            }
            if entries.len() >= self.config.max_entries {
                if let Some(oldest_key) = entries
                    .iter()
                    .min_by_key(|(_, e)| e.inserted_at)
                    .map(|(k, _)| k.clone())
                {
                    entries.remove(&oldest_key);
                }
            }
        }

        entries.insert(key.to_string(), CacheEntry {
            value,
            inserted_at: Instant::now(),
            ttl: (!ttl.is_zero()).then_some(ttl),
        });
    }

    /// Clears all cached entries.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Removes all expired entries and returns how many were dropped.
    pub fn cleanup_expired(&self) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, e| !e.is_expired());
        before - entries.len()
    }

    /// Returns the number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Returns cache statistics.
    pub fn stats(&self) -> CacheStats {
        let entries = self.entries.read();
        let expired = entries.values().filter(|e| e.is_expired()).count();
        CacheStats {
            total_entries: entries.len(),
            expired_entries: expired,
            valid_entries: entries.len().saturating_sub(expired),
            capacity: self.config.max_entries,
        }
    }

    /// Spawns a background task that purges expired entries every `period`.
    ///
    /// The task holds only a weak reference and ends once the cache is
    /// dropped. Must be called from within a tokio runtime. A zero `period`
    /// is rejected with [`ViaCepError::ConfigError`].
    pub fn spawn_sweeper(self: &Arc<Self>, period: Duration) -> Result<JoinHandle<()>> {
        if period.is_zero() {
            return Err(ViaCepError::ConfigError(
                "sweeper period must be non-zero".into(),
            ));
        }

        let cache = Arc::downgrade(self);
        Ok(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // First tick completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                let Some(cache) = cache.upgrade() else {
                    break;
                };
                let removed = cache.cleanup_expired();
                if removed > 0 {
                    debug!(removed, "Swept expired cache entries");
                }
            }
        }))
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.lookup(key)
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()> {
        self.insert(key, value, ttl);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.entries.write().remove(key);
        Ok(())
    }
}

/// Cache statistics.
#[derive(Clone, Debug)]
pub struct CacheStats {
    /// Total entries (including expired)
    pub total_entries: usize,
    /// Expired entries
    pub expired_entries: usize,
    /// Valid (non-expired) entries
    pub valid_entries: usize,
    /// Maximum capacity
    pub capacity: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::CacheExt;
    use serde::ser::Error as _;
    use serde::Serializer;

    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Dummy {
        id: i32,
        name: String,
        age: i32,
    }

    fn model() -> Dummy {
        Dummy { id: 1, name: "John Doe".into(), age: 30 }
    }

    struct Channel;

    impl Serialize for Channel {
        fn serialize<S: Serializer>(&self, _serializer: S) -> std::result::Result<S::Ok, S::Error> {
            Err(S::Error::custom("channels cannot be serialized"))
        }
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let cache = MemoryCache::new();
        cache.set_value("user:1", &model(), Duration::ZERO).await.unwrap();

        let found: Option<Dummy> = cache.get_value("user:1").await;
        assert_eq!(found, Some(model()));
    }

    #[tokio::test]
    async fn test_key_not_found() {
        let cache = MemoryCache::new();
        assert_eq!(cache.get_value::<Dummy>("user:nonexistent").await, None);
    }

    #[tokio::test]
    async fn test_deserialization_error_is_miss() {
        let cache = MemoryCache::new();
        cache.set("user:invalid", b"invalid data".to_vec(), Duration::ZERO).await.unwrap();

        assert_eq!(cache.get_value::<Dummy>("user:invalid").await, None);
        // The raw bytes are still there; only the typed read misses.
        assert!(cache.get("user:invalid").await.is_some());
    }

    #[tokio::test]
    async fn test_overwrite() {
        let cache = MemoryCache::new();
        cache.set_value("user:1", &model(), Duration::ZERO).await.unwrap();

        let updated = Dummy { age: 31, ..model() };
        cache.set_value("user:1", &updated, Duration::ZERO).await.unwrap();

        assert_eq!(cache.get_value::<Dummy>("user:1").await, Some(updated));
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_serialization_error_keeps_prior_entry() {
        let cache = MemoryCache::new();
        cache.set_value("user:1", &model(), Duration::ZERO).await.unwrap();

        let err = cache.set_value("user:1", &Channel, Duration::ZERO).await.unwrap_err();
        assert!(err.to_string().starts_with("failed to encode value of type "));

        assert_eq!(cache.get_value::<Dummy>("user:1").await, Some(model()));
    }

    #[tokio::test]
    async fn test_ttl_expiration() {
        let cache = MemoryCache::new();
        cache.set_value("user:2", &model(), Duration::from_millis(10)).await.unwrap();

        assert_eq!(cache.get_value::<Dummy>("user:2").await, Some(model()));

        tokio::time::sleep(Duration::from_millis(40)).await;

        assert_eq!(cache.get_value::<Dummy>("user:2").await, None);
    }

    #[tokio::test]
    async fn test_zero_ttl_never_expires() {
        let cache = MemoryCache::new();
        cache.set_value("user:1", &model(), Duration::ZERO).await.unwrap();

        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(cache.cleanup_expired(), 0);
        assert!(cache.get_value::<Dummy>("user:1").await.is_some());
    }

    #[tokio::test]
    async fn test_overwrite_replaces_ttl() {
        let cache = MemoryCache::new();
        cache.set_value("user:1", &model(), Duration::from_millis(10)).await.unwrap();

        let updated = Dummy { age: 31, ..model() };
        cache.set_value("user:1", &updated, Duration::ZERO).await.unwrap();

        tokio::time::sleep(Duration::from_millis(40)).await;

        assert_eq!(cache.get_value::<Dummy>("user:1").await, Some(updated));
    }

    #[tokio::test]
    async fn test_delete() {
        let cache = MemoryCache::new();
        cache.set_value("user:1", &model(), Duration::ZERO).await.unwrap();

        cache.delete("user:1").await.unwrap();
        assert_eq!(cache.get_value::<Dummy>("user:1").await, None);

        // Absent key is not an error.
        cache.delete("user:1").await.unwrap();
    }

    #[tokio::test]
    async fn test_capacity_eviction() {
        let cache = MemoryCache::with_config(MemoryCacheConfig {
            max_entries: 2,
            auto_cleanup: true,
        });

        cache.set("a", vec![1], Duration::ZERO).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        cache.set("b", vec![2], Duration::ZERO).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        cache.set("c", vec![3], Duration::ZERO).await.unwrap();

        assert_eq!(cache.len(), 2);
        assert!(cache.get("b").await.is_some());
        assert!(cache.get("a").await.is_none());
        assert!(cache.get("c").await.is_some());
    }

    #[tokio::test]
    async fn test_capacity_prefers_expired() {
        let cache = MemoryCache::with_config(MemoryCacheConfig {
            max_entries: 2,
            auto_cleanup: true,
        });

        cache.set("a", vec![1], Duration::ZERO).await.unwrap();
        cache.set("b", vec![2], Duration::from_millis(1)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
        cache.set("c", vec![3], Duration::ZERO).await.unwrap();

        assert!(cache.get("a").await.is_some());
        assert!(cache.get("c").await.is_some());
    }

    #[tokio::test]
    async fn test_stats_and_cleanup() {
        let cache = MemoryCache::new();
        cache.set("alice", vec![1], Duration::from_millis(1)).await.unwrap();
        cache.set("bob", vec![2], Duration::ZERO).await.unwrap();

        tokio::time::sleep(Duration::from_millis(10)).await;

        let stats = cache.stats();
        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.expired_entries, 1);
        assert_eq!(stats.valid_entries, 1);

        assert_eq!(cache.cleanup_expired(), 1);
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_sweeper_purges_and_stops() {
        let cache = Arc::new(MemoryCache::new());
        cache.set("alice", vec![1], Duration::from_millis(1)).await.unwrap();

        let handle = cache.spawn_sweeper(Duration::from_millis(5)).unwrap();
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(cache.is_empty());

        drop(cache);
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("sweeper should stop once the cache is dropped")
            .unwrap();
    }

    #[tokio::test]
    async fn test_sweeper_rejects_zero_period() {
        let cache = Arc::new(MemoryCache::new());

        let err = cache.spawn_sweeper(Duration::ZERO).unwrap_err();
        assert!(matches!(err, ViaCepError::ConfigError(_)));
    }

    #[tokio::test]
    async fn test_usable_as_trait_object() {
        let cache: Arc<dyn Cache> = Arc::new(MemoryCache::new());
        cache.set_value("list", &vec![model(), model()], Duration::ZERO).await.unwrap();

        let found: Option<Vec<Dummy>> = cache.get_value("list").await;
        assert_eq!(found.map(|v| v.len()), Some(2));
    }
}
