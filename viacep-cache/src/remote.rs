//! Cache backed by an external key-value service.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use viacep_core::error::Result;
use viacep_core::traits::{Cache, RemoteStore};

/// Adapter from a [`RemoteStore`] to the [`Cache`] contract.
///
/// Keeps no local state. Keys are forwarded unchanged, TTLs become the
/// store's native expiry, and read failures are logged and reported as
/// misses.
pub struct RemoteCache<S: ?Sized> {
    store: Arc<S>,
}

impl<S: RemoteStore + ?Sized> RemoteCache<S> {
    /// Wraps a shared store.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }
}

impl<S: ?Sized> Clone for RemoteCache<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

#[async_trait]
impl<S: RemoteStore + ?Sized> Cache for RemoteCache<S> {
    async fn get(&self, key: &str) -> Option<Vec<u8>> {
        match self.store.get(key).await {
            Ok(Some(value)) => Some(value),
            Ok(None) => {
                debug!(key, "Remote cache miss");
                None
            }
            Err(e) => {
                warn!(key, error = %e, "Remote cache read failed, treating as miss");
                None
            }
        }
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()> {
        let ttl = (!ttl.is_zero()).then_some(ttl);
        self.store.set(key, &value, ttl).await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.store.delete(key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};

    use parking_lot::Mutex;
    use serde::{Deserialize, Serialize};
    use viacep_core::error::ViaCepError;

    use crate::codec::{encode, CacheExt};

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct Dummy {
        id: i32,
        name: String,
        age: i32,
    }

    fn model() -> Dummy {
        Dummy { id: 1, name: "John Doe".into(), age: 30 }
    }

    /// Store double that records TTLs and can be switched into failure mode.
    #[derive(Default)]
    struct FakeStore {
        data: Mutex<HashMap<String, Vec<u8>>>,
        ttls: Mutex<HashMap<String, Option<Duration>>>,
        failing: AtomicBool,
    }

    impl FakeStore {
        fn fail(&self) {
            self.failing.store(true, Ordering::SeqCst);
        }

        fn check(&self) -> Result<()> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(ViaCepError::Store("connection refused".into()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl RemoteStore for FakeStore {
        async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
            self.check()?;
            Ok(self.data.lock().get(key).cloned())
        }

        async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()> {
            self.check()?;
            self.data.lock().insert(key.to_string(), value.to_vec());
            self.ttls.lock().insert(key.to_string(), ttl);
            Ok(())
        }

        async fn delete(&self, key: &str) -> Result<()> {
            self.check()?;
            self.data.lock().remove(key);
            Ok(())
        }
    }

    fn setup() -> (Arc<FakeStore>, RemoteCache<FakeStore>) {
        let store = Arc::new(FakeStore::default());
        let cache = RemoteCache::new(Arc::clone(&store));
        (store, cache)
    }

    #[tokio::test]
    async fn test_get_existing_value() {
        let (store, cache) = setup();
        store.data.lock().insert("user:1".into(), encode(&model()).unwrap());

        assert_eq!(cache.get_value::<Dummy>("user:1").await, Some(model()));
    }

    #[tokio::test]
    async fn test_key_not_found() {
        let (_store, cache) = setup();
        assert_eq!(cache.get_value::<Dummy>("user:1").await, None);
    }

    #[tokio::test]
    async fn test_store_error_is_miss() {
        let (store, cache) = setup();
        store.data.lock().insert("user:1".into(), encode(&model()).unwrap());
        store.fail();

        assert_eq!(cache.get_value::<Dummy>("user:1").await, None);
    }

    #[tokio::test]
    async fn test_deserialization_error_is_miss() {
        let (store, cache) = setup();
        store.data.lock().insert("user:1".into(), b"invalid data".to_vec());

        assert_eq!(cache.get_value::<Dummy>("user:1").await, None);
    }

    #[tokio::test]
    async fn test_set_forwards_ttl() {
        let (store, cache) = setup();

        cache.set_value("short", &model(), Duration::from_secs(60)).await.unwrap();
        cache.set_value("forever", &model(), Duration::ZERO).await.unwrap();

        let ttls = store.ttls.lock();
        assert_eq!(ttls.get("short"), Some(&Some(Duration::from_secs(60))));
        assert_eq!(ttls.get("forever"), Some(&None));
    }

    #[tokio::test]
    async fn test_set_error_surfaces() {
        let (store, cache) = setup();
        store.fail();

        let err = cache.set_value("user:1", &model(), Duration::ZERO).await.unwrap_err();
        assert!(matches!(err, ViaCepError::Store(_)));
    }

    #[tokio::test]
    async fn test_delete_forwards() {
        let (store, cache) = setup();
        cache.set_value("user:1", &model(), Duration::ZERO).await.unwrap();

        cache.delete("user:1").await.unwrap();
        assert!(store.data.lock().is_empty());
    }
}
