//! Redis implementation of [`RemoteStore`].
//!
//! Enabled with the `redis` feature.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::{debug, instrument};

use viacep_core::error::{Result, ViaCepError};
use viacep_core::traits::RemoteStore;

fn store_error(e: redis::RedisError) -> ViaCepError {
    ViaCepError::Store(e.to_string())
}

/// Redis-backed store using a reconnecting multiplexed connection.
///
/// Writes with a TTL use `PSETEX`, so sub-second TTLs are honored by the
/// server's native expiry.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    /// Connects to the server at `url` (e.g. `redis://127.0.0.1:6379/0`).
    #[instrument]
    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url)
            .map_err(|e| ViaCepError::ConfigError(format!("invalid Redis URL: {}", e)))?;
        let conn = ConnectionManager::new(client).await.map_err(store_error)?;

        debug!("Connected to Redis");
        Ok(Self { conn })
    }

    /// Wraps an existing connection manager.
    pub fn from_manager(conn: ConnectionManager) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl RemoteStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.conn.clone();
        let value: Option<Vec<u8>> = conn.get(key).await.map_err(store_error)?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: () = match ttl {
            Some(ttl) => {
                let millis = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1);
                conn.pset_ex(key, value, millis).await
            }
            None => conn.set(key, value).await,
        }
        .map_err(store_error)?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.del(key).await.map_err(store_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_rejects_invalid_url() {
        let err = RedisStore::connect("not-a-redis-url").await.err().unwrap();
        assert!(matches!(err, ViaCepError::ConfigError(_)));
    }
}
