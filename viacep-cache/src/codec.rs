//! Typed access on top of the byte-level [`Cache`] trait.
//!
//! Values are encoded with `bincode`. Decoding is lenient: anything that does
//! not decode into the requested type is reported as a miss.

use std::any::type_name;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use viacep_core::error::{Result, ViaCepError};
use viacep_core::traits::Cache;

/// Encodes `value` into the byte form stored by every cache backend.
///
/// Fails with [`ViaCepError::Encode`] naming the value's type.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    bincode::serialize(value).map_err(|e| ViaCepError::Encode {
        type_name: type_name::<T>(),
        reason: e.to_string(),
    })
}

/// Decodes bytes produced by [`encode`]. Returns `None` on any mismatch.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Option<T> {
    match bincode::deserialize(bytes) {
        Ok(value) => Some(value),
        Err(e) => {
            debug!(target_type = type_name::<T>(), error = %e, "Cached bytes did not decode");
            None
        }
    }
}

/// Typed get/set for any [`Cache`], including `dyn Cache`.
#[async_trait]
pub trait CacheExt: Cache {
    /// Looks up `key` and decodes it as `T`.
    ///
    /// A missing key, a backend failure and bytes that do not decode as `T`
    /// all return `None`.
    async fn get_value<T>(&self, key: &str) -> Option<T>
    where
        T: DeserializeOwned + Send;

    /// Encodes `value` and stores it under `key`.
    ///
    /// An encode failure is returned before anything is written, so an
    /// existing entry under `key` is left untouched.
    async fn set_value<T>(&self, key: &str, value: &T, ttl: Duration) -> Result<()>
    where
        T: Serialize + Sync + ?Sized;
}

#[async_trait]
impl<C> CacheExt for C
where
    C: Cache + ?Sized,
{
    async fn get_value<T>(&self, key: &str) -> Option<T>
    where
        T: DeserializeOwned + Send,
    {
        let bytes = self.get(key).await?;
        decode(&bytes)
    }

    async fn set_value<T>(&self, key: &str, value: &T, ttl: Duration) -> Result<()>
    where
        T: Serialize + Sync + ?Sized,
    {
        let bytes = encode(value)?;
        self.set(key, bytes, ttl).await
    }
}
