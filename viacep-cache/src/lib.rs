//! Result caching for the ViaCEP client.
//!
//! Backends implement the byte-level [`Cache`](viacep_core::Cache) trait:
//!
//! - [`MemoryCache`]: in-process map with lazy per-entry expiry
//! - [`RemoteCache`]: adapter over any [`RemoteStore`](viacep_core::RemoteStore)
//! - `RedisStore`: Redis store for [`RemoteCache`] (feature `redis`)
//!
//! [`CacheExt`] adds typed `get_value`/`set_value`, and [`cache_key`]
//! derives namespaced keys.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use viacep_cache::{cache_key, CacheExt, MemoryCache};
//!
//! let cache = MemoryCache::new();
//! let key = cache_key(&["01001000"]);
//! cache.set_value(&key, &address, Duration::from_secs(3600)).await?;
//! let cached: Option<Address> = cache.get_value(&key).await;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod codec;
mod key;
mod memory;
mod remote;
#[cfg(feature = "redis")]
mod redis_store;

pub use codec::{decode, encode, CacheExt};
pub use key::cache_key;
pub use memory::{CacheStats, MemoryCache, MemoryCacheConfig};
pub use remote::RemoteCache;
#[cfg(feature = "redis")]
pub use redis_store::RedisStore;
