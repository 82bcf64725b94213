//! # ViaCEP Client
//!
//! Client for the ViaCEP Brazilian postal-code API with pluggable result
//! caching.
//!
//! ## Example
//!
//! ```rust,ignore
//! use viacep_client::{ViaCep, ViaCepConfig};
//!
//! let client = ViaCep::with_config(ViaCepConfig::from_env()?)?;
//!
//! let address = client.lookup("01001-000").await?;
//! let matches = client.search("RS", "Porto Alegre", "Domingos").await?;
//! ```
//!
//! To share results between processes, swap the default in-memory cache for
//! a remote one:
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use viacep_client::{RedisStore, RemoteCache, ViaCep};
//!
//! let store = Arc::new(RedisStore::connect("redis://127.0.0.1/").await?);
//! let client = ViaCep::new()?.with_cache(Arc::new(RemoteCache::new(store)));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod client;
mod config;

pub use client::ViaCep;
pub use config::ViaCepConfig;

pub use viacep_cache::{cache_key, CacheExt, MemoryCache, MemoryCacheConfig, RemoteCache};
#[cfg(feature = "redis")]
pub use viacep_cache::RedisStore;
pub use viacep_core::{Address, Cache, Cep, HttpFetcher, RemoteStore, Result, SearchQuery, ViaCepError};
pub use viacep_http::{HttpClient, HttpConfig};
