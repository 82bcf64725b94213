//! Common traits for the ViaCEP client.
//!
//! These traits define the seams between the client, its HTTP transport and
//! its cache backends, so each can be swapped or faked in tests.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

// ═══════════════════════════════════════════════════════════════════════════════
// CACHE TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Key-value cache of opaque byte values with optional expiry.
///
/// The trait is byte-oriented so it stays object safe (`Arc<dyn Cache>`);
/// typed access lives in `viacep_cache::CacheExt`.
///
/// # Contract
/// - `get` never fails: an absent key, an expired entry and a backend error
///   are all reported as `None`.
/// - `set` with `ttl == Duration::ZERO` stores an entry that never expires.
/// - `delete` of an absent key succeeds.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Returns the bytes stored under `key`, if any.
    async fn get(&self, key: &str) -> Option<Vec<u8>>;

    /// Stores `value` under `key`, replacing any previous entry.
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()>;

    /// Removes `key`.
    async fn delete(&self, key: &str) -> Result<()>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// REMOTE STORE TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// External key-value service backing a remote cache.
///
/// Unlike [`Cache`], a store distinguishes "not found" (`Ok(None)`) from a
/// failure to reach the service (`Err`).
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Fetches the raw value for `key`.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Writes `value` under `key`, expiring natively after `ttl` if given.
    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()>;

    /// Deletes `key`. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<()>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// HTTP FETCHER TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Fetches a JSON document over HTTP.
///
/// Implementations send JSON content negotiation headers, retry transport
/// failures according to their configuration, and treat any status other
/// than 200 as an error.
#[async_trait]
pub trait HttpFetcher: Send + Sync {
    /// Performs a GET on `url` and returns the body of a 200 response.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}
