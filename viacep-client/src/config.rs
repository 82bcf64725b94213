//! Client configuration.

use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use viacep_core::constants::{DEFAULT_BASE_URL, DEFAULT_CACHE_TTL_SECONDS};
use viacep_core::error::{Result, ViaCepError};
use viacep_http::HttpConfig;

/// Client configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViaCepConfig {
    /// Service base URL (no trailing `/ws`)
    pub base_url: String,
    /// Whether results are cached
    pub enable_cache: bool,
    /// Cache TTL in seconds; 0 keeps entries until deleted
    pub cache_ttl_seconds: u64,
    /// HTTP transport settings
    pub http: HttpConfig,
}

impl Default for ViaCepConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            enable_cache: true,
            cache_ttl_seconds: DEFAULT_CACHE_TTL_SECONDS,
            http: HttpConfig::default(),
        }
    }
}

impl ViaCepConfig {
    /// Creates a config pointing at another deployment (or a mock server).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Sets the retry budget for transport failures.
    pub fn with_retry(mut self, retry_count: u32, wait: Duration) -> Self {
        self.http = self.http.with_retry_wait(wait);
        self.http.retry_count = retry_count;
        self
    }

    /// Sets the per-attempt request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http = self.http.with_timeout(timeout);
        self
    }

    /// Sets the cache TTL in seconds.
    pub fn with_cache_ttl_seconds(mut self, seconds: u64) -> Self {
        self.cache_ttl_seconds = seconds;
        self
    }

    /// Disables caching.
    pub fn no_cache(mut self) -> Self {
        self.enable_cache = false;
        self
    }

    /// Returns the cache TTL.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }

    /// Loads configuration from the environment, reading `.env` first.
    ///
    /// | variable | field |
    /// |---|---|
    /// | `VIACEP_BASE_URL` | `base_url` |
    /// | `VIACEP_ENABLE_CACHE` | `enable_cache` (`false`/`0` disable) |
    /// | `VIACEP_CACHE_TTL_SECONDS` | `cache_ttl_seconds` |
    /// | `VIACEP_RETRY_COUNT` | `http.retry_count` |
    /// | `VIACEP_RETRY_WAIT_MS` | `http.retry_wait_ms` |
    /// | `VIACEP_TIMEOUT_MS` | `http.timeout_ms` |
    ///
    /// Unset variables keep their defaults; unparsable ones are an error.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(base_url) = lookup("VIACEP_BASE_URL") {
            config.base_url = base_url;
        }
        if let Some(enable) = lookup("VIACEP_ENABLE_CACHE") {
            config.enable_cache = enable != "false" && enable != "0";
        }
        if let Some(ttl) = parse_var::<u64>(&lookup, "VIACEP_CACHE_TTL_SECONDS")? {
            config.cache_ttl_seconds = ttl;
        }
        if let Some(count) = parse_var::<u32>(&lookup, "VIACEP_RETRY_COUNT")? {
            config.http.retry_count = count;
        }
        if let Some(wait) = parse_var::<u64>(&lookup, "VIACEP_RETRY_WAIT_MS")? {
            config.http.retry_wait_ms = wait;
        }
        if let Some(timeout) = parse_var::<u64>(&lookup, "VIACEP_TIMEOUT_MS")? {
            config.http.timeout_ms = timeout;
        }

        Ok(config)
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    lookup(name)
        .map(|raw| {
            raw.trim().parse().map_err(|e| {
                ViaCepError::ConfigError(format!("{} has invalid value '{}': {}", name, raw, e))
            })
        })
        .transpose()
}
