//! Cached ViaCEP client.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, info, instrument, warn};
use url::Url;

use viacep_cache::{cache_key, CacheExt, MemoryCache};
use viacep_core::error::{Result, ViaCepError};
use viacep_core::traits::{Cache, HttpFetcher};
use viacep_core::types::{Address, Cep, SearchQuery};
use viacep_http::{decode_json, HttpClient};

use crate::config::ViaCepConfig;

/// Body of a CEP lookup: ViaCEP answers an unknown but well-formed CEP with
/// 200 and `{"erro": true}` (older deployments send `"true"`).
#[derive(Deserialize)]
#[serde(untagged)]
enum LookupBody {
    Missing {
        #[allow(dead_code)]
        erro: NotFoundFlag,
    },
    Found(Address),
}

/// An `erro` field that is set: `true` or `"true"`. Anything else fails to
/// deserialize, so the body falls through to [`LookupBody::Found`].
struct NotFoundFlag;

impl<'de> Deserialize<'de> for NotFoundFlag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Flag {
            Bool(bool),
            Text(String),
        }

        match Flag::deserialize(deserializer)? {
            Flag::Bool(true) => Ok(NotFoundFlag),
            Flag::Text(text) if text == "true" => Ok(NotFoundFlag),
            _ => Err(D::Error::custom("erro flag is not set")),
        }
    }
}

/// ViaCEP client with result caching.
///
/// Each call:
/// 1. Validates its arguments (no request is made for malformed input)
/// 2. Derives a cache key from the normalized arguments
/// 3. Returns a cached result when there is one
/// 4. Otherwise fetches from the API and caches the decoded result
pub struct ViaCep {
    http: Arc<dyn HttpFetcher>,
    cache: Option<Arc<dyn Cache>>,
    config: ViaCepConfig,
}

impl ViaCep {
    /// Creates a client with default configuration and an in-memory cache.
    pub fn new() -> Result<Self> {
        Self::with_config(ViaCepConfig::default())
    }

    /// Creates a client with custom configuration.
    ///
    /// Uses [`HttpClient`] for transport and, unless caching is disabled, a
    /// fresh [`MemoryCache`].
    pub fn with_config(config: ViaCepConfig) -> Result<Self> {
        let http = HttpClient::with_config(config.http.clone())?;

        let cache: Option<Arc<dyn Cache>> = if config.enable_cache {
            Some(Arc::new(MemoryCache::new()))
        } else {
            None
        };

        Ok(Self::with_parts(config, Arc::new(http), cache))
    }

    /// Creates a client from explicit collaborators.
    ///
    /// `cache` is used as given; `config.enable_cache` is not consulted.
    pub fn with_parts(
        config: ViaCepConfig,
        http: Arc<dyn HttpFetcher>,
        cache: Option<Arc<dyn Cache>>,
    ) -> Self {
        Self {
            http,
            cache,
            config,
        }
    }

    /// Replaces the cache backend (for example with a `RemoteCache`).
    pub fn with_cache(mut self, cache: Arc<dyn Cache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &ViaCepConfig {
        &self.config
    }

    /// Looks up the address of a postal code.
    ///
    /// Accepts `01001000` or `01001-000`.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let client = ViaCep::new()?;
    /// let address = client.lookup("01001-000").await?;
    /// assert_eq!(address.city, "São Paulo");
    /// ```
    #[instrument(skip(self))]
    pub async fn lookup(&self, code: &str) -> Result<Address> {
        let cep = Cep::parse(code)?;
        let key = cache_key(&[cep.as_str()]);

        if let Some(address) = self.cached::<Address>(&key).await {
            debug!(%cep, "Cache hit");
            return Ok(address);
        }

        debug!(%cep, "Cache miss, fetching");

        let url = self.endpoint(&[cep.as_str()])?;
        let address = match self.fetch_json::<LookupBody>(&url).await? {
            LookupBody::Found(address) => address,
            LookupBody::Missing { .. } => return Err(ViaCepError::CepNotFound(cep.formatted())),
        };

        self.store(&key, &address).await;

        info!(%cep, "Resolved CEP");
        Ok(address)
    }

    /// Searches addresses by state, city and street.
    ///
    /// `uf` is a two-letter state code; `city` and `street` need at least
    /// three characters. An empty list means nothing matched.
    #[instrument(skip(self))]
    pub async fn search(&self, uf: &str, city: &str, street: &str) -> Result<Vec<Address>> {
        let query = SearchQuery::new(uf, city, street)?;
        let key = cache_key(&query.components());

        if let Some(addresses) = self.cached::<Vec<Address>>(&key).await {
            debug!(count = addresses.len(), "Cache hit");
            return Ok(addresses);
        }

        debug!("Cache miss, fetching");

        let url = self.endpoint(&query.components())?;
        let addresses: Vec<Address> = self.fetch_json(&url).await?;

        self.store(&key, &addresses).await;

        info!(count = addresses.len(), "Search completed");
        Ok(addresses)
    }

    /// Drops the cached result for a postal code, if any.
    #[instrument(skip(self))]
    pub async fn invalidate(&self, code: &str) -> Result<()> {
        let cep = Cep::parse(code)?;
        match &self.cache {
            Some(cache) => cache.delete(&cache_key(&[cep.as_str()])).await,
            None => Ok(()),
        }
    }

    /// Builds `{base}/ws/{segments...}/json/`, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Result<String> {
        let mut url = Url::parse(&self.config.base_url).map_err(|e| {
            ViaCepError::ConfigError(format!("invalid base URL '{}': {}", self.config.base_url, e))
        })?;

        url.path_segments_mut()
            .map_err(|_| {
                ViaCepError::ConfigError(format!("base URL '{}' cannot have a path", self.config.base_url))
            })?
            .pop_if_empty()
            .push("ws")
            .extend(segments)
            .push("json")
            .push("");

        Ok(url.into())
    }

    async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let body = self.http.fetch(url).await?;
        decode_json(url, &body)
    }

    async fn cached<T: DeserializeOwned + Send>(&self, key: &str) -> Option<T> {
        match &self.cache {
            Some(cache) => cache.get_value(key).await,
            None => None,
        }
    }

    /// Writes through to the cache. A failed write only costs a future
    /// cache hit, so it is logged rather than returned.
    async fn store<T: Serialize + Sync + ?Sized>(&self, key: &str, value: &T) {
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.set_value(key, value, self.config.cache_ttl()).await {
                warn!(key, error = %e, "Failed to cache result");
            }
        }
    }
}
