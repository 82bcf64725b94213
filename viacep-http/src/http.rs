//! HTTP client implementation.
//!
//! Every request carries JSON `Content-Type`/`Accept` headers. Transport
//! failures are retried a fixed number of times with a fixed wait; any
//! response other than 200 is returned to the caller immediately.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use viacep_core::constants::{
    DEFAULT_RETRY_COUNT, DEFAULT_RETRY_WAIT_MS, DEFAULT_TIMEOUT_SECONDS, JSON_MEDIA_TYPE,
};
use viacep_core::error::{Result, ViaCepError};
use viacep_core::traits::HttpFetcher;

const USER_AGENT: &str = concat!("viacep-rs/", env!("CARGO_PKG_VERSION"));

/// HTTP transport configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Additional attempts after a transport failure
    pub retry_count: u32,
    /// Wait between attempts in milliseconds
    pub retry_wait_ms: u64,
    /// Per-attempt timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            retry_count: DEFAULT_RETRY_COUNT,
            retry_wait_ms: DEFAULT_RETRY_WAIT_MS,
            timeout_ms: DEFAULT_TIMEOUT_SECONDS * 1000,
        }
    }
}

impl HttpConfig {
    /// Creates a config with the given retry count and default timings.
    pub fn new(retry_count: u32) -> Self {
        Self {
            retry_count,
            ..Default::default()
        }
    }

    /// Sets the wait between attempts.
    pub fn with_retry_wait(mut self, wait: Duration) -> Self {
        self.retry_wait_ms = wait.as_millis() as u64;
        self
    }

    /// Sets the per-attempt timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = timeout.as_millis() as u64;
        self
    }

    fn retry_wait(&self) -> Duration {
        Duration::from_millis(self.retry_wait_ms)
    }
}

/// JSON-over-HTTP client with bounded retry.
///
/// Cancellation is cooperative: dropping the returned future (for example
/// through `tokio::time::timeout`) aborts the in-flight attempt and any
/// pending retry.
#[derive(Clone, Debug)]
pub struct HttpClient {
    config: HttpConfig,
    http_client: reqwest::Client,
}

impl HttpClient {
    /// Creates a client with default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(HttpConfig::default())
    }

    /// Creates a client with custom configuration.
    pub fn with_config(config: HttpConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_MEDIA_TYPE));
        headers.insert(ACCEPT, HeaderValue::from_static(JSON_MEDIA_TYPE));

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(|e| ViaCepError::ConfigError(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    /// Performs a GET on `url` and decodes the JSON body into `T`.
    #[instrument(skip(self))]
    pub async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let body = self.fetch_with_retry(url).await?;
        decode_json(url, &body)
    }

    async fn fetch_with_retry(&self, url: &str) -> Result<Vec<u8>> {
        check_url(url)?;

        let mut attempt: u32 = 0;
        loop {
            match self.send_once(url).await {
                Err(e) if is_retryable(&e) && attempt < self.config.retry_count => {
                    attempt += 1;
                    warn!(url, attempt, max = self.config.retry_count, error = %e, "Request failed, retrying");
                    tokio::time::sleep(self.config.retry_wait()).await;
                }
                result => return result,
            }
        }
    }

    async fn send_once(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| transport_error(url, e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ViaCepError::UnexpectedStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| transport_error(url, e))?;

        debug!(url, bytes = body.len(), "Fetched");
        Ok(body.to_vec())
    }
}

#[async_trait]
impl HttpFetcher for HttpClient {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        self.fetch_with_retry(url).await
    }
}

/// Decodes a JSON response body fetched from `url`.
pub fn decode_json<T: DeserializeOwned>(url: &str, body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(|source| ViaCepError::Decode {
        url: url.to_string(),
        source,
    })
}

/// Rejects URLs that can never succeed, so they are not retried.
fn check_url(url: &str) -> Result<()> {
    let parsed = Url::parse(url).map_err(|e| ViaCepError::Transport {
        url: url.to_string(),
        source: Box::new(e),
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(ViaCepError::Transport {
            url: url.to_string(),
            source: format!("unsupported protocol scheme \"{}\"", scheme).into(),
        }),
    }
}

fn transport_error(url: &str, e: reqwest::Error) -> ViaCepError {
    if e.is_timeout() {
        ViaCepError::Timeout {
            url: url.to_string(),
        }
    } else {
        ViaCepError::Transport {
            url: url.to_string(),
            source: Box::new(e),
        }
    }
}

fn is_retryable(e: &ViaCepError) -> bool {
    matches!(e, ViaCepError::Transport { .. } | ViaCepError::Timeout { .. })
}
