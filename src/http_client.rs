use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT as USER_AGENT_HEADER};
use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use url::Url;

use crate::error::{ExtractionError, Result};

/// Fixed mobile-browser identity sent with every request
pub const USER_AGENT: &str =
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15";

/// Headers attached to every MangaHere request
pub fn request_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT_HEADER, HeaderValue::from_static(USER_AGENT));
    headers
}

/// Fetch capability the extractors are written against.
///
/// Given a URL and a header map, return the response body as text. Anything
/// that goes wrong is an [`ExtractionError`]; callers decide how to degrade.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_text(&self, url: &str, headers: &HeaderMap) -> Result<String>;
}

/// Configuration for the reqwest-backed fetcher
#[derive(Clone, Debug)]
pub struct HttpClientConfig {
    pub timeout: Duration,
    pub enable_gzip: bool,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            enable_gzip: true,
        }
    }
}

/// Single-shot HTTP GET fetcher. No retries, no rate limiting.
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    client: Client,
    config: HttpClientConfig,
}

impl HttpFetcher {
    /// Create a new fetcher with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a new fetcher with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let client = ClientBuilder::new()
            .timeout(config.timeout)
            .gzip(config.enable_gzip)
            .brotli(config.enable_gzip)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Get the underlying reqwest client for direct access
    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch_text(&self, url: &str, headers: &HeaderMap) -> Result<String> {
        let parsed = Url::parse(url)?;

        let response = self.client.get(parsed).headers(headers.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExtractionError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}
