use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use url::Url;

use crate::error::ExtractionError;
use crate::http_client::{HttpClientConfig, HttpFetcher};
use crate::sources::mangahere::{MangaHere, BASE_URL};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub mangahere: SourceConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SourceConfig {
    /// Site origin (no path); override to point at a mirror
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Timeout for HTTP requests in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Enable gzip/brotli compression
    #[serde(default = "default_true")]
    pub enable_compression: bool,
}

fn default_base_url() -> String { BASE_URL.to_string() }
fn default_timeout() -> u64 { 30 }
fn default_true() -> bool { true }

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: 30,
            enable_compression: true,
        }
    }
}

impl Config {
    /// Load `config.toml` from the working directory, or defaults.
    pub fn load() -> Self {
        Self::load_from(Path::new("config.toml"))
    }

    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            if let Ok(content) = fs::read_to_string(path) {
                match Self::from_toml_str(&content) {
                    Ok(cfg) => return cfg,
                    Err(e) => log::warn!("Ignoring invalid {}: {}", path.display(), e),
                }
            }
        }
        Self::default()
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<Config>(content)
    }
}

impl SourceConfig {
    /// Create the HTTP fetcher described by this configuration
    pub fn create_fetcher(&self) -> crate::Result<HttpFetcher> {
        let config = HttpClientConfig {
            timeout: Duration::from_secs(self.timeout_secs),
            enable_gzip: self.enable_compression,
        };

        HttpFetcher::with_config(config)
    }

    /// Create a MangaHere source backed by the configured fetcher.
    ///
    /// Fails with [`ExtractionError::InvalidUrl`] unless `base_url` is a bare
    /// origin: relative hrefs resolve against the host root, so a path prefix
    /// would be silently lost.
    pub fn create_source(&self) -> crate::Result<MangaHere<HttpFetcher>> {
        check_origin(&self.base_url)?;
        Ok(MangaHere::with_fetcher(self.create_fetcher()?).with_base_url(&self.base_url))
    }
}

fn check_origin(base_url: &str) -> crate::Result<()> {
    let url = Url::parse(base_url)?;
    if url.cannot_be_a_base() || url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
        return Err(ExtractionError::InvalidUrl(format!(
            "base_url must be a site origin, got {}",
            base_url
        )));
    }
    Ok(())
}
