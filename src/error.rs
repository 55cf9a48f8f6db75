//! Error type for MangaHere extraction.
//!
//! Every failure the source can hit while fetching or extracting is an
//! [`ExtractionError`]. The public operations in [`crate::sources::mangahere`]
//! never return it: they log it and degrade to an empty or fallback result.
//! The fallible inner functions and the [`crate::http_client::PageFetcher`]
//! seam use it directly.

use thiserror::Error;

/// A recoverable failure while fetching or extracting a page.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// Transport failure from reqwest (DNS, connect, timeout, body decode).
    #[error("HTTP request failed: {0}")]
    Fetch(#[from] reqwest::Error),

    /// The site answered with a non-success status.
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    /// A URL could not be parsed or built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The input reference carries nothing to build a page URL from.
    #[error("No href or id to resolve a page URL")]
    MissingHref,
}

impl From<url::ParseError> for ExtractionError {
    fn from(err: url::ParseError) -> Self {
        ExtractionError::InvalidUrl(err.to_string())
    }
}

/// Result alias for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;
