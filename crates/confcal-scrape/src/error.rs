//! Scraping error types.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for scraping operations.
pub type ScrapeResult<T> = Result<T, ScrapeError>;

/// Errors produced while fetching and parsing source documents.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// A located card region does not carry a required subfield.
    #[error("card {card}: missing or malformed field `{field}`")]
    MalformedCard { card: String, field: &'static str },

    /// Failed to construct the HTTP client.
    #[error("failed to construct HTTP client")]
    Client(#[source] reqwest::Error),

    /// An external document fetch failed. Never retried; fatal for the run.
    #[error("failed to fetch {url}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Failed to read the document-cache file.
    #[error("failed to read cache file {path}")]
    CacheLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document-cache file is not a valid locator→markup mapping.
    #[error("cache file {path}: {source}")]
    CacheCodec {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Failed to write the document-cache file.
    #[error("failed to write cache file {path}")]
    CacheStore {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ScrapeError {
    /// Shorthand for a malformed-card error.
    pub fn malformed_card(card: impl Into<String>, field: &'static str) -> Self {
        Self::MalformedCard {
            card: card.into(),
            field,
        }
    }
}
