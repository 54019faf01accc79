//! Persisted document cache with an injected fetch collaborator.
//!
//! The cache is a locator→markup mapping stored as a single JSON file.
//! Entries are never evicted or refreshed automatically; freshness is an
//! operator decision (delete the file to force a re-fetch). Every miss is
//! written through to disk before the caller proceeds, so an interrupted
//! run keeps everything it already fetched.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::error::{ScrapeError, ScrapeResult};

/// Raw document retrieval, injected so tests can run without a network.
pub trait Fetch {
    /// Retrieves the raw markup behind a locator.
    ///
    /// # Errors
    ///
    /// A failed fetch is fatal for the run; no retry is attempted.
    fn fetch(&self, url: &str) -> ScrapeResult<String>;
}

/// Blocking HTTP implementation of [`Fetch`].
#[derive(Debug)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    /// Creates a fetcher with a default blocking client.
    pub fn new() -> ScrapeResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("confcal/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ScrapeError::Client)?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str) -> ScrapeResult<String> {
        debug!("fetching {url}");
        self.client
            .get(url)
            .send()
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.text())
            .map_err(|source| ScrapeError::Fetch {
                url: url.to_string(),
                source,
            })
    }
}

/// Persisted locator→markup store.
///
/// A disabled cache (no backing file) passes every call straight to the
/// fetcher and persists nothing.
#[derive(Debug)]
pub struct DocumentCache {
    path: Option<PathBuf>,
    entries: HashMap<String, String>,
}

impl DocumentCache {
    /// Opens the cache at `path`, loading any previously stored entries.
    ///
    /// A missing file is an empty cache, not an error.
    pub fn open(path: impl Into<PathBuf>) -> ScrapeResult<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let raw = fs::read_to_string(&path).map_err(|source| ScrapeError::CacheLoad {
                path: path.clone(),
                source,
            })?;
            serde_json::from_str(&raw).map_err(|source| ScrapeError::CacheCodec {
                path: path.clone(),
                source,
            })?
        } else {
            HashMap::new()
        };

        info!(
            "document cache at {} holds {} entries",
            path.display(),
            entries.len()
        );
        Ok(Self {
            path: Some(path),
            entries,
        })
    }

    /// Creates a pass-through cache that never stores anything.
    pub fn disabled() -> Self {
        Self {
            path: None,
            entries: HashMap::new(),
        }
    }

    /// Number of cached documents.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if the locator is already cached.
    pub fn contains(&self, locator: &str) -> bool {
        self.entries.contains_key(locator)
    }

    /// Returns the markup behind `locator`, fetching on a miss.
    ///
    /// A hit returns the stored markup with no external call. A miss
    /// fetches through the collaborator, merges the result into the
    /// persisted store, and returns it.
    pub fn fetch(&mut self, fetcher: &dyn Fetch, locator: &str) -> ScrapeResult<String> {
        if let Some(markup) = self.entries.get(locator) {
            debug!("cache hit for {locator}");
            return Ok(markup.clone());
        }

        let markup = fetcher.fetch(locator)?;
        if self.path.is_some() {
            self.entries
                .insert(locator.to_string(), markup.clone());
            self.persist()?;
        }
        Ok(markup)
    }

    /// Writes the full mapping back to disk.
    fn persist(&self) -> ScrapeResult<()> {
        let Some(ref path) = self.path else {
            return Ok(());
        };
        let body =
            serde_json::to_vec(&self.entries).map_err(|source| ScrapeError::CacheCodec {
                path: path.clone(),
                source,
            })?;
        fs::write(path, body).map_err(|source| ScrapeError::CacheStore {
            path: path.clone(),
            source,
        })
    }
}
