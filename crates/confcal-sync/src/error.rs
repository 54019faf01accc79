//! Pipeline error types.

use std::path::PathBuf;

use confcal_core::CoreError;
use confcal_providers::ProviderError;
use confcal_scrape::ScrapeError;
use thiserror::Error;

/// Result type for pipeline operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that abort a sync run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Schedule resolution failed.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Fetching or parsing a source document failed.
    #[error(transparent)]
    Scrape(#[from] ScrapeError),

    /// The external calendar service reported an error.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Failed to read the ledger file.
    #[error("failed to read ledger file {path}")]
    LedgerLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The ledger file contains a non-numeric entry.
    #[error("ledger file {path}: invalid entry {line:?}")]
    LedgerParse { path: PathBuf, line: String },

    /// Failed to append to the ledger file.
    #[error("failed to append to ledger file {path}")]
    LedgerStore {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A category calendar is still missing after the creation phase.
    #[error("no calendar found for category {label:?} after creation")]
    MissingCalendar { label: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_pass_through() {
        let err: SyncError = CoreError::malformed(3, "no `@` separator").into();
        assert!(err.to_string().contains("card 3"));
    }
}
