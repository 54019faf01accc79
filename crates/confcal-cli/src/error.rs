//! CLI error types.

use confcal_core::{CoreError, TraceError};
use confcal_providers::ProviderError;
use confcal_scrape::ScrapeError;
use confcal_sync::SyncError;
use thiserror::Error;

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Errors surfaced to the operator.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded or is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// No access token was supplied.
    #[error(
        "no access token; pass --access-token, set GOOGLE_ACCESS_TOKEN, \
         or add it to the [google] section of the config file"
    )]
    MissingToken,

    /// Tracing setup failed.
    #[error(transparent)]
    Trace(#[from] TraceError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Scrape(#[from] ScrapeError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Sync(#[from] SyncError),
}
