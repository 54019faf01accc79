//! Tracing setup for confcal.
//!
//! Provides unified logging configuration for the CLI and the library
//! crates. The `RUST_LOG` environment variable overrides the configured
//! default level.

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Errors that can occur during tracing initialization.
#[derive(Debug, Error)]
pub enum TraceError {
    /// Failed to set the global subscriber.
    #[error("failed to set global tracing subscriber: {0}")]
    SetGlobalSubscriber(#[from] tracing::subscriber::SetGlobalDefaultError),

    /// Failed to parse an env filter directive.
    #[error("failed to parse env filter: {0}")]
    EnvFilter(#[from] tracing_subscriber::filter::ParseError),
}

/// Output format for log messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TraceFormat {
    /// Human-readable pretty format.
    Pretty,
    /// Compact single-line format (default for the CLI).
    #[default]
    Compact,
}

/// Configuration for tracing initialization.
#[derive(Debug, Clone)]
pub struct TraceConfig {
    /// The default log level when `RUST_LOG` is not set.
    pub default_level: Level,
    /// Output format for log messages.
    pub format: TraceFormat,
    /// Whether to include the target (module path) in logs.
    pub include_target: bool,
    /// Custom env filter directive (overrides `default_level` if set).
    pub env_filter: Option<String>,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            default_level: Level::INFO,
            format: TraceFormat::Compact,
            include_target: false,
            env_filter: None,
        }
    }
}

impl TraceConfig {
    /// Config suitable for `--debug` CLI runs.
    #[must_use]
    pub fn cli_debug() -> Self {
        Self {
            default_level: Level::DEBUG,
            format: TraceFormat::Compact,
            include_target: true,
            env_filter: None,
        }
    }

    /// Set the default log level.
    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.default_level = level;
        self
    }

    /// Set a custom env filter directive.
    #[must_use]
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }
}

/// Initialize tracing with the given configuration.
///
/// This should be called once at the start of the application.
///
/// # Errors
///
/// Returns an error if the global subscriber has already been set or if
/// the env filter directive is invalid.
pub fn init_tracing(config: TraceConfig) -> Result<(), TraceError> {
    let env_filter = if let Some(ref filter) = config.env_filter {
        EnvFilter::try_new(filter)?
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("confcal={}", config.default_level)))
    };

    match config.format {
        TraceFormat::Pretty => {
            let subscriber = tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty().with_target(config.include_target));
            tracing::subscriber::set_global_default(subscriber)?;
        }
        TraceFormat::Compact => {
            let subscriber = tracing_subscriber::registry().with(env_filter).with(
                fmt::layer()
                    .compact()
                    .without_time()
                    .with_target(config.include_target),
            );
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = TraceConfig::default();
        assert_eq!(config.default_level, Level::INFO);
        assert_eq!(config.format, TraceFormat::Compact);
        assert!(config.env_filter.is_none());
    }

    #[test]
    fn builder_methods() {
        let config = TraceConfig::default()
            .with_level(Level::WARN)
            .with_env_filter("confcal=trace");

        assert_eq!(config.default_level, Level::WARN);
        assert_eq!(config.env_filter, Some("confcal=trace".to_string()));
    }
}
