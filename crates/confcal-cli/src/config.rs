//! Application configuration.
//!
//! All settings live in a single `config.toml` at
//! `~/.config/confcal/config.toml` by default. Every field has a default,
//! so a missing file is a usable configuration; the shipped defaults
//! point at the NeurIPS 2018 schedule and proceedings.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{CliError, CliResult};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Source site URLs.
    pub source: SourceSettings,

    /// Calendar-wide settings (timezone, venue).
    pub calendar: CalendarSettings,

    /// Run behavior: exclusions and state file locations.
    pub sync: SyncSettings,

    /// Google Calendar settings.
    pub google: GoogleSettings,
}

/// Where the schedule and proceedings documents live.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    /// Full schedule page listing every event card.
    pub schedule_url: String,

    /// Prefix which, followed by an event ID, addresses a detail page.
    pub event_detail_prefix: String,

    /// Proceedings index page with the paper link table.
    pub proceedings_url: String,

    /// Base prepended to relative proceedings hrefs.
    pub papers_base: String,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            schedule_url: "https://nips.cc/Conferences/2018/Schedule".to_string(),
            event_detail_prefix: "https://nips.cc/Conferences/2018/Schedule?showEvent="
                .to_string(),
            proceedings_url:
                "https://papers.nips.cc/book/advances-in-neural-information-processing-systems-31-2018"
                    .to_string(),
            papers_base: "https://papers.nips.cc".to_string(),
        }
    }
}

/// Conference-wide calendar settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarSettings {
    /// IANA timezone all schedule text resolves in.
    pub timezone: String,

    /// Venue address recorded on every created calendar.
    pub venue_location: String,
}

impl Default for CalendarSettings {
    fn default() -> Self {
        Self {
            timezone: "America/Montreal".to_string(),
            venue_location: "1001 Jean Paul Riopelle Pl, Montreal, QC H2Z 1H5, Canada"
                .to_string(),
        }
    }
}

/// Run behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncSettings {
    /// Category substrings to skip.
    #[serde(default)]
    pub excluded_types: Vec<String>,

    /// Whether to keep the document cache. `--no-cache` overrides.
    pub use_cache: bool,

    /// Whether to keep the processed ledger. `--no-ledger` overrides.
    pub use_ledger: bool,

    /// Document cache file. Defaults to `cache.json` in the data dir.
    pub cache_path: Option<PathBuf>,

    /// Processed ledger file. Defaults to `processed.log` in the data dir.
    pub ledger_path: Option<PathBuf>,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            excluded_types: vec!["Break".to_string()],
            use_cache: true,
            use_ledger: true,
            cache_path: None,
            ledger_path: None,
        }
    }
}

impl SyncSettings {
    /// The document cache file to use.
    pub fn cache_path(&self) -> PathBuf {
        self.cache_path
            .clone()
            .unwrap_or_else(|| AppConfig::default_data_dir().join("cache.json"))
    }

    /// The processed ledger file to use.
    pub fn ledger_path(&self) -> PathBuf {
        self.ledger_path
            .clone()
            .unwrap_or_else(|| AppConfig::default_data_dir().join("processed.log"))
    }
}

/// Google Calendar settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GoogleSettings {
    /// Already-authorized access token. The `--access-token` flag and the
    /// `GOOGLE_ACCESS_TOKEN` environment variable take precedence.
    pub access_token: Option<String>,
}

impl AppConfig {
    /// Loads configuration from the default path; a missing file is the
    /// default configuration.
    pub fn load() -> CliResult<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &PathBuf) -> CliResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CliError::Config(format!("failed to read {}: {e}", path.display())))?;
        toml::from_str(&content)
            .map_err(|e| CliError::Config(format!("failed to parse {}: {e}", path.display())))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("confcal")
    }

    /// Returns the default data directory (cache and ledger files).
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("confcal")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_is_the_default_config() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.calendar.timezone, "America/Montreal");
        assert_eq!(config.sync.excluded_types, vec!["Break"]);
        assert!(config.sync.use_cache);
        assert!(config.sync.use_ledger);
        assert!(config.google.access_token.is_none());
        assert!(config.source.schedule_url.contains("/2018/Schedule"));
    }

    #[test]
    fn sections_override_independently() {
        let config: AppConfig = toml::from_str(
            r#"
[calendar]
timezone = "Europe/Paris"

[sync]
excluded_types = ["Break", "Expo"]
ledger_path = "/var/lib/confcal/done.log"

[google]
access_token = "ya29.token"
"#,
        )
        .unwrap();

        assert_eq!(config.calendar.timezone, "Europe/Paris");
        // Untouched sections keep their defaults.
        assert!(config.calendar.venue_location.contains("Montreal"));
        assert_eq!(config.sync.excluded_types, vec!["Break", "Expo"]);
        assert_eq!(
            config.sync.ledger_path(),
            PathBuf::from("/var/lib/confcal/done.log")
        );
        assert_eq!(config.google.access_token.as_deref(), Some("ya29.token"));
    }

    #[test]
    fn default_state_paths_land_in_the_data_dir() {
        let sync = SyncSettings::default();
        assert!(sync.cache_path().ends_with("confcal/cache.json"));
        assert!(sync.ledger_path().ends_with("confcal/processed.log"));
    }

    #[test]
    fn load_from_reports_parse_failures() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "not = [valid").unwrap();

        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("failed to parse"));
    }
}
