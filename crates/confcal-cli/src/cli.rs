//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// confcal - Mirror a conference schedule into Google Calendar
#[derive(Debug, Parser)]
#[command(name = "confcal")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "CONFCAL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    /// Google Calendar access token
    #[arg(long, env = "GOOGLE_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run a synchronization pass (the default)
    Sync {
        /// Fetch every document fresh instead of using the cache file
        #[arg(long)]
        no_cache: bool,

        /// Ignore the processed ledger and submit every card again
        #[arg(long)]
        no_ledger: bool,

        /// Skip cards whose category contains this text (can be repeated)
        #[arg(long, action = clap::ArgAction::Append)]
        exclude: Vec<String>,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration
    Dump,

    /// Show configuration file path
    Path,
}
