//! confcal CLI entry point.

use std::process::ExitCode;

use clap::Parser;

use confcal_cli::cli::{Cli, Command, ConfigAction};
use confcal_cli::commands;
use confcal_cli::config::AppConfig;
use confcal_cli::error::CliResult;
use confcal_core::{TraceConfig, init_tracing};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let trace = if cli.debug {
        TraceConfig::cli_debug()
    } else {
        TraceConfig::default()
    };
    if let Err(e) = init_tracing(trace) {
        eprintln!("error: {e}");
        return ExitCode::FAILURE;
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CliResult<()> {
    let config = if let Some(ref path) = cli.config {
        AppConfig::load_from(path)?
    } else {
        AppConfig::load()?
    };

    match cli.command {
        Some(Command::Sync {
            no_cache,
            no_ledger,
            exclude,
        }) => commands::sync::run(&config, cli.access_token, no_cache, no_ledger, exclude),
        Some(Command::Config { action }) => match action {
            ConfigAction::Dump => commands::config::dump(&config),
            ConfigAction::Path => commands::config::path(),
        },
        // Bare `confcal` is a sync run with configured behavior.
        None => commands::sync::run(&config, cli.access_token, false, false, Vec::new()),
    }
}
