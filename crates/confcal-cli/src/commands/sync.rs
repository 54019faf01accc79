//! The sync command: wires configuration into one orchestrated run.

use std::path::Path;

use confcal_core::parse_timezone;
use confcal_providers::GoogleCalendarService;
use confcal_scrape::{DocumentCache, HttpFetcher};
use confcal_sync::{ProcessedLedger, SourceUrls, SyncOptions, SyncOrchestrator};
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::error::{CliError, CliResult};

/// Runs one synchronization pass.
///
/// `access_token` comes from the flag or environment and takes precedence
/// over the config file. `extra_excludes` extend (never replace) the
/// configured exclusion list.
pub fn run(
    config: &AppConfig,
    access_token: Option<String>,
    no_cache: bool,
    no_ledger: bool,
    extra_excludes: Vec<String>,
) -> CliResult<()> {
    let token = access_token
        .or_else(|| config.google.access_token.clone())
        .ok_or(CliError::MissingToken)?;

    let timezone = parse_timezone(&config.calendar.timezone)?;
    let mut options = SyncOptions::new(timezone, &config.calendar.venue_location);
    for fragment in config.sync.excluded_types.iter().cloned().chain(extra_excludes) {
        options = options.exclude(fragment);
    }

    info!(
        "starting sync against {} in {}",
        config.source.schedule_url, config.calendar.timezone
    );

    let mut cache = if no_cache || !config.sync.use_cache {
        debug!("document cache disabled");
        DocumentCache::disabled()
    } else {
        let path = config.sync.cache_path();
        ensure_parent_dir(&path)?;
        DocumentCache::open(path)?
    };
    let mut ledger = if no_ledger || !config.sync.use_ledger {
        debug!("processed ledger disabled; cards will be resubmitted");
        ProcessedLedger::disabled()
    } else {
        let path = config.sync.ledger_path();
        ensure_parent_dir(&path)?;
        ProcessedLedger::open(path)?
    };

    let fetcher = HttpFetcher::new()?;
    let service = GoogleCalendarService::new(token)?;
    let urls = SourceUrls {
        schedule: config.source.schedule_url.clone(),
        proceedings: config.source.proceedings_url.clone(),
        event_detail_prefix: config.source.event_detail_prefix.clone(),
        papers_base: config.source.papers_base.clone(),
    };

    let report =
        SyncOrchestrator::new(&service, &fetcher, &mut cache, &mut ledger, urls, options).run()?;

    println!("submitted:          {}", report.submitted);
    println!("already processed:  {}", report.skipped_processed);
    println!("excluded:           {}", report.skipped_excluded);
    println!("calendars created:  {}", report.calendars_created);
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> CliResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| CliError::Config(format!("failed to create {}: {e}", parent.display())))?;
    }
    Ok(())
}
