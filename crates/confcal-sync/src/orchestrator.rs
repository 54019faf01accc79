//! The sync run itself.
//!
//! One run walks three phases in order: pull and parse the source
//! documents, make sure a calendar exists for every event category, then
//! process the cards one by one in document order. Each phase finishes
//! before the next begins and every collaborator call is blocking;
//! failures abort the run and the cache plus ledger make the next run pick
//! up where this one stopped.

use std::collections::HashMap;

use chrono::NaiveDate;
use chrono_tz::Tz;
use confcal_core::{DateTimeResolver, ProceedingsLinks, RawCard};
use confcal_providers::{CalendarService, CalendarSpec, EventPayload};
use confcal_scrape::{
    extract_abstract, extract_cards, extract_proceedings_links, DocumentCache, Fetch, HtmlDocument,
};
use tracing::{debug, info};

use crate::error::{SyncError, SyncResult};
use crate::ledger::ProcessedLedger;
use crate::normalize::normalize_event;

/// The source site's entry points.
#[derive(Debug, Clone)]
pub struct SourceUrls {
    /// Full schedule page listing every event card.
    pub schedule: String,
    /// Proceedings index page with the paper link table.
    pub proceedings: String,
    /// Prefix which, followed by an event ID, addresses a detail page.
    pub event_detail_prefix: String,
    /// Base prepended to relative proceedings hrefs.
    pub papers_base: String,
}

impl SourceUrls {
    /// The detail page URL for one event.
    pub fn event_detail(&self, id: u64) -> String {
        format!("{}{id}", self.event_detail_prefix)
    }
}

/// Run-level settings.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Conference timezone; all schedule text resolves in this zone.
    pub timezone: Tz,
    /// Venue address recorded on every calendar we create.
    pub venue_location: String,
    /// Category substrings to skip; a card is excluded when its type
    /// label contains any of them.
    pub excluded_types: Vec<String>,
    /// Fixed base date for fields the schedule text omits. `None` means
    /// today.
    pub base_date: Option<NaiveDate>,
}

impl SyncOptions {
    /// Creates options with no exclusions and today's base date.
    pub fn new(timezone: Tz, venue_location: impl Into<String>) -> Self {
        Self {
            timezone,
            venue_location: venue_location.into(),
            excluded_types: Vec::new(),
            base_date: None,
        }
    }

    /// Adds a category substring to skip.
    pub fn exclude(mut self, type_fragment: impl Into<String>) -> Self {
        self.excluded_types.push(type_fragment.into());
        self
    }

    /// Fixes the base date used for defaulted schedule fields.
    pub fn with_base_date(mut self, date: NaiveDate) -> Self {
        self.base_date = Some(date);
        self
    }

    fn is_excluded(&self, type_label: &str) -> bool {
        self.excluded_types
            .iter()
            .any(|fragment| type_label.contains(fragment))
    }
}

/// Counters summarizing one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Events submitted and committed to the ledger in this run.
    pub submitted: usize,
    /// Cards skipped because an earlier run already committed them.
    pub skipped_processed: usize,
    /// Cards skipped by the category exclusion list.
    pub skipped_excluded: usize,
    /// Category calendars created in this run.
    pub calendars_created: usize,
}

/// Drives one sequential sync run against injected collaborators.
pub struct SyncOrchestrator<'a> {
    service: &'a dyn CalendarService,
    fetcher: &'a dyn Fetch,
    cache: &'a mut DocumentCache,
    ledger: &'a mut ProcessedLedger,
    urls: SourceUrls,
    options: SyncOptions,
}

impl<'a> SyncOrchestrator<'a> {
    /// Wires up a run; nothing is fetched until [`run`](Self::run).
    pub fn new(
        service: &'a dyn CalendarService,
        fetcher: &'a dyn Fetch,
        cache: &'a mut DocumentCache,
        ledger: &'a mut ProcessedLedger,
        urls: SourceUrls,
        options: SyncOptions,
    ) -> Self {
        Self {
            service,
            fetcher,
            cache,
            ledger,
            urls,
            options,
        }
    }

    /// Executes the full run and returns its counters.
    pub fn run(&mut self) -> SyncResult<SyncReport> {
        let mut report = SyncReport::default();

        let (cards, links) = self.load_sources()?;
        let registry = self.ensure_calendars(&cards, &mut report)?;
        self.process_cards(&cards, &links, &registry, &mut report)?;

        info!(
            "run complete: {} submitted, {} already processed, {} excluded, {} calendars created",
            report.submitted,
            report.skipped_processed,
            report.skipped_excluded,
            report.calendars_created
        );
        Ok(report)
    }

    /// Fetches and parses the schedule and proceedings documents.
    fn load_sources(&mut self) -> SyncResult<(Vec<RawCard>, ProceedingsLinks)> {
        info!("loading schedule from {}", self.urls.schedule);
        let schedule_markup = self.cache.fetch(self.fetcher, &self.urls.schedule)?;
        let cards = extract_cards(&HtmlDocument::parse(&schedule_markup))?;
        info!("schedule holds {} cards", cards.len());

        info!("loading proceedings from {}", self.urls.proceedings);
        let proceedings_markup = self.cache.fetch(self.fetcher, &self.urls.proceedings)?;
        let links = extract_proceedings_links(
            &HtmlDocument::parse(&proceedings_markup),
            &self.urls.papers_base,
        );

        Ok((cards, links))
    }

    /// Makes sure a calendar exists per category and returns the
    /// label→calendar-ID registry.
    ///
    /// Categories are collected over every card, excluded ones included,
    /// so the calendar layout does not shift when exclusions change
    /// between runs. The calendar list is re-read after any creation so
    /// the registry always reflects server-assigned IDs.
    fn ensure_calendars(
        &mut self,
        cards: &[RawCard],
        report: &mut SyncReport,
    ) -> SyncResult<HashMap<String, String>> {
        let mut labels: Vec<&str> = Vec::new();
        for card in cards {
            if !labels.contains(&card.type_label.as_str()) {
                labels.push(&card.type_label);
            }
        }

        let mut existing = self.service.list_calendars()?;
        for label in &labels {
            if existing.iter().any(|entry| entry.summary == *label) {
                continue;
            }
            info!("creating calendar for category {label:?}");
            self.service.create_calendar(&CalendarSpec {
                display_name: (*label).to_string(),
                timezone: self.options.timezone.name().to_string(),
                location: self.options.venue_location.clone(),
            })?;
            report.calendars_created += 1;
        }
        if report.calendars_created > 0 {
            existing = self.service.list_calendars()?;
        }

        Ok(existing
            .into_iter()
            .map(|entry| (entry.summary, entry.id))
            .collect())
    }

    /// Walks the cards in document order and submits each at most once.
    fn process_cards(
        &mut self,
        cards: &[RawCard],
        links: &ProceedingsLinks,
        registry: &HashMap<String, String>,
        report: &mut SyncReport,
    ) -> SyncResult<()> {
        let mut resolver = DateTimeResolver::new(self.options.timezone);
        if let Some(date) = self.options.base_date {
            resolver = resolver.with_base_date(date);
        }

        for card in cards {
            if self.ledger.contains(card.id) {
                debug!("card {} already processed", card.id);
                report.skipped_processed += 1;
                continue;
            }
            if self.options.is_excluded(&card.type_label) {
                debug!("card {} excluded by category {:?}", card.id, card.type_label);
                report.skipped_excluded += 1;
                continue;
            }

            let time_range = resolver.resolve(card.id, &card.schedule_text)?;
            let detail_url = self.urls.event_detail(card.id);
            let event = normalize_event(card, time_range, links, &detail_url, |id| {
                let markup = self.cache.fetch(self.fetcher, &detail_url)?;
                extract_abstract(&HtmlDocument::parse(&markup), id)
            })?;

            let calendar_id = registry
                .get(&card.type_label)
                .ok_or_else(|| SyncError::MissingCalendar {
                    label: card.type_label.clone(),
                })?;

            let payload = EventPayload::from_event(&event, self.options.timezone.name());
            self.service.create_event(calendar_id, &payload)?;
            self.ledger.commit(card.id)?;
            report.submitted += 1;
            info!("submitted card {} to calendar {:?}", card.id, card.type_label);
        }

        Ok(())
    }
}
