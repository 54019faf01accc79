//! End-to-end pipeline runs against in-memory collaborators.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;

use chrono::NaiveDate;
use confcal_providers::{
    CalendarEntry, CalendarService, CalendarSpec, EventPayload, ProviderError, ProviderResult,
};
use confcal_scrape::{DocumentCache, Fetch, ScrapeError, ScrapeResult};
use confcal_sync::{ProcessedLedger, SourceUrls, SyncOptions, SyncOrchestrator};

const SCHEDULE_URL: &str = "https://conf.example/Schedule";
const PROCEEDINGS_URL: &str = "https://papers.example/book/2018";
const DETAIL_PREFIX: &str = "https://conf.example/Schedule?showEvent=";
const PAPERS_BASE: &str = "https://papers.example";

/// Serves canned pages and counts every fetch.
struct SiteFetcher {
    pages: HashMap<String, String>,
    calls: RefCell<usize>,
}

impl SiteFetcher {
    fn new() -> Self {
        let mut pages = HashMap::new();
        pages.insert(SCHEDULE_URL.to_string(), schedule_page());
        pages.insert(PROCEEDINGS_URL.to_string(), proceedings_page());
        pages.insert(
            format!("{DETAIL_PREFIX}101"),
            detail_page("An introduction to scalable inference."),
        );
        pages.insert(
            format!("{DETAIL_PREFIX}103"),
            detail_page("We propose attention."),
        );
        Self {
            pages,
            calls: RefCell::new(0),
        }
    }

    fn calls(&self) -> usize {
        *self.calls.borrow()
    }
}

impl Fetch for SiteFetcher {
    fn fetch(&self, url: &str) -> ScrapeResult<String> {
        *self.calls.borrow_mut() += 1;
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| ScrapeError::malformed_card(url, "id"))
    }
}

fn card(id: u64, type_label: &str, schedule: &str, name: &str, footer: &str) -> String {
    format!(
        r#"<div id="maincard_{id}" class="maincard narrower">
            <div class="pull-right maincardHeader maincardType">{type_label}</div>
            <div class="maincardHeader">{schedule}</div>
            <div class="maincardBody">{name}</div>
            <div class="maincardFooter">{footer}</div>
        </div>"#
    )
}

fn schedule_page() -> String {
    format!(
        "<html><body>{}{}{}</body></html>",
        card(
            101,
            "Tutorial",
            "Mon Dec 3rd 05:00 -- 07:00 PM @ Room 220 E",
            "Scalable Bayesian Inference",
            "David Dunson"
        ),
        card(
            102,
            "Coffee Break",
            "Tue Dec 4th 09:30 -- 10:00 AM @ Hall",
            "Morning Coffee",
            ""
        ),
        card(
            103,
            "Oral",
            "Tue Dec 4th 10:00 -- 10:20 AM @ Room 220 CD",
            "Attention Is All You Need",
            "Ashish Vaswani · Noam Shazeer"
        ),
    )
}

fn proceedings_page() -> String {
    r#"<html><body><ul>
        <li><a href="/paper/7181-attention">Attention Is All You Need</a></li>
        <li><a href="/paper/9999-unrelated">Some Unrelated Paper</a></li>
    </ul></body></html>"#
        .to_string()
}

fn detail_page(abstract_text: &str) -> String {
    format!(r#"<html><body><div class="abstractContainer">{abstract_text}</div></body></html>"#)
}

/// In-memory calendar service recording every call.
struct FakeCalendarService {
    calendars: RefCell<Vec<CalendarEntry>>,
    events: RefCell<Vec<(String, EventPayload)>>,
    fail_event_summary: Option<String>,
}

impl FakeCalendarService {
    fn new() -> Self {
        Self {
            calendars: RefCell::new(Vec::new()),
            events: RefCell::new(Vec::new()),
            fail_event_summary: None,
        }
    }

    fn failing_on(summary: &str) -> Self {
        Self {
            fail_event_summary: Some(summary.to_string()),
            ..Self::new()
        }
    }

    fn events(&self) -> Vec<(String, EventPayload)> {
        self.events.borrow().clone()
    }
}

impl CalendarService for FakeCalendarService {
    fn list_calendars(&self) -> ProviderResult<Vec<CalendarEntry>> {
        Ok(self.calendars.borrow().clone())
    }

    fn create_calendar(&self, spec: &CalendarSpec) -> ProviderResult<CalendarEntry> {
        let mut calendars = self.calendars.borrow_mut();
        let entry = CalendarEntry::new(format!("cal-{}", calendars.len()), &spec.display_name);
        calendars.push(entry.clone());
        Ok(entry)
    }

    fn create_event(&self, calendar_id: &str, payload: &EventPayload) -> ProviderResult<()> {
        if self.fail_event_summary.as_deref() == Some(payload.summary.as_str()) {
            return Err(ProviderError::server("injected failure"));
        }
        self.events
            .borrow_mut()
            .push((calendar_id.to_string(), payload.clone()));
        Ok(())
    }
}

fn urls() -> SourceUrls {
    SourceUrls {
        schedule: SCHEDULE_URL.into(),
        proceedings: PROCEEDINGS_URL.into(),
        event_detail_prefix: DETAIL_PREFIX.into(),
        papers_base: PAPERS_BASE.into(),
    }
}

fn options() -> SyncOptions {
    SyncOptions::new(chrono_tz::America::Montreal, "Conference Venue")
        .exclude("Break")
        .with_base_date(NaiveDate::from_ymd_opt(2018, 6, 1).unwrap())
}

fn run_once(
    service: &FakeCalendarService,
    fetcher: &SiteFetcher,
    cache_path: &Path,
    ledger_path: &Path,
) -> confcal_sync::SyncResult<confcal_sync::SyncReport> {
    let mut cache = DocumentCache::open(cache_path).unwrap();
    let mut ledger = ProcessedLedger::open(ledger_path).unwrap();
    SyncOrchestrator::new(service, fetcher, &mut cache, &mut ledger, urls(), options()).run()
}

#[test]
fn full_run_submits_and_creates_calendars() {
    let dir = tempfile::tempdir().unwrap();
    let service = FakeCalendarService::new();
    let fetcher = SiteFetcher::new();

    let report = run_once(
        &service,
        &fetcher,
        &dir.path().join("cache.json"),
        &dir.path().join("processed.log"),
    )
    .unwrap();

    assert_eq!(report.submitted, 2);
    assert_eq!(report.skipped_excluded, 1);
    assert_eq!(report.skipped_processed, 0);
    // Excluded categories still get a calendar so the layout is stable.
    assert_eq!(report.calendars_created, 3);

    let events = service.events();
    assert_eq!(events.len(), 2);

    let (tutorial_cal, tutorial) = &events[0];
    assert_eq!(tutorial.summary, "Scalable Bayesian Inference");
    assert_eq!(tutorial.location, "Room 220 E");
    assert_eq!(tutorial.start.to_rfc3339(), "2018-12-03T17:00:00-05:00");
    assert_eq!(tutorial.end.to_rfc3339(), "2018-12-03T19:00:00-05:00");
    assert_eq!(tutorial.timezone, "America/Montreal");
    assert_eq!(
        tutorial.description,
        "David Dunson\n\nAn introduction to scalable inference."
    );
    // No proceedings entry, so the event points at its own detail page.
    assert_eq!(tutorial.source_url, format!("{DETAIL_PREFIX}101"));
    assert_eq!(tutorial.attachment_url, None);

    let (oral_cal, oral) = &events[1];
    assert_ne!(tutorial_cal, oral_cal);
    assert_eq!(oral.summary, "Attention Is All You Need");
    assert_eq!(
        oral.source_url,
        "https://papers.example/paper/7181-attention"
    );
    assert_eq!(
        oral.attachment_url.as_deref(),
        Some("https://papers.example/paper/7181-attention.pdf")
    );

    let calendars = service.list_calendars().unwrap();
    let summaries: Vec<&str> = calendars.iter().map(|c| c.summary.as_str()).collect();
    assert_eq!(summaries, vec!["Tutorial", "Coffee Break", "Oral"]);
}

#[test]
fn second_run_resubmits_nothing_and_refetches_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let service = FakeCalendarService::new();
    let fetcher = SiteFetcher::new();
    let cache_path = dir.path().join("cache.json");
    let ledger_path = dir.path().join("processed.log");

    run_once(&service, &fetcher, &cache_path, &ledger_path).unwrap();
    // Schedule, proceedings, and two detail pages.
    assert_eq!(fetcher.calls(), 4);

    let report = run_once(&service, &fetcher, &cache_path, &ledger_path).unwrap();
    assert_eq!(report.submitted, 0);
    assert_eq!(report.skipped_processed, 2);
    assert_eq!(report.skipped_excluded, 1);
    assert_eq!(report.calendars_created, 0);
    assert_eq!(service.events().len(), 2);
    assert_eq!(fetcher.calls(), 4);
}

#[test]
fn prepopulated_ledger_skips_its_cards() {
    let dir = tempfile::tempdir().unwrap();
    let ledger_path = dir.path().join("processed.log");
    std::fs::write(&ledger_path, "101\n").unwrap();

    let service = FakeCalendarService::new();
    let fetcher = SiteFetcher::new();
    let report = run_once(
        &service,
        &fetcher,
        &dir.path().join("cache.json"),
        &ledger_path,
    )
    .unwrap();

    assert_eq!(report.submitted, 1);
    assert_eq!(report.skipped_processed, 1);
    assert_eq!(service.events().len(), 1);
    assert_eq!(service.events()[0].1.summary, "Attention Is All You Need");
}

#[test]
fn aborted_run_resumes_where_it_stopped() {
    let dir = tempfile::tempdir().unwrap();
    let fetcher = SiteFetcher::new();
    let cache_path = dir.path().join("cache.json");
    let ledger_path = dir.path().join("processed.log");

    let failing = FakeCalendarService::failing_on("Attention Is All You Need");
    let err = run_once(&failing, &fetcher, &cache_path, &ledger_path).unwrap_err();
    assert!(err.to_string().contains("injected failure"));
    // The first card committed before the abort.
    assert_eq!(failing.events().len(), 1);

    let service = FakeCalendarService::new();
    let report = run_once(&service, &fetcher, &cache_path, &ledger_path).unwrap();
    assert_eq!(report.submitted, 1);
    assert_eq!(report.skipped_processed, 1);
    assert_eq!(service.events()[0].1.summary, "Attention Is All You Need");
}
