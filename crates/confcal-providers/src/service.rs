//! CalendarService trait definition and payload types.
//!
//! The orchestrator depends only on this interface; tests drive it with an
//! in-memory double and production wires up the Google implementation.

use chrono::{DateTime, FixedOffset};
use confcal_core::NormalizedEvent;

use crate::error::ProviderResult;

/// Metadata for creating a category calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarSpec {
    /// Display name; the event category label.
    pub display_name: String,
    /// IANA timezone identifier for the calendar.
    pub timezone: String,
    /// Venue address used as the calendar's location.
    pub location: String,
}

/// One remote calendar as reported by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEntry {
    /// Remote calendar identifier.
    pub id: String,
    /// Display name (matches the category label for calendars we create).
    pub summary: String,
}

impl CalendarEntry {
    /// Creates a new calendar entry.
    pub fn new(id: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            summary: summary.into(),
        }
    }
}

/// The event data submitted to the calendar service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventPayload {
    /// Event title.
    pub summary: String,
    /// Room or venue text.
    pub location: String,
    /// Speakers plus abstract.
    pub description: String,
    /// Localized start time.
    pub start: DateTime<FixedOffset>,
    /// Localized end time.
    pub end: DateTime<FixedOffset>,
    /// IANA timezone identifier accompanying both timestamps.
    pub timezone: String,
    /// Source link attached to the event.
    pub source_url: String,
    /// PDF attachment, when the event is a published paper.
    pub attachment_url: Option<String>,
}

impl EventPayload {
    /// Builds the submission payload for a normalized event.
    pub fn from_event(event: &NormalizedEvent, timezone: impl Into<String>) -> Self {
        Self {
            summary: event.name.clone(),
            location: event.location.clone(),
            description: event.description.clone(),
            start: event.start,
            end: event.end,
            timezone: timezone.into(),
            source_url: event.source_url.clone(),
            attachment_url: event.attachment_url.clone(),
        }
    }
}

/// The external calendar collaborator.
///
/// All calls are blocking and executed strictly in sequence; no call is
/// retried internally. Any error is fatal to the run - the ledger and
/// document cache make the next run resume where this one stopped.
pub trait CalendarService {
    /// Lists the calendars visible to the authorized account.
    fn list_calendars(&self) -> ProviderResult<Vec<CalendarEntry>>;

    /// Creates a calendar and returns its remote entry.
    fn create_calendar(&self, spec: &CalendarSpec) -> ProviderResult<CalendarEntry>;

    /// Creates an event in the given calendar.
    ///
    /// Returning `Ok` confirms the event was committed remotely; the
    /// caller records the event ID in the processed ledger only after
    /// this confirmation.
    fn create_event(&self, calendar_id: &str, payload: &EventPayload) -> ProviderResult<()>;
}
