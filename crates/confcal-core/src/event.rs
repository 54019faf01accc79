//! Resolved time ranges and canonical event records.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// An absolute, timezone-localized time span with a venue location.
///
/// Both endpoints carry the conference's fixed UTC offset. The resolver
/// guarantees `start < end` before constructing a range; a violated
/// ordering surfaces as
/// [`TimeRangeInversion`](crate::CoreError::TimeRangeInversion) instead of
/// being silently swapped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    /// When the event starts.
    pub start: DateTime<FixedOffset>,
    /// When the event ends.
    pub end: DateTime<FixedOffset>,
    /// Room or venue text taken from the schedule line.
    pub location: String,
}

impl TimeRange {
    /// Creates a new time range.
    pub fn new(
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            start,
            end,
            location: location.into(),
        }
    }

    /// The span between start and end.
    pub fn duration(&self) -> chrono::Duration {
        self.end - self.start
    }
}

/// The canonical event record submitted to the calendar service.
///
/// Created once per card and never mutated; each record is submitted at
/// most once, gated by the processed ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedEvent {
    /// Numeric event identifier (also the ledger key).
    pub id: u64,
    /// The event category label; selects the target calendar.
    pub type_label: String,
    /// The event's display name.
    pub name: String,
    /// Speaker names, in card order.
    pub speakers: Vec<String>,
    /// Localized start time.
    pub start: DateTime<FixedOffset>,
    /// Localized end time.
    pub end: DateTime<FixedOffset>,
    /// Room or venue text.
    pub location: String,
    /// Speakers joined by `", "`, a blank line, then the abstract text.
    pub description: String,
    /// Proceedings URL when the name matches a paper title, otherwise the
    /// event's own detail-page URL.
    pub source_url: String,
    /// PDF URL derived from the proceedings link; absent on a lookup miss.
    pub attachment_url: Option<String>,
}
