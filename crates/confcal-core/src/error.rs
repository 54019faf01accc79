//! Core error types.
//!
//! Parsing and resolution errors are attributed to the schedule card that
//! produced them, so a failed run can be diagnosed (and, if need be, the
//! offending ID manually appended to the ledger) from the error alone.

use chrono::{DateTime, FixedOffset};
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors produced while resolving schedule data.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A card's schedule text does not match the expected shape.
    #[error("card {card_id}: malformed schedule text: {reason}")]
    MalformedSchedule { card_id: u64, reason: String },

    /// A resolved time range ends at or before its start.
    #[error("card {card_id}: end time {end} does not follow start time {start}")]
    TimeRangeInversion {
        card_id: u64,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    },

    /// The configured timezone identifier is not a known IANA zone.
    #[error("unknown timezone identifier: {0}")]
    UnknownTimezone(String),
}

impl CoreError {
    /// Shorthand for a malformed-schedule error.
    pub fn malformed(card_id: u64, reason: impl Into<String>) -> Self {
        Self::MalformedSchedule {
            card_id,
            reason: reason.into(),
        }
    }

    /// Returns the card ID this error is attributed to, if any.
    pub fn card_id(&self) -> Option<u64> {
        match self {
            Self::MalformedSchedule { card_id, .. } => Some(*card_id),
            Self::TimeRangeInversion { card_id, .. } => Some(*card_id),
            Self::UnknownTimezone(_) => None,
        }
    }
}
