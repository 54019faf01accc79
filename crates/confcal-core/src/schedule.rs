//! Schedule-text resolution into absolute, localized time ranges.
//!
//! A card's schedule line looks like:
//!
//! ```text
//! Mon Dec 3rd 05:00 -- 07:00 PM @ Room 210
//! ```
//!
//! The text is split on `@` into a time phrase and a location, the time
//! phrase is split on `--` into a start and an end phrase, and both phrases
//! are tokenized on whitespace. Two legacy heuristics are then applied
//! before parsing:
//!
//! 1. **Meridiem sharing** - when the start phrase has exactly four tokens
//!    it carries no AM/PM marker of its own, and the end phrase's last
//!    token (assumed to be its meridiem) is appended to the start tokens.
//!    This keys off token *count*, not token shape, and is preserved
//!    bug-for-bug: a four-token start phrase that does not need the borrow
//!    will misparse (see the tests).
//! 2. **Date-context borrowing** - the end phrase as written carries only a
//!    clock time and meridiem, so the start phrase's date prefix (all but
//!    its last two tokens) is prepended to the end tokens.
//!
//! Each final token list is parsed order-independently (weekday, month
//! name, ordinal day, `HH:MM[:SS]`, AM/PM, optional four-digit year),
//! localized to the configured zone, and returned as offset-aware
//! timestamps.

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono::offset::LocalResult;
use chrono_tz::Tz;
use regex::Regex;
use tracing::trace;

use crate::error::{CoreError, CoreResult};
use crate::event::TimeRange;

/// Regex for clock-time tokens (`05:00`, `17:00:30`).
static TIME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2}):(\d{2})(?::(\d{2}))?$").expect("invalid time regex"));

/// Regex for day-of-month tokens with an optional ordinal suffix (`3`, `3rd`).
static DAY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})(?:st|nd|rd|th)?$").expect("invalid day regex"));

/// Regex for AM/PM markers (`PM`, `p.m.`).
static MERIDIEM_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?i)([ap])\.?m\.?$").expect("invalid meridiem regex"));

/// Parses a timezone identifier into a named IANA zone.
pub fn parse_timezone(name: &str) -> CoreResult<Tz> {
    name.parse::<Tz>()
        .map_err(|_| CoreError::UnknownTimezone(name.to_string()))
}

/// Resolves raw schedule text into a [`TimeRange`] in a fixed zone.
///
/// The zone is configured once for the whole system, not per event. The
/// base date supplies the year (and, in principle, month/day) when the
/// text omits them; it defaults to today and is injectable for
/// deterministic tests.
#[derive(Debug, Clone)]
pub struct DateTimeResolver {
    tz: Tz,
    base_date: Option<NaiveDate>,
}

impl DateTimeResolver {
    /// Creates a resolver for the given conference timezone.
    pub fn new(tz: Tz) -> Self {
        Self {
            tz,
            base_date: None,
        }
    }

    /// Builder method to fix the base date used for defaulted fields.
    pub fn with_base_date(mut self, date: NaiveDate) -> Self {
        self.base_date = Some(date);
        self
    }

    /// The configured zone.
    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Resolves one card's schedule text into a localized time range.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MalformedSchedule`] when the text does not
    /// match the expected shape and [`CoreError::TimeRangeInversion`] when
    /// the resolved end does not follow the start. Errors carry `card_id`.
    pub fn resolve(&self, card_id: u64, schedule_text: &str) -> CoreResult<TimeRange> {
        let parts: Vec<&str> = schedule_text.split('@').collect();
        if parts.len() != 2 {
            return Err(CoreError::malformed(
                card_id,
                format!(
                    "expected exactly one `@` separator, found {}",
                    parts.len() - 1
                ),
            ));
        }
        let (time_phrase, location) = (parts[0], parts[1].trim());

        let phrases: Vec<&str> = time_phrase.split("--").collect();
        if phrases.len() != 2 {
            return Err(CoreError::malformed(
                card_id,
                format!(
                    "expected exactly one `--` separator, found {}",
                    phrases.len() - 1
                ),
            ));
        }

        let mut start_tokens: Vec<&str> = phrases[0].split_whitespace().collect();
        let end_tokens: Vec<&str> = phrases[1].split_whitespace().collect();
        if end_tokens.is_empty() {
            return Err(CoreError::malformed(card_id, "empty end phrase"));
        }

        // Meridiem sharing: a four-token start phrase carries no AM/PM
        // marker of its own and borrows the end phrase's.
        if start_tokens.len() == 4 {
            start_tokens.push(end_tokens[end_tokens.len() - 1]);
        }

        // Date-context borrowing: prepend the start phrase's date prefix
        // (all but clock time and meridiem) to the end tokens.
        let prefix_len = start_tokens.len().saturating_sub(2);
        let mut full_end_tokens: Vec<&str> = start_tokens[..prefix_len].to_vec();
        full_end_tokens.extend(&end_tokens);

        trace!(card_id, ?start_tokens, ?full_end_tokens, "resolving schedule tokens");

        let base = self
            .base_date
            .unwrap_or_else(|| Utc::now().date_naive());
        let start_naive = parse_tokens(card_id, &start_tokens, base)?;
        let end_naive = parse_tokens(card_id, &full_end_tokens, base)?;

        let start = self.localize(card_id, start_naive)?;
        let end = self.localize(card_id, end_naive)?;

        if start >= end {
            return Err(CoreError::TimeRangeInversion {
                card_id,
                start,
                end,
            });
        }

        Ok(TimeRange::new(start, end, location))
    }

    /// Localizes a naive timestamp to the configured zone.
    ///
    /// A DST-ambiguous local time resolves to its earliest mapping; a
    /// nonexistent local time (spring-forward gap) is malformed input.
    fn localize(
        &self,
        card_id: u64,
        naive: NaiveDateTime,
    ) -> CoreResult<chrono::DateTime<chrono::FixedOffset>> {
        match self.tz.from_local_datetime(&naive) {
            LocalResult::Single(dt) => Ok(dt.fixed_offset()),
            LocalResult::Ambiguous(earliest, _) => Ok(earliest.fixed_offset()),
            LocalResult::None => Err(CoreError::malformed(
                card_id,
                format!("local time {naive} does not exist in {}", self.tz),
            )),
        }
    }
}

/// Accumulator for the order-independent token parse.
#[derive(Debug, Default)]
struct DateParts {
    year: Option<i32>,
    month: Option<u32>,
    day: Option<u32>,
    hour: Option<u32>,
    minute: u32,
    second: u32,
    meridiem: Option<Meridiem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Meridiem {
    Am,
    Pm,
}

/// Parses a free-form token list into a naive timestamp.
///
/// Tokens may appear in any order. Weekday names are recognized and
/// ignored (the explicit month/day govern). Fields missing from the
/// tokens default from `base`.
fn parse_tokens(card_id: u64, tokens: &[&str], base: NaiveDate) -> CoreResult<NaiveDateTime> {
    let mut parts = DateParts::default();

    for token in tokens {
        classify_token(card_id, token, &mut parts)?;
    }

    let mut hour = parts.hour.unwrap_or(0);
    match parts.meridiem {
        Some(Meridiem::Pm) => hour = hour % 12 + 12,
        Some(Meridiem::Am) => hour %= 12,
        None => {}
    }

    let year = parts.year.unwrap_or_else(|| base.year());
    let month = parts.month.unwrap_or_else(|| base.month());
    let day = parts.day.unwrap_or_else(|| base.day());

    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, parts.minute, parts.second))
        .ok_or_else(|| {
            CoreError::malformed(
                card_id,
                format!("tokens {tokens:?} do not form a valid date/time"),
            )
        })
}

/// Classifies one token and folds it into the accumulator.
fn classify_token(card_id: u64, token: &str, parts: &mut DateParts) -> CoreResult<()> {
    let bare = token.trim_end_matches('.');

    if is_weekday(bare) {
        return Ok(());
    }

    if let Some(month) = month_number(bare) {
        return set_once(card_id, &mut parts.month, month, "month", token);
    }

    if let Some(caps) = MERIDIEM_REGEX.captures(token) {
        let m = if caps[1].eq_ignore_ascii_case("a") {
            Meridiem::Am
        } else {
            Meridiem::Pm
        };
        return set_once(card_id, &mut parts.meridiem, m, "meridiem", token);
    }

    if let Some(caps) = TIME_REGEX.captures(token) {
        let hour: u32 = caps[1].parse().map_err(|_| bad_token(card_id, token))?;
        let minute: u32 = caps[2].parse().map_err(|_| bad_token(card_id, token))?;
        let second: u32 = caps
            .get(3)
            .map(|m| m.as_str().parse())
            .transpose()
            .map_err(|_| bad_token(card_id, token))?
            .unwrap_or(0);
        if parts.hour.is_some() {
            return Err(duplicate(card_id, "clock time", token));
        }
        parts.hour = Some(hour);
        parts.minute = minute;
        parts.second = second;
        return Ok(());
    }

    if token.len() == 4 && token.chars().all(|c| c.is_ascii_digit()) {
        let year: i32 = token.parse().map_err(|_| bad_token(card_id, token))?;
        return set_once(card_id, &mut parts.year, year, "year", token);
    }

    if let Some(caps) = DAY_REGEX.captures(token) {
        let day: u32 = caps[1].parse().map_err(|_| bad_token(card_id, token))?;
        return set_once(card_id, &mut parts.day, day, "day", token);
    }

    Err(bad_token(card_id, token))
}

fn set_once<T>(
    card_id: u64,
    slot: &mut Option<T>,
    value: T,
    field: &str,
    token: &str,
) -> CoreResult<()> {
    if slot.is_some() {
        return Err(duplicate(card_id, field, token));
    }
    *slot = Some(value);
    Ok(())
}

fn duplicate(card_id: u64, field: &str, token: &str) -> CoreError {
    CoreError::malformed(card_id, format!("duplicate {field} token `{token}`"))
}

fn bad_token(card_id: u64, token: &str) -> CoreError {
    CoreError::malformed(card_id, format!("unrecognized token `{token}`"))
}

fn is_weekday(token: &str) -> bool {
    matches!(
        token.to_ascii_lowercase().as_str(),
        "mon" | "monday"
            | "tue" | "tues" | "tuesday"
            | "wed" | "wednesday"
            | "thu" | "thur" | "thurs" | "thursday"
            | "fri" | "friday"
            | "sat" | "saturday"
            | "sun" | "sunday"
    )
}

fn month_number(token: &str) -> Option<u32> {
    let month = match token.to_ascii_lowercase().as_str() {
        "jan" | "january" => 1,
        "feb" | "february" => 2,
        "mar" | "march" => 3,
        "apr" | "april" => 4,
        "may" => 5,
        "jun" | "june" => 6,
        "jul" | "july" => 7,
        "aug" | "august" => 8,
        "sep" | "sept" | "september" => 9,
        "oct" | "october" => 10,
        "nov" | "november" => 11,
        "dec" | "december" => 12,
        _ => return None,
    };
    Some(month)
}
