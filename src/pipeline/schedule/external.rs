//! Oracle-backed schedule extraction.
//!
//! Sends the (capped) document to a `ScheduleOracle`, parses whatever comes
//! back, and converts each record into a candidate. Every item is validated
//! on its own: a bad item is dropped, never the whole reply.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde_json::{Map, Value};

use super::builder::{truncate_with_ellipsis, CandidateBuilder};
use super::classify::normalize_category_label;
use super::error::ScheduleError;
use super::parser::ReplyShape;
use super::prompt::cap_external_input;
use super::traits::ScheduleOracle;
use super::types::{ExtractionConfig, ScheduleCandidate, ScheduleCategory};

const DATE_KEYS: &[&str] = &["date", "날짜", "due_date"];
const TITLE_KEYS: &[&str] = &["title", "제목", "task"];
const DESCRIPTION_KEYS: &[&str] = &["description", "설명", "task_description"];
const TYPE_KEYS: &[&str] = &["type", "유형", "schedule_type"];

/// How much of an unusable reply is kept in the error.
const REPLY_PREVIEW_CHARS: usize = 80;

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%Y년 %m월 %d일",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%m/%d/%y",
    "%y-%m-%d",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Year-less forms: (separator placed after the current year, format).
const MONTH_DAY_FORMATS: &[(&str, &str)] = &[
    ("-", "%Y-%m-%d"),
    ("/", "%Y/%m/%d"),
    (" ", "%Y %m월 %d일"),
    (" ", "%Y %B %d"),
];

/// Parse a date string in any of the common notations models produce.
///
/// `%Y` accepts one to four digits, so "5/10/26" would read as year 5.
/// Any parse landing before `min_year` is discarded and the next format
/// tried. Year-less input takes the year of `today`; no rollover is
/// applied, so a passed month/day is later rejected as past.
pub fn parse_flexible_date(raw: &str, today: NaiveDate, min_year: i32) -> Option<NaiveDate> {
    let s = raw.trim().trim_end_matches('.');
    if s.is_empty() {
        return None;
    }
    let plausible = |d: &NaiveDate| d.year() >= min_year;

    if let Some(d) = DATE_FORMATS
        .iter()
        .filter_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .find(plausible)
    {
        return Some(d);
    }

    if let Some(d) = DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.date_naive())
        .filter(plausible)
    {
        return Some(d);
    }

    if let Some(d) = DATETIME_FORMATS
        .iter()
        .filter_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.date())
        .find(plausible)
    {
        return Some(d);
    }

    // Compact YYYYMMDD
    if s.len() == 8 && s.bytes().all(|b| b.is_ascii_digit()) {
        let year = s[..4].parse().ok()?;
        let month = s[4..6].parse().ok()?;
        let day = s[6..].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day).filter(plausible);
    }

    MONTH_DAY_FORMATS.iter().find_map(|(sep, fmt)| {
        NaiveDate::parse_from_str(&format!("{}{sep}{s}", today.year()), fmt).ok()
    })
}

/// First non-empty value among `keys`, in key order.
///
/// Null and empty strings are skipped like missing keys; any other value is
/// returned as-is for the caller to type-check.
fn first_present<'a>(item: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| item.get(*k))
        .find(|v| match v {
            Value::Null => false,
            Value::String(s) => !s.trim().is_empty(),
            _ => true,
        })
}

fn first_str<'a>(item: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    first_present(item, keys).and_then(Value::as_str)
}

/// Converts oracle replies into schedule candidates.
pub struct ExternalExtractor {
    builder: CandidateBuilder,
    input_max_chars: usize,
    min_year: i32,
}

impl Default for ExternalExtractor {
    fn default() -> Self {
        Self::new(&ExtractionConfig::default())
    }
}

impl ExternalExtractor {
    pub fn new(config: &ExtractionConfig) -> Self {
        Self {
            builder: CandidateBuilder::from_config(config),
            input_max_chars: config.external_input_max_chars,
            min_year: config.min_literal_year,
        }
    }

    /// Best-effort extraction: any failure yields an empty list.
    pub fn extract(
        &self,
        oracle: &dyn ScheduleOracle,
        text: &str,
        today: NaiveDate,
    ) -> Vec<ScheduleCandidate> {
        match self.try_extract(oracle, text, today) {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::warn!(error = %e, "External schedule extraction failed");
                vec![]
            }
        }
    }

    /// Request and convert. Errors for request failures and for replies
    /// with no recognizable JSON at all.
    pub fn try_extract(
        &self,
        oracle: &dyn ScheduleOracle,
        text: &str,
        today: NaiveDate,
    ) -> Result<Vec<ScheduleCandidate>, ScheduleError> {
        let capped = cap_external_input(text, self.input_max_chars);
        let today_iso = today.format("%Y-%m-%d").to_string();
        let reply = oracle.request(&capped, &today_iso)?;

        let shape = ReplyShape::parse(&reply);
        if shape == ReplyShape::Unrecognized {
            return Err(ScheduleError::MalformedReply(truncate_with_ellipsis(
                reply.trim(),
                REPLY_PREVIEW_CHARS,
            )));
        }
        Ok(self.convert_shape(shape, today))
    }

    /// Parse a raw reply and convert every usable item.
    pub fn convert_reply(&self, reply: &str, today: NaiveDate) -> Vec<ScheduleCandidate> {
        self.convert_shape(ReplyShape::parse(reply), today)
    }

    fn convert_shape(&self, shape: ReplyShape, today: NaiveDate) -> Vec<ScheduleCandidate> {
        tracing::debug!(shape = shape.kind(), "Parsed oracle reply");

        shape
            .into_items()
            .iter()
            .filter_map(|item| self.convert_item(item, today))
            .collect()
    }

    /// Convert one reply record. `None` when the record is unusable.
    pub fn convert_item(&self, item: &Value, today: NaiveDate) -> Option<ScheduleCandidate> {
        let Some(obj) = item.as_object() else {
            tracing::trace!("Dropping non-object oracle item");
            return None;
        };

        let date_str = first_present(obj, DATE_KEYS)?.as_str()?;
        let Some(due_date) = parse_flexible_date(date_str, today, self.min_year) else {
            tracing::trace!(date = date_str, "Dropping oracle item with unparseable date");
            return None;
        };
        if due_date < today {
            tracing::trace!(%due_date, "Dropping past-dated oracle item");
            return None;
        }

        let category = first_str(obj, TYPE_KEYS)
            .map(normalize_category_label)
            .unwrap_or(ScheduleCategory::Other);

        Some(self.builder.from_external(
            due_date,
            first_str(obj, TITLE_KEYS),
            first_str(obj, DESCRIPTION_KEYS),
            category,
        ))
    }
}

// ═══════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════
