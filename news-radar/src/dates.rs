//! Date parsing and formatting for publish timestamps.
//!
//! Sources disagree wildly on how they spell a date. `parse_date` tries a fixed
//! list of formats and the first that succeeds wins; anything else is `None`,
//! never an error.

use crate::types::Article;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use tracing::debug;

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// Epoch values above this are taken as milliseconds.
const MILLIS_THRESHOLD: f64 = 1e11;

/// Parse a publish date into UTC.
///
/// Order: RFC 3339, ISO 8601 with a compact offset, naive ISO 8601 (assumed
/// UTC), bare `YYYY-MM-DD`, RFC 2822, then Unix epoch seconds or milliseconds.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(value, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|naive| Utc.from_utc_datetime(&naive));
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Some(dt) = parse_epoch(value) {
        return Some(dt);
    }

    debug!("Could not parse date string '{}'", value);
    None
}

fn parse_epoch(value: &str) -> Option<DateTime<Utc>> {
    let number: f64 = value.parse().ok()?;
    if !number.is_finite() {
        return None;
    }
    let seconds = if number.abs() > MILLIS_THRESHOLD {
        number / 1000.0
    } else {
        number
    };
    let whole = seconds.floor();
    let nanos = ((seconds - whole) * 1e9).round() as u32;
    DateTime::from_timestamp(whole as i64, nanos.min(999_999_999))
}

/// `Article` builder taking the publish date as the source spelled it.
pub trait WithPublishedStr {
    /// Parses `raw` with `parse_date`; anything unparsable leaves no date.
    fn with_published_str(self, raw: &str) -> Self;
}

impl WithPublishedStr for Article {
    fn with_published_str(mut self, raw: &str) -> Self {
        self.published_at = parse_date(raw);
        self
    }
}

/// Human-readable age such as "3 hours ago".
pub fn time_ago(date: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = now.signed_duration_since(date).num_seconds();

    if seconds < 60 {
        return "just now".to_string();
    }

    let (amount, unit) = if seconds < 3600 {
        (seconds / 60, "minute")
    } else if seconds < 86_400 {
        (seconds / 3600, "hour")
    } else if seconds < 604_800 {
        (seconds / 86_400, "day")
    } else if seconds < 2_592_000 {
        (seconds / 604_800, "week")
    } else {
        (seconds / 2_592_000, "month")
    };

    format!("{} {}{} ago", amount, unit, if amount == 1 { "" } else { "s" })
}
