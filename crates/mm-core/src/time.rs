//! UTC date helpers for entry timestamps.
//!
//! Entry dates arrive as loosely formatted ISO-8601 strings. Anything that
//! cannot be read becomes `None` so callers can skip it instead of comparing
//! against a garbage value.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

const MS_PER_DAY: f64 = 86_400_000.0;

const NAIVE_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse an ISO-8601 timestamp.
///
/// Accepts RFC 3339 (with `Z` or an offset), naive date-times (read as UTC)
/// and bare `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Format as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
pub fn to_iso8601(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Current UTC timestamp in ISO-8601 format.
pub fn now_iso8601() -> String {
    to_iso8601(&Utc::now())
}

/// Fractional days from `earlier` to `later`. Negative if `earlier` is after `later`.
pub fn days_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> f64 {
    (later - earlier).num_milliseconds() as f64 / MS_PER_DAY
}
