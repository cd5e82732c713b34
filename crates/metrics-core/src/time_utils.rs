use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, Utc};
use tracing::debug;

use crate::error::{MetricsError, Result};

/// Spreadsheet serial of 1970-01-01 in the 1900 date system.
pub const EXCEL_UNIX_EPOCH_SERIAL: f64 = 25569.0;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Earliest calendar year accepted from a sheet.
pub const MIN_YEAR: i32 = 1900;

/// Latest calendar year accepted from a sheet.
pub const MAX_YEAR: i32 = 9999;

/// `Some(date)` only when its year lies in `MIN_YEAR..=MAX_YEAR`.
pub fn in_supported_range(date: NaiveDate) -> Option<NaiveDate> {
    (MIN_YEAR..=MAX_YEAR).contains(&date.year()).then_some(date)
}

// ── Spreadsheet serials ───────────────────────────────────────────────────────

/// Convert a spreadsheet serial to the UTC calendar date it falls on.
///
/// `(serial − 25569)` days after 1970-01-01 UTC; a time fraction is carried
/// through and the date is taken from the resulting instant. Zero and
/// non-finite serials are not dates, nor are serials landing outside
/// `MIN_YEAR..=MAX_YEAR`.
pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    excel_serial_to_datetime(serial).and_then(|dt| in_supported_range(dt.date_naive()))
}

/// Convert a spreadsheet serial to a UTC instant.
pub fn excel_serial_to_datetime(serial: f64) -> Option<DateTime<Utc>> {
    if !serial.is_finite() || serial == 0.0 {
        return None;
    }
    let millis = ((serial - EXCEL_UNIX_EPOCH_SERIAL) * MILLIS_PER_DAY).round();
    if millis.abs() > i64::MAX as f64 {
        return None;
    }
    DateTime::from_timestamp_millis(millis as i64)
}

// ── Generic date strings ──────────────────────────────────────────────────────

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%y",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%b %d %Y",
    "%B %d %Y",
    "%d %b %Y",
    "%d %B %Y",
];

/// Parse a date from the common textual forms found in exported sheets.
///
/// Accepts RFC 3339 (including a `Z` suffix), RFC 2822, ISO date-times, and
/// US-style `MM/DD/YYYY` or `Mon DD, YYYY` dates. Instants with an offset are
/// converted to UTC before the date is taken. Years outside
/// `MIN_YEAR..=MAX_YEAR` are rejected.
pub fn parse_date_str(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let parsed = parse_any_date(s);
    if parsed.is_none() && !s.is_empty() {
        debug!("could not parse date string \"{}\"", s);
    }
    parsed.and_then(in_supported_range)
}

fn parse_any_date(s: &str) -> Option<NaiveDate> {
    if s.is_empty() {
        return None;
    }

    let normalised = match s.strip_suffix('Z') {
        Some(stripped) => format!("{}+00:00", stripped),
        None => s.to_string(),
    };
    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalised) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.date());
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }
    None
}

/// Parse a user-supplied start date, reporting failure as an error.
pub fn parse_start_date(s: &str) -> Result<NaiveDate> {
    parse_date_str(s).ok_or_else(|| MetricsError::InvalidDate(s.to_string()))
}

// ── Bucket keys ───────────────────────────────────────────────────────────────

/// The Sunday that starts the week containing `date`.
///
/// Falls back to `date` itself when that Sunday precedes the earliest
/// representable date.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date.checked_sub_signed(Duration::days(i64::from(
        date.weekday().num_days_from_sunday(),
    )))
    .unwrap_or(date)
}

/// ISO calendar date key, e.g. `"2024-01-15"`.
pub fn day_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Month key, e.g. `"2024-01"`.
pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// Whole days elapsed from `from` to `to` (negative when `to` is earlier).
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
