//! # Normalization Helpers
//!
//! Shared text and date helpers used by every query stage and by ingestion.
//!
//! All string comparisons in the engine go through [`normalize_text`]
//! (trim + lower-case), which makes filtering insensitive to the casing and
//! whitespace noise that heterogeneous import sources produce.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, TimeZone, Utc};

/// Naive timestamp layouts accepted after RFC 3339 fails. Interpreted as UTC.
const NAIVE_TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Calendar-date layouts. ISO first; the slash form appears in spreadsheet exports.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

// =============================================================================
// Text
// =============================================================================

/// Trims and lower-cases a value for case-insensitive comparison.
///
/// ## Example
/// ```rust
/// use salesdesk_core::normalize::normalize_text;
///
/// assert_eq!(normalize_text("  North America "), "north america");
/// ```
pub fn normalize_text(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Folds a label down to its lower-case alphanumeric characters.
///
/// `"Credit Card"`, `"credit_card"` and `"CREDIT-CARD"` all fold to
/// `"creditcard"`. Used for enum labels and import column names, where
/// separators vary between sources.
pub fn fold_key(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Case-insensitive substring test. An empty needle always matches.
pub fn contains_ignore_case(haystack: &str, normalized_needle: &str) -> bool {
    normalize_text(haystack).contains(normalized_needle)
}

// =============================================================================
// Dates
// =============================================================================

/// Parses a record or filter timestamp.
///
/// Accepts RFC 3339 (`2024-12-01T10:30:00Z`, offsets are converted to UTC),
/// naive date-times (read as UTC) and plain calendar dates (midnight UTC).
/// Returns `None` for anything else; callers treat that as "no date".
///
/// ## Example
/// ```rust
/// use salesdesk_core::normalize::parse_timestamp;
///
/// assert!(parse_timestamp("2024-12-01T10:30:00Z").is_some());
/// assert!(parse_timestamp("2024-12-01").is_some());
/// assert!(parse_timestamp("yesterday").is_none());
/// ```
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }

    for format in NAIVE_TIMESTAMP_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    parse_date_only(raw).map(start_of_day)
}

/// Parses a filter bound into a calendar date.
///
/// A full timestamp is accepted too and reduced to its (UTC) calendar date,
/// so `dateTo=2024-12-03T08:00:00Z` still means "through the end of Dec 3".
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    parse_date_only(raw).or_else(|| parse_timestamp(raw).map(|ts| ts.date_naive()))
}

fn parse_date_only(raw: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
}

/// First instant of a calendar day (00:00:00.000 UTC).
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

/// Last millisecond of a calendar day (23:59:59.999 UTC).
pub fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    let end = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
    Utc.from_utc_datetime(&date.and_time(end))
}

/// Projects a timestamp onto a plain `YYYY-MM-DD` string.
pub fn format_calendar_date(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d").to_string()
}

/// Canonical wire form of a record timestamp: `2024-12-01T10:30:00.000Z`.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("  Europe\t"), "europe");
        assert_eq!(normalize_text(""), "");
    }

    #[test]
    fn test_fold_key() {
        assert_eq!(fold_key("Credit Card"), "creditcard");
        assert_eq!(fold_key("credit_card"), "creditcard");
        assert_eq!(fold_key("Customer Name"), "customername");
        assert_eq!(fold_key("customer-name"), "customername");
    }

    #[test]
    fn test_contains_ignore_case() {
        assert!(contains_ignore_case("John Smith", "john"));
        assert!(contains_ignore_case("+1-555-0001", "555"));
        assert!(!contains_ignore_case("Sarah Williams", "john"));
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let utc = parse_timestamp("2024-12-01T10:30:00Z").unwrap();
        assert_eq!(utc.hour(), 10);

        let offset = parse_timestamp("2024-12-01T10:30:00+02:00").unwrap();
        assert_eq!(offset.hour(), 8);

        let naive = parse_timestamp("2024-12-01 10:30:00").unwrap();
        assert_eq!(naive, utc);

        let date_only = parse_timestamp("2024-12-01").unwrap();
        assert_eq!(date_only.hour(), 0);
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("not-a-date").is_none());
        assert!(parse_timestamp("2024-13-45").is_none());
    }

    #[test]
    fn test_parse_calendar_date_from_timestamp() {
        let date = parse_calendar_date("2024-12-03T23:00:00Z").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 12, 3).unwrap());
    }

    #[test]
    fn test_day_bounds() {
        let day = NaiveDate::from_ymd_opt(2024, 12, 3).unwrap();
        assert_eq!(format_timestamp(start_of_day(day)), "2024-12-03T00:00:00.000Z");
        assert_eq!(format_timestamp(end_of_day(day)), "2024-12-03T23:59:59.999Z");
    }

    #[test]
    fn test_format_calendar_date() {
        let ts = parse_timestamp("2024-12-08T15:30:00Z").unwrap();
        assert_eq!(format_calendar_date(ts), "2024-12-08");
    }
}
