//! # Validation Module
//!
//! Lenient parsing and clamping for user-supplied query parameters and
//! import values.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Where Bad Input Goes                               │
//! │                                                                         │
//! │  Query parameters (from the filter UI)                                 │
//! │  ├── "abc" for page/limit/age  ──► treated as absent                   │
//! │  ├── page 0, limit 10_000      ──► clamped into range                  │
//! │  └── dateTo "31/31/2024"       ──► treated as absent                   │
//! │           │                                                             │
//! │           ▼  a best-effort result, never an error                       │
//! │                                                                         │
//! │  Import values (ingestion)                                             │
//! │  ├── age -4 / 300              ──► clamped to 0..=150                  │
//! │  ├── quantity 0                ──► 1                                   │
//! │  └── negative amounts          ──► 0                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use salesdesk_core::validation::{clamp_limit, parse_page};
//!
//! assert_eq!(parse_page(Some("3")), 3);
//! assert_eq!(parse_page(Some("zero")), 1);
//! assert_eq!(clamp_limit(Some("500"), 10, 100), 100);
//! ```

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::normalize::parse_calendar_date;
use crate::{DEFAULT_PAGE, MAX_CUSTOMER_AGE, MAX_PAGE_SIZE};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Query Parameters
// =============================================================================

/// Parses a page number. Missing, non-numeric or zero input gives page 1.
///
/// Values past the last page are left alone; the paginate stage clamps them
/// once the result size is known.
pub fn parse_page(raw: Option<&str>) -> u32 {
    raw.and_then(parse_unsigned)
        .filter(|page| *page >= 1)
        .unwrap_or(DEFAULT_PAGE)
}

/// Parses and clamps a page size into `1..=max`.
///
/// Missing or non-numeric input gives `default`. `max` itself is capped at
/// [`MAX_PAGE_SIZE`].
pub fn clamp_limit(raw: Option<&str>, default: u32, max: u32) -> u32 {
    let max = max.clamp(1, MAX_PAGE_SIZE);
    raw.and_then(parse_unsigned)
        .unwrap_or(default)
        .clamp(1, max)
}

/// Parses an age bound. Anything non-numeric or negative is absent.
pub fn parse_age(raw: &str) -> Option<u32> {
    parse_unsigned(raw)
}

/// Parses a date filter bound. Unparseable text is absent.
pub fn parse_date_bound(raw: &str) -> Option<NaiveDate> {
    if raw.trim().is_empty() {
        return None;
    }
    parse_calendar_date(raw)
}

/// Accepts `"12"`, `" 12 "` and `"12.0"`; rejects negatives, fractions and
/// garbage. Well-formed numbers above `u32::MAX` saturate.
fn parse_unsigned(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    if let Ok(value) = raw.parse::<u64>() {
        return Some(value.min(u64::from(u32::MAX)) as u32);
    }
    let value = raw.parse::<f64>().ok()?;
    (value.is_finite() && value >= 0.0 && value.fract() == 0.0)
        .then(|| value.min(f64::from(u32::MAX)) as u32)
}

// =============================================================================
// Import Values
// =============================================================================

/// Clamps an imported age into `0..=MAX_CUSTOMER_AGE`.
pub fn clamp_age(age: i64) -> u32 {
    age.clamp(0, MAX_CUSTOMER_AGE as i64) as u32
}

/// Clamps an imported quantity to at least 1.
pub fn clamp_quantity(quantity: i64) -> u32 {
    quantity.clamp(1, u32::MAX as i64) as u32
}

/// Validates that a required import field is present.
///
/// ## Example
/// ```rust
/// use salesdesk_core::validation::require_text;
///
/// assert_eq!(require_text("customerId", " CUST001 ").unwrap(), "CUST001");
/// assert!(require_text("customerId", "  ").is_err());
/// ```
pub fn require_text(field: &str, value: &str) -> ValidationResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(value.to_string())
}

/// Validates a configured page size.
pub fn validate_page_size(field: &str, size: u32) -> ValidationResult<()> {
    if size == 0 || size > MAX_PAGE_SIZE {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 1,
            max: MAX_PAGE_SIZE as i64,
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_page() {
        assert_eq!(parse_page(None), 1);
        assert_eq!(parse_page(Some("")), 1);
        assert_eq!(parse_page(Some("0")), 1);
        assert_eq!(parse_page(Some("-2")), 1);
        assert_eq!(parse_page(Some(" 4 ")), 4);
        assert_eq!(parse_page(Some("2.0")), 2);
        assert_eq!(parse_page(Some("2.5")), 1);
    }

    #[test]
    fn test_oversized_numbers_saturate() {
        assert_eq!(parse_page(Some("10000000000")), u32::MAX);
        assert_eq!(parse_page(Some("1e30")), u32::MAX);
        assert_eq!(clamp_limit(Some("10000000000"), 10, 100), 100);
        assert_eq!(clamp_limit(Some("99999999999999999999999"), 10, 50), 50);
        assert_eq!(parse_age("10000000000"), Some(u32::MAX));
        assert_eq!(parse_age("inf"), None);
    }

    #[test]
    fn test_clamp_limit() {
        assert_eq!(clamp_limit(None, 10, 100), 10);
        assert_eq!(clamp_limit(Some("abc"), 10, 100), 10);
        assert_eq!(clamp_limit(Some("0"), 10, 100), 1);
        assert_eq!(clamp_limit(Some("25"), 10, 100), 25);
        assert_eq!(clamp_limit(Some("250"), 10, 50), 50);
        // A configured max above the hard cap is ignored.
        assert_eq!(clamp_limit(Some("250"), 10, 1000), 100);
    }

    #[test]
    fn test_parse_age() {
        assert_eq!(parse_age("30"), Some(30));
        assert_eq!(parse_age("thirty"), None);
        assert_eq!(parse_age("-1"), None);
    }

    #[test]
    fn test_parse_date_bound() {
        assert_eq!(
            parse_date_bound("2024-12-03"),
            NaiveDate::from_ymd_opt(2024, 12, 3)
        );
        assert_eq!(parse_date_bound(""), None);
        assert_eq!(parse_date_bound("31/31/2024"), None);
    }

    #[test]
    fn test_import_clamps() {
        assert_eq!(clamp_age(-4), 0);
        assert_eq!(clamp_age(300), 150);
        assert_eq!(clamp_age(42), 42);
        assert_eq!(clamp_quantity(0), 1);
        assert_eq!(clamp_quantity(7), 7);
    }

    #[test]
    fn test_validate_page_size() {
        assert!(validate_page_size("defaultPageSize", 10).is_ok());
        assert!(validate_page_size("defaultPageSize", 0).is_err());
        assert!(validate_page_size("maxPageSize", 101).is_err());
    }
}
