//! # Query-String Parsing
//!
//! Turns the raw query string of `GET /api/sales` into the engine's
//! [`QueryFilters`] and [`QueryOptions`].
//!
//! ## Accepted Shapes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    One List, Three Spellings                            │
//! │                                                                         │
//! │  ?tags=laptop&tags=gaming          repeated key                        │
//! │  ?tags[]=laptop&tags[]=gaming      bracketed key                       │
//! │  ?tags=laptop,gaming               comma-separated                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  filters.tags == ["laptop", "gaming"]                                  │
//! │                                                                         │
//! │  Older clients: region, category, paymentMethod, pageSize              │
//! │  are read as customerRegions, productCategories, paymentMethods, limit │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing in here fails. A garbled number or date is dropped, an unknown
//! `sortBy` falls back to newest-first, `page`/`limit` are clamped.

use salesdesk_core::query::AgeBucket;
use salesdesk_core::validation::{clamp_limit, parse_age, parse_date_bound, parse_page};
use salesdesk_core::{QueryFilters, QueryOptions, SortField, SortOrder};
use std::collections::HashMap;
use url::form_urlencoded;

use crate::config::ApiConfig;

const SEARCH: &[&str] = &["search"];
const REGIONS: &[&str] = &["customerRegions", "customerRegion", "region"];
const GENDER: &[&str] = &["gender"];
const AGE_MIN: &[&str] = &["ageMin"];
const AGE_MAX: &[&str] = &["ageMax"];
const AGE_RANGES: &[&str] = &["ageRanges", "ageRange"];
const CATEGORIES: &[&str] = &["productCategories", "productCategory", "category"];
const TAGS: &[&str] = &["tags", "tag"];
const PAYMENT_METHODS: &[&str] = &["paymentMethods", "paymentMethod"];
const DATE_FROM: &[&str] = &["dateFrom"];
const DATE_TO: &[&str] = &["dateTo"];
const PAGE: &[&str] = &["page"];
const LIMIT: &[&str] = &["limit", "pageSize"];
const SORT_BY: &[&str] = &["sortBy"];
const SORT_ORDER: &[&str] = &["sortOrder"];

/// A parsed `GET /api/sales` request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalesQuery {
    pub filters: QueryFilters,
    pub options: QueryOptions,
}

impl SalesQuery {
    /// Parses a raw (still percent-encoded) query string.
    pub fn parse(raw: Option<&str>, config: &ApiConfig) -> Self {
        let params = Params::parse(raw.unwrap_or_default());

        let filters = QueryFilters {
            search: params.first(SEARCH).map(str::to_string),
            customer_regions: params.list(REGIONS),
            gender: params.first(GENDER).map(str::to_string),
            age_min: params.first(AGE_MIN).and_then(parse_age),
            age_max: params.first(AGE_MAX).and_then(parse_age),
            age_ranges: parse_age_buckets(&params.list(AGE_RANGES)),
            product_categories: params.list(CATEGORIES),
            tags: params.list(TAGS),
            payment_methods: params.list(PAYMENT_METHODS),
            date_from: params.first(DATE_FROM).and_then(parse_date_bound),
            date_to: params.first(DATE_TO).and_then(parse_date_bound),
        };

        let (sort_by, sort_order) = parse_sort(params.first(SORT_BY), params.first(SORT_ORDER));
        let options = QueryOptions {
            page: parse_page(params.first(PAGE)),
            limit: clamp_limit(
                params.first(LIMIT),
                config.default_page_size,
                config.max_page_size,
            ),
            sort_by,
            sort_order,
        };

        SalesQuery { filters, options }
    }
}

// =============================================================================
// Raw Parameters
// =============================================================================

/// Decoded key/value pairs grouped by key, `[]` suffix removed.
#[derive(Debug, Default)]
struct Params {
    values: HashMap<String, Vec<String>>,
}

impl Params {
    fn parse(raw: &str) -> Self {
        let mut values: HashMap<String, Vec<String>> = HashMap::new();
        for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
            let key = key.trim();
            let key = key.strip_suffix("[]").unwrap_or(key);
            values
                .entry(key.to_string())
                .or_default()
                .push(value.into_owned());
        }
        Params { values }
    }

    /// Every value under any of `keys`, in alias order.
    fn all<'a>(&'a self, keys: &'a [&'a str]) -> impl Iterator<Item = &'a str> + 'a {
        keys.iter()
            .filter_map(|key| self.values.get(*key))
            .flatten()
            .map(String::as_str)
    }

    /// First non-blank value, trimmed.
    fn first<'a>(&'a self, keys: &'a [&'a str]) -> Option<&'a str> {
        self.all(keys).map(str::trim).find(|value| !value.is_empty())
    }

    /// All values, comma-split, trimmed, blanks and repeats dropped.
    fn list(&self, keys: &[&str]) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for item in self.all(keys).flat_map(|value| value.split(',')) {
            let item = item.trim();
            if !item.is_empty() && !out.iter().any(|seen| seen == item) {
                out.push(item.to_string());
            }
        }
        out
    }
}

// =============================================================================
// Typed Values
// =============================================================================

/// Unknown labels are ignored.
fn parse_age_buckets(labels: &[String]) -> Vec<AgeBucket> {
    let mut buckets = Vec::new();
    for label in labels {
        // An unencoded `50+` arrives as `50 ` (form encoding turns `+` into a space)
        let bucket = label
            .parse::<AgeBucket>()
            .or_else(|_| format!("{}+", label.trim()).parse());
        if let Ok(bucket) = bucket {
            if !buckets.contains(&bucket) {
                buckets.push(bucket);
            }
        }
    }
    buckets
}

/// An unknown `sortBy` resets to newest-first; an unknown `sortOrder` is
/// the default order.
fn parse_sort(sort_by: Option<&str>, sort_order: Option<&str>) -> (SortField, SortOrder) {
    let defaults = QueryOptions::default();
    let order = sort_order
        .and_then(|order| order.parse().ok())
        .unwrap_or(defaults.sort_order);

    match sort_by {
        None => (defaults.sort_by, order),
        Some(field) => match field.parse() {
            Ok(field) => (field, order),
            Err(_) => (SortField::Date, SortOrder::Desc),
        },
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
