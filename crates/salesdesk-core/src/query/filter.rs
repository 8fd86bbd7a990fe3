//! # Filter Stage
//!
//! Reduces a record sequence to the records matching every supplied filter
//! category. Input order is preserved.
//!
//! ## Matching Rules
//! ```text
//! ┌──────────────────────┬──────────────────────────────────────────────────┐
//! │ Category             │ Record matches when                              │
//! ├──────────────────────┼──────────────────────────────────────────────────┤
//! │ search               │ term is a substring of ANY search field          │
//! │ customerRegions      │ region equals ANY selected value                 │
//! │ gender               │ gender equals the value                          │
//! │ ageMin / ageMax      │ ageMin ≤ age ≤ ageMax (each bound optional)      │
//! │ ageRanges            │ age falls in ANY selected bucket                 │
//! │ productCategories    │ category equals ANY selected value               │
//! │ tags                 │ ANY record tag equals ANY selected tag           │
//! │ paymentMethods       │ method equals ANY selected value                 │
//! │ dateFrom / dateTo    │ start(dateFrom) ≤ date ≤ end(dateTo)             │
//! └──────────────────────┴──────────────────────────────────────────────────┘
//!   All comparisons are trimmed and case-insensitive.
//!   Categories are AND-ed; empty categories are no-ops.
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use super::{QueryFilters, SearchField};
use crate::error::ValidationError;
use crate::normalize::{contains_ignore_case, end_of_day, normalize_text, start_of_day};
use crate::types::SalesRecord;

// =============================================================================
// Age Buckets
// =============================================================================

/// Predefined age ranges offered by the filter panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum AgeBucket {
    #[serde(rename = "18-25")]
    From18To25,
    #[serde(rename = "26-35")]
    From26To35,
    #[serde(rename = "36-50")]
    From36To50,
    #[serde(rename = "50+")]
    Over50,
}

impl AgeBucket {
    pub const ALL: &'static [AgeBucket] = &[
        AgeBucket::From18To25,
        AgeBucket::From26To35,
        AgeBucket::From36To50,
        AgeBucket::Over50,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            AgeBucket::From18To25 => "18-25",
            AgeBucket::From26To35 => "26-35",
            AgeBucket::From36To50 => "36-50",
            AgeBucket::Over50 => "50+",
        }
    }

    /// Inclusive bounds; `None` means open-ended.
    pub const fn bounds(&self) -> (u32, Option<u32>) {
        match self {
            AgeBucket::From18To25 => (18, Some(25)),
            AgeBucket::From26To35 => (26, Some(35)),
            AgeBucket::From36To50 => (36, Some(50)),
            AgeBucket::Over50 => (50, None),
        }
    }

    pub fn contains(&self, age: u32) -> bool {
        let (min, max) = self.bounds();
        age >= min && max.map_or(true, |max| age <= max)
    }
}

impl fmt::Display for AgeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgeBucket {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        AgeBucket::ALL
            .iter()
            .copied()
            .find(|bucket| bucket.as_str() == s)
            .ok_or_else(|| {
                ValidationError::not_allowed("ageRanges", &["18-25", "26-35", "36-50", "50+"])
            })
    }
}

// =============================================================================
// Compiled Filter
// =============================================================================

/// A [`QueryFilters`] with every value normalized once, ready to be tested
/// against many records.
#[derive(Debug, Clone)]
pub struct RecordFilter {
    search: Option<String>,
    search_fields: Vec<SearchField>,
    regions: Vec<String>,
    gender: Option<String>,
    age_min: Option<u32>,
    age_max: Option<u32>,
    age_buckets: Vec<AgeBucket>,
    categories: Vec<String>,
    tags: Vec<String>,
    payment_methods: Vec<String>,
    date_from: Option<DateTime<Utc>>,
    date_to: Option<DateTime<Utc>>,
}

impl RecordFilter {
    pub fn new(filters: &QueryFilters, search_fields: &[SearchField]) -> Self {
        Self {
            search: non_blank(filters.search.as_deref()),
            search_fields: search_fields.to_vec(),
            regions: normalize_set(&filters.customer_regions),
            gender: non_blank(filters.gender.as_deref()),
            age_min: filters.age_min,
            age_max: filters.age_max,
            age_buckets: filters.age_ranges.clone(),
            categories: normalize_set(&filters.product_categories),
            tags: normalize_set(&filters.tags),
            payment_methods: normalize_set(&filters.payment_methods),
            date_from: filters.date_from.map(start_of_day),
            date_to: filters.date_to.map(end_of_day),
        }
    }

    /// True when the record satisfies every active category.
    pub fn matches(&self, record: &SalesRecord) -> bool {
        self.matches_search(record)
            && matches_any(&self.regions, &record.customer_region)
            && self
                .gender
                .as_ref()
                .map_or(true, |g| *g == normalize_text(record.gender.as_str()))
            && self.matches_age(record.age)
            && matches_any(&self.categories, &record.product_category)
            && self.matches_tags(&record.tags)
            && matches_any(&self.payment_methods, record.payment_method.as_str())
            && self.matches_date(record)
    }

    fn matches_search(&self, record: &SalesRecord) -> bool {
        let Some(term) = &self.search else {
            return true;
        };
        self.search_fields
            .iter()
            .filter_map(|field| field.value(record))
            .any(|value| contains_ignore_case(value, term))
    }

    fn matches_age(&self, age: u32) -> bool {
        let in_bounds = self.age_min.map_or(true, |min| age >= min)
            && self.age_max.map_or(true, |max| age <= max);
        let in_bucket =
            self.age_buckets.is_empty() || self.age_buckets.iter().any(|b| b.contains(age));
        in_bounds && in_bucket
    }

    fn matches_tags(&self, tags: &[String]) -> bool {
        if self.tags.is_empty() {
            return true;
        }
        tags.iter()
            .map(|tag| normalize_text(tag))
            .any(|tag| self.tags.contains(&tag))
    }

    fn matches_date(&self, record: &SalesRecord) -> bool {
        if self.date_from.is_none() && self.date_to.is_none() {
            return true;
        }
        // An active date constraint never matches an unparseable date.
        let Some(ts) = record.timestamp() else {
            return false;
        };
        self.date_from.map_or(true, |from| ts >= from) && self.date_to.map_or(true, |to| ts <= to)
    }
}

/// Filters a record sequence, preserving its order.
pub fn apply<'a, I>(records: I, filter: &RecordFilter) -> Vec<&'a SalesRecord>
where
    I: IntoIterator<Item = &'a SalesRecord>,
{
    records
        .into_iter()
        .filter(|record| filter.matches(record))
        .collect()
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value.map(normalize_text).filter(|v| !v.is_empty())
}

fn normalize_set(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|v| normalize_text(v))
        .filter(|v| !v.is_empty())
        .collect()
}

/// An empty set matches everything.
fn matches_any(set: &[String], value: &str) -> bool {
    set.is_empty() || set.contains(&normalize_text(value))
}

// =============================================================================
// Unit Tests
// =============================================================================
