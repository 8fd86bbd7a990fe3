//! # Facet Stage
//!
//! Distinct values and ranges that populate the filter panel. Always computed
//! over the full collection, never over a filtered subset, so every option
//! the UI offers exists somewhere in the data.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use ts_rs::TS;

use crate::normalize::format_calendar_date;
use crate::types::SalesRecord;

/// Inclusive numeric range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AgeRange {
    pub min: u32,
    pub max: u32,
}

/// Inclusive calendar-date range (`YYYY-MM-DD`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DateRange {
    pub min: String,
    pub max: String,
}

/// Facet metadata for the filter controls.
///
/// Categorical lists are deduplicated and sorted ascending. Ranges are
/// `null` when there is nothing to compute them from.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct FilterOptions {
    pub customer_regions: Vec<String>,
    pub genders: Vec<String>,
    pub product_categories: Vec<String>,
    pub payment_methods: Vec<String>,
    pub tags: Vec<String>,
    pub age_range: Option<AgeRange>,
    /// Only records with a parseable date contribute.
    pub date_range: Option<DateRange>,
}

/// Computes facet metadata over a whole collection.
///
/// ## Example
/// ```rust
/// use salesdesk_core::facet::compute_options;
/// use salesdesk_core::sample::sample_records;
///
/// let options = compute_options(&sample_records());
/// assert_eq!(options.genders, vec!["Female", "Male"]);
///
/// let empty = compute_options(&[]);
/// assert!(empty.age_range.is_none());
/// ```
pub fn compute_options(records: &[SalesRecord]) -> FilterOptions {
    let mut regions = BTreeSet::new();
    let mut genders = BTreeSet::new();
    let mut categories = BTreeSet::new();
    let mut methods = BTreeSet::new();
    let mut tags = BTreeSet::new();

    for record in records {
        insert_value(&mut regions, &record.customer_region);
        genders.insert(record.gender.as_str());
        insert_value(&mut categories, &record.product_category);
        methods.insert(record.payment_method.as_str());
        for tag in &record.tags {
            insert_value(&mut tags, tag);
        }
    }

    let age_range = records
        .iter()
        .map(|r| r.age)
        .fold(None, |range: Option<AgeRange>, age| {
            Some(match range {
                None => AgeRange { min: age, max: age },
                Some(r) => AgeRange {
                    min: r.min.min(age),
                    max: r.max.max(age),
                },
            })
        });

    let timestamps = records.iter().filter_map(SalesRecord::timestamp);
    let date_range = timestamps
        .clone()
        .min()
        .zip(timestamps.max())
        .map(|(min, max)| DateRange {
            min: format_calendar_date(min),
            max: format_calendar_date(max),
        });

    FilterOptions {
        customer_regions: regions.into_iter().collect(),
        genders: genders.into_iter().map(str::to_string).collect(),
        product_categories: categories.into_iter().collect(),
        payment_methods: methods.into_iter().map(str::to_string).collect(),
        tags: tags.into_iter().collect(),
        age_range,
        date_range,
    }
}

/// Blank values are not offered as options.
fn insert_value(set: &mut BTreeSet<String>, value: &str) {
    let value = value.trim();
    if !value.is_empty() && !set.contains(value) {
        set.insert(value.to_string());
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{InMemoryEngine, QueryFilters, QueryOptions, SalesQueryEngine};
    use crate::sample::sample_records;
    use crate::types::RecordDate;

    #[test]
    fn test_sample_facets() {
        let options = compute_options(&sample_records());

        assert_eq!(
            options.customer_regions,
            vec!["Asia", "Europe", "North America", "South America"]
        );
        assert_eq!(options.product_categories, vec!["Accessories", "Electronics"]);
        assert_eq!(
            options.payment_methods,
            vec!["Bank Transfer", "Credit Card", "Debit Card", "PayPal"]
        );
        assert_eq!(options.tags.len(), 24);
        assert_eq!(options.tags.first().map(String::as_str), Some("4k"));
        assert_eq!(options.age_range, Some(AgeRange { min: 24, max: 52 }));
        assert_eq!(
            options.date_range,
            Some(DateRange {
                min: "2024-12-01".to_string(),
                max: "2024-12-08".to_string(),
            })
        );
    }

    #[test]
    fn test_empty_collection_has_null_ranges() {
        let options = compute_options(&[]);
        assert!(options.customer_regions.is_empty());
        assert!(options.age_range.is_none());
        assert!(options.date_range.is_none());

        let value = serde_json::to_value(&options).unwrap();
        assert!(value["ageRange"].is_null());
        assert!(value["dateRange"].is_null());
    }

    #[test]
    fn test_unparseable_dates_are_skipped() {
        let mut records = sample_records();
        records[0].date = RecordDate::parse("garbage");
        records[7].date = RecordDate::parse("");

        let range = compute_options(&records).date_range.unwrap();
        assert_eq!(range.min, "2024-12-02");
        assert_eq!(range.max, "2024-12-07");
    }

    #[test]
    fn test_duplicate_and_blank_values_collapse() {
        let mut records = sample_records();
        records[1].tags = vec![" laptop ".to_string(), "".to_string()];
        records[2].customer_region = "   ".to_string();

        let options = compute_options(&records);
        assert_eq!(options.tags.iter().filter(|t| *t == "laptop").count(), 1);
        assert!(!options.tags.iter().any(|t| t.is_empty()));
        assert!(!options.customer_regions.iter().any(|r| r.trim().is_empty()));
    }

    #[test]
    fn test_every_offered_value_finds_records() {
        let records = sample_records();
        let engine = InMemoryEngine::new(&records);
        let options = engine.filter_options();
        let all = QueryOptions::default();

        for region in &options.customer_regions {
            let filters = QueryFilters {
                customer_regions: vec![region.clone()],
                ..Default::default()
            };
            assert!(engine.query(&filters, &all).total_items > 0, "{region}");
        }
        for tag in &options.tags {
            let filters = QueryFilters {
                tags: vec![tag.clone()],
                ..Default::default()
            };
            assert!(engine.query(&filters, &all).total_items > 0, "{tag}");
        }
        for method in &options.payment_methods {
            let filters = QueryFilters {
                payment_methods: vec![method.clone()],
                ..Default::default()
            };
            assert!(engine.query(&filters, &all).total_items > 0, "{method}");
        }
        for gender in &options.genders {
            let filters = QueryFilters {
                gender: Some(gender.clone()),
                ..Default::default()
            };
            assert!(engine.query(&filters, &all).total_items > 0, "{gender}");
        }
    }
}
