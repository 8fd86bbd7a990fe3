//! # Query Engine
//!
//! Turns a record collection plus filter, sort and pagination parameters into
//! one page of results.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         One Query Invocation                            │
//! │                                                                         │
//! │  &[SalesRecord] (read-only snapshot)                                    │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  ┌───────────┐  QueryFilters   AND across categories, OR within one    │
//! │  │  filter   │ ─────────────── input order preserved                   │
//! │  └─────┬─────┘                                                          │
//! │        ▼                                                                │
//! │  ┌───────────┐  SortField +    stable, unparseable dates last          │
//! │  │   sort    │ ─ SortOrder ─── new Vec of refs, input untouched        │
//! │  └─────┬─────┘                                                          │
//! │        ├──────────────► SalesSummary (whole filtered set)               │
//! │        ▼                                                                │
//! │  ┌───────────┐  page + limit   clamped window, totalPages ≥ 1          │
//! │  │ paginate  │ ───────────────                                          │
//! │  └─────┬─────┘                                                          │
//! │        ▼                                                                │
//! │  PaginatedResult                                                        │
//! │                                                                         │
//! │  facet::compute_options reads the same snapshot, outside this pipeline  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No stage mutates shared state, so concurrent queries over the same
//! snapshot need no coordination.

pub mod filter;
pub mod paginate;
pub mod sort;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::facet::{self, FilterOptions};
use crate::money::Money;
use crate::normalize::fold_key;
use crate::types::SalesRecord;
use crate::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE};

pub use filter::{AgeBucket, RecordFilter};
pub use paginate::PageWindow;

// =============================================================================
// Query Inputs
// =============================================================================

/// Optional filter criteria. The default value matches every record.
///
/// Values are kept as the caller supplied them; normalization happens once
/// when a [`RecordFilter`] is built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryFilters {
    /// Free-text search over the configured search fields.
    pub search: Option<String>,
    pub customer_regions: Vec<String>,
    pub gender: Option<String>,
    /// Inclusive lower age bound.
    pub age_min: Option<u32>,
    /// Inclusive upper age bound.
    pub age_max: Option<u32>,
    /// Predefined age buckets, OR-ed together.
    pub age_ranges: Vec<AgeBucket>,
    pub product_categories: Vec<String>,
    pub tags: Vec<String>,
    pub payment_methods: Vec<String>,
    /// Inclusive, from the start of this day (UTC).
    pub date_from: Option<NaiveDate>,
    /// Inclusive, through the end of this day (UTC).
    pub date_to: Option<NaiveDate>,
}

impl QueryFilters {
    /// Number of filter categories that actually constrain the result.
    pub fn active_count(&self) -> usize {
        let search = self
            .search
            .as_deref()
            .is_some_and(|s| !s.trim().is_empty());
        let gender = self.gender.as_deref().is_some_and(|g| !g.trim().is_empty());
        let age = self.age_min.is_some() || self.age_max.is_some();
        let dates = self.date_from.is_some() || self.date_to.is_some();

        [
            search,
            !self.customer_regions.is_empty(),
            gender,
            age,
            !self.age_ranges.is_empty(),
            !self.product_categories.is_empty(),
            !self.tags.is_empty(),
            !self.payment_methods.is_empty(),
            dates,
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }

    /// True when no category constrains the result.
    pub fn is_empty(&self) -> bool {
        self.active_count() == 0
    }
}

/// Sort and pagination parameters.
///
/// `page` and `limit` are expected to be clamped already (see
/// [`crate::validation`]); the engine still guards against a zero limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    pub page: u32,
    pub limit: u32,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_PAGE_SIZE,
            sort_by: SortField::Date,
            sort_order: SortOrder::Desc,
        }
    }
}

/// Sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub enum SortField {
    #[default]
    Date,
    Quantity,
    CustomerName,
}

impl SortField {
    pub const fn as_str(&self) -> &'static str {
        match self {
            SortField::Date => "date",
            SortField::Quantity => "quantity",
            SortField::CustomerName => "customerName",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = ValidationError;

    /// Exact key names only; an unknown key is an error the caller maps to
    /// the default sort.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "date" => Ok(SortField::Date),
            "quantity" => Ok(SortField::Quantity),
            "customerName" => Ok(SortField::CustomerName),
            _ => Err(ValidationError::not_allowed(
                "sortBy",
                &["date", "quantity", "customerName"],
            )),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub const fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Asc),
            "desc" | "descending" => Ok(SortOrder::Desc),
            _ => Err(ValidationError::not_allowed("sortOrder", &["asc", "desc"])),
        }
    }
}

// =============================================================================
// Engine Configuration
// =============================================================================

/// A record field that free-text search looks at.
///
/// Serializes as the camelCase field name; deserializes through `FromStr`, so
/// `"employee_name"` and `"Customer Name"` are accepted too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchField {
    CustomerName,
    PhoneNumber,
    ProductName,
    CustomerId,
    ProductId,
    EmployeeName,
    TransactionId,
}

impl SearchField {
    pub const ALL: &'static [SearchField] = &[
        SearchField::CustomerName,
        SearchField::PhoneNumber,
        SearchField::ProductName,
        SearchField::CustomerId,
        SearchField::ProductId,
        SearchField::EmployeeName,
        SearchField::TransactionId,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            SearchField::CustomerName => "customerName",
            SearchField::PhoneNumber => "phoneNumber",
            SearchField::ProductName => "productName",
            SearchField::CustomerId => "customerId",
            SearchField::ProductId => "productId",
            SearchField::EmployeeName => "employeeName",
            SearchField::TransactionId => "transactionId",
        }
    }

    /// The field's value on a record, if it has one.
    pub fn value<'a>(&self, record: &'a SalesRecord) -> Option<&'a str> {
        match self {
            SearchField::CustomerName => Some(&record.customer_name),
            SearchField::PhoneNumber => Some(&record.phone_number),
            SearchField::ProductName => Some(&record.product_name),
            SearchField::CustomerId => Some(&record.customer_id),
            SearchField::ProductId => Some(&record.product_id),
            SearchField::EmployeeName => Some(&record.employee_name),
            SearchField::TransactionId => record.transaction_id.as_deref(),
        }
    }
}

impl FromStr for SearchField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = fold_key(s);
        SearchField::ALL
            .iter()
            .copied()
            .find(|field| fold_key(field.as_str()) == key)
            .ok_or_else(|| {
                let names: Vec<&str> = SearchField::ALL.iter().map(|f| f.as_str()).collect();
                ValidationError::not_allowed("searchFields", &names)
            })
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SearchField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SearchField {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Engine-wide settings that do not change per query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// Fields the `search` filter matches against. Never empty.
    pub search_fields: Vec<SearchField>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            search_fields: vec![SearchField::CustomerName, SearchField::PhoneNumber],
        }
    }
}

// =============================================================================
// Query Output
// =============================================================================

/// Aggregates over the whole filtered set, independent of the page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SalesSummary {
    /// Σ quantity.
    #[ts(type = "number")]
    pub total_units: u64,
    /// Σ totalAmount.
    #[ts(type = "number")]
    pub total_amount: Money,
    /// Σ (totalAmount - finalAmount).
    #[ts(type = "number")]
    pub total_discount: Money,
}

impl SalesSummary {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a SalesRecord>,
    {
        records
            .into_iter()
            .fold(SalesSummary::default(), |mut acc, record| {
                acc.total_units = acc.total_units.saturating_add(u64::from(record.quantity));
                acc.total_amount += record.total_amount;
                acc.total_discount += record.discount_amount();
                acc
            })
    }
}

/// One page of query results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PaginatedResult {
    /// At most `limit` records.
    pub items: Vec<SalesRecord>,
    /// Count after filtering, before pagination.
    pub total_items: usize,
    /// Always ≥ 1, even for an empty result.
    pub total_pages: u32,
    pub current_page: u32,
    pub limit: u32,
    pub has_next_page: bool,
    pub has_prev_page: bool,
    pub summary: SalesSummary,
}

// =============================================================================
// Engine
// =============================================================================

/// The query contract: filter → sort → paginate, plus the facet read.
///
/// Implementations over a queryable store must reproduce exactly the
/// semantics of [`InMemoryEngine`].
pub trait SalesQueryEngine {
    /// Runs one query and returns the requested page.
    fn query(&self, filters: &QueryFilters, options: &QueryOptions) -> PaginatedResult;

    /// Facet metadata over the full, unfiltered collection.
    fn filter_options(&self) -> FilterOptions;
}

/// Reference engine over an in-memory snapshot.
///
/// ## Example
/// ```rust
/// use salesdesk_core::query::{InMemoryEngine, QueryOptions, SalesQueryEngine, SortField, SortOrder};
/// use salesdesk_core::sample::sample_records;
///
/// let records = sample_records();
/// let engine = InMemoryEngine::new(&records);
///
/// let options = QueryOptions {
///     sort_by: SortField::CustomerName,
///     sort_order: SortOrder::Asc,
///     ..Default::default()
/// };
/// let page = engine.query(&Default::default(), &options);
/// assert_eq!(page.items[0].customer_name, "Emily Brown");
/// ```
#[derive(Debug, Clone)]
pub struct InMemoryEngine<'a> {
    records: &'a [SalesRecord],
    config: EngineConfig,
}

impl<'a> InMemoryEngine<'a> {
    /// Creates an engine with the default search fields.
    pub fn new(records: &'a [SalesRecord]) -> Self {
        Self::with_config(records, EngineConfig::default())
    }

    pub fn with_config(records: &'a [SalesRecord], config: EngineConfig) -> Self {
        Self { records, config }
    }

    /// The snapshot this engine reads.
    pub fn records(&self) -> &'a [SalesRecord] {
        self.records
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

impl SalesQueryEngine for InMemoryEngine<'_> {
    fn query(&self, filters: &QueryFilters, options: &QueryOptions) -> PaginatedResult {
        let record_filter = RecordFilter::new(filters, &self.config.search_fields);
        let filtered = filter::apply(self.records, &record_filter);
        let sorted = sort::apply(filtered, options.sort_by, options.sort_order);

        let summary = SalesSummary::from_records(sorted.iter().copied());
        let window = PageWindow::new(sorted.len(), options.page, options.limit);

        PaginatedResult {
            items: window.slice(&sorted).iter().copied().cloned().collect(),
            total_items: window.total_items,
            total_pages: window.total_pages,
            current_page: window.current_page,
            limit: window.limit,
            has_next_page: window.has_next_page(),
            has_prev_page: window.has_prev_page(),
            summary,
        }
    }

    fn filter_options(&self) -> FilterOptions {
        facet::compute_options(self.records)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::sample_records;

    fn names(page: &PaginatedResult) -> Vec<&str> {
        page.items.iter().map(|r| r.customer_name.as_str()).collect()
    }

    #[test]
    fn test_default_query_returns_everything_newest_first() {
        let records = sample_records();
        let engine = InMemoryEngine::new(&records);

        let page = engine.query(&QueryFilters::default(), &QueryOptions::default());

        assert_eq!(page.items.len(), 8);
        assert_eq!(page.total_items, 8);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.current_page, 1);
        assert_eq!(page.limit, 10);
        assert_eq!(page.items[0].customer_id, "CUST008");
        assert_eq!(page.items[7].customer_id, "CUST001");
        assert!(!page.has_next_page);
        assert!(!page.has_prev_page);
    }

    #[test]
    fn test_age_bounds_are_inclusive() {
        let records = sample_records();
        let engine = InMemoryEngine::new(&records);
        let filters = QueryFilters {
            age_min: Some(30),
            age_max: Some(40),
            ..Default::default()
        };

        let page = engine.query(&filters, &QueryOptions::default());

        let mut ages: Vec<u32> = page.items.iter().map(|r| r.age).collect();
        ages.sort_unstable();
        assert_eq!(ages, vec![31, 32, 35]);
    }

    #[test]
    fn test_tag_filter_finds_laptop() {
        let records = sample_records();
        let engine = InMemoryEngine::new(&records);
        let filters = QueryFilters {
            tags: vec!["LAPTOP".to_string()],
            ..Default::default()
        };

        let page = engine.query(&filters, &QueryOptions::default());
        assert_eq!(names(&page), vec!["John Smith"]);
    }

    #[test]
    fn test_search_is_scoped_to_configured_fields() {
        let records = sample_records();
        let engine = InMemoryEngine::new(&records);
        let filters = QueryFilters {
            search: Some("  john ".to_string()),
            ..Default::default()
        };

        // "Robert Johnson" matches by name; "Alice Johnson" is an employee
        // name and is not searched by default.
        let page = engine.query(&filters, &QueryOptions::default());
        assert_eq!(names(&page), vec!["Robert Johnson", "John Smith"]);

        let wide = InMemoryEngine::with_config(
            &records,
            EngineConfig {
                search_fields: vec![SearchField::CustomerName, SearchField::EmployeeName],
            },
        );
        assert_eq!(wide.query(&filters, &QueryOptions::default()).total_items, 4);
    }

    #[test]
    fn test_sort_by_customer_name_ascending() {
        let records = sample_records();
        let engine = InMemoryEngine::new(&records);
        let options = QueryOptions {
            sort_by: SortField::CustomerName,
            sort_order: SortOrder::Asc,
            ..Default::default()
        };

        let page = engine.query(&QueryFilters::default(), &options);
        assert_eq!(
            names(&page),
            vec![
                "Emily Brown",
                "James Anderson",
                "Jessica Davis",
                "John Smith",
                "Lisa Zhang",
                "Michael Chen",
                "Robert Johnson",
                "Sarah Williams",
            ]
        );
    }

    #[test]
    fn test_second_page_of_three() {
        let records = sample_records();
        let engine = InMemoryEngine::new(&records);
        let options = QueryOptions {
            page: 2,
            limit: 3,
            ..Default::default()
        };

        let page = engine.query(&QueryFilters::default(), &options);

        // date desc: 008 007 006 | 005 004 003 | 002 001
        let ids: Vec<&str> = page.items.iter().map(|r| r.customer_id.as_str()).collect();
        assert_eq!(ids, vec!["CUST005", "CUST004", "CUST003"]);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.current_page, 2);
        assert!(page.has_next_page);
        assert!(page.has_prev_page);
    }

    #[test]
    fn test_all_pages_reproduce_sorted_set() {
        let records = sample_records();
        let engine = InMemoryEngine::new(&records);
        let filters = QueryFilters::default();
        let sort = QueryOptions {
            sort_by: SortField::Quantity,
            sort_order: SortOrder::Asc,
            limit: 100,
            ..Default::default()
        };
        let everything = engine.query(&filters, &sort).items;

        let first = engine.query(&filters, &QueryOptions { limit: 3, ..sort });
        let mut joined = Vec::new();
        for page in 1..=first.total_pages {
            let options = QueryOptions { page, limit: 3, ..sort };
            joined.extend(engine.query(&filters, &options).items);
        }

        assert_eq!(joined, everything);
    }

    #[test]
    fn test_empty_result_is_well_formed() {
        let records = sample_records();
        let engine = InMemoryEngine::new(&records);
        let filters = QueryFilters {
            customer_regions: vec!["Antarctica".to_string()],
            ..Default::default()
        };

        let page = engine.query(&filters, &QueryOptions { page: 4, ..Default::default() });

        assert!(page.items.is_empty());
        assert_eq!(page.total_items, 0);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.current_page, 1);
        assert_eq!(page.summary, SalesSummary::default());
    }

    #[test]
    fn test_summary_covers_whole_filtered_set() {
        let records = sample_records();
        let engine = InMemoryEngine::new(&records);
        let filters = QueryFilters {
            product_categories: vec!["electronics".to_string()],
            ..Default::default()
        };

        let page = engine.query(&filters, &QueryOptions { limit: 1, ..Default::default() });

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.total_items, 4);
        assert_eq!(page.summary.total_units, 4);
        // 1200 + 150 + 200 + 300
        assert_eq!(page.summary.total_amount.cents(), 185_000);
        // 120 + 30 + 20 + 45
        assert_eq!(page.summary.total_discount.cents(), 21_500);
    }

    #[test]
    fn test_summary_saturates_on_huge_amounts() {
        let mut records = sample_records();
        for record in records.iter_mut().take(2) {
            record.total_amount = Money::from_cents(i64::MAX);
            record.final_amount = Money::zero();
        }

        let summary = SalesSummary::from_records(&records);

        assert_eq!(summary.total_amount.cents(), i64::MAX);
        assert_eq!(summary.total_discount.cents(), i64::MAX);
        assert_eq!(summary.total_units, 21);
    }

    #[test]
    fn test_query_does_not_touch_snapshot() {
        let records = sample_records();
        let before = records.clone();
        let engine = InMemoryEngine::new(&records);

        let options = QueryOptions {
            sort_by: SortField::Quantity,
            sort_order: SortOrder::Asc,
            ..Default::default()
        };
        engine.query(&QueryFilters::default(), &options);

        assert_eq!(records, before);
    }

    #[test]
    fn test_active_count() {
        assert!(QueryFilters::default().is_empty());

        let filters = QueryFilters {
            search: Some("   ".to_string()),
            age_min: Some(20),
            age_max: Some(30),
            tags: vec!["ssd".to_string()],
            ..Default::default()
        };
        assert_eq!(filters.active_count(), 2);
    }

    #[test]
    fn test_sort_field_parsing() {
        assert_eq!("customerName".parse::<SortField>().unwrap(), SortField::CustomerName);
        assert!("price".parse::<SortField>().is_err());
        assert_eq!("ASC".parse::<SortOrder>().unwrap(), SortOrder::Asc);
        assert!("sideways".parse::<SortOrder>().is_err());
    }

    #[test]
    fn test_search_field_parsing() {
        assert_eq!("product_name".parse::<SearchField>().unwrap(), SearchField::ProductName);
        assert_eq!("Employee Name".parse::<SearchField>().unwrap(), SearchField::EmployeeName);
        assert!("brand".parse::<SearchField>().is_err());
    }

    #[test]
    fn test_search_field_serde_matches_parsing() {
        let fields: Vec<SearchField> =
            serde_json::from_str(r#"["employee_name", "Customer Name", "phoneNumber"]"#).unwrap();
        assert_eq!(
            fields,
            vec![SearchField::EmployeeName, SearchField::CustomerName, SearchField::PhoneNumber]
        );
        assert_eq!(serde_json::to_string(&fields[0]).unwrap(), "\"employeeName\"");
        assert!(serde_json::from_str::<SearchField>("\"brand\"").is_err());
    }

    #[test]
    fn test_paginated_result_json_shape() {
        let records = sample_records();
        let engine = InMemoryEngine::new(&records);
        let page = engine.query(&QueryFilters::default(), &QueryOptions::default());

        let value = serde_json::to_value(&page).unwrap();
        assert_eq!(value["totalItems"], 8);
        assert_eq!(value["currentPage"], 1);
        assert_eq!(value["hasNextPage"], false);
        assert!(value["summary"]["totalAmount"].is_number());
    }
}
