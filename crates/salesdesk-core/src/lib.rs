//! # salesdesk-core: Pure Query Engine for Salesdesk
//!
//! This crate is the **heart** of Salesdesk. It turns a collection of sales
//! records plus filter, sort and pagination parameters into one page of
//! results, and derives the facet metadata that populates the filter UI.
//! Everything here is a pure function with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Salesdesk Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Frontend (React)                             │   │
//! │  │    Search bar ──► Filter panel ──► Sales table ──► Pagination  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP (GET /api/sales)                  │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    sales-api (axum)                             │   │
//! │  │    parse query string, clamp page/limit, JSON envelope          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ salesdesk-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐  ┌──────────┐  ┌──────────┐  ┌──────────┐      │   │
//! │  │   │  filter  │─►│   sort   │─►│ paginate │  │  facet   │      │   │
//! │  │   └──────────┘  └──────────┘  └──────────┘  └──────────┘      │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                ▲                                        │
//! │  ┌─────────────────────────────┴───────────────────────────────────┐   │
//! │  │                 salesdesk-db (Record Store)                     │   │
//! │  │              SQLite snapshot of all sales records               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (SalesRecord, PaymentMethod, RecordDate, ...)
//! - [`money`] - Money and discount types with integer arithmetic
//! - [`query`] - Filter, sort and paginate stages plus the engine trait
//! - [`facet`] - Distinct-value and range metadata for filter controls
//! - [`normalize`] - Shared text and date normalization helpers
//! - [`ingest`] - Maps heterogeneous import rows onto the canonical record
//! - [`validation`] - Lenient parsing and clamping of user parameters
//! - [`sample`] - Built-in sample data set
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use salesdesk_core::query::{InMemoryEngine, QueryFilters, QueryOptions, SalesQueryEngine};
//! use salesdesk_core::sample::sample_records;
//!
//! let records = sample_records();
//! let engine = InMemoryEngine::new(&records);
//!
//! let filters = QueryFilters {
//!     age_min: Some(30),
//!     age_max: Some(40),
//!     ..Default::default()
//! };
//! let page = engine.query(&filters, &QueryOptions::default());
//!
//! assert_eq!(page.total_items, 3);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod facet;
pub mod ingest;
pub mod money;
pub mod normalize;
pub mod query;
pub mod sample;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, ValidationError};
pub use facet::FilterOptions;
pub use money::{DiscountRate, Money};
pub use query::{PaginatedResult, QueryFilters, QueryOptions, SortField, SortOrder};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Page number used when none (or garbage) is supplied.
pub const DEFAULT_PAGE: u32 = 1;

/// Page size used when none (or garbage) is supplied.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Upper bound for the page size a client may request.
///
/// ## Business Reason
/// Keeps a single response bounded no matter what the frontend sends.
/// The API can lower it through configuration, never raise it.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Oldest plausible customer age accepted at ingestion.
pub const MAX_CUSTOMER_AGE: u32 = 150;
