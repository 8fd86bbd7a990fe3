//! # salesdesk-db: Record Store for Salesdesk
//!
//! This crate provides database access for Salesdesk.
//! It uses SQLite for storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Salesdesk Data Flow                              │
//! │                                                                         │
//! │  GET /api/sales                        seed --file export.json          │
//! │       │                                      │                          │
//! │       ▼                                      ▼                          │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  salesdesk-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌──────────────────┐   ┌──────────────┐ │   │
//! │  │   │   Database    │    │   Repository     │   │  Migrations  │ │   │
//! │  │   │   (pool.rs)   │    │ (sales_record)   │   │  (embedded)  │ │   │
//! │  │   │               │    │                  │   │              │ │   │
//! │  │   │ SqlitePool    │◄───│ snapshot()       │   │ 001_sales_   │ │   │
//! │  │   │ WAL mode      │    │ insert_many()    │   │  records.sql │ │   │
//! │  │   └───────────────┘    └──────────────────┘   └──────────────┘ │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │                     ./salesdesk.db                              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Sales record repository
//!
//! ## Usage
//!
//! ```rust,ignore
//! use salesdesk_core::query::{InMemoryEngine, SalesQueryEngine};
//! use salesdesk_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./salesdesk.db")).await?;
//!
//! // One SELECT, then the pure engine runs over the snapshot
//! let records = db.sales_records().snapshot().await?;
//! let options = InMemoryEngine::new(&records).filter_options();
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::sales_record::{SalesRecordRepository, INSERT_BATCH_SIZE};
