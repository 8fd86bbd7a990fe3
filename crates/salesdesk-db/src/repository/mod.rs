//! # Repository Module
//!
//! Database repository implementations for Salesdesk.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  HTTP handler / seed binary                                            │
//! │       │                                                                 │
//! │       │  db.sales_records().snapshot()                                 │
//! │       ▼                                                                 │
//! │  SalesRecordRepository                                                 │
//! │  ├── snapshot(&self)              every record, insertion order        │
//! │  ├── insert_many(&self, records)  batched transactions                 │
//! │  ├── count(&self)                                                      │
//! │  └── clear(&self)                                                      │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`sales_record::SalesRecordRepository`] - Sales record snapshot and import

pub mod sales_record;
