//! # Salesdesk Sales API
//!
//! HTTP transport for the sales record query engine.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         sales-api                                       │
//! │                                                                         │
//! │  Browser ──► CORS ──► TraceLayer ──► Router                            │
//! │                                        │                                │
//! │                    ┌───────────────────┼────────────────────┐          │
//! │                    ▼                   ▼                    ▼          │
//! │               params.rs            routes.rs            error.rs       │
//! │            (query string →      (snapshot + engine)   (404 / 500       │
//! │             filters/options)                           envelopes)      │
//! │                                        │                                │
//! │                                        ▼                                │
//! │                         salesdesk-db ──► SQLite                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The binary in `main.rs` only loads config, opens the database and serves
//! [`build_router`]; everything testable lives here.

pub mod config;
pub mod error;
pub mod params;
pub mod routes;

use axum::routing::get;
use axum::Router;
use salesdesk_core::query::EngineConfig;
use salesdesk_db::Database;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use config::{ApiConfig, ConfigError};
pub use error::ApiError;

/// Shared application state. Cloned into every request.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<ApiConfig>,
}

impl AppState {
    pub fn new(db: Database, config: ApiConfig) -> Self {
        AppState {
            db,
            config: Arc::new(config),
        }
    }

    pub fn engine_config(&self) -> EngineConfig {
        self.config.engine_config()
    }
}

/// Builds the application router with its middleware.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::root))
        .route("/health", get(routes::health))
        .route("/api/sales", get(routes::list_sales))
        .route("/api/sales/filters", get(routes::filter_options))
        .fallback(routes::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
