//! # HTTP Routes
//!
//! Handlers for the sales API.
//!
//! ## Endpoints
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           Route Table                                   │
//! │                                                                         │
//! │  GET /                    service info                                 │
//! │  GET /health              liveness + store reachability                │
//! │  GET /api/sales           filter → sort → paginate (+ summary)         │
//! │  GET /api/sales/filters   facet values for the filter UI               │
//! │  *                        404 envelope                                 │
//! │                                                                         │
//! │  Each sales request:                                                   │
//! │    raw query ──► SalesQuery ──► snapshot() ──► InMemoryEngine ──► JSON │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::extract::{RawQuery, State};
use axum::http::{Method, StatusCode, Uri};
use axum::Json;
use salesdesk_core::query::{InMemoryEngine, SalesQueryEngine};
use salesdesk_core::{FilterOptions, PaginatedResult};
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Instant;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::params::SalesQuery;
use crate::AppState;

// =============================================================================
// Response Envelope
// =============================================================================

/// Success envelope shared by the data endpoints.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
    pub message: &'static str,
}

impl<T> Envelope<T> {
    pub fn ok(data: T, message: &'static str) -> Json<Self> {
        Json(Envelope {
            success: true,
            data,
            message,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct HealthBody {
    pub status: &'static str,
    pub message: &'static str,
    pub database: &'static str,
}

// =============================================================================
// Handlers
// =============================================================================

/// `GET /`
pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "Retail Sales Management System API",
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/health",
            "sales": "/api/sales",
            "salesFilters": "/api/sales/filters",
        },
    }))
}

/// `GET /health`
///
/// 200 while the store answers, 503 otherwise.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthBody>) {
    if state.db.health_check().await {
        (
            StatusCode::OK,
            Json(HealthBody {
                status: "ok",
                message: "Server is running",
                database: "connected",
            }),
        )
    } else {
        warn!("Health check failed: database unavailable");
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthBody {
                status: "degraded",
                message: "Server is running",
                database: "unavailable",
            }),
        )
    }
}

/// `GET /api/sales`
pub async fn list_sales(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> Result<Json<Envelope<PaginatedResult>>, ApiError> {
    let query = SalesQuery::parse(raw.as_deref(), &state.config);
    let start = Instant::now();

    let records = state
        .db
        .sales_records()
        .snapshot()
        .await
        .map_err(ApiError::fetch_failed("Failed to fetch sales records"))?;

    let engine = InMemoryEngine::with_config(&records, state.engine_config());
    let result = engine.query(&query.filters, &query.options);

    debug!(
        active_filters = query.filters.active_count(),
        sort_by = %query.options.sort_by,
        sort_order = %query.options.sort_order,
        scanned = records.len(),
        matched = result.total_items,
        page = result.current_page,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Sales query"
    );

    Ok(Envelope::ok(result, "Sales records retrieved successfully"))
}

/// `GET /api/sales/filters`
pub async fn filter_options(
    State(state): State<AppState>,
) -> Result<Json<Envelope<FilterOptions>>, ApiError> {
    let start = Instant::now();

    let records = state
        .db
        .sales_records()
        .snapshot()
        .await
        .map_err(ApiError::fetch_failed("Failed to fetch filter options"))?;

    let options = InMemoryEngine::with_config(&records, state.engine_config()).filter_options();

    debug!(
        scanned = records.len(),
        regions = options.customer_regions.len(),
        categories = options.product_categories.len(),
        tags = options.tags.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Filter options computed"
    );

    Ok(Envelope::ok(options, "Filter options retrieved successfully"))
}

/// Anything no route matched.
pub async fn not_found(method: Method, uri: Uri) -> ApiError {
    ApiError::RouteNotFound {
        method,
        path: uri.path().to_string(),
    }
}

// =============================================================================
// Router Tests
// =============================================================================
