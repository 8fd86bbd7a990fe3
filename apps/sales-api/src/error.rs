//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Sales API                          │
//! │                                                                         │
//! │  Handler                                                               │
//! │  Result<Json<Envelope<T>>, ApiError>                                   │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Garbled query parameter? ─── ignored in params, never an error        │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Store unavailable? ─── DbError ──► ApiError::FetchFailed               │
//! │         │                              │                                │
//! │         │                              ├── error! with full detail      │
//! │         │                              └── 500 generic envelope         │
//! │         ▼                                                               │
//! │  Unknown route? ─────────────────► ApiError::RouteNotFound ── 404      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Response Body
//! ```json
//! {
//!   "success": false,
//!   "error": "Internal server error",
//!   "message": "Failed to fetch sales records"
//! }
//! ```

use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use salesdesk_db::DbError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Error returned from HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Reading the record store failed. `context` is the only text the
    /// client sees.
    #[error("{context}: {source}")]
    FetchFailed {
        context: &'static str,
        #[source]
        source: DbError,
    },

    #[error("Route {method} {path} not found")]
    RouteNotFound { method: Method, path: String },
}

impl ApiError {
    /// Wraps a store failure with a client-safe message.
    pub fn fetch_failed(context: &'static str) -> impl FnOnce(DbError) -> ApiError {
        move |source| ApiError::FetchFailed { context, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::FetchFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::RouteNotFound { .. } => StatusCode::NOT_FOUND,
        }
    }
}

/// Failure envelope.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: &'static str,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match &self {
            ApiError::FetchFailed { context, source } => {
                error!(error = %source, unavailable = source.is_unavailable(), "{}", context);
                ErrorBody {
                    success: false,
                    error: "Internal server error",
                    message: context.to_string(),
                }
            }
            ApiError::RouteNotFound { .. } => ErrorBody {
                success: false,
                error: "Not Found",
                message: self.to_string(),
            },
        };

        (self.status(), Json(body)).into_response()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_failed_hides_detail() {
        let err = ApiError::fetch_failed("Failed to fetch sales records")(DbError::ConnectionFailed(
            "unable to open /secret/path.db".to_string(),
        ));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().contains("/secret/path.db"));

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_route_not_found_message() {
        let err = ApiError::RouteNotFound {
            method: Method::GET,
            path: "/api/unknown".to_string(),
        };
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Route GET /api/unknown not found");
    }
}
