//! API route handlers
//!
//! - `health`: liveness and readiness probes
//! - `upload`: multipart document ingestion
//! - `search`: similarity queries
//! - `papers`: stored document listing

pub mod health;
pub mod papers;
pub mod search;
pub mod upload;

use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::error::{ServerError, ServerResult};

/// API version and base info
///
/// Root endpoint (GET /): service name, version, and available endpoints.
pub async fn api_info() -> ServerResult<impl IntoResponse> {
    Ok(Json(json!({
        "name": "paperfind",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            "/upload",
            "/search",
            "/papers",
            "/health",
            "/ready"
        ]
    })))
}

/// 404 Not Found handler for undefined routes.
pub async fn not_found() -> ServerError {
    ServerError::NotFound
}
