use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::error::{ServerError, ServerResult};
use crate::state::ServerState;

/// Search request body.
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    /// Free-text query
    pub query: String,
}

/// Rank all stored documents against the query text.
///
/// Returns the documents' fields flattened together with their `similarity`,
/// sorted descending. An empty store yields `[]` without calling the
/// embedding provider.
pub async fn search_papers(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<SearchRequest>,
) -> ServerResult<impl IntoResponse> {
    if request.query.trim().is_empty() {
        return Err(ServerError::BadRequest("query must not be empty".into()));
    }

    let results = if state.store.is_empty() {
        Vec::new()
    } else {
        state.pipeline.search(&request.query).await?
    };

    tracing::debug!(query = %request.query, hits = results.len(), "search served");
    Ok(Json(results))
}
