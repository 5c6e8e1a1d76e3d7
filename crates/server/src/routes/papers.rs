use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::error::ServerResult;
use crate::state::ServerState;

/// List all stored documents in insertion order.
pub async fn list_papers(
    State(state): State<Arc<ServerState>>,
) -> ServerResult<impl IntoResponse> {
    Ok(Json(state.store.all_documents()))
}
