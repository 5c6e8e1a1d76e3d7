use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::response::IntoResponse;
use axum::Json;

use crate::error::{ServerError, ServerResult};
use crate::state::ServerState;

/// Ingest a document.
///
/// Expects a multipart form with a `file` field carrying the document
/// bytes. Runs the full pipeline (text extraction → metadata → embedding →
/// quantization → upload → append) and returns the stored document, whose
/// `vector` serializes as the `0x` hex wire string.
///
/// A request without a `file` field (or with an empty file) is a `400`;
/// any pipeline-stage failure is a `500` whose body names the stage.
pub async fn upload_paper(
    State(state): State<Arc<ServerState>>,
    mut multipart: Multipart,
) -> ServerResult<impl IntoResponse> {
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ServerError::BadRequest(format!("invalid multipart body: {err}")))?
    {
        if field.name() == Some("file") {
            let filename = field
                .file_name()
                .unwrap_or("upload")
                .to_string();
            let data = field
                .bytes()
                .await
                .map_err(|err| ServerError::BadRequest(format!("failed to read file field: {err}")))?;
            file = Some((filename, data.to_vec()));
        }
    }

    let Some((filename, data)) = file else {
        return Err(ServerError::BadRequest("no file uploaded".into()));
    };
    if data.is_empty() {
        return Err(ServerError::BadRequest("uploaded file is empty".into()));
    }

    let document = state.pipeline.ingest(&data, &filename).await?;
    Ok(Json(document))
}
