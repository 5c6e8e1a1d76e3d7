use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use paperfind::PipelineError;
use serde_json::json;
use store::StoreError;

pub type ServerResult<T> = Result<T, ServerError>;

/// Server error types.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found")]
    NotFound,
}

impl ServerError {
    /// Get HTTP status code for this error.
    ///
    /// Every pipeline-stage failure is a server-side 500 whose message
    /// names the failing stage; only malformed requests map to 400.
    fn status_code(&self) -> StatusCode {
        match self {
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::NotFound => StatusCode::NOT_FOUND,
            ServerError::Pipeline(_)
            | ServerError::Store(_)
            | ServerError::Internal(_)
            | ServerError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error code string.
    fn error_code(&self) -> &'static str {
        match self {
            ServerError::BadRequest(_) => "BAD_REQUEST",
            ServerError::Pipeline(err) => match err {
                PipelineError::ExtractionFailed(_) => "EXTRACTION_FAILED",
                PipelineError::MetadataParseFailed(_) => "METADATA_PARSE_FAILED",
                PipelineError::EmbeddingFailed(_) => "EMBEDDING_FAILED",
                PipelineError::UploadFailed(_) => "UPLOAD_FAILED",
                PipelineError::Codec(_) => "CODEC_ERROR",
                PipelineError::Store(_) => "STORE_ERROR",
            },
            ServerError::Store(_) => "STORE_ERROR",
            ServerError::Internal(_) => "INTERNAL_ERROR",
            ServerError::Config(_) => "CONFIG_ERROR",
            ServerError::NotFound => "NOT_FOUND",
        }
    }

    fn is_vector_length_mismatch(&self) -> bool {
        matches!(
            self,
            ServerError::Store(StoreError::VectorLengthMismatch { .. })
                | ServerError::Pipeline(PipelineError::Store(
                    StoreError::VectorLengthMismatch { .. }
                ))
        )
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code().to_string();
        let message = self.to_string();

        // Dimensionality divergence means the embedding provider is
        // misconfigured; every subsequent ingestion will fail the same way.
        if self.is_vector_length_mismatch() {
            tracing::error!(
                %message,
                "vector length mismatch: embedding provider output size changed mid-process"
            );
        }

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

impl From<providers::ProviderError> for ServerError {
    fn from(err: providers::ProviderError) -> Self {
        ServerError::Config(err.to_string())
    }
}
