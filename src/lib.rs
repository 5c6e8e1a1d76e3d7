//! Umbrella crate for paperfind, the semantic paper index.
//!
//! This crate stitches the component crates together behind the ingestion
//! pipeline: documents come in as raw file bytes, flow through the four
//! external collaborators (text extraction, metadata extraction, embedding,
//! content-addressable upload), get their embedding quantized by the codec,
//! and land in the append-only store. Queries flow through the same
//! embedder and codec before being ranked by the similarity engine.
//!
//! Component crates are re-exported so callers can operate through a single
//! API entry point.

mod metrics;
mod pipeline;

pub use codec::{decode, encode, CodecError, EncodedVector};
pub use metrics::{set_pipeline_metrics, PipelineMetrics, PipelineStage};
pub use pipeline::{IngestPipeline, PipelineConfig};
pub use providers::{
    parse_metadata_reply, ContentUploader, Embedder, HttpEmbedder, HttpMetadataExtractor,
    HttpTextExtractor, HttpUploader, MetadataExtractor, PaperMetadata, ProviderConfig,
    ProviderError, ProviderMode, ProviderSet, StubEmbedder, StubMetadataExtractor,
    StubTextExtractor, StubUploader, TextExtractor,
};
pub use similarity::{cosine_similarity, rank_by_similarity, SearchResult, SimilarityError};
pub use store::{Document, DocumentHandle, PaperStore, StoreError};

use thiserror::Error;

/// Errors that can occur while running a document or query through the
/// pipeline. Each external-call failure keeps its stage so callers can
/// distinguish the kinds (and decide their own retry policy — the pipeline
/// itself never retries).
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Stage 1: the text-extraction service failed.
    #[error("text extraction failed: {0}")]
    ExtractionFailed(#[source] ProviderError),
    /// Stage 2: the metadata extractor failed or its reply could not be
    /// parsed into the required fields. Always a hard stop, never a
    /// partial record.
    #[error("metadata extraction failed: {0}")]
    MetadataParseFailed(#[source] ProviderError),
    /// Stage 4: the embedding provider failed or returned a vector of the
    /// wrong dimensionality.
    #[error("embedding failed: {0}")]
    EmbeddingFailed(#[source] ProviderError),
    /// Stage 6: the content upload failed. The store is never touched when
    /// this happens, so no record exists without a retrievable artifact.
    #[error("content upload failed: {0}")]
    UploadFailed(#[source] ProviderError),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl PipelineError {
    /// Short name of the failing stage, for logs and HTTP error bodies.
    pub fn stage(&self) -> &'static str {
        match self {
            PipelineError::ExtractionFailed(_) => "text-extraction",
            PipelineError::MetadataParseFailed(_) => "metadata-extraction",
            PipelineError::EmbeddingFailed(_) => "embedding",
            PipelineError::UploadFailed(_) => "upload",
            PipelineError::Codec(_) => "codec",
            PipelineError::Store(_) => "store",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_error_names_its_stage() {
        let err = PipelineError::UploadFailed(ProviderError::BadReply("no cid".into()));
        assert_eq!(err.stage(), "upload");
        assert!(err.to_string().contains("content upload failed"));
        assert!(err.to_string().contains("no cid"));

        let err = PipelineError::Codec(CodecError::InvalidInput("empty".into()));
        assert_eq!(err.stage(), "codec");
    }
}
