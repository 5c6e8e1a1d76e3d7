//! Failure-path tests: every pipeline stage aborts the ingestion with its
//! own error kind and leaves the store untouched.

use std::sync::Arc;

use async_trait::async_trait;
use paperfind::{
    ContentUploader, Embedder, IngestPipeline, PaperStore, PipelineConfig, PipelineError,
    ProviderError, ProviderSet, StubEmbedder, StubMetadataExtractor, StubTextExtractor,
    StubUploader, TextExtractor,
};

const SAMPLE_PAPER: &str = "Quantized Fingerprints for Paper Search\n\
A. Curie, B. Noether\n\
We study byte-quantized embeddings for similarity search over papers.";

fn stub_set(embedding_dim: usize) -> ProviderSet {
    ProviderSet {
        text: Arc::new(StubTextExtractor),
        metadata: Arc::new(StubMetadataExtractor),
        embedder: Arc::new(StubEmbedder::new(embedding_dim)),
        uploader: Arc::new(StubUploader::new("stub://papers".into())),
    }
}

fn pipeline_with(providers: ProviderSet) -> IngestPipeline {
    IngestPipeline::new(providers, Arc::new(PaperStore::new()), PipelineConfig::default())
}

struct FailingTextExtractor;

#[async_trait]
impl TextExtractor for FailingTextExtractor {
    async fn extract_text(&self, _file_bytes: &[u8]) -> Result<String, ProviderError> {
        Err(ProviderError::BadReply("service unavailable".into()))
    }
}

struct FailingUploader;

#[async_trait]
impl ContentUploader for FailingUploader {
    async fn upload(&self, _file_bytes: &[u8], _filename: &str) -> Result<String, ProviderError> {
        Err(ProviderError::BadStatus {
            endpoint: "stub://papers".into(),
            status: 503,
            body: "gateway overloaded".into(),
        })
    }
}

/// Claims one dimensionality, returns another.
struct LyingEmbedder;

#[async_trait]
impl Embedder for LyingEmbedder {
    fn dimension(&self) -> usize {
        8
    }

    async fn embed(&self, _text: &str) -> Result<Vec<f64>, ProviderError> {
        Ok(vec![0.5; 4])
    }
}

#[tokio::test]
async fn extraction_failure_surfaces_its_kind() {
    let pipeline = pipeline_with(ProviderSet {
        text: Arc::new(FailingTextExtractor),
        ..stub_set(8)
    });

    let err = pipeline
        .ingest(SAMPLE_PAPER.as_bytes(), "paper.txt")
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::ExtractionFailed(_)));
    assert_eq!(err.stage(), "text-extraction");
    assert!(pipeline.store().is_empty());
}

#[tokio::test]
async fn unparseable_metadata_aborts_without_partial_record() {
    let pipeline = pipeline_with(stub_set(8));

    // Punctuation-only content yields no extractable keywords, so the
    // metadata stage must hard-stop.
    let err = pipeline.ingest(b"!!! ??? ...", "noise.txt").await.unwrap_err();
    assert!(matches!(err, PipelineError::MetadataParseFailed(_)));

    // The store must be unchanged: no partially-populated document.
    assert_eq!(pipeline.store().len(), 0);
}

#[tokio::test]
async fn upload_failure_never_appends() {
    let pipeline = pipeline_with(ProviderSet {
        uploader: Arc::new(FailingUploader),
        ..stub_set(8)
    });

    let err = pipeline
        .ingest(SAMPLE_PAPER.as_bytes(), "paper.txt")
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::UploadFailed(_)));
    assert!(err.to_string().contains("503"));

    // Embedding succeeded, but without a retrievable artifact nothing may
    // be stored.
    assert!(pipeline.store().is_empty());
}

#[tokio::test]
async fn divergent_embedding_dimension_is_an_embedding_failure() {
    let pipeline = pipeline_with(ProviderSet {
        embedder: Arc::new(LyingEmbedder),
        ..stub_set(8)
    });

    let err = pipeline
        .ingest(SAMPLE_PAPER.as_bytes(), "paper.txt")
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::EmbeddingFailed(_)));
    assert!(err.to_string().contains("configured for 8"));
    assert!(pipeline.store().is_empty());
}

#[tokio::test]
async fn search_embedding_failure_surfaces_its_kind() {
    let pipeline = pipeline_with(ProviderSet {
        embedder: Arc::new(LyingEmbedder),
        ..stub_set(8)
    });

    let err = pipeline.search("query").await.unwrap_err();
    assert!(matches!(err, PipelineError::EmbeddingFailed(_)));
}

#[tokio::test]
async fn failed_ingestion_keeps_earlier_documents_intact() {
    let pipeline = pipeline_with(stub_set(8));

    pipeline
        .ingest(SAMPLE_PAPER.as_bytes(), "paper.txt")
        .await
        .expect("ingest");
    let err = pipeline.ingest(b"???", "noise.txt").await.unwrap_err();
    assert!(matches!(err, PipelineError::MetadataParseFailed(_)));

    let stored = pipeline.store().all_documents();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].title, "Quantized Fingerprints for Paper Search");
}
