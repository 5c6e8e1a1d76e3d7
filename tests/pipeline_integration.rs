//! End-to-end pipeline tests over the deterministic stub providers.

use std::sync::Arc;

use async_trait::async_trait;
use paperfind::{
    Embedder, IngestPipeline, MetadataExtractor, PaperStore, PipelineConfig, ProviderConfig,
    ProviderError, ProviderSet, StubMetadataExtractor, StubTextExtractor, StubUploader,
};

const SAMPLE_PAPER: &str = "Quantized Fingerprints for Paper Search\n\
A. Curie, B. Noether\n\
We study byte-quantized embeddings for similarity search over papers. \
The fingerprints stay compact while preserving ranking quality.";

fn stub_pipeline(embedding_dim: usize) -> IngestPipeline {
    let providers = ProviderConfig {
        embedding_dim,
        ..Default::default()
    }
    .build()
    .expect("stub providers");
    IngestPipeline::new(providers, Arc::new(PaperStore::new()), PipelineConfig::default())
}

/// Embedder that always returns one fixed vector, for wire-format checks.
struct FixedEmbedder {
    vector: Vec<f64>,
}

#[async_trait]
impl Embedder for FixedEmbedder {
    fn dimension(&self) -> usize {
        self.vector.len()
    }

    async fn embed(&self, _text: &str) -> Result<Vec<f64>, ProviderError> {
        Ok(self.vector.clone())
    }
}

fn fixed_vector_pipeline(vector: Vec<f64>) -> IngestPipeline {
    let providers = ProviderSet {
        text: Arc::new(StubTextExtractor),
        metadata: Arc::new(StubMetadataExtractor),
        embedder: Arc::new(FixedEmbedder { vector }),
        uploader: Arc::new(StubUploader::new("stub://papers".into())),
    };
    IngestPipeline::new(providers, Arc::new(PaperStore::new()), PipelineConfig::default())
}

#[tokio::test]
async fn ingest_stores_a_complete_document() {
    let pipeline = stub_pipeline(32);

    let doc = pipeline
        .ingest(SAMPLE_PAPER.as_bytes(), "paper.txt")
        .await
        .expect("ingest");

    assert_eq!(doc.title, "Quantized Fingerprints for Paper Search");
    assert_eq!(doc.authors, "A. Curie, B. Noether");
    assert!(!doc.abstract_.is_empty());
    assert_eq!(doc.keywords.len(), 5);
    assert!(!doc.content_uri.is_empty());
    assert_eq!(doc.vector.len(), 32);

    let stored = pipeline.store().all_documents();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0], doc);
}

#[tokio::test]
async fn ingest_is_deterministic() {
    let first = stub_pipeline(32)
        .ingest(SAMPLE_PAPER.as_bytes(), "a.txt")
        .await
        .expect("ingest");
    let second = stub_pipeline(32)
        .ingest(SAMPLE_PAPER.as_bytes(), "b.txt")
        .await
        .expect("ingest");

    // Same bytes, same fingerprint and content address, across instances.
    assert_eq!(first.vector, second.vector);
    assert_eq!(first.content_uri, second.content_uri);
}

#[tokio::test]
async fn reference_vector_encodes_to_reference_hex() {
    let pipeline = fixed_vector_pipeline(vec![0.0, 1.0, 0.5]);

    let doc = pipeline
        .ingest(SAMPLE_PAPER.as_bytes(), "paper.txt")
        .await
        .expect("ingest");
    assert_eq!(doc.vector.to_hex(), "0x00ff80");

    // Any query embeds to the same fixed vector, so the document comes back
    // first with similarity ~1.0.
    let results = pipeline.search("the same text").await.expect("search");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].item.title, doc.title);
    assert!((results[0].similarity - 1.0).abs() < 1e-2);
}

#[tokio::test]
async fn search_ranks_same_text_first() {
    let pipeline = stub_pipeline(64);

    pipeline
        .ingest(SAMPLE_PAPER.as_bytes(), "paper.txt")
        .await
        .expect("ingest");
    let other = "Deep Sea Acoustics\nC. Darwin\n\
A survey of whale song propagation in deep ocean water columns over long distances.";
    pipeline
        .ingest(other.as_bytes(), "other.txt")
        .await
        .expect("ingest");

    // Query with the exact embedding input of the first paper.
    let meta = StubMetadataExtractor
        .extract_metadata(SAMPLE_PAPER)
        .await
        .expect("metadata");
    let query = IngestPipeline::embedding_input(&meta);

    let results = pipeline.search(&query).await.expect("search");
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].item.title, "Quantized Fingerprints for Paper Search");
    assert!((results[0].similarity - 1.0).abs() < 1e-2);
    assert!(results[0].similarity >= results[1].similarity);
}

#[tokio::test]
async fn search_on_empty_store_is_empty() {
    let pipeline = stub_pipeline(16);
    let results = pipeline.search("anything at all").await.expect("search");
    assert!(results.is_empty());
}

#[tokio::test]
async fn stored_document_serializes_with_hex_vector() {
    let pipeline = fixed_vector_pipeline(vec![0.0, 1.0, 0.5]);
    let doc = pipeline
        .ingest(SAMPLE_PAPER.as_bytes(), "paper.txt")
        .await
        .expect("ingest");

    let json = serde_json::to_value(&doc).expect("serialize");
    assert_eq!(json["vector"], "0x00ff80");
    assert_eq!(json["title"], "Quantized Fingerprints for Paper Search");
}
