//! # External Providers
//!
//! Trait seams for the four external collaborators the ingestion pipeline
//! depends on: document-to-text extraction, text-to-metadata extraction
//! (an LLM call), embedding generation, and content-addressable upload.
//!
//! Each seam has two implementations:
//! - an HTTP client (`api` module) talking to the real service over a
//!   shared pooled [`reqwest::Client`], and
//! - a deterministic stub (`stub` module) for hermetic runs and tests.
//!
//! [`ProviderConfig::build`] selects between them and wires a [`ProviderSet`]
//! the pipeline can own.

mod api;
mod config;
mod error;
mod metadata;
mod stub;

pub use api::{HttpEmbedder, HttpMetadataExtractor, HttpTextExtractor, HttpUploader};
pub use config::{ProviderConfig, ProviderMode, ProviderSet};
pub use error::ProviderError;
pub use metadata::{parse_metadata_reply, PaperMetadata};
pub use stub::{StubEmbedder, StubMetadataExtractor, StubTextExtractor, StubUploader};

use async_trait::async_trait;

/// Turns raw file bytes (a PDF-like document) into plain text.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract_text(&self, file_bytes: &[u8]) -> Result<String, ProviderError>;
}

/// Turns extracted text into the structured metadata record.
///
/// Implementations must yield a complete [`PaperMetadata`] or fail; a reply
/// that cannot be parsed into all four fields is an error, never a partial
/// record.
#[async_trait]
pub trait MetadataExtractor: Send + Sync {
    async fn extract_metadata(&self, text: &str) -> Result<PaperMetadata, ProviderError>;
}

/// Produces a fixed-dimension embedding vector for a piece of text.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// The configured output dimensionality. Fixed for the life of the
    /// process; every vector returned by [`embed`](Self::embed) has exactly
    /// this length.
    fn dimension(&self) -> usize;

    async fn embed(&self, text: &str) -> Result<Vec<f64>, ProviderError>;
}

/// Uploads raw file bytes to content-addressable storage and returns the
/// locator URI.
#[async_trait]
pub trait ContentUploader: Send + Sync {
    async fn upload(&self, file_bytes: &[u8], filename: &str) -> Result<String, ProviderError>;
}
