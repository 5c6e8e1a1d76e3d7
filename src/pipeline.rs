//! The ingestion pipeline: a straight-line sequence of fallible steps.
//!
//! Ingest: extract text → extract metadata → embed → quantize → upload →
//! append. Query: embed → quantize → rank. Every external call happens
//! without any store-wide lock held; only the final append takes the write
//! lock, for the insert itself.
//!
//! A failed stage aborts the ingestion and surfaces its kind; partial work
//! is discarded, never stored. The pipeline does not retry — the error
//! kinds are distinguishable so the caller can.

use std::sync::Arc;
use std::time::Instant;

use providers::{PaperMetadata, ProviderSet};
use similarity::SearchResult;
use store::{Document, PaperStore};

use crate::metrics::{record, PipelineStage};
use crate::PipelineError;

/// Pipeline tuning knobs.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Extracted text is truncated to this many characters before metadata
    /// extraction, matching the reference extraction contract.
    pub max_extract_chars: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_extract_chars: 4000,
        }
    }
}

/// Orchestrates the external providers, the codec, and the store.
pub struct IngestPipeline {
    providers: ProviderSet,
    store: Arc<PaperStore>,
    cfg: PipelineConfig,
}

impl IngestPipeline {
    pub fn new(providers: ProviderSet, store: Arc<PaperStore>, cfg: PipelineConfig) -> Self {
        Self {
            providers,
            store,
            cfg,
        }
    }

    /// The store this pipeline appends into.
    pub fn store(&self) -> &Arc<PaperStore> {
        &self.store
    }

    /// The embedding input string: title, abstract, and keywords joined
    /// with single spaces.
    pub fn embedding_input(meta: &PaperMetadata) -> String {
        format!(
            "{} {} {}",
            meta.title,
            meta.abstract_,
            meta.keywords.join(" ")
        )
    }

    /// Run one document through the full pipeline and append it.
    ///
    /// Returns the stored document on success. On failure the store is
    /// untouched and the error names the failing stage.
    pub async fn ingest(
        &self,
        file_bytes: &[u8],
        filename: &str,
    ) -> Result<Document, PipelineError> {
        tracing::debug!(filename, size = file_bytes.len(), "ingestion started");

        let start = Instant::now();
        let result = self.providers.text.extract_text(file_bytes).await;
        record(PipelineStage::Extract, start.elapsed(), result.is_ok());
        let text = result.map_err(PipelineError::ExtractionFailed)?;

        let excerpt = truncate_chars(&text, self.cfg.max_extract_chars);
        let start = Instant::now();
        let result = self.providers.metadata.extract_metadata(excerpt).await;
        record(PipelineStage::Metadata, start.elapsed(), result.is_ok());
        let meta = result.map_err(PipelineError::MetadataParseFailed)?;

        let input = Self::embedding_input(&meta);
        let raw = self.embed(&input).await?;
        let encoded = codec::encode(&raw)?;

        let start = Instant::now();
        let result = self.providers.uploader.upload(file_bytes, filename).await;
        record(PipelineStage::Upload, start.elapsed(), result.is_ok());
        let content_uri = result.map_err(PipelineError::UploadFailed)?;
        if content_uri.is_empty() {
            return Err(PipelineError::UploadFailed(
                providers::ProviderError::BadReply("empty content URI".into()),
            ));
        }

        let document = Document {
            title: meta.title,
            authors: meta.authors,
            abstract_: meta.abstract_,
            keywords: meta.keywords,
            content_uri,
            vector: encoded,
        };

        let start = Instant::now();
        let result = self.store.append(document.clone());
        record(PipelineStage::Append, start.elapsed(), result.is_ok());
        let handle = result?;

        tracing::info!(
            filename,
            title = %document.title,
            index = handle.index(),
            "document ingested"
        );
        Ok(document)
    }

    /// Embed a query string and rank all stored documents against it.
    ///
    /// The query vector is passed through the codec (encode, then decode)
    /// so query and stored vectors share the same quantization grid.
    pub async fn search(
        &self,
        query_text: &str,
    ) -> Result<Vec<SearchResult<Document>>, PipelineError> {
        let raw = self.embed(query_text).await?;
        let query = codec::decode(&codec::encode(&raw)?);

        let start = Instant::now();
        let result = self.store.search(&query);
        record(PipelineStage::Search, start.elapsed(), result.is_ok());
        let results = result?;

        tracing::debug!(hits = results.len(), "search completed");
        Ok(results)
    }

    async fn embed(&self, text: &str) -> Result<Vec<f64>, PipelineError> {
        let start = Instant::now();
        let result = self.providers.embedder.embed(text).await;
        record(PipelineStage::Embed, start.elapsed(), result.is_ok());
        let raw = result.map_err(PipelineError::EmbeddingFailed)?;

        // The provider's configured dimensionality is the process-wide
        // contract; a divergent vector must never reach the codec or store.
        let want = self.providers.embedder.dimension();
        if raw.len() != want {
            return Err(PipelineError::EmbeddingFailed(
                providers::ProviderError::BadReply(format!(
                    "embedding has {} components, provider is configured for {want}",
                    raw.len()
                )),
            ));
        }
        Ok(raw)
    }
}

/// Truncate to at most `max_chars` characters on a char boundary.
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 3), "hel");
        // Multi-byte chars count as one.
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("", 4), "");
    }

    #[test]
    fn embedding_input_joins_title_abstract_keywords() {
        let meta = PaperMetadata {
            title: "Title".into(),
            authors: "Nobody".into(),
            abstract_: "Abstract".into(),
            keywords: vec!["k1".into(), "k2".into()],
        };
        assert_eq!(
            IngestPipeline::embedding_input(&meta),
            "Title Abstract k1 k2"
        );
    }
}
