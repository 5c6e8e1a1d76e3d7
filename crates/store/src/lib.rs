//! # Document Store
//!
//! An append-only, in-memory collection of ingested papers with ranked
//! similarity search. The store is volatile: its lifecycle is tied to the
//! owning process, and there is no update or delete.
//!
//! Concurrency model: appends take the write lock only for the insert
//! itself; searches copy a snapshot under the read lock and score it after
//! the lock is released, so a search never blocks appends for longer than
//! the snapshot copy. No partial document is ever visible.

mod document;

pub use document::{Document, DocumentHandle};

use std::sync::RwLock;

use similarity::{SearchResult, SimilarityError};
use thiserror::Error;

/// Errors surfaced by the store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A document's vector length diverges from the store's established
    /// dimensionality. This means the embedding provider is misconfigured
    /// and should be treated as fatal by the process, not retried.
    #[error("vector length mismatch: store holds {expected}-byte vectors, got {got}")]
    VectorLengthMismatch { expected: usize, got: usize },
    #[error(transparent)]
    Similarity(#[from] SimilarityError),
}

/// Append-only store of ingested papers.
///
/// The first appended document fixes the vector dimensionality; every later
/// append is validated against it under the same write lock, so the check
/// and the insert are atomic.
#[derive(Debug, Default)]
pub struct PaperStore {
    papers: RwLock<Vec<Document>>,
}

impl PaperStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a document and return its handle.
    ///
    /// Fails only with [`StoreError::VectorLengthMismatch`] when the vector
    /// length diverges from the first-ever inserted vector's length.
    pub fn append(&self, doc: Document) -> Result<DocumentHandle, StoreError> {
        // The write lock is held for the validation and the insert.
        let mut papers = self
            .papers
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(first) = papers.first() {
            if first.vector.len() != doc.vector.len() {
                return Err(StoreError::VectorLengthMismatch {
                    expected: first.vector.len(),
                    got: doc.vector.len(),
                });
            }
        }
        papers.push(doc);
        let handle = DocumentHandle::new(papers.len() - 1);
        tracing::debug!(index = handle.index(), total = papers.len(), "document appended");
        Ok(handle)
    }

    /// Snapshot of all stored documents in insertion order, reflecting every
    /// append that completed before this call.
    pub fn all_documents(&self) -> Vec<Document> {
        self.papers
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.papers
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rank all stored documents against `query`, descending by cosine
    /// similarity. An empty store yields an empty result, not an error.
    ///
    /// Scoring runs on a snapshot outside the lock.
    pub fn search(
        &self,
        query: &[f64],
    ) -> Result<Vec<SearchResult<Document>>, StoreError> {
        let snapshot = self.all_documents();
        if snapshot.is_empty() {
            return Ok(Vec::new());
        }
        let candidates = snapshot.into_iter().map(|doc| {
            let vector = doc.vector.clone();
            (doc, vector)
        });
        Ok(similarity::rank_by_similarity(query, candidates)?)
    }
}
