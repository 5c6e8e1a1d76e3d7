use codec::EncodedVector;
use serde::{Deserialize, Serialize};

/// The unit of storage: metadata extracted from a paper, the locator of the
/// uploaded artifact, and the quantized embedding fingerprint.
///
/// Created once by the ingestion pipeline after every external call has
/// succeeded; immutable thereafter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub title: String,
    pub authors: String,
    #[serde(rename = "abstract")]
    pub abstract_: String,
    /// Ordered keywords from the extraction contract. The reference
    /// extractor asks for five, but nothing here depends on the count.
    pub keywords: Vec<String>,
    /// External content-addressable locator; required, non-empty.
    pub content_uri: String,
    /// Quantized embedding, one byte per dimension. Serializes as the
    /// `0x`-prefixed hex wire string.
    pub vector: EncodedVector,
}

/// Position of a document in the append-only store.
///
/// The store never removes entries, so the index is stable for the life of
/// the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentHandle(usize);

impl DocumentHandle {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}
