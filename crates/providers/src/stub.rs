//! Deterministic in-process stand-ins for the external services.
//!
//! The stubs make the whole pipeline runnable hermetically: same input
//! bytes, same document out, every time. They are the default providers so
//! a bare config never reaches for the network.

use async_trait::async_trait;
use fxhash::hash64;
use sha2::{Digest, Sha256};

use crate::{ContentUploader, Embedder, MetadataExtractor, PaperMetadata, ProviderError, TextExtractor};

/// Treats the uploaded bytes as UTF-8 text (lossy on invalid sequences).
pub struct StubTextExtractor;

#[async_trait]
impl TextExtractor for StubTextExtractor {
    async fn extract_text(&self, file_bytes: &[u8]) -> Result<String, ProviderError> {
        Ok(String::from_utf8_lossy(file_bytes).into_owned())
    }
}

/// Derives metadata mechanically from the text: first line becomes the
/// title, second line the authors, leading text the abstract, and the first
/// five distinct long-ish words the keywords.
pub struct StubMetadataExtractor;

const STUB_ABSTRACT_CHARS: usize = 240;
const STUB_KEYWORD_COUNT: usize = 5;
const STUB_KEYWORD_MIN_LEN: usize = 4;

#[async_trait]
impl MetadataExtractor for StubMetadataExtractor {
    async fn extract_metadata(&self, text: &str) -> Result<PaperMetadata, ProviderError> {
        let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());
        let title = lines
            .next()
            .ok_or_else(|| {
                ProviderError::MalformedReply("text has no extractable content".into())
            })?
            .to_string();
        let authors = lines.next().unwrap_or("Unknown").to_string();

        let abstract_: String = text
            .chars()
            .filter(|c| *c != '\n' && *c != '\r')
            .take(STUB_ABSTRACT_CHARS)
            .collect();

        let mut keywords: Vec<String> = Vec::new();
        for word in text.split_whitespace() {
            let word: String = word
                .chars()
                .filter(|c| c.is_alphabetic())
                .collect::<String>()
                .to_lowercase();
            if word.chars().count() >= STUB_KEYWORD_MIN_LEN && !keywords.contains(&word) {
                keywords.push(word);
            }
            if keywords.len() == STUB_KEYWORD_COUNT {
                break;
            }
        }
        if keywords.is_empty() {
            return Err(ProviderError::MalformedReply(
                "text has no extractable keywords".into(),
            ));
        }

        Ok(PaperMetadata {
            title,
            authors,
            abstract_,
            keywords,
        })
    }
}

/// Hash-seeded sinusoid embedding with components in `[0, 1]`. Same text,
/// same vector.
pub struct StubEmbedder {
    dimension: usize,
}

impl StubEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

#[async_trait]
impl Embedder for StubEmbedder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> Result<Vec<f64>, ProviderError> {
        let seed = hash64(text.as_bytes());
        let mut vector = vec![0f64; self.dimension];
        for (idx, value) in vector.iter_mut().enumerate() {
            let phase = ((seed >> (idx % 32)) as u32 as f64) * 1e-4 + idx as f64 * 0.1;
            *value = 0.5 + 0.5 * phase.sin();
        }
        Ok(vector)
    }
}

/// Content-derived pseudo-URI: the SHA-256 digest of the bytes joined onto
/// the gateway prefix, mirroring what a content-addressable store returns.
pub struct StubUploader {
    gateway: String,
}

impl StubUploader {
    pub fn new(gateway: String) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl ContentUploader for StubUploader {
    async fn upload(&self, file_bytes: &[u8], _filename: &str) -> Result<String, ProviderError> {
        let mut hasher = Sha256::new();
        hasher.update(file_bytes);
        let digest = hex::encode(hasher.finalize());
        Ok(format!("{}/{}", self.gateway.trim_end_matches('/'), digest))
    }
}
