use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::api::{HttpEmbedder, HttpMetadataExtractor, HttpTextExtractor, HttpUploader};
use crate::stub::{StubEmbedder, StubMetadataExtractor, StubTextExtractor, StubUploader};
use crate::{ContentUploader, Embedder, MetadataExtractor, ProviderError, TextExtractor};

/// Selects how the external collaborators are reached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderMode {
    /// Real services over HTTP.
    Http,
    /// Deterministic in-process stubs. The default, so a bare config runs
    /// hermetically.
    #[default]
    Stub,
}

/// Configuration for all four provider seams.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub mode: ProviderMode,

    /// Text-extraction service endpoint (HTTP mode).
    #[serde(default)]
    pub extraction_url: Option<String>,

    /// OpenAI-style chat-completions endpoint for metadata extraction
    /// (HTTP mode).
    #[serde(default)]
    pub chat_url: Option<String>,

    /// Model name sent to the chat endpoint.
    #[serde(default = "default_chat_model")]
    pub chat_model: String,

    /// OpenAI-style embeddings endpoint (HTTP mode).
    #[serde(default)]
    pub embeddings_url: Option<String>,

    /// Model name sent to the embeddings endpoint.
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Output dimensionality of the embedding provider. Fixed at process
    /// start; every stored vector has exactly this length.
    #[serde(default = "default_embedding_dim")]
    pub embedding_dim: usize,

    /// Bearer token for the chat and embeddings endpoints.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Content-addressable upload endpoint (HTTP mode).
    #[serde(default)]
    pub upload_url: Option<String>,

    /// Gateway prefix the returned CID is joined onto.
    #[serde(default = "default_gateway_url")]
    pub gateway_url: String,

    /// Per-request timeout for provider calls.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            mode: ProviderMode::default(),
            extraction_url: None,
            chat_url: None,
            chat_model: default_chat_model(),
            embeddings_url: None,
            embedding_model: default_embedding_model(),
            embedding_dim: default_embedding_dim(),
            api_key: None,
            upload_url: None,
            gateway_url: default_gateway_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// The four wired provider handles the ingestion pipeline owns.
#[derive(Clone)]
pub struct ProviderSet {
    pub text: Arc<dyn TextExtractor>,
    pub metadata: Arc<dyn MetadataExtractor>,
    pub embedder: Arc<dyn Embedder>,
    pub uploader: Arc<dyn ContentUploader>,
}

impl std::fmt::Debug for ProviderSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSet").finish_non_exhaustive()
    }
}

impl ProviderConfig {
    /// Wire the configured provider implementations.
    ///
    /// HTTP mode requires every endpoint to be present; a missing one is an
    /// [`ProviderError::InvalidConfig`] at startup rather than a surprise on
    /// the first request.
    pub fn build(&self) -> Result<ProviderSet, ProviderError> {
        if self.embedding_dim == 0 {
            return Err(ProviderError::InvalidConfig(
                "embedding_dim must be non-zero".into(),
            ));
        }
        match self.mode {
            ProviderMode::Stub => Ok(ProviderSet {
                text: Arc::new(StubTextExtractor),
                metadata: Arc::new(StubMetadataExtractor),
                embedder: Arc::new(StubEmbedder::new(self.embedding_dim)),
                uploader: Arc::new(StubUploader::new(self.gateway_url.clone())),
            }),
            ProviderMode::Http => {
                let extraction_url = self.require("extraction_url", &self.extraction_url)?;
                let chat_url = self.require("chat_url", &self.chat_url)?;
                let embeddings_url = self.require("embeddings_url", &self.embeddings_url)?;
                let upload_url = self.require("upload_url", &self.upload_url)?;

                Ok(ProviderSet {
                    text: Arc::new(HttpTextExtractor::new(
                        extraction_url,
                        self.api_key.clone(),
                        self.timeout_secs,
                    )),
                    metadata: Arc::new(HttpMetadataExtractor::new(
                        chat_url,
                        self.chat_model.clone(),
                        self.api_key.clone(),
                        self.timeout_secs,
                    )),
                    embedder: Arc::new(HttpEmbedder::new(
                        embeddings_url,
                        self.embedding_model.clone(),
                        self.embedding_dim,
                        self.api_key.clone(),
                        self.timeout_secs,
                    )),
                    uploader: Arc::new(HttpUploader::new(
                        upload_url,
                        self.gateway_url.clone(),
                        self.api_key.clone(),
                        self.timeout_secs,
                    )),
                })
            }
        }
    }

    fn require(&self, name: &str, value: &Option<String>) -> Result<String, ProviderError> {
        value.clone().ok_or_else(|| {
            ProviderError::InvalidConfig(format!("{name} is required in http mode"))
        })
    }
}

fn default_chat_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-ada-002".to_string()
}

fn default_embedding_dim() -> usize {
    1536
}

fn default_gateway_url() -> String {
    "https://w3s.link/ipfs".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}
