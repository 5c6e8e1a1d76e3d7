//! HTTP implementations of the provider seams.
//!
//! All clients share one pooled [`reqwest::Client`]; per-call timeouts come
//! from [`ProviderConfig`](crate::ProviderConfig). Reply decoding is split
//! into pure helpers so the shapes can be tested without a live service.

use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use serde_json::{json, Value};

use crate::metadata::parse_metadata_reply;
use crate::{ContentUploader, Embedder, MetadataExtractor, PaperMetadata, ProviderError, TextExtractor};

// Shared HTTP client with connection pooling. The per-request timeout is
// applied on top of the connect timeout configured here.
static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(|| {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(16)
        .build()
        .expect("failed to build HTTP client")
});

const EXTRACTION_SYSTEM_PROMPT: &str = "You are an assistant that extracts information from \
academic papers. Format your response exactly as shown in the example, with hexadecimal \
encoding for the title and authors when they contain non-ASCII characters.";

fn extraction_user_prompt(text: &str) -> String {
    format!(
        r#"Extract the following information from the given text:
1. Title (hexadecimal encoded if it contains non-ASCII characters, otherwise plain text)
2. Authors (hexadecimal encoded if it contains non-ASCII characters, otherwise plain text)
3. Abstract (plain text)
4. 5 keywords (as an array of strings)

Format your response exactly like this:
{{
  title: "Paper Title Here" or hex if you have to,
  authors: "Author Names Here" or hex if you have to,
  abstract: "Abstract text here (not hexadecimal encoded)",
  keywords: [
    "keyword1",
    "keyword2",
    "keyword3",
    "keyword4",
    "keyword5"
  ]
}}

Text to extract from:
{text}"#
    )
}

async fn post_json(
    endpoint: &str,
    api_key: Option<&str>,
    timeout_secs: u64,
    payload: Value,
) -> Result<Value, ProviderError> {
    let mut request = HTTP_CLIENT
        .post(endpoint)
        .timeout(Duration::from_secs(timeout_secs))
        .json(&payload);
    if let Some(key) = api_key {
        request = request.bearer_auth(key);
    }

    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderError::BadStatus {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            body,
        });
    }
    Ok(response.json().await?)
}

async fn post_bytes(
    endpoint: &str,
    api_key: Option<&str>,
    timeout_secs: u64,
    query: &[(&str, &str)],
    bytes: Vec<u8>,
) -> Result<Value, ProviderError> {
    let mut request = HTTP_CLIENT
        .post(endpoint)
        .timeout(Duration::from_secs(timeout_secs))
        .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
        .body(bytes);
    if !query.is_empty() {
        request = request.query(query);
    }
    if let Some(key) = api_key {
        request = request.bearer_auth(key);
    }

    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderError::BadStatus {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            body,
        });
    }
    Ok(response.json().await?)
}

/// Extraction-service client: posts raw document bytes, expects
/// `{"text": "..."}` back.
pub struct HttpTextExtractor {
    url: String,
    api_key: Option<String>,
    timeout_secs: u64,
}

impl HttpTextExtractor {
    pub fn new(url: String, api_key: Option<String>, timeout_secs: u64) -> Self {
        Self {
            url,
            api_key,
            timeout_secs,
        }
    }
}

#[async_trait]
impl TextExtractor for HttpTextExtractor {
    async fn extract_text(&self, file_bytes: &[u8]) -> Result<String, ProviderError> {
        let reply = post_bytes(
            &self.url,
            self.api_key.as_deref(),
            self.timeout_secs,
            &[],
            file_bytes.to_vec(),
        )
        .await?;
        text_from_extraction_reply(&reply)
    }
}

fn text_from_extraction_reply(reply: &Value) -> Result<String, ProviderError> {
    reply
        .get("text")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ProviderError::BadReply("extraction reply has no `text` field".into()))
}

/// Chat-completions client running the reference extraction prompt, then the
/// structured reply parser.
pub struct HttpMetadataExtractor {
    url: String,
    model: String,
    api_key: Option<String>,
    timeout_secs: u64,
}

impl HttpMetadataExtractor {
    pub fn new(url: String, model: String, api_key: Option<String>, timeout_secs: u64) -> Self {
        Self {
            url,
            model,
            api_key,
            timeout_secs,
        }
    }
}

fn chat_payload(model: &str, text: &str) -> Value {
    json!({
        "model": model,
        "messages": [
            {"role": "system", "content": EXTRACTION_SYSTEM_PROMPT},
            {"role": "user", "content": extraction_user_prompt(text)},
        ],
        "temperature": 0.3,
        "max_tokens": 1000,
    })
}

fn content_from_chat_reply(reply: &Value) -> Result<&str, ProviderError> {
    reply
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .ok_or_else(|| ProviderError::BadReply("chat reply has no message content".into()))
}

#[async_trait]
impl MetadataExtractor for HttpMetadataExtractor {
    async fn extract_metadata(&self, text: &str) -> Result<PaperMetadata, ProviderError> {
        let reply = post_json(
            &self.url,
            self.api_key.as_deref(),
            self.timeout_secs,
            chat_payload(&self.model, text),
        )
        .await?;
        let content = content_from_chat_reply(&reply)?;
        tracing::debug!(reply_chars = content.len(), "metadata reply received");
        parse_metadata_reply(content)
    }
}

/// Embeddings-endpoint client. The returned vector length is validated
/// against the configured dimensionality, so a misconfigured provider fails
/// loudly on the first call.
pub struct HttpEmbedder {
    url: String,
    model: String,
    dimension: usize,
    api_key: Option<String>,
    timeout_secs: u64,
}

impl HttpEmbedder {
    pub fn new(
        url: String,
        model: String,
        dimension: usize,
        api_key: Option<String>,
        timeout_secs: u64,
    ) -> Self {
        Self {
            url,
            model,
            dimension,
            api_key,
            timeout_secs,
        }
    }
}

fn embedding_from_reply(reply: &Value, want_dim: usize) -> Result<Vec<f64>, ProviderError> {
    let values = reply
        .pointer("/data/0/embedding")
        .and_then(Value::as_array)
        .ok_or_else(|| ProviderError::BadReply("embeddings reply has no vector".into()))?;
    let vector: Vec<f64> = values
        .iter()
        .map(|v| {
            v.as_f64()
                .ok_or_else(|| ProviderError::BadReply("non-numeric embedding component".into()))
        })
        .collect::<Result<_, _>>()?;
    if vector.len() != want_dim {
        return Err(ProviderError::BadReply(format!(
            "embedding has {} components, provider is configured for {}",
            vector.len(),
            want_dim
        )));
    }
    Ok(vector)
}

#[async_trait]
impl Embedder for HttpEmbedder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> Result<Vec<f64>, ProviderError> {
        let reply = post_json(
            &self.url,
            self.api_key.as_deref(),
            self.timeout_secs,
            json!({"model": self.model, "input": text}),
        )
        .await?;
        embedding_from_reply(&reply, self.dimension)
    }
}

/// Content-addressable upload client: posts the raw bytes, expects a CID
/// back, and joins it onto the gateway prefix.
pub struct HttpUploader {
    url: String,
    gateway: String,
    api_key: Option<String>,
    timeout_secs: u64,
}

impl HttpUploader {
    pub fn new(url: String, gateway: String, api_key: Option<String>, timeout_secs: u64) -> Self {
        Self {
            url,
            gateway,
            api_key,
            timeout_secs,
        }
    }
}

fn uri_from_upload_reply(reply: &Value, gateway: &str) -> Result<String, ProviderError> {
    let cid = reply
        .get("cid")
        .or_else(|| reply.get("Hash"))
        .and_then(Value::as_str)
        .filter(|cid| !cid.is_empty())
        .ok_or_else(|| ProviderError::BadReply("upload reply has no cid".into()))?;
    Ok(format!("{}/{}", gateway.trim_end_matches('/'), cid))
}

#[async_trait]
impl ContentUploader for HttpUploader {
    async fn upload(&self, file_bytes: &[u8], filename: &str) -> Result<String, ProviderError> {
        let reply = post_bytes(
            &self.url,
            self.api_key.as_deref(),
            self.timeout_secs,
            &[("filename", filename)],
            file_bytes.to_vec(),
        )
        .await?;
        uri_from_upload_reply(&reply, &self.gateway)
    }
}
