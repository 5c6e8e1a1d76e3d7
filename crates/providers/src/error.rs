use thiserror::Error;

/// Errors surfaced by provider implementations.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Configuration is inconsistent (e.g. HTTP mode without an endpoint).
    #[error("invalid provider config: {0}")]
    InvalidConfig(String),
    /// The HTTP request itself failed (connect, timeout, TLS, body read).
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The service answered with a non-success status.
    #[error("unexpected status {status} from {endpoint}: {body}")]
    BadStatus {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// The service answered 2xx but the body is not the expected shape.
    #[error("malformed provider reply: {0}")]
    BadReply(String),
    /// The metadata extractor's reply could not be parsed into the four
    /// required fields.
    #[error("malformed metadata reply: {0}")]
    MalformedReply(String),
}
