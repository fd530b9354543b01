use thiserror::Error;

/// Every failure a request can end in, whatever layer produced it.
///
/// Provider errors (reqwest, serde_json) are flattened into strings here so they
/// never cross the crate boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportCause {
    #[error("failed to build the request: {0}")]
    Build(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out")]
    Timeout,

    #[error("server answered with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to serialize the request body: {0}")]
    Serialization(String),

    #[error("failed to deserialize the response: {0}")]
    Deserialization(String),
}

impl From<reqwest::Error> for TransportCause {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportCause::Timeout
        } else if err.is_builder() {
            TransportCause::Build(err.to_string())
        } else if err.is_decode() {
            TransportCause::Deserialization(err.to_string())
        } else {
            TransportCause::Network(err.to_string())
        }
    }
}

/// The single error shape surfaced by the transport.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Failed to fetch from {path}: {cause}")]
pub struct TransportError {
    pub path: String,
    pub cause: TransportCause,
}

impl TransportError {
    /// Builds the error and emits the diagnostic log entry for it.
    pub fn logged(path: impl Into<String>, cause: TransportCause) -> Self {
        let path = path.into();
        tracing::error!(path = %path, error = %cause, "Request to evaluator failed.");
        Self { path, cause }
    }
}
