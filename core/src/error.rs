//! Error types for the Stilla configuration client.
//!
//! # Design
//! Every failure a caller can observe is a `ConfigError`. Transport-level
//! failures are classified into a handful of variants whose `Display` text is
//! the message callers already match on (`"connection timeout"`,
//! `"configuration not found"`, ...). Anything that does not fit a named
//! variant lands in `Unknown` with the underlying description.

use thiserror::Error;

/// Errors returned by `ConfigClient` and `ClientConfig` constructors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// An argument failed validation before any network call was made.
    #[error("{0}")]
    InvalidArgument(String),

    /// The server signaled an HTTP error without a JSON body.
    #[error("configuration not found")]
    NotFound,

    /// The transport gave up waiting for the server.
    #[error("connection timeout")]
    Timeout,

    /// The transport could not reach the server.
    #[error("connection error")]
    ConnectionError,

    /// The requested entry is missing from the configuration document.
    #[error("invalid key. value not found.")]
    ValueNotFound,

    /// Any other failure, carrying its description.
    #[error("{0}")]
    Unknown(String),
}

impl ConfigError {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// True for failures raised locally, before a request left the process.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}

/// Failures reported by a `Transport` while executing a request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connection(String),

    /// The transport itself rejected the response status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("{0}")]
    Other(String),
}

impl From<TransportError> for ConfigError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Timeout => ConfigError::Timeout,
            TransportError::Connection(_) => ConfigError::ConnectionError,
            TransportError::Status { .. } => ConfigError::NotFound,
            TransportError::Other(msg) => ConfigError::Unknown(msg),
        }
    }
}
