//! Error types for the transport layer.

use thiserror::Error;

/// Errors that can occur during transport operations.
#[derive(Error, Debug, Clone)]
pub enum TransportError {
    /// The transport has been disposed; no further operations are possible.
    #[error("transport has been disposed")]
    Disposed,

    /// The operation was cancelled by the caller.
    ///
    /// Cancellation is a benign terminal state: the caller intentionally
    /// abandoned the operation, so this is never relayed through
    /// [`Connection::on_error`](crate::Connection::on_error).
    #[error("operation was cancelled")]
    Cancelled,

    /// HTTP request failed.
    #[error("HTTP request error: {0}")]
    Request(String),

    /// Connection refused or failed.
    #[error("connection error: {0}")]
    Connection(String),

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Invalid URL provided.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// HTTP error status (4xx or 5xx).
    #[error("HTTP {status}{}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    HttpStatus {
        /// The HTTP status code.
        status: u16,
        /// Optional error message from the response body.
        message: Option<String>,
    },

    /// Transport-specific handshake failure reported through the start hook.
    #[error("handshake error: {0}")]
    Handshake(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Connection(err.to_string())
        } else {
            Self::Request(err.to_string())
        }
    }
}

impl From<url::ParseError> for TransportError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}

/// A specialized Result type for transport operations.
pub type Result<T> = std::result::Result<T, TransportError>;
