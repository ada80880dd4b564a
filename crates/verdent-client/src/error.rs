//! Error types for Verdent client operations

use thiserror::Error;

/// Result type alias for Verdent client operations
pub type Result<T> = std::result::Result<T, VerdentClientError>;

/// Errors that can occur during Verdent client operations
#[derive(Error, Debug)]
pub enum VerdentClientError {
    /// HTTP request failed (connect, timeout, or body decode)
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Server returned a non-2xx status
    #[error("Server error {status}: {message}")]
    ServerError { status: u16, message: String },

    /// Server returned 2xx but flagged an error in the envelope
    #[error("API error {code}: {message}")]
    ApiError { code: i64, message: String },

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Response body lacks a field the operation depends on
    #[error("Unexpected response shape: {0}")]
    ResponseShape(String),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Header value could not be encoded
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// Token is not a well-formed JWT
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl VerdentClientError {
    /// Create a server error from status code and message
    pub fn server_error(status: u16, message: impl Into<String>) -> Self {
        Self::ServerError {
            status,
            message: message.into(),
        }
    }

    /// Create a response shape error for a missing field
    pub fn response_shape(message: impl Into<String>) -> Self {
        Self::ResponseShape(message.into())
    }

    /// Network failure or non-2xx status.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::HttpError(_) | Self::ServerError { .. })
    }

    pub fn is_response_shape(&self) -> bool {
        matches!(self, Self::ResponseShape(_))
    }

    /// HTTP status code, if the server answered with one
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ServerError { status, .. } => Some(*status),
            Self::HttpError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
