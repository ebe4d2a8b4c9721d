//! Vision client error types.

use thiserror::Error;

/// Result type for vision operations.
pub type VisionResult<T> = Result<T, VisionError>;

/// Errors that can occur when talking to the vision endpoint.
#[derive(Debug, Error)]
pub enum VisionError {
    /// The endpoint URL is invalid.
    #[error("invalid vision endpoint URL: {0}")]
    InvalidUrl(String),
    /// HTTP layer failed (connection, timeout, etc.).
    #[error("vision HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The endpoint answered with a non-success status.
    #[error("vision endpoint returned {code}: {body}")]
    Status {
        /// HTTP status code.
        code: u16,
        /// Response body, for diagnostics.
        body: String,
    },
    /// The per-image response carried an error object.
    #[error("vision API error {code}: {message}")]
    Api {
        /// Error code reported by the API.
        code: i32,
        /// Human readable error message.
        message: String,
    },
    /// JSON parsing failed.
    #[error("failed to parse vision payload: {0}")]
    Json(#[from] serde_json::Error),
    /// Reading the image file failed.
    #[error("failed to read image: {0}")]
    Io(#[from] std::io::Error),
    /// The response contained no per-image result.
    #[error("vision response contained no results")]
    EmptyResponse,
}

impl VisionError {
    /// Returns true if this error is retryable (transient HTTP failures).
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Http(_))
    }
}
