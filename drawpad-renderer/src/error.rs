//! Renderer error types.

use drawpad_core::CanvasError;
use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur while decoding, fitting or encoding images.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Image bytes could not be decoded.
    #[error("Failed to decode image: {0}")]
    Decode(String),

    /// Pixels could not be encoded to the requested format.
    #[error("Failed to encode image: {0}")]
    Encode(String),

    /// Reading or writing an image file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Input was structurally invalid (bad data URI, non-square image, ...).
    #[error("Invalid image data: {0}")]
    InvalidData(String),

    /// The canvas rejected the pixels.
    #[error(transparent)]
    Canvas(#[from] CanvasError),
}
