//! Error types for canvas operations.

use thiserror::Error;

/// Result type for canvas operations.
pub type CanvasResult<T> = Result<T, CanvasError>;

/// Errors that can occur in canvas operations.
#[derive(Debug, Error)]
pub enum CanvasError {
    /// Canvas dimensions are zero or cannot be allocated.
    #[error("Invalid canvas size: {0}")]
    InvalidSize(u32),

    /// Pen size is not a positive, finite number.
    #[error("Invalid pen size: {0}")]
    InvalidPenSize(f32),

    /// A replacement buffer does not match the canvas dimensions.
    #[error("Buffer size mismatch: canvas is {expected}px, buffer is {actual}px")]
    SizeMismatch {
        /// Side length of the canvas.
        expected: u32,
        /// Side length of the offered buffer.
        actual: u32,
    },

    /// Color string could not be parsed.
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// Pen shape name is not circle, square or line.
    #[error("Unknown pen shape '{0}' (expected circle, square or line)")]
    InvalidShape(String),

    /// Raw pixel data does not describe a square buffer.
    #[error("Invalid pixel data: {0}")]
    InvalidPixelData(String),

    /// Stroke script serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
