//! Store error types.

use drawpad_renderer::RenderError;
use thiserror::Error;

use crate::DrawingId;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An I/O error occurred while reading or writing drawings.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The catalog file could not be serialized or parsed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// No catalog row has the requested id.
    #[error("Drawing not found: {0}")]
    NotFound(DrawingId),

    /// A row id leaves no room for the next id.
    #[error("Drawing id {0} leaves no id to assign")]
    IdOverflow(DrawingId),

    /// Encoding or decoding the image failed.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// A background save task panicked or was cancelled.
    #[error("Background task failed: {0}")]
    Task(String),
}
