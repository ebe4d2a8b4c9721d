//! Boundary to whatever stores drawings on disk.

use std::path::{Path, PathBuf};

use crate::{CanvasResult, PixelBuffer, Rgba};

/// Saves canvas pixels as image files and loads them back.
pub trait DrawingPersistence {
    /// Error produced when saving fails.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Encode `buffer` under a user-facing `file_name` and return the path written.
    ///
    /// # Errors
    ///
    /// Returns an implementation-defined error if encoding or writing fails.
    fn save(&self, buffer: &PixelBuffer, file_name: &str) -> Result<PathBuf, Self::Error>;

    /// Decode a stored drawing. `None` if it is missing or unreadable.
    fn load(&self, path: &Path) -> Option<PixelBuffer>;
}

/// Load `path` for a `size` canvas, or produce a blank buffer.
///
/// No path, a missing or undecodable file, and a stored image of the wrong
/// size all yield a buffer filled with `background`.
///
/// # Errors
///
/// Returns [`CanvasError::InvalidSize`](crate::CanvasError::InvalidSize) if `size` is zero.
pub fn open_or_blank<P>(
    persistence: &P,
    path: Option<&Path>,
    size: u32,
    background: Rgba,
) -> CanvasResult<PixelBuffer>
where
    P: DrawingPersistence + ?Sized,
{
    let Some(path) = path else {
        return PixelBuffer::new(size, background);
    };

    match persistence.load(path) {
        Some(buffer) if buffer.size() == size => Ok(buffer),
        Some(buffer) => {
            tracing::warn!(
                "Stored drawing {} is {}px, expected {size}px; starting blank",
                path.display(),
                buffer.size()
            );
            PixelBuffer::new(size, background)
        }
        None => {
            tracing::debug!("No readable drawing at {}; starting blank", path.display());
            PixelBuffer::new(size, background)
        }
    }
}
