//! The raster drawing canvas.
//!
//! [`RasterCanvas`] owns a square [`PixelBuffer`] and the active
//! [`PenState`], and rasterizes each stroke directly into the buffer.
//! External readers (renderers, background saves) take a [`Snapshot`]
//! instead of borrowing the live buffer.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use crate::raster::{fill_capsule, fill_disc, fill_square};
use crate::{CanvasError, CanvasEvent, CanvasResult, PenShape, PenState, PixelBuffer, Rgba};

/// Default canvas side length in pixels.
pub const DEFAULT_CANVAS_SIZE: u32 = 1000;

/// Callback invoked after every canvas change.
pub type OnChangeCallback = Box<dyn Fn(&CanvasEvent) + Send + Sync>;

/// A fixed-size drawing surface with a pen.
pub struct RasterCanvas {
    buffer: PixelBuffer,
    background: Rgba,
    pen: PenState,
    /// Last Line sample of the current gesture.
    cursor: Option<(f32, f32)>,
    revision: u64,
    on_change: Option<OnChangeCallback>,
}

impl RasterCanvas {
    /// Create a `size` x `size` canvas with a white background.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidSize`] if `size` is zero.
    pub fn new(size: u32) -> CanvasResult<Self> {
        Self::with_background(size, Rgba::WHITE)
    }

    /// Create a canvas filled with `background`.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidSize`] if `size` is zero.
    pub fn with_background(size: u32, background: Rgba) -> CanvasResult<Self> {
        let buffer = PixelBuffer::new(size, background)?;
        tracing::debug!("Created {size}x{size} canvas, background {background}");
        Ok(Self {
            buffer,
            background,
            pen: PenState::default(),
            cursor: None,
            revision: 0,
            on_change: None,
        })
    }

    /// Register the change callback, replacing any previous one.
    pub fn set_on_change<F>(&mut self, callback: F)
    where
        F: Fn(&CanvasEvent) + Send + Sync + 'static,
    {
        self.on_change = Some(Box::new(callback));
    }

    /// Remove the change callback.
    pub fn clear_on_change(&mut self) {
        self.on_change = None;
    }

    fn notify(&self, event: &CanvasEvent) {
        if let Some(ref callback) = self.on_change {
            callback(event);
        }
    }

    /// Side length in pixels.
    #[must_use]
    pub fn size(&self) -> u32 {
        self.buffer.size()
    }

    /// Background fill color.
    #[must_use]
    pub fn background(&self) -> Rgba {
        self.background
    }

    /// The active pen.
    #[must_use]
    pub fn pen(&self) -> PenState {
        self.pen
    }

    /// The last Line sample of the current gesture, if any.
    #[must_use]
    pub fn cursor(&self) -> Option<(f32, f32)> {
        self.cursor
    }

    /// Number of pixel-changing operations applied so far.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Borrow the live buffer. Only the owning thread should do this.
    #[must_use]
    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    /// Reset every pixel to the background color.
    pub fn clear(&mut self) {
        self.buffer.fill(self.background);
        self.revision += 1;
        tracing::debug!("Canvas cleared (revision {})", self.revision);
        self.notify(&CanvasEvent::Cleared {
            revision: self.revision,
        });
    }

    /// Replace the pixel content with `buffer`.
    ///
    /// The gesture cursor is reset so a Line stroke does not connect to a
    /// point on the previous drawing.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::SizeMismatch`] if the buffer has a different size.
    pub fn load(&mut self, buffer: PixelBuffer) -> CanvasResult<()> {
        if buffer.size() != self.size() {
            return Err(CanvasError::SizeMismatch {
                expected: self.size(),
                actual: buffer.size(),
            });
        }
        self.buffer = buffer;
        self.cursor = None;
        self.revision += 1;
        tracing::debug!("Canvas content replaced (revision {})", self.revision);
        self.notify(&CanvasEvent::Loaded {
            revision: self.revision,
        });
        Ok(())
    }

    /// Replace the whole pen.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidPenSize`] if the pen size is not positive and finite.
    pub fn set_pen(&mut self, pen: PenState) -> CanvasResult<()> {
        let pen = PenState::new(pen.color, pen.size, pen.shape)?;
        self.replace_pen(pen);
        Ok(())
    }

    /// Change the pen color.
    pub fn set_pen_color(&mut self, color: Rgba) {
        self.replace_pen(self.pen.with_color(color));
    }

    /// Change the pen size. The pen is left untouched on error.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidPenSize`] if `size` is not positive and finite.
    pub fn set_pen_size(&mut self, size: f32) -> CanvasResult<()> {
        let pen = self.pen.with_size(size)?;
        self.replace_pen(pen);
        Ok(())
    }

    /// Change the stamp shape for subsequent strokes.
    pub fn set_shape(&mut self, shape: PenShape) {
        self.replace_pen(self.pen.with_shape(shape));
    }

    fn replace_pen(&mut self, pen: PenState) {
        if pen == self.pen {
            return;
        }
        self.pen = pen;
        tracing::trace!("Pen changed: {:?}", pen);
        self.notify(&CanvasEvent::PenChanged { pen });
    }

    /// Apply one stroke at (x, y) with the current pen.
    ///
    /// Never fails: the portion of the mark outside the canvas is clipped,
    /// and a non-finite coordinate is dropped without touching the cursor.
    pub fn stroke_at(&mut self, x: f32, y: f32) {
        if !x.is_finite() || !y.is_finite() {
            tracing::trace!("Dropping non-finite stroke sample ({x}, {y})");
            return;
        }

        let pen = self.pen;
        let touched = match pen.shape {
            PenShape::Circle => fill_disc(&mut self.buffer, x, y, pen.size / 2.0, pen.color),
            PenShape::Square => fill_square(&mut self.buffer, x, y, pen.size, pen.color),
            PenShape::Line => {
                let from = self.cursor.unwrap_or((x, y));
                let rect = fill_capsule(&mut self.buffer, from, (x, y), pen.size, pen.color);
                self.cursor = Some((x, y));
                rect
            }
        };

        if let Some(rect) = touched {
            self.revision += 1;
            self.notify(&CanvasEvent::Stroked {
                rect,
                revision: self.revision,
            });
        }
    }

    /// End the current gesture: the next Line stroke starts a new polyline.
    ///
    /// Idempotent.
    pub fn end_stroke(&mut self) {
        self.cursor = None;
    }

    /// Take an immutable copy of the current pixels.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            buffer: Arc::new(self.buffer.clone()),
            revision: self.revision,
        }
    }

    /// Give up the canvas and keep its pixels.
    #[must_use]
    pub fn into_buffer(self) -> PixelBuffer {
        self.buffer
    }
}

impl fmt::Debug for RasterCanvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RasterCanvas")
            .field("size", &self.size())
            .field("background", &self.background)
            .field("pen", &self.pen)
            .field("cursor", &self.cursor)
            .field("revision", &self.revision)
            .field("on_change", &self.on_change.is_some())
            .finish()
    }
}

/// An immutable, shareable copy of a canvas' pixels.
///
/// Cloning is cheap; the pixels are shared. Safe to hand to another thread
/// while the canvas keeps drawing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    buffer: Arc<PixelBuffer>,
    revision: u64,
}

impl Snapshot {
    /// Wrap a standalone buffer (revision 0).
    #[must_use]
    pub fn from_buffer(buffer: PixelBuffer) -> Self {
        Self {
            buffer: Arc::new(buffer),
            revision: 0,
        }
    }

    /// Canvas revision the snapshot was taken at.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Take the pixels out, copying only if other clones are alive.
    #[must_use]
    pub fn into_buffer(self) -> PixelBuffer {
        Arc::try_unwrap(self.buffer).unwrap_or_else(|shared| (*shared).clone())
    }
}

impl Deref for Snapshot {
    type Target = PixelBuffer;

    fn deref(&self) -> &PixelBuffer {
        &self.buffer
    }
}
