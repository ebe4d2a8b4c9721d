//! Aspect-preserving placement of arbitrary images on the square canvas.

use drawpad_core::{PixelBuffer, Rgba};
use image::imageops::{self, FilterType};
use image::RgbaImage;

use crate::error::{RenderError, RenderResult};

/// Where a scaled source lands inside a `target x target` canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitPlacement {
    /// Left margin in pixels.
    pub left: u32,
    /// Top margin in pixels.
    pub top: u32,
    /// Scaled source width.
    pub width: u32,
    /// Scaled source height.
    pub height: u32,
}

impl FitPlacement {
    /// Compute the placement for a `source_width x source_height` image.
    ///
    /// Returns `None` if any dimension is zero.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn new(source_width: u32, source_height: u32, target: u32) -> Option<Self> {
        if source_width == 0 || source_height == 0 || target == 0 {
            return None;
        }

        let (sw, sh, t) = (
            f64::from(source_width),
            f64::from(source_height),
            f64::from(target),
        );
        let scale = (t / sw).min(t / sh);
        let scaled = |len: f64| ((len * scale).round() as u32).clamp(1, target);

        let width = scaled(sw);
        let height = scaled(sh);
        Some(Self {
            left: (target - width) / 2,
            top: (target - height) / 2,
            width,
            height,
        })
    }
}

/// Scale `source` to fit a `target x target` canvas without distortion.
///
/// The source is resampled bilinearly, centred, and composited over a canvas
/// filled with `background`; the letterbox margins stay `background`.
///
/// # Errors
///
/// Returns [`RenderError::InvalidData`] for an empty source and
/// [`RenderError::Canvas`] if `target` is zero.
pub fn fit(source: &RgbaImage, target: u32, background: Rgba) -> RenderResult<PixelBuffer> {
    let mut canvas = PixelBuffer::new(target, background)?;
    let (sw, sh) = source.dimensions();
    let placement = FitPlacement::new(sw, sh, target)
        .ok_or_else(|| RenderError::InvalidData(format!("cannot fit a {sw}x{sh} image")))?;

    let resized = imageops::resize(
        source,
        placement.width,
        placement.height,
        FilterType::Triangle,
    );

    for (x, y, pixel) in resized.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        canvas.blend_pixel(
            i64::from(placement.left + x),
            i64::from(placement.top + y),
            Rgba::new(r, g, b, a),
            1.0,
        );
    }

    tracing::debug!(
        "Fitted {sw}x{sh} image into {target}px canvas at ({}, {}) as {}x{}",
        placement.left,
        placement.top,
        placement.width,
        placement.height
    );
    Ok(canvas)
}

/// [`fit`] the source if there is one, otherwise return a blank canvas.
///
/// An absent or empty source gives a `target x target` buffer filled with
/// `background`.
///
/// # Errors
///
/// Returns [`RenderError::Canvas`] if `target` is zero.
pub fn fit_or_blank(
    source: Option<&RgbaImage>,
    target: u32,
    background: Rgba,
) -> RenderResult<PixelBuffer> {
    match source {
        Some(image) if image.width() > 0 && image.height() > 0 => fit(image, target, background),
        _ => {
            tracing::debug!("No source image; starting with a blank {target}px canvas");
            Ok(PixelBuffer::new(target, background)?)
        }
    }
}
