//! Drawing export to PNG and JPEG.
//!
//! Encodes a [`PixelBuffer`] for the drawing catalog, for sharing with other
//! apps, and as small thumbnails for drawing lists.

use std::path::Path;

use drawpad_core::{PixelBuffer, Rgba};
use image::{ExtendedColorType, ImageEncoder, RgbaImage};

use crate::error::{RenderError, RenderResult};
use crate::image::{buffer_to_image, ImageFormat};

/// Export output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// PNG image, lossless with alpha.
    Png,
    /// JPEG image; alpha is flattened over the configured background.
    Jpeg,
}

impl ExportFormat {
    /// Pick a format from a file extension. `None` for anything else.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ImageFormat::from_extension(ext) {
            ImageFormat::Png => Some(Self::Png),
            ImageFormat::Jpeg => Some(Self::Jpeg),
            ImageFormat::WebP | ImageFormat::Unknown => None,
        }
    }

    /// Pick a format from a path's extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Canonical file extension.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }

    /// MIME type of the encoded bytes.
    #[must_use]
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }
}

/// Configuration for drawing export.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Color that transparent pixels are flattened onto for JPEG.
    pub background: Rgba,
    /// JPEG quality 1-100 (default: 85).
    pub jpeg_quality: u8,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            background: Rgba::WHITE,
            jpeg_quality: 85,
        }
    }
}

/// Encodes canvas pixels to image files.
#[derive(Debug, Clone, Default)]
pub struct BufferExporter {
    config: ExportConfig,
}

impl BufferExporter {
    /// Create a new exporter with the given configuration.
    #[must_use]
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    /// Create an exporter with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(ExportConfig::default())
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Encode `buffer` in `format`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Encode`] if the encoder fails.
    pub fn export(&self, buffer: &PixelBuffer, format: ExportFormat) -> RenderResult<Vec<u8>> {
        match format {
            ExportFormat::Png => Self::encode_png(buffer),
            ExportFormat::Jpeg => self.encode_jpeg(buffer),
        }
    }

    /// Encode `buffer` and write it to `path`, choosing the format from the
    /// extension. Returns the format used.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::InvalidData`] for an unsupported extension,
    /// [`RenderError::Encode`] if encoding fails and [`RenderError::Io`] if
    /// the file cannot be written.
    pub fn export_to_path(&self, buffer: &PixelBuffer, path: &Path) -> RenderResult<ExportFormat> {
        let format = ExportFormat::from_path(path).ok_or_else(|| {
            RenderError::InvalidData(format!("unsupported export type: {}", path.display()))
        })?;
        let bytes = self.export(buffer, format)?;
        std::fs::write(path, bytes)?;
        tracing::debug!("Exported {:?} drawing to {}", format, path.display());
        Ok(format)
    }

    /// Encode `buffer` as PNG.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Encode`] if the encoder fails.
    pub fn encode_png(buffer: &PixelBuffer) -> RenderResult<Vec<u8>> {
        let size = buffer.size();
        let mut out = std::io::Cursor::new(Vec::new());
        image::codecs::png::PngEncoder::new(&mut out)
            .write_image(&buffer.to_rgba_bytes(), size, size, ExtendedColorType::Rgba8)
            .map_err(|e| RenderError::Encode(format!("PNG encoding failed: {e}")))?;
        Ok(out.into_inner())
    }

    /// Encode `buffer` as JPEG, flattening alpha over the configured background.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Encode`] if the encoder fails.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn encode_jpeg(&self, buffer: &PixelBuffer) -> RenderResult<Vec<u8>> {
        let size = buffer.size();
        let bg = self.config.background;
        let mut rgb_data = Vec::with_capacity(buffer.pixel_count() * 3);
        for pixel in buffer.to_rgba_bytes().chunks_exact(4) {
            let alpha = f32::from(pixel[3]) / 255.0;
            let inv = 1.0 - alpha;
            for (channel, backdrop) in pixel[..3].iter().zip([bg.r, bg.g, bg.b]) {
                let value = f32::from(*channel).mul_add(alpha, f32::from(backdrop) * inv);
                rgb_data.push(value.round().clamp(0.0, 255.0) as u8);
            }
        }

        let mut out = std::io::Cursor::new(Vec::new());
        image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, self.config.jpeg_quality)
            .write_image(&rgb_data, size, size, ExtendedColorType::Rgb8)
            .map_err(|e| RenderError::Encode(format!("JPEG encoding failed: {e}")))?;
        Ok(out.into_inner())
    }
}

/// Shrink a drawing for list previews, keeping it square.
///
/// Buffers already within `max_size` are returned at full size.
///
/// # Errors
///
/// Returns [`RenderError::InvalidData`] if `max_size` is zero.
pub fn thumbnail(buffer: &PixelBuffer, max_size: u32) -> RenderResult<RgbaImage> {
    if max_size == 0 {
        return Err(RenderError::InvalidData(
            "thumbnail size must be positive".to_string(),
        ));
    }
    let image = buffer_to_image(buffer)?;
    if buffer.size() <= max_size {
        return Ok(image);
    }
    Ok(image::imageops::thumbnail(&image, max_size, max_size))
}

/// MIME type to advertise when sharing the file at `path`.
///
/// `png` maps to `image/png`, `jpg`/`jpeg` to `image/jpeg`, everything else
/// to `image/*`.
#[must_use]
pub fn mime_for_path(path: &Path) -> &'static str {
    match ImageFormat::from_path(path) {
        format @ (ImageFormat::Png | ImageFormat::Jpeg) => format.mime_type(),
        ImageFormat::WebP | ImageFormat::Unknown => "image/*",
    }
}
