//! Image loading and conversion.
//!
//! Decodes files, raw bytes and base64 data URIs into [`RgbaImage`]s and
//! converts between those and the canvas' [`PixelBuffer`].

use std::path::Path;

use drawpad_core::PixelBuffer;
use image::RgbaImage;

use crate::error::{RenderError, RenderResult};

/// A decoded image together with the container format it came from.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// RGBA pixels (straight alpha).
    pub pixels: RgbaImage,
    /// Format detected from the encoded bytes.
    pub format: ImageFormat,
}

impl DecodedImage {
    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

/// Supported image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// PNG with alpha support.
    Png,
    /// JPEG (no alpha).
    Jpeg,
    /// WebP (alpha support).
    WebP,
    /// Unknown/other format.
    Unknown,
}

impl ImageFormat {
    /// Detect format from file extension.
    #[must_use]
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Self::Png,
            "jpg" | "jpeg" => Self::Jpeg,
            "webp" => Self::WebP,
            _ => Self::Unknown,
        }
    }

    /// Detect format from a path's extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map_or(Self::Unknown, Self::from_extension)
    }

    /// Detect format from MIME type.
    #[must_use]
    pub fn from_mime(mime: &str) -> Self {
        match mime.to_ascii_lowercase().as_str() {
            "image/png" => Self::Png,
            "image/jpeg" | "image/jpg" => Self::Jpeg,
            "image/webp" => Self::WebP,
            _ => Self::Unknown,
        }
    }

    /// Detect format from magic bytes.
    #[must_use]
    pub fn from_magic_bytes(data: &[u8]) -> Self {
        if data.len() < 4 {
            return Self::Unknown;
        }

        // PNG: 89 50 4E 47
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Self::Png;
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Self::Jpeg;
        }

        // WebP: RIFF....WEBP
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Self::WebP;
        }

        Self::Unknown
    }

    /// MIME type used when handing the file to other apps.
    #[must_use]
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::WebP => "image/webp",
            Self::Unknown => "image/*",
        }
    }
}

/// Decode an image from raw bytes.
///
/// # Errors
///
/// Returns [`RenderError::Decode`] if the bytes are not a supported image.
pub fn load_image_from_bytes(data: &[u8]) -> RenderResult<DecodedImage> {
    let format = ImageFormat::from_magic_bytes(data);

    let pixels = image::load_from_memory(data)
        .map_err(|e| RenderError::Decode(e.to_string()))?
        .to_rgba8();

    tracing::debug!(
        "Decoded {:?} image {}x{}",
        format,
        pixels.width(),
        pixels.height()
    );
    Ok(DecodedImage { pixels, format })
}

/// Read and decode an image file.
///
/// # Errors
///
/// Returns [`RenderError::Io`] if the file cannot be read and
/// [`RenderError::Decode`] if it is not a supported image.
pub fn load_image_from_path(path: &Path) -> RenderResult<DecodedImage> {
    let data = std::fs::read(path)?;
    load_image_from_bytes(&data)
}

/// Decode an image from a data URI.
///
/// Supports `data:image/png;base64,iVBORw0KGgo...` as well as
/// percent-encoded payloads.
///
/// # Errors
///
/// Returns [`RenderError::InvalidData`] if the URI is malformed and
/// [`RenderError::Decode`] if the payload is not a supported image.
pub fn load_image_from_data_uri(uri: &str) -> RenderResult<DecodedImage> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| RenderError::InvalidData("not a data URI".to_string()))?;

    let (metadata, payload) = rest
        .split_once(',')
        .ok_or_else(|| RenderError::InvalidData("data URI is missing ','".to_string()))?;

    let bytes = if metadata.ends_with(";base64") {
        use base64::Engine;
        base64::engine::general_purpose::STANDARD
            .decode(payload)
            .map_err(|e| RenderError::InvalidData(format!("bad base64 payload: {e}")))?
    } else {
        percent_decode(payload)?
    };

    load_image_from_bytes(&bytes)
}

fn percent_decode(input: &str) -> RenderResult<Vec<u8>> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' {
            let byte = bytes
                .get(i + 1..i + 3)
                .and_then(|hex| std::str::from_utf8(hex).ok())
                .and_then(|hex| u8::from_str_radix(hex, 16).ok())
                .ok_or_else(|| RenderError::InvalidData("bad percent escape".to_string()))?;
            out.push(byte);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }

    Ok(out)
}

/// Copy canvas pixels into an [`RgbaImage`].
///
/// # Errors
///
/// Returns [`RenderError::InvalidData`] if the buffer length does not match
/// its dimensions.
pub fn buffer_to_image(buffer: &PixelBuffer) -> RenderResult<RgbaImage> {
    let size = buffer.size();
    RgbaImage::from_raw(size, size, buffer.to_rgba_bytes())
        .ok_or_else(|| RenderError::InvalidData(format!("buffer is not {size}x{size}")))
}

/// Copy a square image into a [`PixelBuffer`].
///
/// # Errors
///
/// Returns [`RenderError::InvalidData`] for non-square images and
/// [`RenderError::Canvas`] for a zero-sized one.
pub fn image_to_buffer(image: &RgbaImage) -> RenderResult<PixelBuffer> {
    let (width, height) = image.dimensions();
    if width != height {
        return Err(RenderError::InvalidData(format!(
            "expected a square image, got {width}x{height}"
        )));
    }
    Ok(PixelBuffer::from_rgba_bytes(width, image.as_raw())?)
}
