//! Square ARGB pixel buffer.
//!
//! All writes are bounds checked: coordinates outside the buffer are
//! silently ignored, which is what lets the rasterizer clip for free.

use crate::{CanvasError, CanvasResult, Rgba};

/// A fixed-size square grid of packed `0xAARRGGBB` pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    size: u32,
    pixels: Vec<u32>,
}

impl PixelBuffer {
    /// Allocate a `size` x `size` buffer filled with `fill`.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidSize`] if `size` is zero or the pixel
    /// count overflows the address space.
    pub fn new(size: u32, fill: Rgba) -> CanvasResult<Self> {
        let len = pixel_count(size)?;
        Ok(Self {
            size,
            pixels: vec![fill.to_argb(); len],
        })
    }

    /// Build a buffer from tightly packed RGBA bytes (4 bytes per pixel).
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidSize`] for a zero size and
    /// [`CanvasError::InvalidPixelData`] if `bytes` is not exactly
    /// `size * size * 4` long.
    pub fn from_rgba_bytes(size: u32, bytes: &[u8]) -> CanvasResult<Self> {
        let len = pixel_count(size)?;
        if bytes.len() != len * 4 {
            return Err(CanvasError::InvalidPixelData(format!(
                "expected {} bytes for {size}x{size}, got {}",
                len * 4,
                bytes.len()
            )));
        }

        let pixels = bytes
            .chunks_exact(4)
            .map(|p| Rgba::new(p[0], p[1], p[2], p[3]).to_argb())
            .collect();

        Ok(Self { size, pixels })
    }

    /// Side length in pixels.
    #[inline]
    #[must_use]
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Total number of pixels (`size * size`).
    #[inline]
    #[must_use]
    pub fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    #[inline]
    fn index(&self, x: i64, y: i64) -> Option<usize> {
        let size = i64::from(self.size);
        if x < 0 || y < 0 || x >= size || y >= size {
            return None;
        }
        usize::try_from(y * size + x).ok()
    }

    /// Read a pixel, or `None` outside the buffer.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        self.index(i64::from(x), i64::from(y))
            .map(|i| Rgba::from_argb(self.pixels[i]))
    }

    /// Overwrite a pixel. Returns `false` if the coordinate is out of range.
    pub fn put_pixel(&mut self, x: i64, y: i64, color: Rgba) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.pixels[i] = color.to_argb();
                true
            }
            None => false,
        }
    }

    /// Composite `color` over the pixel at (x, y) using `coverage` in `[0, 1]`
    /// as an extra alpha factor (source-over).
    ///
    /// Returns `false` if the coordinate is out of range.
    pub fn blend_pixel(&mut self, x: i64, y: i64, color: Rgba, coverage: f32) -> bool {
        match self.index(x, y) {
            Some(i) => {
                let dst = Rgba::from_argb(self.pixels[i]);
                self.pixels[i] = source_over(dst, color, coverage).to_argb();
                true
            }
            None => false,
        }
    }

    /// Set every pixel to `color`.
    pub fn fill(&mut self, color: Rgba) {
        self.pixels.fill(color.to_argb());
    }

    /// Raw packed pixels, row-major.
    #[must_use]
    pub fn as_argb(&self) -> &[u32] {
        &self.pixels
    }

    /// Iterate over rows of packed pixels.
    pub fn rows(&self) -> impl Iterator<Item = &[u32]> {
        self.pixels.chunks_exact(self.size as usize)
    }

    /// Copy out as tightly packed RGBA bytes.
    #[must_use]
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for &argb in &self.pixels {
            let c = Rgba::from_argb(argb);
            bytes.extend_from_slice(&[c.r, c.g, c.b, c.a]);
        }
        bytes
    }

    /// Number of pixels exactly equal to `color`.
    #[must_use]
    pub fn count_matching(&self, color: Rgba) -> usize {
        let argb = color.to_argb();
        self.pixels.iter().filter(|&&p| p == argb).count()
    }

    /// Number of pixels that differ from `other`.
    ///
    /// Buffers of different sizes are considered entirely different.
    #[must_use]
    pub fn diff_count(&self, other: &Self) -> usize {
        if self.size != other.size {
            return self.pixels.len().max(other.pixels.len());
        }
        self.pixels
            .iter()
            .zip(&other.pixels)
            .filter(|(a, b)| a != b)
            .count()
    }
}

fn pixel_count(size: u32) -> CanvasResult<usize> {
    if size == 0 {
        return Err(CanvasError::InvalidSize(size));
    }
    let side = usize::try_from(size).map_err(|_| CanvasError::InvalidSize(size))?;
    side.checked_mul(side)
        .filter(|n| n.checked_mul(4).is_some())
        .ok_or(CanvasError::InvalidSize(size))
}

/// Straight-alpha source-over compositing.
///
/// An opaque source at full coverage replaces the destination exactly, so
/// repeated opaque stamps over the same pixel are idempotent.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn source_over(dst: Rgba, src: Rgba, coverage: f32) -> Rgba {
    let coverage = if coverage.is_nan() { 0.0 } else { coverage.clamp(0.0, 1.0) };
    let sa = f32::from(src.a) / 255.0 * coverage;
    if sa <= 0.0 {
        return dst;
    }
    if sa >= 1.0 {
        return Rgba { a: 255, ..src };
    }

    let da = f32::from(dst.a) / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return Rgba::TRANSPARENT;
    }

    let mix = |s: u8, d: u8| {
        let v = (f32::from(s) * sa + f32::from(d) * da * (1.0 - sa)) / out_a;
        v.round().clamp(0.0, 255.0) as u8
    };

    Rgba {
        r: mix(src.r, dst.r),
        g: mix(src.g, dst.g),
        b: mix(src.b, dst.b),
        a: (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_fills_every_pixel() {
        let buf = PixelBuffer::new(16, Rgba::WHITE).expect("buffer");
        assert_eq!(buf.size(), 16);
        assert_eq!(buf.pixel_count(), 256);
        assert_eq!(buf.count_matching(Rgba::WHITE), 256);
    }

    #[test]
    fn test_zero_size_rejected() {
        assert!(matches!(
            PixelBuffer::new(0, Rgba::WHITE),
            Err(CanvasError::InvalidSize(0))
        ));
    }

    #[test]
    fn test_out_of_range_writes_ignored() {
        let mut buf = PixelBuffer::new(4, Rgba::WHITE).expect("buffer");
        assert!(!buf.put_pixel(-1, 0, Rgba::RED));
        assert!(!buf.put_pixel(0, 4, Rgba::RED));
        assert!(!buf.blend_pixel(i64::MAX, i64::MIN, Rgba::RED, 1.0));
        assert_eq!(buf.count_matching(Rgba::WHITE), 16);
        assert!(buf.pixel(4, 0).is_none());
    }

    #[test]
    fn test_opaque_full_coverage_replaces() {
        let mut buf = PixelBuffer::new(2, Rgba::WHITE).expect("buffer");
        assert!(buf.blend_pixel(1, 1, Rgba::RED, 1.0));
        assert_eq!(buf.pixel(1, 1), Some(Rgba::RED));
    }

    #[test]
    fn test_partial_coverage_blends() {
        let mut buf = PixelBuffer::new(1, Rgba::WHITE).expect("buffer");
        buf.blend_pixel(0, 0, Rgba::BLACK, 0.5);
        let px = buf.pixel(0, 0).expect("pixel");
        assert_eq!(px.a, 255);
        assert!((127..=128).contains(&px.r), "got {px:?}");
        assert_eq!(px.r, px.g);
    }

    #[test]
    fn test_zero_coverage_is_noop() {
        let mut buf = PixelBuffer::new(1, Rgba::WHITE).expect("buffer");
        buf.blend_pixel(0, 0, Rgba::BLACK, 0.0);
        buf.blend_pixel(0, 0, Rgba::BLACK, f32::NAN);
        assert_eq!(buf.pixel(0, 0), Some(Rgba::WHITE));
    }

    #[test]
    fn test_rgba_bytes_roundtrip() {
        let mut buf = PixelBuffer::new(3, Rgba::WHITE).expect("buffer");
        buf.put_pixel(2, 1, Rgba::new(1, 2, 3, 4));
        let bytes = buf.to_rgba_bytes();
        assert_eq!(bytes.len(), 36);
        assert_eq!(&bytes[(3 + 2) * 4..(3 + 2) * 4 + 4], &[1, 2, 3, 4]);

        let back = PixelBuffer::from_rgba_bytes(3, &bytes).expect("from bytes");
        assert_eq!(back, buf);
    }

    #[test]
    fn test_rgba_bytes_length_checked() {
        let result = PixelBuffer::from_rgba_bytes(2, &[0; 15]);
        assert!(matches!(result, Err(CanvasError::InvalidPixelData(_))));
    }

    #[test]
    fn test_diff_count() {
        let a = PixelBuffer::new(4, Rgba::WHITE).expect("a");
        let mut b = a.clone();
        assert_eq!(a.diff_count(&b), 0);
        b.put_pixel(0, 0, Rgba::BLACK);
        b.put_pixel(3, 3, Rgba::BLACK);
        assert_eq!(a.diff_count(&b), 2);

        let c = PixelBuffer::new(5, Rgba::WHITE).expect("c");
        assert_eq!(a.diff_count(&c), 25);
    }

    #[test]
    fn test_rows() {
        let buf = PixelBuffer::new(3, Rgba::BLACK).expect("buffer");
        assert_eq!(buf.rows().count(), 3);
        assert!(buf.rows().all(|row| row.len() == 3));
    }
}
