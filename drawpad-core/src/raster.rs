//! Shape rasterization onto a [`PixelBuffer`].
//!
//! Each primitive visits only the pixels inside the clipped bounding box of
//! its mark and returns the rectangle it actually wrote, so the cost of a
//! stroke is proportional to the mark and not to the drawing history.
//!
//! Pixels are sampled at their centres: pixel `(px, py)` covers
//! `[px, px + 1) x [py, py + 1)` and is tested at `(px + 0.5, py + 0.5)`.

#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]

use serde::{Deserialize, Serialize};

use crate::{PixelBuffer, Rgba};

/// An axis-aligned rectangle of pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelRect {
    /// Left column.
    pub x: u32,
    /// Top row.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl PixelRect {
    /// Smallest rectangle containing both.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = (self.x + self.width).max(other.x + other.width);
        let bottom = (self.y + self.height).max(other.y + other.height);
        Self {
            x,
            y,
            width: right - x,
            height: bottom - y,
        }
    }

    /// Whether the pixel lies inside the rectangle.
    #[must_use]
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && y >= self.y && x < self.x + self.width && y < self.y + self.height
    }

    /// Number of pixels covered.
    #[must_use]
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

/// Running bounds of written pixels.
#[derive(Default)]
struct Touched(Option<(u32, u32, u32, u32)>);

impl Touched {
    fn add(&mut self, x: u32, y: u32) {
        self.0 = Some(match self.0 {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }

    fn into_rect(self) -> Option<PixelRect> {
        self.0.map(|(x0, y0, x1, y1)| PixelRect {
            x: x0,
            y: y0,
            width: x1 - x0 + 1,
            height: y1 - y0 + 1,
        })
    }
}

/// Pixel column/row span `[start, end)` whose centres may fall in
/// `[min, max]`, clipped to the buffer. `None` when empty or non-finite.
fn clip_span(size: u32, min: f64, max: f64) -> Option<(u32, u32)> {
    if !min.is_finite() || !max.is_finite() {
        return None;
    }
    let start = (min - 0.5).ceil().max(0.0);
    let end = (max - 0.5).floor().min(f64::from(size) - 1.0);
    if start > end {
        return None;
    }
    Some((start as u32, end as u32 + 1))
}

/// Fill an antialiased disc.
///
/// Pixel coverage is `clamp(radius + 0.5 - d, 0, 1)` where `d` is the
/// distance from the pixel centre to `(cx, cy)`: pixels with
/// `d <= radius - 0.5` get the full color, pixels with `d >= radius + 0.5`
/// are left alone.
pub fn fill_disc(
    buffer: &mut PixelBuffer,
    cx: f32,
    cy: f32,
    radius: f32,
    color: Rgba,
) -> Option<PixelRect> {
    if !radius.is_finite() || radius < 0.0 {
        return None;
    }
    let (cx, cy, reach) = (f64::from(cx), f64::from(cy), f64::from(radius) + 0.5);
    let (x0, x1) = clip_span(buffer.size(), cx - reach, cx + reach)?;
    let (y0, y1) = clip_span(buffer.size(), cy - reach, cy + reach)?;

    let mut touched = Touched::default();
    for py in y0..y1 {
        let dy = f64::from(py) + 0.5 - cy;
        for px in x0..x1 {
            let dx = f64::from(px) + 0.5 - cx;
            let coverage = (reach - dx.hypot(dy)).min(1.0);
            if coverage > 0.0 && buffer.blend_pixel(px.into(), py.into(), color, coverage as f32)
            {
                touched.add(px, py);
            }
        }
    }
    touched.into_rect()
}

/// Fill a hard-edged axis-aligned square of side `side` centred on `(cx, cy)`.
///
/// A pixel is painted when its centre lies in `[cx - side/2, cx + side/2)`
/// on both axes.
pub fn fill_square(
    buffer: &mut PixelBuffer,
    cx: f32,
    cy: f32,
    side: f32,
    color: Rgba,
) -> Option<PixelRect> {
    if !side.is_finite() || side <= 0.0 {
        return None;
    }
    let half = f64::from(side) / 2.0;
    let (x0, x1) = half_open_span(buffer.size(), f64::from(cx) - half, f64::from(cx) + half)?;
    let (y0, y1) = half_open_span(buffer.size(), f64::from(cy) - half, f64::from(cy) + half)?;

    let mut touched = Touched::default();
    for py in y0..y1 {
        for px in x0..x1 {
            if buffer.blend_pixel(px.into(), py.into(), color, 1.0) {
                touched.add(px, py);
            }
        }
    }
    touched.into_rect()
}

/// Pixels whose centre lies in `[lo, hi)`, clipped to the buffer.
fn half_open_span(size: u32, lo: f64, hi: f64) -> Option<(u32, u32)> {
    if !lo.is_finite() || !hi.is_finite() {
        return None;
    }
    let start = (lo - 0.5).ceil().max(0.0);
    let end = (hi - 0.5).ceil().min(f64::from(size));
    if start >= end {
        return None;
    }
    Some((start as u32, end as u32))
}

/// Fill a hard-edged, round-capped segment of width `width` from `from` to `to`.
///
/// A pixel is painted when the distance from its centre to the segment is at
/// most `width / 2`. A zero-length segment paints a dot.
pub fn fill_capsule(
    buffer: &mut PixelBuffer,
    from: (f32, f32),
    to: (f32, f32),
    width: f32,
    color: Rgba,
) -> Option<PixelRect> {
    if !width.is_finite() || width <= 0.0 {
        return None;
    }
    let (ax, ay) = (f64::from(from.0), f64::from(from.1));
    let (bx, by) = (f64::from(to.0), f64::from(to.1));
    let half = f64::from(width) / 2.0;
    let half_sq = half * half;

    let (y0, y1) = clip_span(buffer.size(), ay.min(by) - half, ay.max(by) + half)?;

    let (dx, dy) = (bx - ax, by - ay);
    let len_sq = dx * dx + dy * dy;

    let mut touched = Touched::default();
    for py in y0..y1 {
        let cy = f64::from(py) + 0.5;
        let Some((x0, x1)) = capsule_row_span(buffer.size(), (ax, ay), (dx, dy), half, cy) else {
            continue;
        };
        for px in x0..x1 {
            let cx = f64::from(px) + 0.5;
            let t = if len_sq > 0.0 {
                (((cx - ax) * dx + (cy - ay) * dy) / len_sq).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let (qx, qy) = (ax + t * dx - cx, ay + t * dy - cy);
            if qx * qx + qy * qy <= half_sq
                && buffer.blend_pixel(px.into(), py.into(), color, 1.0)
            {
                touched.add(px, py);
            }
        }
    }
    touched.into_rect()
}

/// Columns of row `cy` that can lie within `half` of the segment
/// `a + t * d`, `t` in `[0, 1]`.
///
/// Only segment points with `|y - cy| <= half` can be that close, so the
/// span is their x extent widened by `half`. The span is a superset of the
/// capsule's row; callers still test each pixel.
fn capsule_row_span(
    size: u32,
    (ax, ay): (f64, f64),
    (dx, dy): (f64, f64),
    half: f64,
    cy: f64,
) -> Option<(u32, u32)> {
    // Slack so rounding in the division never drops a boundary pixel
    let reach = half + 1e-6;
    let (t0, t1) = if dy == 0.0 {
        if (ay - cy).abs() > reach {
            return None;
        }
        (0.0, 1.0)
    } else {
        let ta = (cy - reach - ay) / dy;
        let tb = (cy + reach - ay) / dy;
        (ta.min(tb).max(0.0), ta.max(tb).min(1.0))
    };
    if t0 > t1 {
        return None;
    }
    let (xa, xb) = (ax + t0 * dx, ax + t1 * dx);
    clip_span(size, xa.min(xb) - reach, xa.max(xb) + reach)
}
