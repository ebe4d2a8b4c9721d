//! Analysis results returned to callers.

use drawpad_core::PixelRect;
use serde::{Deserialize, Serialize};

/// Bounding box in normalized image coordinates (`0.0..=1.0` on both axes).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRect {
    /// Left edge.
    pub left: f32,
    /// Top edge.
    pub top: f32,
    /// Right edge.
    pub right: f32,
    /// Bottom edge.
    pub bottom: f32,
}

impl NormalizedRect {
    /// Bounding box of a polygon's vertices.
    ///
    /// Missing coordinates count as `0`; everything is clamped to `[0, 1]`.
    /// No vertices gives the empty rect at the origin.
    #[must_use]
    pub fn from_vertices<I>(vertices: I) -> Self
    where
        I: IntoIterator<Item = (Option<f32>, Option<f32>)>,
    {
        let mut bounds: Option<Self> = None;
        for (x, y) in vertices {
            let x = unit(x.unwrap_or(0.0));
            let y = unit(y.unwrap_or(0.0));
            bounds = Some(match bounds {
                None => Self {
                    left: x,
                    top: y,
                    right: x,
                    bottom: y,
                },
                Some(b) => Self {
                    left: b.left.min(x),
                    top: b.top.min(y),
                    right: b.right.max(x),
                    bottom: b.bottom.max(y),
                },
            });
        }
        bounds.unwrap_or_default()
    }

    /// Normalized width.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    /// Normalized height.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Map onto a `width x height` image, rounding outwards.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn to_pixels(&self, width: u32, height: u32) -> PixelRect {
        let (w, h) = (f64::from(width), f64::from(height));
        let x0 = (f64::from(self.left) * w).floor().clamp(0.0, w) as u32;
        let y0 = (f64::from(self.top) * h).floor().clamp(0.0, h) as u32;
        let x1 = (f64::from(self.right) * w).ceil().clamp(0.0, w) as u32;
        let y1 = (f64::from(self.bottom) * h).ceil().clamp(0.0, h) as u32;
        PixelRect {
            x: x0,
            y: y0,
            width: x1.saturating_sub(x0),
            height: y1.saturating_sub(y0),
        }
    }
}

fn unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// A localized object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedObject {
    /// Object name, e.g. "Cat".
    pub name: String,
    /// Confidence in `[0, 1]`.
    pub confidence: f32,
    /// Where the object is.
    pub bounds: NormalizedRect,
}

/// A whole-image label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    /// Label text, e.g. "Drawing".
    pub label: String,
    /// Confidence in `[0, 1]`.
    pub confidence: f32,
}

/// Everything the endpoint found in one image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageAnalysis {
    /// Localized objects, in response order.
    pub objects: Vec<DetectedObject>,
    /// Labels, in response order.
    pub labels: Vec<Label>,
}

impl ImageAnalysis {
    /// Whether nothing was detected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty() && self.labels.is_empty()
    }

    /// Most confident label, if any.
    #[must_use]
    pub fn top_label(&self) -> Option<&Label> {
        self.labels
            .iter()
            .max_by(|a, b| a.confidence.total_cmp(&b.confidence))
    }
}

pub(crate) fn confidence(score: Option<f32>) -> f32 {
    unit(score.unwrap_or(0.0))
}
