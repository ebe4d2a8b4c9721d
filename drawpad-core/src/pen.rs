//! Pen configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{CanvasError, CanvasResult, Rgba};

/// Smallest pen size a UI should offer.
pub const MIN_UI_PEN_SIZE: f32 = 1.0;

/// Largest pen size a UI should offer.
pub const MAX_UI_PEN_SIZE: f32 = 50.0;

/// Default pen size (stroke width / diameter).
pub const DEFAULT_PEN_SIZE: f32 = 12.0;

/// Shape stamped by each stroke.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PenShape {
    /// Antialiased disc of diameter `size`.
    #[default]
    Circle,
    /// Axis-aligned square of side `size`.
    Square,
    /// Connected segments of width `size` within a gesture.
    Line,
}

impl PenShape {
    /// Every shape, in toolbar order.
    pub const ALL: [Self; 3] = [Self::Circle, Self::Square, Self::Line];

    /// Lowercase display name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Circle => "circle",
            Self::Square => "square",
            Self::Line => "line",
        }
    }
}

impl fmt::Display for PenShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PenShape {
    type Err = CanvasError;

    fn from_str(s: &str) -> CanvasResult<Self> {
        Self::ALL
            .into_iter()
            .find(|shape| shape.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CanvasError::InvalidShape(s.to_string()))
    }
}

/// The color, size and shape used for the next stroke.
///
/// A plain value: changing the pen builds a new `PenState`, and pixels that
/// are already on the canvas are never touched by a pen change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PenState {
    /// Stroke color.
    pub color: Rgba,
    /// Stroke width / diameter in canvas pixels.
    pub size: f32,
    /// Stamp shape.
    pub shape: PenShape,
}

impl PenState {
    /// Create a pen, validating the size.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidPenSize`] if `size` is not positive and finite.
    pub fn new(color: Rgba, size: f32, shape: PenShape) -> CanvasResult<Self> {
        Ok(Self {
            color,
            size: validate_size(size)?,
            shape,
        })
    }

    /// Same pen with a different color.
    #[must_use]
    pub fn with_color(self, color: Rgba) -> Self {
        Self { color, ..self }
    }

    /// Same pen with a different size.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidPenSize`] if `size` is not positive and finite.
    pub fn with_size(self, size: f32) -> CanvasResult<Self> {
        Ok(Self {
            size: validate_size(size)?,
            ..self
        })
    }

    /// Same pen with a different shape.
    #[must_use]
    pub fn with_shape(self, shape: PenShape) -> Self {
        Self { shape, ..self }
    }

    /// Clamp a slider value into the recommended UI range.
    #[must_use]
    pub fn clamp_ui_size(size: f32) -> f32 {
        if size.is_nan() {
            return DEFAULT_PEN_SIZE;
        }
        size.clamp(MIN_UI_PEN_SIZE, MAX_UI_PEN_SIZE)
    }
}

impl Default for PenState {
    fn default() -> Self {
        Self {
            color: Rgba::BLACK,
            size: DEFAULT_PEN_SIZE,
            shape: PenShape::Circle,
        }
    }
}

fn validate_size(size: f32) -> CanvasResult<f32> {
    if size.is_finite() && size > 0.0 {
        Ok(size)
    } else {
        Err(CanvasError::InvalidPenSize(size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pen() {
        let pen = PenState::default();
        assert_eq!(pen.color, Rgba::BLACK);
        assert!((pen.size - 12.0).abs() < f32::EPSILON);
        assert_eq!(pen.shape, PenShape::Circle);
    }

    #[test]
    fn test_with_size_rejects_non_positive() {
        let pen = PenState::default();
        assert!(pen.with_size(0.0).is_err());
        assert!(pen.with_size(-3.0).is_err());
        assert!(pen.with_size(f32::NAN).is_err());
        assert!(pen.with_size(f32::INFINITY).is_err());
    }

    #[test]
    fn test_with_size_accepts_out_of_ui_range() {
        let pen = PenState::default();
        assert!(pen.with_size(0.01).is_ok());
        assert!(pen.with_size(500.0).is_ok());
    }

    #[test]
    fn test_builders_keep_other_fields() {
        let pen = PenState::default()
            .with_color(Rgba::RED)
            .with_shape(PenShape::Line)
            .with_size(20.0)
            .expect("size");
        assert_eq!(pen.color, Rgba::RED);
        assert_eq!(pen.shape, PenShape::Line);
        assert!((pen.size - 20.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_clamp_ui_size() {
        assert!((PenState::clamp_ui_size(0.2) - MIN_UI_PEN_SIZE).abs() < f32::EPSILON);
        assert!((PenState::clamp_ui_size(99.0) - MAX_UI_PEN_SIZE).abs() < f32::EPSILON);
        assert!((PenState::clamp_ui_size(25.0) - 25.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_shape_parsing() {
        assert_eq!("circle".parse::<PenShape>().ok(), Some(PenShape::Circle));
        assert_eq!("Square".parse::<PenShape>().ok(), Some(PenShape::Square));
        assert_eq!(" LINE ".parse::<PenShape>().ok(), Some(PenShape::Line));
        assert!(matches!(
            "triangle".parse::<PenShape>(),
            Err(CanvasError::InvalidShape(ref name)) if name == "triangle"
        ));
    }

    #[test]
    fn test_shape_serde_lowercase() {
        let json = serde_json::to_string(&PenShape::Square).expect("serialize");
        assert_eq!(json, "\"square\"");
    }
}
