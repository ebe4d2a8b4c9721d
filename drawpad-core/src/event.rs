//! Pointer input and canvas change notifications.

use serde::{Deserialize, Serialize};

use crate::{PenState, PixelRect};

/// Phase of a pointer drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerPhase {
    /// Pointer pressed (finger down).
    Down,
    /// Pointer dragged while pressed.
    Move,
    /// Pointer released (finger up).
    Up,
    /// Gesture cancelled by the platform (e.g., palm rejection).
    Cancel,
}

/// A single pointer sample in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    /// Phase of this sample.
    pub phase: PointerPhase,
    /// X position in canvas pixels.
    pub x: f32,
    /// Y position in canvas pixels.
    pub y: f32,
    /// Timestamp in milliseconds since the input source started.
    #[serde(default)]
    pub timestamp_ms: u64,
}

impl PointerEvent {
    /// Create a new pointer event.
    #[must_use]
    pub fn new(phase: PointerPhase, x: f32, y: f32) -> Self {
        Self {
            phase,
            x,
            y,
            timestamp_ms: 0,
        }
    }

    /// Pointer pressed at (x, y).
    #[must_use]
    pub fn down(x: f32, y: f32) -> Self {
        Self::new(PointerPhase::Down, x, y)
    }

    /// Pointer dragged to (x, y).
    #[must_use]
    pub fn moved(x: f32, y: f32) -> Self {
        Self::new(PointerPhase::Move, x, y)
    }

    /// Pointer released at (x, y).
    #[must_use]
    pub fn up(x: f32, y: f32) -> Self {
        Self::new(PointerPhase::Up, x, y)
    }

    /// Attach a timestamp.
    #[must_use]
    pub fn at(mut self, timestamp_ms: u64) -> Self {
        self.timestamp_ms = timestamp_ms;
        self
    }
}

/// Notification emitted by a [`RasterCanvas`](crate::RasterCanvas) after it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CanvasEvent {
    /// The pen was replaced.
    PenChanged {
        /// The new pen.
        pen: PenState,
    },
    /// A stroke wrote pixels inside `rect`.
    Stroked {
        /// Pixels touched by the stroke.
        rect: PixelRect,
        /// Canvas revision after the stroke.
        revision: u64,
    },
    /// Every pixel was reset to the background.
    Cleared {
        /// Canvas revision after the clear.
        revision: u64,
    },
    /// The pixel content was replaced by a loaded buffer.
    Loaded {
        /// Canvas revision after the load.
        revision: u64,
    },
}

impl CanvasEvent {
    /// Revision carried by pixel-changing events.
    #[must_use]
    pub fn revision(&self) -> Option<u64> {
        match self {
            Self::PenChanged { .. } => None,
            Self::Stroked { revision, .. }
            | Self::Cleared { revision }
            | Self::Loaded { revision } => Some(*revision),
        }
    }
}
