//! Recorded stroke scripts.
//!
//! A script is a JSON array of commands that replays pen changes and pointer
//! input through a [`StrokeSession`]:
//!
//! ```json
//! [
//!   { "op": "pen", "color": "#FF0000", "size": 20, "shape": "circle" },
//!   { "op": "down", "x": 500, "y": 500 },
//!   { "op": "move", "x": 520, "y": 510 },
//!   { "op": "up" }
//! ]
//! ```

use serde::{Deserialize, Serialize};

use crate::{CanvasResult, PenShape, PointerEvent, PointerPhase, Rgba, StrokeSession};

/// One step of a stroke script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum StrokeCommand {
    /// Change any subset of the pen settings.
    Pen {
        /// New pen color.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        color: Option<Rgba>,
        /// New pen size.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        size: Option<f32>,
        /// New pen shape.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        shape: Option<PenShape>,
    },
    /// Pointer pressed.
    Down {
        /// X coordinate.
        x: f32,
        /// Y coordinate.
        y: f32,
    },
    /// Pointer dragged.
    Move {
        /// X coordinate.
        x: f32,
        /// Y coordinate.
        y: f32,
    },
    /// Pointer released.
    Up,
    /// Reset the canvas to its background.
    Clear,
}

/// Counters reported after a replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    /// Completed gestures.
    pub gestures: usize,
    /// Pointer samples that reached the canvas.
    pub samples: usize,
}

/// An ordered list of [`StrokeCommand`]s.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StrokeScript {
    /// Commands in replay order.
    pub commands: Vec<StrokeCommand>,
}

impl StrokeScript {
    /// Parse a script from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Serialization`](crate::CanvasError::Serialization) for malformed input.
    pub fn from_json(json: &str) -> CanvasResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Serialization`](crate::CanvasError::Serialization) if encoding fails.
    pub fn to_json(&self) -> CanvasResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Replay every command through `session`.
    ///
    /// A gesture left open at the end of the script is closed.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidPenSize`](crate::CanvasError::InvalidPenSize)
    /// if a pen command carries a bad size; commands before it stay applied.
    pub fn replay(&self, session: &mut StrokeSession) -> CanvasResult<ReplayStats> {
        let mut stats = ReplayStats::default();

        for command in &self.commands {
            match *command {
                StrokeCommand::Pen { color, size, shape } => {
                    let canvas = session.canvas_mut();
                    if let Some(color) = color {
                        canvas.set_pen_color(color);
                    }
                    if let Some(size) = size {
                        canvas.set_pen_size(size)?;
                    }
                    if let Some(shape) = shape {
                        canvas.set_shape(shape);
                    }
                }
                StrokeCommand::Down { x, y } => {
                    session.handle(&PointerEvent::new(PointerPhase::Down, x, y));
                    stats.samples += 1;
                }
                StrokeCommand::Move { x, y } => {
                    session.handle(&PointerEvent::new(PointerPhase::Move, x, y));
                    stats.samples += 1;
                }
                StrokeCommand::Up => {
                    if session.is_active() {
                        stats.gestures += 1;
                    }
                    session.end();
                }
                StrokeCommand::Clear => session.canvas_mut().clear(),
            }
        }

        if session.is_active() {
            stats.gestures += 1;
            session.end();
        }

        tracing::debug!(
            "Replayed {} commands: {} gestures, {} samples",
            self.commands.len(),
            stats.gestures,
            stats.samples
        );
        Ok(stats)
    }
}
