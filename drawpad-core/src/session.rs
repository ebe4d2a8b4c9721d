//! Gesture sequencing on top of a [`RasterCanvas`].

use serde::{Deserialize, Serialize};

use crate::{PointerEvent, PointerPhase, RasterCanvas};

/// Whether a drag gesture is in progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GesturePhase {
    /// No stroke in progress.
    #[default]
    Idle,
    /// A drag is in progress; samples become strokes.
    Active,
}

/// Turns drag gestures into canvas strokes.
///
/// The session owns its canvas so that start/continue/end ordering is
/// enforced in one place regardless of how the UI delivers events.
#[derive(Debug)]
pub struct StrokeSession {
    canvas: RasterCanvas,
    phase: GesturePhase,
    samples: usize,
}

impl StrokeSession {
    /// Start an idle session over `canvas`.
    #[must_use]
    pub fn new(canvas: RasterCanvas) -> Self {
        Self {
            canvas,
            phase: GesturePhase::Idle,
            samples: 0,
        }
    }

    /// Current gesture phase.
    #[must_use]
    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    /// Whether a gesture is in progress.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.phase == GesturePhase::Active
    }

    /// Samples applied in the current gesture (or the last one, once ended).
    #[must_use]
    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Start a gesture at (x, y). An unfinished gesture is ended first.
    pub fn begin(&mut self, x: f32, y: f32) {
        if self.is_active() {
            tracing::debug!("Drag started while active; ending previous gesture");
            self.end();
        }
        self.phase = GesturePhase::Active;
        self.samples = 0;
        self.sample(x, y);
    }

    /// Continue the gesture to (x, y). Starts one if idle.
    pub fn extend(&mut self, x: f32, y: f32) {
        if self.is_active() {
            self.sample(x, y);
        } else {
            self.begin(x, y);
        }
    }

    /// Finish the gesture. Safe to call while idle.
    pub fn end(&mut self) {
        if self.is_active() {
            tracing::trace!("Gesture ended after {} samples", self.samples);
        }
        self.canvas.end_stroke();
        self.phase = GesturePhase::Idle;
    }

    /// Dispatch a pointer event.
    ///
    /// `Cancel` is treated like `Up`: whatever was drawn stays drawn.
    pub fn handle(&mut self, event: &PointerEvent) {
        match event.phase {
            PointerPhase::Down => self.begin(event.x, event.y),
            PointerPhase::Move => self.extend(event.x, event.y),
            PointerPhase::Up | PointerPhase::Cancel => self.end(),
        }
    }

    fn sample(&mut self, x: f32, y: f32) {
        self.canvas.stroke_at(x, y);
        self.samples += 1;
    }

    /// The canvas being drawn on.
    #[must_use]
    pub fn canvas(&self) -> &RasterCanvas {
        &self.canvas
    }

    /// Mutable access for pen changes, clears and loads.
    pub fn canvas_mut(&mut self) -> &mut RasterCanvas {
        &mut self.canvas
    }

    /// Drop the session and keep the canvas.
    #[must_use]
    pub fn into_canvas(self) -> RasterCanvas {
        self.canvas
    }
}
