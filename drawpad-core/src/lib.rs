//! # Drawpad Core
//!
//! Incremental raster drawing engine: pointer samples go in, pixels come out.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                drawpad-core                 │
//! ├─────────────────────────────────────────────┤
//! │  StrokeSession   │  RasterCanvas            │
//! │  - Idle/Active   │  - PixelBuffer           │
//! │  - PointerEvent  │  - PenState              │
//! │  - StrokeScript  │  - Snapshot / observer   │
//! ├─────────────────────────────────────────────┤
//! │  raster          │  persist                 │
//! │  - disc, square  │  - DrawingPersistence    │
//! │  - capsule       │  - blank fallback        │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod buffer;
pub mod canvas;
pub mod color;
pub mod error;
pub mod event;
pub mod pen;
pub mod persist;
pub mod raster;
pub mod script;
pub mod session;

pub use buffer::PixelBuffer;
pub use canvas::{OnChangeCallback, RasterCanvas, Snapshot, DEFAULT_CANVAS_SIZE};
pub use color::Rgba;
pub use error::{CanvasError, CanvasResult};
pub use event::{CanvasEvent, PointerEvent, PointerPhase};
pub use pen::{PenShape, PenState, DEFAULT_PEN_SIZE, MAX_UI_PEN_SIZE, MIN_UI_PEN_SIZE};
pub use persist::{open_or_blank, DrawingPersistence};
pub use raster::PixelRect;
pub use script::{ReplayStats, StrokeCommand, StrokeScript};
pub use session::{GesturePhase, StrokeSession};

/// Drawpad core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
