//! # Drawpad Vision
//!
//! Asks a cloud vision endpoint what is in a drawing or photo: localized
//! objects with bounding boxes, and whole-image labels.
//!
//! ```text
//! PNG/JPEG bytes ──base64──▶ POST images:annotate?key=…
//!                                   │
//!        ImageAnalysis ◀── objects (≤ 10) + labels (≤ 5)
//! ```
//!
//! Transport failures are retried with exponential backoff; HTTP status and
//! API errors are returned immediately.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod analysis;
pub mod client;
pub mod error;
mod wire;

pub use analysis::{DetectedObject, ImageAnalysis, Label, NormalizedRect};
pub use client::{RetryConfig, VisionClient, DEFAULT_ENDPOINT};
pub use error::{VisionError, VisionResult};
pub use wire::{MAX_LABELS, MAX_OBJECTS};
