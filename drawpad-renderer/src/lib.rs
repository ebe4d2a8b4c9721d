//! # Drawpad Renderer
//!
//! Image codecs around the drawing canvas: decoding photos, fitting them
//! onto the square working canvas, and encoding drawings for storage and
//! sharing.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              drawpad-renderer               │
//! ├─────────────────────────────────────────────┤
//! │  image            │  fit                    │
//! │  - format sniff   │  - FitPlacement         │
//! │  - bytes / path   │  - bilinear resample    │
//! │  - data URIs      │  - letterbox background │
//! ├─────────────────────────────────────────────┤
//! │  export                                     │
//! │  - PNG / JPEG     - thumbnails   - MIME     │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod export;
pub mod fit;
pub mod image;

pub use error::{RenderError, RenderResult};
pub use export::{mime_for_path, thumbnail, BufferExporter, ExportConfig, ExportFormat};
pub use fit::{fit, fit_or_blank, FitPlacement};
pub use crate::image::{
    buffer_to_image, image_to_buffer, load_image_from_bytes, load_image_from_data_uri,
    load_image_from_path, DecodedImage, ImageFormat,
};
