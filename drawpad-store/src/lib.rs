//! # Drawpad Store
//!
//! Local storage for finished drawings: PNG files in a data directory and a
//! JSON catalog that lists them.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               drawpad-store                 │
//! ├─────────────────────────────────────────────┤
//! │  ImageRepository                            │
//! │  - save (temp file + rename)                │
//! │  - open / fit / blank fallback              │
//! │  - delete, clear                            │
//! ├─────────────────────────────────────────────┤
//! │  DrawingCatalog                             │
//! │  - auto-increment ids                       │
//! │  - catalog.json rewritten on mutation       │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod error;
pub mod repository;

pub use catalog::{DrawingCatalog, DrawingId, StoredDrawing};
pub use error::{StoreError, StoreResult};
pub use repository::{ImageRepository, CATALOG_FILE, FILE_PREFIX};
