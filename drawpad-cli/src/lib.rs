//! # Drawpad CLI
//!
//! Command-line host for the Drawpad drawing engine.
//!
//! ## Usage
//!
//! ```bash
//! drawpad new sketch
//! drawpad draw sketch --script strokes.json
//! drawpad import photo.jpg "holiday"
//! drawpad list
//! drawpad export 3 share.jpg
//! VISION_API_KEY=... drawpad analyze share.jpg
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `Config` - Data directory, canvas size and background shared by commands
//! - `commands::run` - Executes one [`Command`] against an `ImageRepository`

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use drawpad_core::{Rgba, DEFAULT_CANVAS_SIZE};
use drawpad_vision::DEFAULT_ENDPOINT;

pub use commands::run;

/// Command-line arguments for drawpad.
#[derive(Debug, Clone, Parser)]
#[command(name = "drawpad")]
#[command(about = "Free-hand raster drawing with a local drawing catalog")]
#[command(version)]
pub struct CliArgs {
    /// Directory holding saved drawings and the catalog
    #[arg(long, env = "DRAWPAD_DATA_DIR", default_value = "drawpad-data", global = true)]
    pub data_dir: PathBuf,

    /// Side length of the square canvas in pixels
    #[arg(
        long,
        env = "DRAWPAD_CANVAS_SIZE",
        default_value_t = DEFAULT_CANVAS_SIZE,
        value_parser = clap::value_parser!(u32).range(1..),
        global = true
    )]
    pub size: u32,

    /// Canvas background as #RRGGBB or #RRGGBBAA
    #[arg(long, default_value = "#FFFFFF", global = true)]
    pub background: Rgba,

    /// What to do
    #[command(subcommand)]
    pub command: Command,
}

/// Drawpad subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Save a blank drawing
    New {
        /// Name shown in the drawing list
        name: String,
    },
    /// Replay a JSON stroke script onto a canvas and save it
    Draw {
        /// Name shown in the drawing list
        name: String,
        /// Stroke script (JSON array of pen/down/move/up/clear commands)
        #[arg(long)]
        script: PathBuf,
        /// Start from this image instead of a blank canvas
        #[arg(long)]
        from: Option<PathBuf>,
    },
    /// Fit a photo onto a blank canvas and save it
    Import {
        /// Image file to import
        image: PathBuf,
        /// Name shown in the drawing list
        name: String,
    },
    /// List saved drawings, newest first
    List {
        /// Print the catalog rows as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a drawing and its file
    Delete {
        /// Drawing id
        id: u64,
    },
    /// Forget every drawing in the catalog (files are kept)
    Clear,
    /// Re-encode a drawing for sharing; the format follows the extension
    Export {
        /// Drawing id
        id: u64,
        /// Output file (.png, .jpg or .jpeg)
        out: PathBuf,
        /// JPEG quality 1-100
        #[arg(long, default_value_t = 85, value_parser = clap::value_parser!(u8).range(1..=100))]
        quality: u8,
        /// Shrink to at most this many pixels per side
        #[arg(long)]
        thumbnail: Option<u32>,
    },
    /// Detect objects and labels in an image
    Analyze {
        /// Image file to analyze
        image: PathBuf,
        /// Vision API key
        #[arg(long, env = "VISION_API_KEY", hide_env_values = true)]
        api_key: String,
        /// Annotate endpoint
        #[arg(long, env = "VISION_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
        endpoint: String,
        /// Print the analysis as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Settings shared by every command.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding saved drawings and the catalog.
    pub data_dir: PathBuf,
    /// Canvas side length in pixels.
    pub canvas_size: u32,
    /// Canvas background.
    pub background: Rgba,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            data_dir: PathBuf::from("drawpad-data"),
            canvas_size: DEFAULT_CANVAS_SIZE,
            background: Rgba::WHITE,
        }
    }
}

impl From<CliArgs> for Config {
    fn from(args: CliArgs) -> Self {
        Self {
            data_dir: args.data_dir,
            canvas_size: args.size,
            background: args.background,
        }
    }
}
