//! Subcommand implementations.

use std::io::Write;
use std::path::Path;

use anyhow::Context;
use drawpad_core::{PixelBuffer, RasterCanvas, StrokeScript, StrokeSession};
use drawpad_renderer::{
    fit, image_to_buffer, load_image_from_path, mime_for_path, thumbnail, BufferExporter,
    ExportConfig,
};
use drawpad_store::{DrawingId, ImageRepository, StoreError, StoredDrawing};
use drawpad_vision::{ImageAnalysis, VisionClient};

use crate::{Command, Config};

/// Execute `command`, writing user-facing output to `out`.
///
/// # Errors
///
/// Returns an error if the command fails; the message names the step that
/// failed.
pub async fn run<W: Write>(config: &Config, command: Command, out: &mut W) -> anyhow::Result<()> {
    match command {
        Command::New { name } => {
            let repo = open_repository(config)?;
            let blank = PixelBuffer::new(config.canvas_size, config.background)?;
            let row = repo.save_image(&blank, &name)?;
            print_row(out, &row)?;
        }
        Command::Draw { name, script, from } => {
            let repo = open_repository(config)?;
            let row = draw(config, &repo, &name, &script, from.as_deref()).await?;
            print_row(out, &row)?;
        }
        Command::Import { image, name } => {
            let repo = open_repository(config)?;
            let decoded = load_image_from_path(&image)
                .with_context(|| format!("cannot import {}", image.display()))?;
            let buffer = fit(&decoded.pixels, config.canvas_size, config.background)?;
            let row = repo.save_image(&buffer, &name)?;
            print_row(out, &row)?;
        }
        Command::List { json } => {
            let rows = open_repository(config)?.all_images();
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&rows)?)?;
            } else {
                for row in &rows {
                    print_row(out, row)?;
                }
            }
        }
        Command::Delete { id } => {
            let row = open_repository(config)?.delete_image(DrawingId(id))?;
            writeln!(out, "Deleted {} ({})", row.id, row.file_name)?;
        }
        Command::Clear => {
            let removed = open_repository(config)?.clear_db();
            writeln!(out, "Removed {removed} drawings from the catalog")?;
        }
        Command::Export {
            id,
            out: target,
            quality,
            thumbnail: max_size,
        } => {
            let repo = open_repository(config)?;
            let id = DrawingId(id);
            let row = repo.catalog().get(id).ok_or(StoreError::NotFound(id))?;
            let mut buffer = repo
                .load_image(&row.file_path)
                .with_context(|| format!("cannot read {}", row.file_path.display()))?;
            if let Some(max_size) = max_size {
                buffer = image_to_buffer(&thumbnail(&buffer, max_size)?)?;
            }

            let exporter = BufferExporter::new(ExportConfig {
                background: config.background,
                jpeg_quality: quality,
            });
            exporter.export_to_path(&buffer, &target)?;
            writeln!(out, "{}\t{}", target.display(), mime_for_path(&target))?;
        }
        Command::Analyze {
            image,
            api_key,
            endpoint,
            json,
        } => {
            let client = VisionClient::new(&endpoint, &api_key)?;
            let analysis = client
                .analyze_file(&image)
                .await
                .with_context(|| format!("cannot analyze {}", image.display()))?;
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&analysis)?)?;
            } else {
                print_analysis(out, &image, &analysis)?;
            }
        }
    }
    Ok(())
}

fn open_repository(config: &Config) -> anyhow::Result<ImageRepository> {
    let repo = ImageRepository::open(&config.data_dir)
        .with_context(|| format!("cannot open {}", config.data_dir.display()))?;
    Ok(repo.with_background(config.background))
}

async fn draw(
    config: &Config,
    repo: &ImageRepository,
    name: &str,
    script: &Path,
    from: Option<&Path>,
) -> anyhow::Result<StoredDrawing> {
    let json = std::fs::read_to_string(script)
        .with_context(|| format!("cannot read script {}", script.display()))?;
    let script = StrokeScript::from_json(&json)?;

    let mut canvas = RasterCanvas::with_background(config.canvas_size, config.background)?;
    canvas.load(repo.open_drawing(from, config.canvas_size)?)?;

    let mut session = StrokeSession::new(canvas);
    let stats = script.replay(&mut session)?;
    tracing::info!(
        "Replayed {} gestures ({} samples)",
        stats.gestures,
        stats.samples
    );

    let snapshot = session.canvas().snapshot();
    Ok(repo.save_snapshot(snapshot, name).await?)
}

fn print_row<W: Write>(out: &mut W, row: &StoredDrawing) -> std::io::Result<()> {
    writeln!(
        out,
        "{}\t{}\t{}",
        row.id,
        row.file_name,
        row.file_path.display()
    )
}

fn print_analysis<W: Write>(
    out: &mut W,
    image: &Path,
    analysis: &ImageAnalysis,
) -> std::io::Result<()> {
    // Pixel boxes need the image size; fall back to normalized coordinates
    let dimensions = load_image_from_path(image)
        .ok()
        .map(|decoded| (decoded.width(), decoded.height()));

    if analysis.is_empty() {
        writeln!(out, "Nothing detected")?;
    }
    for object in &analysis.objects {
        let b = object.bounds;
        match dimensions {
            Some((w, h)) => {
                let rect = b.to_pixels(w, h);
                writeln!(
                    out,
                    "object\t{}\t{:.2}\t{},{} {}x{}",
                    object.name, object.confidence, rect.x, rect.y, rect.width, rect.height
                )?;
            }
            None => writeln!(
                out,
                "object\t{}\t{:.2}\t{:.3},{:.3} {:.3}x{:.3}",
                object.name,
                object.confidence,
                b.left,
                b.top,
                b.width(),
                b.height()
            )?,
        }
    }
    for label in &analysis.labels {
        writeln!(out, "label\t{}\t{:.2}", label.label, label.confidence)?;
    }
    Ok(())
}
