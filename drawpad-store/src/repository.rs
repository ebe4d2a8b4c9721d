//! Drawing files on disk plus their catalog rows.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use drawpad_core::{DrawingPersistence, PixelBuffer, Rgba, Snapshot};
use drawpad_renderer::{fit_or_blank, image_to_buffer, load_image_from_path, BufferExporter};

use crate::catalog::{DrawingCatalog, DrawingId, StoredDrawing};
use crate::error::{StoreError, StoreResult};

/// Catalog file name inside the data directory.
pub const CATALOG_FILE: &str = "catalog.json";

/// Prefix of generated image file names.
pub const FILE_PREFIX: &str = "drawing_app_";

/// Saves drawings as PNG files and keeps the catalog in step.
///
/// Cloning is cheap and clones share the catalog.
#[derive(Debug, Clone)]
pub struct ImageRepository {
    data_dir: PathBuf,
    catalog: DrawingCatalog,
    background: Rgba,
    /// Serializes choosing a free file name and claiming it.
    naming: Arc<Mutex<()>>,
}

impl ImageRepository {
    /// Open the repository in `data_dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory cannot be created and any
    /// error from [`DrawingCatalog::open`].
    pub fn open(data_dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let data_dir = data_dir.into();
        std::fs::create_dir_all(&data_dir)?;
        let catalog = DrawingCatalog::open(data_dir.join(CATALOG_FILE))?;
        tracing::info!(
            "Opened drawing repository at {} ({} drawings)",
            data_dir.display(),
            catalog.len()
        );
        Ok(Self {
            data_dir,
            catalog,
            background: Rgba::WHITE,
            naming: Arc::new(Mutex::new(())),
        })
    }

    /// Use `background` for blank and letterboxed canvases.
    #[must_use]
    pub fn with_background(mut self, background: Rgba) -> Self {
        self.background = background;
        self
    }

    /// Directory holding the images and the catalog.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// The catalog.
    #[must_use]
    pub fn catalog(&self) -> &DrawingCatalog {
        &self.catalog
    }

    /// Encode `buffer` as PNG, write it under a fresh name and record it.
    ///
    /// The file is written to a temporary name first and renamed into place,
    /// so a crash never leaves a truncated PNG under a catalogued name.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Render`] if encoding fails, [`StoreError::Io`]
    /// if the file cannot be written and [`StoreError::IdOverflow`] if the
    /// catalog has run out of ids.
    pub fn save_image(&self, buffer: &PixelBuffer, file_name: &str) -> StoreResult<StoredDrawing> {
        let bytes = BufferExporter::encode_png(buffer)?;

        let temp = self
            .data_dir
            .join(format!(".{}.tmp", uuid::Uuid::new_v4().simple()));
        std::fs::write(&temp, bytes)?;

        let target = {
            let _guard = self.naming.lock().unwrap_or_else(PoisonError::into_inner);
            let target = self.free_path(current_timestamp_ms());
            if let Err(e) = std::fs::rename(&temp, &target) {
                if let Err(cleanup) = std::fs::remove_file(&temp) {
                    tracing::warn!("Failed to remove {}: {cleanup}", temp.display());
                }
                return Err(e.into());
            }
            target
        };

        let mut row = StoredDrawing::new(target, file_name);
        row.id = match self.catalog.insert(row.clone()) {
            Ok(id) => id,
            Err(e) => {
                if let Err(cleanup) = std::fs::remove_file(&row.file_path) {
                    tracing::warn!("Failed to remove {}: {cleanup}", row.file_path.display());
                }
                return Err(e);
            }
        };
        tracing::debug!(
            "Saved drawing {} as {} ({}px)",
            row.id,
            row.file_path.display(),
            buffer.size()
        );
        Ok(row)
    }

    /// [`save_image`](Self::save_image) on the blocking thread pool.
    ///
    /// # Errors
    ///
    /// Returns whatever `save_image` returns, or [`StoreError::Task`] if the
    /// blocking task panics.
    pub async fn save_snapshot(
        &self,
        snapshot: Snapshot,
        file_name: impl Into<String>,
    ) -> StoreResult<StoredDrawing> {
        let repo = self.clone();
        let file_name = file_name.into();
        tokio::task::spawn_blocking(move || repo.save_image(&snapshot, &file_name))
            .await
            .map_err(|e| StoreError::Task(e.to_string()))?
    }

    /// Decode a stored square drawing. `None` if it is missing, unreadable
    /// or not square.
    #[must_use]
    pub fn load_image(&self, path: &Path) -> Option<PixelBuffer> {
        let decoded = match load_image_from_path(path) {
            Ok(decoded) => decoded,
            Err(e) => {
                tracing::debug!("Cannot load {}: {e}", path.display());
                return None;
            }
        };
        match image_to_buffer(&decoded.pixels) {
            Ok(buffer) => Some(buffer),
            Err(e) => {
                tracing::debug!("Cannot use {} as a drawing: {e}", path.display());
                None
            }
        }
    }

    /// Prepare a `size` canvas for editing the image at `path`.
    ///
    /// A stored drawing of exactly `size` pixels is returned unchanged. Any
    /// other image is fitted onto the canvas, and a missing or undecodable
    /// file yields a blank canvas.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Render`] if `size` is zero.
    pub fn open_drawing(&self, path: Option<&Path>, size: u32) -> StoreResult<PixelBuffer> {
        let decoded = path.and_then(|path| match load_image_from_path(path) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                tracing::warn!("Cannot open {}: {e}; starting blank", path.display());
                None
            }
        });

        if let Some(ref decoded) = decoded {
            if decoded.width() == size && decoded.height() == size {
                return Ok(image_to_buffer(&decoded.pixels)?);
            }
        }

        Ok(fit_or_blank(
            decoded.as_ref().map(|d| &d.pixels),
            size,
            self.background,
        )?)
    }

    /// Remove a drawing's row and its file.
    ///
    /// A file that cannot be removed is logged and left behind.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no row has `id`.
    pub fn delete_image(&self, id: DrawingId) -> StoreResult<StoredDrawing> {
        let row = self.catalog.delete(id)?;
        if let Err(e) = std::fs::remove_file(&row.file_path) {
            tracing::warn!(
                "Deleted drawing {id} but could not remove {}: {e}",
                row.file_path.display()
            );
        }
        Ok(row)
    }

    /// Drop every catalog row. Image files stay on disk.
    pub fn clear_db(&self) -> usize {
        let removed = self.catalog.clear_all();
        tracing::info!("Cleared {removed} drawings from the catalog");
        removed
    }

    /// All drawings, newest first.
    #[must_use]
    pub fn all_images(&self) -> Vec<StoredDrawing> {
        self.catalog.all()
    }

    /// User-facing names, oldest first.
    #[must_use]
    pub fn file_names(&self) -> Vec<String> {
        self.catalog.file_names()
    }

    fn free_path(&self, millis: u64) -> PathBuf {
        let base = format!("{FILE_PREFIX}{millis}");
        let mut candidate = self.data_dir.join(format!("{base}.png"));
        let mut suffix = 1u32;
        while candidate.exists() {
            candidate = self.data_dir.join(format!("{base}-{suffix}.png"));
            suffix += 1;
        }
        candidate
    }
}

impl DrawingPersistence for ImageRepository {
    type Error = StoreError;

    fn save(&self, buffer: &PixelBuffer, file_name: &str) -> Result<PathBuf, Self::Error> {
        self.save_image(buffer, file_name).map(|row| row.file_path)
    }

    fn load(&self, path: &Path) -> Option<PixelBuffer> {
        self.load_image(path)
    }
}

/// Get the current Unix timestamp in milliseconds.
fn current_timestamp_ms() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |d| {
        #[allow(clippy::cast_possible_truncation)]
        {
            d.as_millis() as u64
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo() -> (tempfile::TempDir, ImageRepository) {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = ImageRepository::open(dir.path().join("drawings")).expect("open");
        (dir, repo)
    }

    fn marked(size: u32) -> PixelBuffer {
        let mut buffer = PixelBuffer::new(size, Rgba::WHITE).expect("buffer");
        buffer.put_pixel(1, 2, Rgba::RED);
        buffer
    }

    #[test]
    fn test_open_creates_directory() {
        let (_dir, repo) = repo();
        assert!(repo.data_dir().is_dir());
        assert!(repo.all_images().is_empty());
    }

    #[test]
    fn test_save_names_and_records() {
        let (_dir, repo) = repo();
        let row = repo.save_image(&marked(8), "sketch").expect("save");

        assert_eq!(row.id, DrawingId(1));
        assert_eq!(row.file_name, "sketch");
        let name = row
            .file_path
            .file_name()
            .and_then(|n| n.to_str())
            .expect("name");
        assert!(name.starts_with(FILE_PREFIX), "{name}");
        assert!(name.ends_with(".png"), "{name}");
        assert!(row.file_path.is_file());
        assert_eq!(repo.all_images(), vec![row]);
    }

    #[test]
    fn test_same_millisecond_gets_suffix() {
        let (_dir, repo) = repo();
        let first = repo.free_path(42);
        std::fs::write(&first, b"taken").expect("write");
        let second = repo.free_path(42);
        assert_ne!(first, second);
        assert!(second.ends_with("drawing_app_42-1.png"));
    }

    #[test]
    fn test_no_temp_files_left_behind() {
        let (_dir, repo) = repo();
        repo.save_image(&marked(4), "a").expect("save");
        let leftovers = std::fs::read_dir(repo.data_dir())
            .expect("read_dir")
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .count();
        assert_eq!(leftovers, 0);
    }

    #[test]
    fn test_load_round_trip() {
        let (_dir, repo) = repo();
        let buffer = marked(8);
        let row = repo.save_image(&buffer, "rt").expect("save");
        assert_eq!(repo.load_image(&row.file_path), Some(buffer));
        assert_eq!(repo.load_image(Path::new("/nope.png")), None);
    }

    #[test]
    fn test_delete_removes_row_and_file() {
        let (_dir, repo) = repo();
        let row = repo.save_image(&marked(4), "bye").expect("save");
        repo.delete_image(row.id).expect("delete");
        assert!(!row.file_path.exists());
        assert!(repo.all_images().is_empty());
        assert!(matches!(
            repo.delete_image(row.id),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_delete_tolerates_missing_file() {
        let (_dir, repo) = repo();
        let row = repo.save_image(&marked(4), "gone").expect("save");
        std::fs::remove_file(&row.file_path).expect("remove");
        assert!(repo.delete_image(row.id).is_ok());
    }

    #[test]
    fn test_clear_db_keeps_files() {
        let (_dir, repo) = repo();
        let row = repo.save_image(&marked(4), "kept").expect("save");
        assert_eq!(repo.clear_db(), 1);
        assert!(repo.file_names().is_empty());
        assert!(row.file_path.exists());
    }

    #[test]
    fn test_persistence_trait() {
        let (_dir, repo) = repo();
        let buffer = marked(6);
        let path = DrawingPersistence::save(&repo, &buffer, "via-trait").expect("save");
        let opened = drawpad_core::open_or_blank(&repo, Some(&path), 6, Rgba::WHITE).expect("open");
        assert_eq!(opened, buffer);

        let resized = drawpad_core::open_or_blank(&repo, Some(&path), 12, Rgba::WHITE).expect("open");
        assert_eq!(resized.count_matching(Rgba::WHITE), 144);
    }
}
