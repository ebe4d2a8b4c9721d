//! Catalog of saved drawings.
//!
//! Provides a thread-safe [`DrawingCatalog`] that maps auto-incrementing ids
//! to saved image files. A catalog opened on a file is rewritten as JSON after
//! every mutation, while the write lock is still held, through a temp file
//! renamed over the old one.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Catalog row identifier. `0` means "not yet assigned".
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct DrawingId(pub u64);

impl DrawingId {
    /// Placeholder id; [`DrawingCatalog::insert`] replaces it.
    pub const UNASSIGNED: Self = Self(0);

    /// Whether the catalog still has to assign an id.
    #[must_use]
    pub fn is_unassigned(self) -> bool {
        self == Self::UNASSIGNED
    }
}

impl fmt::Display for DrawingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One saved drawing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredDrawing {
    /// Catalog id.
    pub id: DrawingId,
    /// Absolute or data-dir-relative path of the image file.
    pub file_path: PathBuf,
    /// User-facing name.
    pub file_name: String,
    /// Account the drawing belongs to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
}

impl StoredDrawing {
    /// A row with no id yet.
    #[must_use]
    pub fn new(file_path: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        Self {
            id: DrawingId::UNASSIGNED,
            file_path: file_path.into(),
            file_name: file_name.into(),
            owner_id: None,
        }
    }

    /// Set the owner.
    #[must_use]
    pub fn with_owner(mut self, owner_id: impl Into<String>) -> Self {
        self.owner_id = Some(owner_id.into());
        self
    }
}

#[derive(Debug, Default)]
struct CatalogState {
    rows: BTreeMap<DrawingId, StoredDrawing>,
    next_id: u64,
}

impl CatalogState {
    fn from_file(file: CatalogFile) -> StoreResult<Self> {
        let max_id = file.drawings.iter().map(|row| row.id.0).max().unwrap_or(0);
        let after_max = max_id.checked_add(1).ok_or_else(|| {
            StoreError::Serialization(format!("drawing id {max_id} leaves no id to assign"))
        })?;
        Ok(Self {
            next_id: file.next_id.max(after_max),
            rows: file
                .drawings
                .into_iter()
                .map(|row| (row.id, row))
                .collect(),
        })
    }

    fn to_file(&self) -> CatalogFile {
        CatalogFile {
            next_id: self.next_id,
            drawings: self.rows.values().cloned().collect(),
        }
    }
}

/// On-disk layout of the catalog.
#[derive(Debug, Serialize, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    next_id: u64,
    #[serde(default)]
    drawings: Vec<StoredDrawing>,
}

/// Thread-safe catalog of saved drawings.
///
/// Ids are assigned in increasing order and never reused, even after
/// [`clear_all`](Self::clear_all).
///
/// # Example
///
/// ```
/// use drawpad_store::{DrawingCatalog, StoredDrawing};
///
/// let catalog = DrawingCatalog::new();
/// let id = catalog.insert(StoredDrawing::new("drawing_app_1.png", "sketch"))?;
/// assert_eq!(catalog.get(id).map(|row| row.file_name), Some("sketch".to_string()));
/// # Ok::<(), drawpad_store::StoreError>(())
/// ```
#[derive(Debug, Clone)]
pub struct DrawingCatalog {
    state: Arc<RwLock<CatalogState>>,
    /// Optional JSON file for persistence.
    path: Option<PathBuf>,
}

impl Default for DrawingCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawingCatalog {
    /// Create an empty in-memory catalog.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(CatalogState {
                rows: BTreeMap::new(),
                next_id: 1,
            })),
            path: None,
        }
    }

    /// Open a catalog backed by the JSON file at `path`.
    ///
    /// A missing file starts an empty catalog; the file is created on the
    /// first mutation.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file exists but cannot be read and
    /// [`StoreError::Serialization`] if it is not a valid catalog, including
    /// one whose largest id is `u64::MAX`.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let state = match std::fs::read_to_string(&path) {
            Ok(contents) => {
                let file: CatalogFile = serde_json::from_str(&contents)
                    .map_err(|e| StoreError::Serialization(e.to_string()))?;
                let state = CatalogState::from_file(file)?;
                tracing::debug!(
                    "Loaded {} drawings from {}",
                    state.rows.len(),
                    path.display()
                );
                state
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => CatalogState {
                rows: BTreeMap::new(),
                next_id: 1,
            },
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            state: Arc::new(RwLock::new(state)),
            path: Some(path),
        })
    }

    /// Backing file, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Insert a row, replacing any row with the same id.
    ///
    /// An unassigned id (`0`) gets the next free id. Returns the id stored.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::IdOverflow`] if the row would leave no id to
    /// assign next; the catalog is left unchanged.
    pub fn insert(&self, mut row: StoredDrawing) -> StoreResult<DrawingId> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if row.id.is_unassigned() {
            row.id = DrawingId(state.next_id);
        }
        let id = row.id;
        let after = id.0.checked_add(1).ok_or(StoreError::IdOverflow(id))?;
        state.next_id = state.next_id.max(after);
        if state.rows.insert(id, row).is_some() {
            tracing::debug!("Replaced drawing {id}");
        }
        self.persist(&state);
        Ok(id)
    }

    /// All rows, newest id first.
    #[must_use]
    pub fn all(&self) -> Vec<StoredDrawing> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state.rows.values().rev().cloned().collect()
    }

    /// Row by id.
    #[must_use]
    pub fn get(&self, id: DrawingId) -> Option<StoredDrawing> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state.rows.get(&id).cloned()
    }

    /// Remove a row and return it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no row has `id`.
    pub fn delete(&self, id: DrawingId) -> StoreResult<StoredDrawing> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let row = state.rows.remove(&id).ok_or(StoreError::NotFound(id))?;
        self.persist(&state);
        Ok(row)
    }

    /// Remove every row. Returns how many were removed.
    pub fn clear_all(&self) -> usize {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let removed = state.rows.len();
        state.rows.clear();
        self.persist(&state);
        removed
    }

    /// User-facing names, oldest id first.
    #[must_use]
    pub fn file_names(&self) -> Vec<String> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state.rows.values().map(|row| row.file_name.clone()).collect()
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state.rows.len()
    }

    /// Whether the catalog has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    /// Rewrite the backing file. No-op for in-memory catalogs.
    ///
    /// Callers hold the write lock, so writers never interleave and the file
    /// always reflects the newest state.
    fn persist(&self, state: &CatalogState) {
        let Some(ref path) = self.path else {
            return;
        };
        let json = match serde_json::to_string_pretty(&state.to_file()) {
            Ok(j) => j,
            Err(e) => {
                tracing::warn!("Failed to serialize drawing catalog: {e}");
                return;
            }
        };

        let mut temp = path.clone().into_os_string();
        temp.push(format!(".{}.tmp", uuid::Uuid::new_v4().simple()));
        let temp = PathBuf::from(temp);
        let written = std::fs::write(&temp, json).and_then(|()| std::fs::rename(&temp, path));
        if let Err(e) = written {
            tracing::warn!("Failed to persist drawing catalog to {}: {e}", path.display());
            if temp.exists() {
                if let Err(cleanup) = std::fs::remove_file(&temp) {
                    tracing::warn!("Failed to remove {}: {cleanup}", temp.display());
                }
            }
        }
    }
}
