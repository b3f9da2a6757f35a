//! Content catalog — scans a directory of image files into an immutable,
//! sorted snapshot. Reloads swap the whole snapshot, so a publish in
//! flight always reads one consistent list.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use jinbot_core::error::{JinbotError, Result};
use jinbot_core::types::ContentItem;

/// File extensions eligible for the catalog.
pub const ALLOWED_EXT: [&str; 5] = ["png", "jpg", "jpeg", "gif", "webp"];

/// Directory-backed content catalog.
pub struct MemeCatalog {
    dir: PathBuf,
    snapshot: RwLock<Arc<Vec<ContentItem>>>,
}

impl MemeCatalog {
    /// Open a catalog over `dir`, creating the directory if needed, and
    /// load the initial snapshot.
    pub fn new(dir: &Path) -> Self {
        std::fs::create_dir_all(dir).ok();
        let catalog = Self {
            dir: dir.to_path_buf(),
            snapshot: RwLock::new(Arc::new(Vec::new())),
        };
        catalog.reload();
        catalog
    }

    /// Rescan the content directory and swap in a fresh snapshot.
    /// An unreadable directory yields an empty catalog, never an error.
    pub fn reload(&self) -> usize {
        let mut items: Vec<ContentItem> = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.path())
                .filter(|path| path.is_file() && has_allowed_ext(path))
                .filter_map(|path| {
                    let id = path.file_name()?.to_str()?.to_string();
                    Some(ContentItem { id, path })
                })
                .collect(),
            Err(e) => {
                tracing::warn!("Failed to read content dir {}: {e}", self.dir.display());
                Vec::new()
            }
        };
        items.sort_by(|a, b| a.id.cmp(&b.id));
        let count = items.len();
        *self.snapshot.write().unwrap() = Arc::new(items);
        tracing::info!("Loaded {count} memes");
        count
    }

    /// Current immutable snapshot.
    pub fn items(&self) -> Arc<Vec<ContentItem>> {
        self.snapshot.read().unwrap().clone()
    }

    /// Add a new item: validate the extension, write the payload into the
    /// content directory, and reload. Returns the new catalog size.
    pub fn add(&self, filename: &str, bytes: &[u8]) -> Result<usize> {
        let candidate = Path::new(filename);
        if candidate.file_name() != Some(candidate.as_os_str()) {
            return Err(JinbotError::Validation(format!(
                "Invalid filename: {filename}"
            )));
        }
        if !has_allowed_ext(candidate) {
            return Err(JinbotError::Validation(format!(
                "Unsupported file type: {filename}"
            )));
        }
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.dir.join(filename), bytes)
            .map_err(|e| JinbotError::Storage(format!("Failed to store {filename}: {e}")))?;
        Ok(self.reload())
    }
}

/// Whether a filename carries an allow-listed extension.
pub fn allowed_file(name: &str) -> bool {
    has_allowed_ext(Path::new(name))
}

fn has_allowed_ext(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            let ext = ext.to_ascii_lowercase();
            ALLOWED_EXT.contains(&ext.as_str())
        })
}
