//! File-based engagement store — lightweight persistence.
//! The full reaction map is saved as one JSON file (`likes.json`) and
//! rewritten on every change; writes are serialized by the owning task.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use jinbot_core::error::{JinbotError, Result};
use jinbot_core::types::ReactionKind;

/// item id → (actor id → reaction kind)
pub type ReactionMap = HashMap<String, HashMap<String, ReactionKind>>;

/// File-based reaction store.
pub struct EngagementStore {
    path: PathBuf,
}

impl EngagementStore {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Load the reaction map from disk. Missing or corrupt data falls
    /// back to an empty map with a warning, never an error.
    pub fn load(&self) -> ReactionMap {
        if !self.path.exists() {
            return ReactionMap::new();
        }
        match std::fs::read_to_string(&self.path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(map) => {
                    tracing::info!("Loaded likes data");
                    map
                }
                Err(e) => {
                    tracing::warn!("Failed parsing likes data, starting fresh: {e}");
                    ReactionMap::new()
                }
            },
            Err(e) => {
                tracing::warn!("Failed reading likes data, starting fresh: {e}");
                ReactionMap::new()
            }
        }
    }

    /// Save the full reaction map to disk.
    pub fn save(&self, reactions: &ReactionMap) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(reactions)
            .map_err(|e| JinbotError::Storage(format!("Serialize error: {e}")))?;
        std::fs::write(&self.path, json)
            .map_err(|e| JinbotError::Storage(format!("Write error: {e}")))?;
        tracing::debug!("Likes saved to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("jinbot-test-{name}"));
        std::fs::remove_dir_all(&dir).ok();
        std::fs::create_dir_all(&dir).ok();
        dir
    }

    #[test]
    fn round_trips_full_map() {
        let dir = scratch("store-roundtrip");
        let store = EngagementStore::new(&dir.join("likes.json"));

        let mut map = ReactionMap::new();
        let entry = map.entry("cat.png".into()).or_default();
        entry.insert("100".into(), ReactionKind::Heart);
        entry.insert("200".into(), ReactionKind::Haha);
        map.entry("dog.gif".into())
            .or_default()
            .insert("100".into(), ReactionKind::Love);

        store.save(&map).unwrap();
        assert_eq!(store.load(), map);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn round_trips_empty_map() {
        let dir = scratch("store-empty");
        let store = EngagementStore::new(&dir.join("likes.json"));
        store.save(&ReactionMap::new()).unwrap();
        assert_eq!(store.load(), ReactionMap::new());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = scratch("store-missing");
        let store = EngagementStore::new(&dir.join("likes.json"));
        assert!(store.load().is_empty());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn corrupt_file_loads_empty() {
        let dir = scratch("store-corrupt");
        let path = dir.join("likes.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(EngagementStore::new(&path).load().is_empty());
        std::fs::remove_dir_all(&dir).ok();
    }
}
