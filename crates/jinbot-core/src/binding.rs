//! Destination-channel binding persistence.
//!
//! One chat id in a plain text file, loaded once at startup.

use std::path::{Path, PathBuf};

use crate::error::{JinbotError, Result};

/// File-backed store for the single destination chat id.
pub struct BindingStore {
    path: PathBuf,
}

impl BindingStore {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Load the bound chat id. Missing or unparseable files yield `None`.
    pub fn load(&self) -> Option<i64> {
        if !self.path.exists() {
            return None;
        }
        match std::fs::read_to_string(&self.path) {
            Ok(text) => match text.trim().parse::<i64>() {
                Ok(chat_id) => {
                    tracing::info!("Loaded group chat ID: {chat_id}");
                    Some(chat_id)
                }
                Err(e) => {
                    tracing::warn!("Failed to parse saved group chat ID: {e}");
                    None
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read saved group chat ID: {e}");
                None
            }
        }
    }

    /// Persist the bound chat id, creating the parent directory if needed.
    pub fn save(&self, chat_id: i64) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, chat_id.to_string())
            .map_err(|e| JinbotError::Storage(format!("Failed to save group chat ID: {e}")))?;
        tracing::info!("Saved group chat ID: {chat_id}");
        Ok(())
    }
}
