//! Next-item selection — strict round-robin or recency-avoiding random.

use std::collections::VecDeque;

use rand::seq::SliceRandom;

use jinbot_core::types::{ContentItem, RotationMode};

/// How many distinct recently-shown items the random strategy avoids.
pub const HISTORY_CAPACITY: usize = 5;

/// Chooses the next catalog item to publish.
///
/// Cursor and history are in-memory only; both reset on restart.
pub struct RotationSelector {
    cursor: usize,
    recent: VecDeque<String>,
    capacity: usize,
}

impl Default for RotationSelector {
    fn default() -> Self {
        Self::new(HISTORY_CAPACITY)
    }
}

impl RotationSelector {
    pub fn new(capacity: usize) -> Self {
        Self {
            cursor: 0,
            recent: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Pick the next item from the given snapshot. An empty catalog
    /// yields `None` in either mode.
    pub fn next(&mut self, mode: RotationMode, items: &[ContentItem]) -> Option<ContentItem> {
        if items.is_empty() {
            return None;
        }
        let picked = match mode {
            RotationMode::Sequential => {
                let item = items[self.cursor % items.len()].clone();
                self.cursor += 1;
                item
            }
            RotationMode::Random => {
                let candidates: Vec<&ContentItem> = items
                    .iter()
                    .filter(|item| !self.recent.contains(&item.id))
                    .collect();
                let pool = if candidates.is_empty() {
                    // Catalog exhausted (or smaller than the window):
                    // forget the history and pick from everything.
                    self.recent.clear();
                    items.iter().collect()
                } else {
                    candidates
                };
                (*pool.choose(&mut rand::thread_rng())?).clone()
            }
        };
        self.remember(&picked.id);
        Some(picked)
    }

    /// Track the last `capacity` distinct item ids, most recent at the back.
    fn remember(&mut self, id: &str) {
        if let Some(pos) = self.recent.iter().position(|seen| seen == id) {
            self.recent.remove(pos);
        }
        self.recent.push_back(id.to_string());
        if self.recent.len() > self.capacity {
            self.recent.pop_front();
        }
    }
}
