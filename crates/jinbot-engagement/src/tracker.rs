//! Reaction tracking — one reaction per (item, actor), rendered as a
//! tally summary line.

use jinbot_core::types::ReactionKind;

use crate::store::{EngagementStore, ReactionMap};

/// Result of recording a reaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// Stored and persisted.
    Applied,
    /// The actor already reacted to this item; no state change, no write.
    Ignored,
}

/// Owns the per-item reaction state and its persistence.
pub struct EngagementTracker {
    reactions: ReactionMap,
    store: EngagementStore,
}

impl EngagementTracker {
    /// Load tracked reactions from the store (empty on missing/corrupt data).
    pub fn load(store: EngagementStore) -> Self {
        let reactions = store.load();
        Self { reactions, store }
    }

    /// Record `kind` from `actor` against `item`.
    ///
    /// The in-memory map is updated before the persistence write is
    /// issued, so a concurrent summary read sees the new tally even if
    /// the write is still in flight. A failed write leaves memory
    /// authoritative; the next successful save reconciles the file.
    pub fn record(&mut self, item: &str, actor: &str, kind: ReactionKind) -> RecordOutcome {
        let actors = self.reactions.entry(item.to_string()).or_default();
        if actors.contains_key(actor) {
            return RecordOutcome::Ignored;
        }
        actors.insert(actor.to_string(), kind);
        if let Err(e) = self.store.save(&self.reactions) {
            tracing::warn!("Failed to save likes data: {e}");
        }
        RecordOutcome::Applied
    }

    /// Render the tally for `item`, e.g. `❤️ 2 | 🔥 1 (Total: 3)`.
    pub fn summary(&self, item: &str) -> String {
        let Some(actors) = self.reactions.get(item) else {
            return Self::empty_summary();
        };
        let mut parts = Vec::new();
        let mut total = 0usize;
        for kind in ReactionKind::ALL {
            let count = actors.values().filter(|&&k| k == kind).count();
            if count > 0 {
                parts.push(format!("{} {count}", kind.symbol()));
                total += count;
            }
        }
        if parts.is_empty() {
            Self::empty_summary()
        } else {
            format!("{} (Total: {total})", parts.join(" | "))
        }
    }

    fn empty_summary() -> String {
        "No likes yet. Be the first!".to_string()
    }
}
