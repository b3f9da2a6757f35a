//! Shared data types — catalog items, reactions, and publish payloads.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One publishable catalog entry. Identity is the stable filename, so
/// reaction tallies survive reposts of the same item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentItem {
    pub id: String,
    pub path: PathBuf,
}

/// The fixed set of reaction kinds recipients can register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionKind {
    Heart,
    Love,
    Haha,
}

/// Callback-data prefix for reaction buttons.
const LIKE_PREFIX: &str = "LIKE_";

impl ReactionKind {
    /// All kinds in display order. Summaries and keyboards follow this order.
    pub const ALL: [ReactionKind; 3] = [ReactionKind::Heart, ReactionKind::Love, ReactionKind::Haha];

    /// Stable wire tag, also used as the persisted representation.
    pub fn tag(self) -> &'static str {
        match self {
            ReactionKind::Heart => "heart",
            ReactionKind::Love => "love",
            ReactionKind::Haha => "haha",
        }
    }

    /// Emoji shown on buttons and in rendered summaries.
    pub fn symbol(self) -> &'static str {
        match self {
            ReactionKind::Heart => "❤️",
            ReactionKind::Love => "🔥",
            ReactionKind::Haha => "😂",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.tag() == tag)
    }

    /// Callback data tying a button press back to this item.
    pub fn callback_data(self, item_id: &str) -> String {
        format!("{LIKE_PREFIX}{}|{item_id}", self.tag())
    }
}

/// Parse reaction callback data (`LIKE_<tag>|<item_id>`).
/// Returns `None` for anything malformed, unknown tags included.
pub fn parse_reaction(data: &str) -> Option<(ReactionKind, String)> {
    let rest = data.strip_prefix(LIKE_PREFIX)?;
    let (tag, item_id) = rest.split_once('|')?;
    if item_id.is_empty() {
        return None;
    }
    Some((ReactionKind::from_tag(tag)?, item_id.to_string()))
}

/// Which strategy picks the next item to publish.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotationMode {
    #[default]
    Sequential,
    Random,
}

/// Explicit transmission result from the publisher collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendStatus {
    Sent,
    Failed(String),
}

/// Outcome of one publish attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    Published,
    /// Empty catalog; a normal outcome, not an error.
    NothingToPublish,
    /// Primary and fallback transmission both failed.
    Failed,
}

/// One inline reaction button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionButton {
    pub label: String,
    pub data: String,
}

/// The reaction affordances for one item, in display order.
pub fn reaction_keyboard(item_id: &str) -> Vec<ReactionButton> {
    ReactionKind::ALL
        .into_iter()
        .map(|kind| ReactionButton {
            label: kind.symbol().to_string(),
            data: kind.callback_data(item_id),
        })
        .collect()
}

/// Everything the publisher needs to transmit one post.
#[derive(Debug, Clone)]
pub struct PostPayload {
    pub chat_id: i64,
    pub item_id: String,
    pub path: PathBuf,
    pub caption: String,
    pub keyboard: Vec<ReactionButton>,
}

/// An in-place caption update after a recorded reaction.
#[derive(Debug, Clone)]
pub struct SummaryEdit {
    pub chat_id: i64,
    pub message_id: i64,
    pub caption: String,
    pub keyboard: Vec<ReactionButton>,
}
