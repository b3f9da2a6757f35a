//! Collaborator traits — the narrow seams the publishing core depends on.
//!
//! The coordinator only sees `Publisher`; the inbound dispatcher
//! additionally uses `ChatControl`. Both are satisfied by an adapter
//! around the real chat-platform client.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{PostPayload, SendStatus, SummaryEdit};

/// Outbound transmission surface.
///
/// Failures come back as `SendStatus::Failed` values; the coordinator
/// decides whether to retry.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Primary payload kind (photo upload).
    async fn send_primary(&self, post: &PostPayload) -> SendStatus;

    /// Fallback payload kind (document upload) for the single retry.
    async fn send_fallback(&self, post: &PostPayload) -> SendStatus;

    /// Plain text notice to a chat.
    async fn send_notice(&self, chat_id: i64, text: &str) -> SendStatus;

    /// Re-render the tally line on an already-published message.
    async fn refresh_summary(&self, edit: &SummaryEdit) -> SendStatus;
}

/// Chat-side operations the inbound dispatcher needs.
#[async_trait]
pub trait ChatControl: Send + Sync {
    /// Acknowledge a reaction button press so the client stops spinning.
    async fn acknowledge(&self, callback_id: &str) -> Result<()>;

    /// Whether the user may run privileged operator commands in this chat.
    async fn is_operator(&self, chat_id: i64, user_id: i64) -> Result<bool>;

    /// Download an uploaded attachment by its platform file id.
    async fn fetch_attachment(&self, file_id: &str) -> Result<Vec<u8>>;
}
