//! Publish coordination — pick the next item, attach its tally, and
//! transmit with one fallback retry.

use jinbot_core::error::{JinbotError, Result};
use jinbot_core::types::{reaction_keyboard, PostPayload, PublishOutcome, SendStatus};

use crate::JinBot;

impl JinBot {
    /// Timer tick target. Skips quietly when no destination is bound;
    /// a missed post is never replayed.
    pub(crate) async fn scheduled_publish(&self) -> Result<()> {
        let Some(chat_id) = self.binding() else {
            tracing::warn!("No group chat ID set, skipping scheduled post");
            return Ok(());
        };
        match self.publish(chat_id).await {
            PublishOutcome::Failed => Err(JinbotError::Channel("scheduled post failed".into())),
            _ => Ok(()),
        }
    }

    /// Publish the next rotation item to `chat_id`.
    ///
    /// An empty catalog is a normal outcome: the publisher is not
    /// contacted at all. A primary transmission failure is retried
    /// exactly once as the fallback payload kind, then given up on.
    pub async fn publish(&self, chat_id: i64) -> PublishOutcome {
        let items = self.catalog.items();
        let picked = self
            .selector
            .lock()
            .unwrap()
            .next(self.config.rotation.mode, &items);
        let Some(item) = picked else {
            tracing::warn!("No memes available to send");
            return PublishOutcome::NothingToPublish;
        };

        let summary = self.engagement.lock().unwrap().summary(&item.id);
        let payload = PostPayload {
            chat_id,
            caption: format!("👍 Likes: {summary}"),
            keyboard: reaction_keyboard(&item.id),
            item_id: item.id,
            path: item.path,
        };

        match self.publisher.send_primary(&payload).await {
            SendStatus::Sent => PublishOutcome::Published,
            SendStatus::Failed(e) => {
                tracing::warn!(
                    "Photo send of {} failed ({e}), retrying as document",
                    payload.item_id
                );
                match self.publisher.send_fallback(&payload).await {
                    SendStatus::Sent => PublishOutcome::Published,
                    SendStatus::Failed(e) => {
                        tracing::error!("Failed to send meme {}: {e}", payload.item_id);
                        PublishOutcome::Failed
                    }
                }
            }
        }
    }

    /// Manual HTTP trigger. `None` when no destination is bound.
    pub async fn manual_publish(&self) -> Option<PublishOutcome> {
        let chat_id = self.binding()?;
        Some(self.publish(chat_id).await)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use jinbot_core::types::PublishOutcome;

    use crate::testing::fixture;

    #[tokio::test]
    async fn empty_catalog_never_contacts_publisher() {
        let fx = fixture("pub-empty", &[]);
        assert_eq!(fx.bot.publish(-100).await, PublishOutcome::NothingToPublish);
        assert!(fx.publisher.primary.lock().unwrap().is_empty());
        assert!(fx.publisher.fallback.lock().unwrap().is_empty());
        assert!(fx.publisher.notices.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn publishes_next_item_with_tally_caption() {
        let fx = fixture("pub-ok", &["b.png", "a.png"]);
        assert_eq!(fx.bot.publish(-100).await, PublishOutcome::Published);
        let sent = fx.publisher.primary.lock().unwrap();
        assert_eq!(sent.len(), 1);
        // Sorted order: a.png first.
        assert_eq!(sent[0].item_id, "a.png");
        assert_eq!(sent[0].chat_id, -100);
        assert!(sent[0].caption.contains("No likes yet"));
        assert_eq!(sent[0].keyboard.len(), 3);
    }

    #[tokio::test]
    async fn primary_failure_retries_exactly_once_as_fallback() {
        let fx = fixture("pub-fallback", &["a.png"]);
        fx.publisher.fail_primary.store(true, Ordering::SeqCst);
        assert_eq!(fx.bot.publish(-100).await, PublishOutcome::Published);
        assert_eq!(fx.publisher.primary.lock().unwrap().len(), 1);
        assert_eq!(fx.publisher.fallback.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn gives_up_after_fallback_failure() {
        let fx = fixture("pub-fail", &["a.png"]);
        fx.publisher.fail_primary.store(true, Ordering::SeqCst);
        fx.publisher.fail_fallback.store(true, Ordering::SeqCst);
        assert_eq!(fx.bot.publish(-100).await, PublishOutcome::Failed);
        assert_eq!(fx.publisher.primary.lock().unwrap().len(), 1);
        assert_eq!(fx.publisher.fallback.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn manual_publish_requires_binding() {
        let fx = fixture("pub-unbound", &["a.png"]);
        assert_eq!(fx.bot.manual_publish().await, None);
        assert!(fx.publisher.primary.lock().unwrap().is_empty());
    }
}
