//! Inbound event dispatch — reaction buttons, operator commands, and
//! destination discovery. Malformed events are dropped, never surfaced
//! back to the sender.

use jinbot_channels::telegram::{TelegramCallbackQuery, TelegramMessage, TelegramUpdate};
use jinbot_core::error::JinbotError;
use jinbot_core::types::{parse_reaction, reaction_keyboard, SendStatus, SummaryEdit};
use jinbot_engagement::RecordOutcome;

use crate::JinBot;

impl JinBot {
    /// Route one inbound update.
    pub async fn handle_update(&self, update: TelegramUpdate) {
        if let Some(callback) = update.callback_query {
            self.handle_callback(callback).await;
        } else if let Some(message) = update.message {
            self.handle_message(message).await;
        }
    }

    /// A reaction button press. Idempotent per (item, actor): only an
    /// applied reaction triggers a caption refresh.
    async fn handle_callback(&self, callback: TelegramCallbackQuery) {
        if let Err(e) = self.chat.acknowledge(&callback.id).await {
            tracing::debug!("Failed to answer callback: {e}");
        }
        let Some((kind, item_id)) = callback.data.as_deref().and_then(parse_reaction) else {
            tracing::debug!("Dropping malformed reaction event");
            return;
        };

        let actor = callback.from.id.to_string();
        let (outcome, summary) = {
            let mut engagement = self.engagement.lock().unwrap();
            let outcome = engagement.record(&item_id, &actor, kind);
            (outcome, engagement.summary(&item_id))
        };
        if outcome == RecordOutcome::Ignored {
            return;
        }

        let Some(message) = callback.message else {
            return;
        };
        let edit = SummaryEdit {
            chat_id: message.chat.id,
            message_id: message.message_id,
            caption: format!("👍 Likes: {summary}"),
            keyboard: reaction_keyboard(&item_id),
        };
        if let SendStatus::Failed(e) = self.publisher.refresh_summary(&edit).await {
            tracing::warn!("Failed to update likes caption: {e}");
        }
    }

    async fn handle_message(&self, message: TelegramMessage) {
        let text = message.text.clone().unwrap_or_default();
        if let Some(rest) = text.strip_prefix('/') {
            let mut parts = rest.split_whitespace();
            let command = parts.next().unwrap_or_default();
            let arg = parts.next().map(str::to_string);
            // Group clients may suffix the bot name: /setinterval@jinbot
            match command.split('@').next().unwrap_or_default() {
                "start" => self.notice(message.chat.id, "Bot is online!").await,
                "setinterval" => self.handle_set_interval(&message, arg).await,
                "add" => self.handle_add(&message).await,
                "getgroupid" => self.handle_get_group_id(&message).await,
                "init_group" => self.handle_init_group(&message).await,
                _ => {}
            }
        } else if !text.is_empty() {
            self.discover_channel(&message).await;
        }
    }

    /// First group-type message binds the destination and starts the
    /// timer at the currently configured period.
    async fn discover_channel(&self, message: &TelegramMessage) {
        if !message.chat.is_group() || self.binding().is_some() {
            return;
        }
        self.bind(message.chat.id);
        if !self.scheduler().is_active() {
            match self.scheduler().start(self.scheduler().current_period()) {
                Ok(()) => tracing::info!("Started scheduled posts; group chat ID detected"),
                Err(e) => tracing::warn!("Could not start posting timer: {e}"),
            }
        }
    }

    async fn handle_set_interval(&self, message: &TelegramMessage, arg: Option<String>) {
        let chat_id = message.chat.id;
        let Some(user) = &message.from else {
            return;
        };
        if !self.operator_check(chat_id, user.id).await {
            self.notice(chat_id, "Only admins can set the posting interval.")
                .await;
            return;
        }
        let Some(minutes) = arg.and_then(|a| a.parse::<u64>().ok()) else {
            self.notice(chat_id, "Usage: /setinterval <minutes>").await;
            return;
        };
        match self.scheduler().reconfigure(minutes) {
            Ok(()) => {
                self.notice(
                    chat_id,
                    &format!("✅ Post interval set to every {minutes} minute(s)."),
                )
                .await
            }
            Err(_) => {
                self.notice(chat_id, "Please select a value between 1 and 60.")
                    .await
            }
        }
    }

    /// Add the replied-to photo or document to the catalog.
    async fn handle_add(&self, message: &TelegramMessage) {
        let chat_id = message.chat.id;
        let Some(user) = &message.from else {
            return;
        };
        if !self.operator_check(chat_id, user.id).await {
            self.notice(chat_id, "Only admins can add memes.").await;
            return;
        }
        let Some(replied) = &message.reply_to_message else {
            self.notice(chat_id, "Please reply to a photo or document with /add.")
                .await;
            return;
        };

        // Photos come as size variants; the last one is the largest.
        let attachment = if let Some(photo) = replied.photo.as_ref().and_then(|sizes| sizes.last())
        {
            Some((photo.file_id.clone(), format!("{}.jpg", photo.file_id)))
        } else if let Some(document) = &replied.document {
            document
                .file_name
                .clone()
                .map(|name| (document.file_id.clone(), name))
        } else {
            None
        };
        let Some((file_id, filename)) = attachment else {
            self.notice(chat_id, "Unsupported file type.").await;
            return;
        };
        if !jinbot_catalog::catalog::allowed_file(&filename) {
            self.notice(chat_id, "Unsupported file type.").await;
            return;
        }

        let bytes = match self.chat.fetch_attachment(&file_id).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!("Failed to download {filename}: {e}");
                self.notice(chat_id, "Failed to download the file.").await;
                return;
            }
        };
        match self.catalog.add(&filename, &bytes) {
            Ok(count) => {
                tracing::info!("Meme {filename} added ({count} total)");
                self.notice(chat_id, "✅ Meme added successfully.").await;
            }
            Err(JinbotError::Validation(_)) => {
                self.notice(chat_id, "Unsupported file type.").await;
            }
            Err(e) => {
                tracing::error!("Failed to store {filename}: {e}");
                self.notice(chat_id, "Failed to store the file.").await;
            }
        }
    }

    async fn handle_get_group_id(&self, message: &TelegramMessage) {
        let chat = &message.chat;
        self.notice(chat.id, &format!("Group chat ID is: {}", chat.id))
            .await;
        if chat.is_group() && self.binding().is_none() {
            self.bind(chat.id);
        }
    }

    /// Explicit operator action: (re)bind the destination to this group.
    async fn handle_init_group(&self, message: &TelegramMessage) {
        let chat = &message.chat;
        if !chat.is_group() {
            self.notice(chat.id, "This command can only be used in groups.")
                .await;
            return;
        }
        self.bind(chat.id);
        if !self.scheduler().is_active() {
            if let Err(e) = self.scheduler().start(self.scheduler().current_period()) {
                tracing::warn!("Could not start posting timer: {e}");
            }
        }
        self.notice(chat.id, &format!("✅ Group initialized with ID {}", chat.id))
            .await;
    }

    async fn operator_check(&self, chat_id: i64, user_id: i64) -> bool {
        match self.chat.is_operator(chat_id, user_id).await {
            Ok(is_operator) => is_operator,
            Err(e) => {
                tracing::warn!("Operator check failed: {e}");
                false
            }
        }
    }

    async fn notice(&self, chat_id: i64, text: &str) {
        if let SendStatus::Failed(e) = self.publisher.send_notice(chat_id, text).await {
            tracing::warn!("Failed to send notice: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use crate::testing::{add_document_update, fixture, reaction_update, text_update};

    #[tokio::test]
    async fn applied_reaction_refreshes_summary_once() {
        let fx = fixture("react-apply", &["cat.png"]);
        fx.bot
            .handle_update(reaction_update(-100, 7, "LIKE_heart|cat.png"))
            .await;
        {
            let edits = fx.publisher.edits.lock().unwrap();
            assert_eq!(edits.len(), 1);
            assert_eq!(edits[0].message_id, 99);
            assert!(edits[0].caption.contains("❤️ 1"));
        }
        // Same actor again, even with a different kind: nothing observable.
        fx.bot
            .handle_update(reaction_update(-100, 7, "LIKE_haha|cat.png"))
            .await;
        assert_eq!(fx.publisher.edits.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn distinct_actors_each_count() {
        let fx = fixture("react-actors", &["cat.png"]);
        fx.bot
            .handle_update(reaction_update(-100, 7, "LIKE_love|cat.png"))
            .await;
        fx.bot
            .handle_update(reaction_update(-100, 8, "LIKE_love|cat.png"))
            .await;
        let edits = fx.publisher.edits.lock().unwrap();
        assert_eq!(edits.len(), 2);
        assert!(edits[1].caption.contains("🔥 2"));
    }

    #[tokio::test]
    async fn malformed_reaction_is_dropped_silently() {
        let fx = fixture("react-bad", &["cat.png"]);
        for data in ["LIKE_heart", "LIKE_sparkle|cat.png", "junk"] {
            fx.bot.handle_update(reaction_update(-100, 7, data)).await;
        }
        assert!(fx.publisher.edits.lock().unwrap().is_empty());
        assert!(fx.publisher.notices.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn first_group_message_binds_and_starts_timer() {
        let fx = fixture("discover", &["cat.png"]);
        assert_eq!(fx.bot.binding(), None);
        fx.bot
            .handle_update(text_update(-100, "supergroup", "good morning"))
            .await;
        assert_eq!(fx.bot.binding(), Some(-100));
        assert!(fx.bot.scheduler().is_active());
        // Persisted for the next restart.
        assert_eq!(
            std::fs::read_to_string(fx.dir.join("group_id.txt")).unwrap(),
            "-100"
        );
        // A second group does not steal the binding.
        fx.bot
            .handle_update(text_update(-200, "group", "hello"))
            .await;
        assert_eq!(fx.bot.binding(), Some(-100));
        fx.bot.scheduler().stop();
    }

    #[tokio::test]
    async fn private_chats_are_not_discovered() {
        let fx = fixture("discover-private", &[]);
        fx.bot.handle_update(text_update(5, "private", "hi")).await;
        assert_eq!(fx.bot.binding(), None);
        assert!(!fx.bot.scheduler().is_active());
    }

    #[tokio::test]
    async fn init_group_overrides_binding() {
        let fx = fixture("init-group", &[]);
        fx.bot
            .handle_update(text_update(-100, "supergroup", "hello"))
            .await;
        fx.bot
            .handle_update(text_update(-200, "supergroup", "/init_group"))
            .await;
        assert_eq!(fx.bot.binding(), Some(-200));
        fx.bot.scheduler().stop();
    }

    #[tokio::test]
    async fn set_interval_validates_and_reconfigures() {
        let fx = fixture("set-interval", &[]);
        fx.bot
            .handle_update(text_update(-100, "supergroup", "/setinterval 30"))
            .await;
        assert_eq!(fx.bot.scheduler().current_period(), 30);
        assert!(fx.bot.scheduler().is_active());

        fx.bot
            .handle_update(text_update(-100, "supergroup", "/setinterval 61"))
            .await;
        assert_eq!(fx.bot.scheduler().current_period(), 30);
        let notices = fx.publisher.notices.lock().unwrap();
        assert!(notices.last().unwrap().1.contains("between 1 and 60"));
        drop(notices);

        fx.bot
            .handle_update(text_update(-100, "supergroup", "/setinterval soon"))
            .await;
        let notices = fx.publisher.notices.lock().unwrap();
        assert!(notices.last().unwrap().1.starts_with("Usage:"));
        drop(notices);
        fx.bot.scheduler().stop();
    }

    #[tokio::test]
    async fn set_interval_denied_for_non_admins() {
        let fx = fixture("set-interval-denied", &[]);
        fx.chat.operator.store(false, Ordering::SeqCst);
        fx.bot
            .handle_update(text_update(-100, "supergroup", "/setinterval 5"))
            .await;
        assert!(!fx.bot.scheduler().is_active());
        let notices = fx.publisher.notices.lock().unwrap();
        assert!(notices.last().unwrap().1.contains("Only admins"));
    }

    #[tokio::test]
    async fn add_stores_document_and_reloads_catalog() {
        let fx = fixture("add-doc", &[]);
        fx.bot
            .handle_update(add_document_update(-100, "file77", "fresh.png"))
            .await;
        let items = fx.bot.catalog().items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "fresh.png");
        assert_eq!(std::fs::read(fx.dir.join("fresh.png")).unwrap(), b"payload");
    }

    #[tokio::test]
    async fn add_rejects_unsupported_files_and_non_admins() {
        let fx = fixture("add-denied", &[]);
        fx.bot
            .handle_update(add_document_update(-100, "file77", "virus.exe"))
            .await;
        assert!(fx.bot.catalog().items().is_empty());

        fx.chat.operator.store(false, Ordering::SeqCst);
        fx.bot
            .handle_update(add_document_update(-100, "file77", "fine.png"))
            .await;
        assert!(fx.bot.catalog().items().is_empty());
    }
}
