//! Test doubles for the channel seams, plus update builders.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use jinbot_channels::telegram::{
    TelegramCallbackQuery, TelegramChat, TelegramDocument, TelegramMessage, TelegramUpdate,
    TelegramUser,
};
use jinbot_core::config::JinbotConfig;
use jinbot_core::error::Result;
use jinbot_core::traits::{ChatControl, Publisher};
use jinbot_core::types::{PostPayload, SendStatus, SummaryEdit};

use crate::JinBot;

#[derive(Default)]
pub struct MockPublisher {
    pub primary: Mutex<Vec<PostPayload>>,
    pub fallback: Mutex<Vec<PostPayload>>,
    pub notices: Mutex<Vec<(i64, String)>>,
    pub edits: Mutex<Vec<SummaryEdit>>,
    pub fail_primary: AtomicBool,
    pub fail_fallback: AtomicBool,
}

#[async_trait]
impl Publisher for MockPublisher {
    async fn send_primary(&self, post: &PostPayload) -> SendStatus {
        self.primary.lock().unwrap().push(post.clone());
        if self.fail_primary.load(Ordering::SeqCst) {
            SendStatus::Failed("photo rejected".into())
        } else {
            SendStatus::Sent
        }
    }

    async fn send_fallback(&self, post: &PostPayload) -> SendStatus {
        self.fallback.lock().unwrap().push(post.clone());
        if self.fail_fallback.load(Ordering::SeqCst) {
            SendStatus::Failed("document rejected".into())
        } else {
            SendStatus::Sent
        }
    }

    async fn send_notice(&self, chat_id: i64, text: &str) -> SendStatus {
        self.notices.lock().unwrap().push((chat_id, text.to_string()));
        SendStatus::Sent
    }

    async fn refresh_summary(&self, edit: &SummaryEdit) -> SendStatus {
        self.edits.lock().unwrap().push(edit.clone());
        SendStatus::Sent
    }
}

pub struct MockChat {
    pub operator: AtomicBool,
    pub attachment: Vec<u8>,
}

impl Default for MockChat {
    fn default() -> Self {
        Self {
            operator: AtomicBool::new(true),
            attachment: b"payload".to_vec(),
        }
    }
}

#[async_trait]
impl ChatControl for MockChat {
    async fn acknowledge(&self, _callback_id: &str) -> Result<()> {
        Ok(())
    }

    async fn is_operator(&self, _chat_id: i64, _user_id: i64) -> Result<bool> {
        Ok(self.operator.load(Ordering::SeqCst))
    }

    async fn fetch_attachment(&self, _file_id: &str) -> Result<Vec<u8>> {
        Ok(self.attachment.clone())
    }
}

pub struct Fixture {
    pub bot: Arc<JinBot>,
    pub publisher: Arc<MockPublisher>,
    pub chat: Arc<MockChat>,
    pub dir: PathBuf,
}

impl Drop for Fixture {
    fn drop(&mut self) {
        std::fs::remove_dir_all(&self.dir).ok();
    }
}

/// Build a bot over a scratch content directory seeded with `seed` files.
pub fn fixture(name: &str, seed: &[&str]) -> Fixture {
    let dir = std::env::temp_dir().join(format!("jinbot-test-agent-{name}"));
    std::fs::remove_dir_all(&dir).ok();
    std::fs::create_dir_all(&dir).ok();
    for file in seed {
        std::fs::write(dir.join(file), b"img").unwrap();
    }
    let mut config = JinbotConfig::default();
    config.content.dir = dir.to_string_lossy().into_owned();
    let publisher = Arc::new(MockPublisher::default());
    let chat = Arc::new(MockChat::default());
    let bot = JinBot::new(config, publisher.clone(), chat.clone());
    Fixture {
        bot,
        publisher,
        chat,
        dir,
    }
}

pub fn user(id: i64) -> TelegramUser {
    TelegramUser {
        id,
        is_bot: false,
        first_name: "Jin".into(),
        last_name: None,
        username: None,
    }
}

pub fn chat(id: i64, chat_type: &str) -> TelegramChat {
    TelegramChat {
        id,
        chat_type: chat_type.into(),
        title: None,
    }
}

pub fn message(chat_id: i64, chat_type: &str, text: &str) -> TelegramMessage {
    TelegramMessage {
        message_id: 1,
        from: Some(user(42)),
        chat: chat(chat_id, chat_type),
        text: Some(text.to_string()),
        caption: None,
        photo: None,
        document: None,
        reply_to_message: None,
    }
}

pub fn text_update(chat_id: i64, chat_type: &str, text: &str) -> TelegramUpdate {
    TelegramUpdate {
        update_id: 1,
        message: Some(message(chat_id, chat_type, text)),
        callback_query: None,
    }
}

/// An `/add` command replying to an uploaded document.
pub fn add_document_update(chat_id: i64, file_id: &str, file_name: &str) -> TelegramUpdate {
    let mut msg = message(chat_id, "supergroup", "/add");
    let mut replied = message(chat_id, "supergroup", "");
    replied.text = None;
    replied.document = Some(TelegramDocument {
        file_id: file_id.into(),
        file_name: Some(file_name.into()),
    });
    msg.reply_to_message = Some(Box::new(replied));
    TelegramUpdate {
        update_id: 1,
        message: Some(msg),
        callback_query: None,
    }
}

pub fn reaction_update(chat_id: i64, actor: i64, data: &str) -> TelegramUpdate {
    let mut shown = message(chat_id, "supergroup", "");
    shown.text = None;
    shown.message_id = 99;
    TelegramUpdate {
        update_id: 1,
        message: None,
        callback_query: Some(TelegramCallbackQuery {
            id: "cb".into(),
            from: user(actor),
            message: Some(shown),
            data: Some(data.to_string()),
        }),
    }
}
