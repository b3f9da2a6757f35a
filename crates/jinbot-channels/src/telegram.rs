//! Telegram Bot API channel — webhook updates in, photos/captions out.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;

use jinbot_core::error::{JinbotError, Result};
use jinbot_core::traits::{ChatControl, Publisher};
use jinbot_core::types::{PostPayload, ReactionButton, SendStatus, SummaryEdit};

/// Telegram Bot API client.
pub struct TelegramChannel {
    bot_token: String,
    client: reqwest::Client,
}

impl TelegramChannel {
    pub fn new(bot_token: &str) -> Self {
        Self {
            bot_token: bot_token.to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn api_url(&self, method: &str) -> String {
        format!("https://api.telegram.org/bot{}/{}", self.bot_token, method)
    }

    fn file_url(&self, file_path: &str) -> String {
        format!("https://api.telegram.org/file/bot{}/{}", self.bot_token, file_path)
    }

    /// Call a JSON-body Bot API method and unwrap the response envelope.
    async fn invoke<T: DeserializeOwned>(&self, method: &str, body: serde_json::Value) -> Result<T> {
        let response = self
            .client
            .post(self.api_url(method))
            .json(&body)
            .send()
            .await
            .map_err(|e| JinbotError::Channel(format!("{method} failed: {e}")))?;
        let body: TelegramApiResponse<T> = response
            .json()
            .await
            .map_err(|e| JinbotError::Channel(format!("Invalid {method} response: {e}")))?;
        if !body.ok {
            return Err(JinbotError::Channel(format!(
                "{method} error: {}",
                body.description.unwrap_or_default()
            )));
        }
        body.result
            .ok_or_else(|| JinbotError::Channel(format!("{method}: empty result")))
    }

    /// Upload a file via multipart (`photo` or `document` field).
    async fn upload(&self, method: &str, field: &'static str, post: &PostPayload) -> Result<()> {
        let bytes = std::fs::read(&post.path)
            .map_err(|e| JinbotError::Channel(format!("Cannot read {}: {e}", post.path.display())))?;
        let form = reqwest::multipart::Form::new()
            .text("chat_id", post.chat_id.to_string())
            .text("caption", post.caption.clone())
            .text("reply_markup", keyboard_markup(&post.keyboard).to_string())
            .part(
                field,
                reqwest::multipart::Part::bytes(bytes).file_name(post.item_id.clone()),
            );
        let response = self
            .client
            .post(self.api_url(method))
            .multipart(form)
            .send()
            .await
            .map_err(|e| JinbotError::Channel(format!("{method} failed: {e}")))?;
        let body: TelegramApiResponse<serde_json::Value> = response
            .json()
            .await
            .map_err(|e| JinbotError::Channel(format!("Invalid {method} response: {e}")))?;
        if !body.ok {
            return Err(JinbotError::Channel(format!(
                "{method} error: {}",
                body.description.unwrap_or_default()
            )));
        }
        Ok(())
    }

    /// Get bot info and log it.
    pub async fn connect(&self) -> Result<()> {
        let me: TelegramUser = self.invoke("getMe", serde_json::json!({})).await?;
        tracing::info!(
            "Telegram bot: @{} ({})",
            me.username.as_deref().unwrap_or("unknown"),
            me.first_name
        );
        Ok(())
    }

    /// Send a text message.
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
        let _: serde_json::Value = self
            .invoke(
                "sendMessage",
                serde_json::json!({ "chat_id": chat_id, "text": text }),
            )
            .await?;
        Ok(())
    }

    /// Replace the caption (and keyboard) on a published message.
    pub async fn edit_caption(
        &self,
        chat_id: i64,
        message_id: i64,
        caption: &str,
        keyboard: &[ReactionButton],
    ) -> Result<()> {
        let _: serde_json::Value = self
            .invoke(
                "editMessageCaption",
                serde_json::json!({
                    "chat_id": chat_id,
                    "message_id": message_id,
                    "caption": caption,
                    "reply_markup": keyboard_markup(keyboard),
                }),
            )
            .await?;
        Ok(())
    }

    /// Acknowledge a callback query.
    pub async fn answer_callback(&self, callback_id: &str) -> Result<()> {
        let _: serde_json::Value = self
            .invoke(
                "answerCallbackQuery",
                serde_json::json!({ "callback_query_id": callback_id }),
            )
            .await?;
        Ok(())
    }

    /// Membership status of a user in a chat ("administrator", "creator", …).
    pub async fn chat_member_status(&self, chat_id: i64, user_id: i64) -> Result<String> {
        let member: TelegramChatMember = self
            .invoke(
                "getChatMember",
                serde_json::json!({ "chat_id": chat_id, "user_id": user_id }),
            )
            .await?;
        Ok(member.status)
    }

    /// Download an uploaded file's bytes by its file id.
    pub async fn download_file(&self, file_id: &str) -> Result<Vec<u8>> {
        let file: TelegramFile = self
            .invoke("getFile", serde_json::json!({ "file_id": file_id }))
            .await?;
        let file_path = file
            .file_path
            .ok_or_else(|| JinbotError::Channel("getFile: no file_path".into()))?;
        let response = self
            .client
            .get(self.file_url(&file_path))
            .send()
            .await
            .map_err(|e| JinbotError::Channel(format!("File download failed: {e}")))?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| JinbotError::Channel(format!("File download failed: {e}")))?;
        Ok(bytes.to_vec())
    }

    /// Register the webhook URL (after clearing any previous one).
    pub async fn set_webhook(&self, url: &str) -> Result<()> {
        self.delete_webhook().await?;
        let _: serde_json::Value = self
            .invoke("setWebhook", serde_json::json!({ "url": url }))
            .await?;
        tracing::info!("Webhook set: {url}");
        Ok(())
    }

    pub async fn delete_webhook(&self) -> Result<()> {
        let _: serde_json::Value = self.invoke("deleteWebhook", serde_json::json!({})).await?;
        Ok(())
    }
}

/// Render reaction buttons as a one-row inline keyboard.
fn keyboard_markup(buttons: &[ReactionButton]) -> serde_json::Value {
    let row: Vec<serde_json::Value> = buttons
        .iter()
        .map(|b| serde_json::json!({ "text": b.label, "callback_data": b.data }))
        .collect();
    serde_json::json!({ "inline_keyboard": [row] })
}

#[async_trait]
impl Publisher for TelegramChannel {
    async fn send_primary(&self, post: &PostPayload) -> SendStatus {
        match self.upload("sendPhoto", "photo", post).await {
            Ok(()) => SendStatus::Sent,
            Err(e) => SendStatus::Failed(e.to_string()),
        }
    }

    async fn send_fallback(&self, post: &PostPayload) -> SendStatus {
        match self.upload("sendDocument", "document", post).await {
            Ok(()) => SendStatus::Sent,
            Err(e) => SendStatus::Failed(e.to_string()),
        }
    }

    async fn send_notice(&self, chat_id: i64, text: &str) -> SendStatus {
        match self.send_message(chat_id, text).await {
            Ok(()) => SendStatus::Sent,
            Err(e) => SendStatus::Failed(e.to_string()),
        }
    }

    async fn refresh_summary(&self, edit: &SummaryEdit) -> SendStatus {
        match self
            .edit_caption(edit.chat_id, edit.message_id, &edit.caption, &edit.keyboard)
            .await
        {
            Ok(()) => SendStatus::Sent,
            Err(e) => SendStatus::Failed(e.to_string()),
        }
    }
}

#[async_trait]
impl ChatControl for TelegramChannel {
    async fn acknowledge(&self, callback_id: &str) -> Result<()> {
        self.answer_callback(callback_id).await
    }

    async fn is_operator(&self, chat_id: i64, user_id: i64) -> Result<bool> {
        let status = self.chat_member_status(chat_id, user_id).await?;
        Ok(matches!(status.as_str(), "administrator" | "creator"))
    }

    async fn fetch_attachment(&self, file_id: &str) -> Result<Vec<u8>> {
        self.download_file(file_id).await
    }
}

// --- Telegram API Types ---

#[derive(Debug, Deserialize)]
pub struct TelegramApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramUpdate {
    pub update_id: i64,
    pub message: Option<TelegramMessage>,
    pub callback_query: Option<TelegramCallbackQuery>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramMessage {
    pub message_id: i64,
    pub from: Option<TelegramUser>,
    pub chat: TelegramChat,
    pub text: Option<String>,
    pub caption: Option<String>,
    pub photo: Option<Vec<TelegramPhotoSize>>,
    pub document: Option<TelegramDocument>,
    pub reply_to_message: Option<Box<TelegramMessage>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramUser {
    pub id: i64,
    pub is_bot: bool,
    pub first_name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramChat {
    pub id: i64,
    #[serde(rename = "type")]
    pub chat_type: String,
    pub title: Option<String>,
}

impl TelegramChat {
    /// Group-type chats are the only valid publish destinations.
    pub fn is_group(&self) -> bool {
        matches!(self.chat_type.as_str(), "group" | "supergroup")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramCallbackQuery {
    pub id: String,
    pub from: TelegramUser,
    pub message: Option<TelegramMessage>,
    pub data: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramPhotoSize {
    pub file_id: String,
    pub width: i64,
    pub height: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramDocument {
    pub file_id: String,
    pub file_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TelegramFile {
    pub file_path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TelegramChatMember {
    pub status: String,
}
