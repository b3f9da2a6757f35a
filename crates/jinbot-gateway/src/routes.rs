//! Route handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;

use jinbot_channels::telegram::TelegramUpdate;
use jinbot_core::types::PublishOutcome;

use super::server::AppState;

pub async fn health_check() -> &'static str {
    "OK"
}

/// Telegram webhook inbound. Malformed bodies are logged and dropped
/// with 200 so the sender has nothing to retry.
pub async fn telegram_webhook(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
    body: String,
) -> (StatusCode, &'static str) {
    if token != state.webhook_token {
        return (StatusCode::NOT_FOUND, "");
    }
    match serde_json::from_str::<TelegramUpdate>(&body) {
        Ok(update) => state.bot.handle_update(update).await,
        Err(e) => tracing::warn!("Failed handling webhook: {e}"),
    }
    (StatusCode::OK, "OK")
}

/// Manually trigger one publish to the bound chat.
pub async fn send_meme(State(state): State<Arc<AppState>>) -> (StatusCode, &'static str) {
    match state.bot.manual_publish().await {
        None => (StatusCode::BAD_REQUEST, "Group chat ID not set"),
        Some(PublishOutcome::Published) => (StatusCode::OK, "Sent"),
        Some(PublishOutcome::NothingToPublish) => (StatusCode::OK, "No memes available"),
        Some(PublishOutcome::Failed) => (StatusCode::BAD_GATEWAY, "Send failed"),
    }
}
