//! HTTP server implementation using Axum.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use jinbot_agent::JinBot;

/// Shared state for the gateway server.
#[derive(Clone)]
pub struct AppState {
    pub bot: Arc<JinBot>,
    /// Token segment expected in the webhook path.
    pub webhook_token: String,
}

/// Build the Axum router with all routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(super::routes::health_check))
        .route("/health", get(super::routes::health_check))
        .route("/webhook/{token}", post(super::routes::telegram_webhook))
        .route("/send_meme", get(super::routes::send_meme))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Start the HTTP server.
pub async fn start(state: AppState, host: &str, port: u16) -> anyhow::Result<()> {
    let app = build_router(state);
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Gateway server listening on http://{addr}");
    axum::serve(listener, app).await?;
    Ok(())
}
