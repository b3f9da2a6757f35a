//! # JinBot — scheduled meme rotation bot for Telegram.
//!
//! Picks the next meme from a rotating catalog, posts it to the bound
//! group chat on a timer, and tracks reaction-button tallies per meme.
//!
//! Usage:
//!   jinbot                      # start with ~/.jinbot/config.toml
//!   jinbot --config bot.toml    # custom config file
//!   jinbot --port 8080          # override the gateway port

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use jinbot_agent::JinBot;
use jinbot_channels::TelegramChannel;
use jinbot_core::config::JinbotConfig;

#[derive(Parser)]
#[command(
    name = "jinbot",
    version,
    about = "Scheduled meme rotation bot for Telegram"
)]
struct Cli {
    /// Path to the config file (default ~/.jinbot/config.toml)
    #[arg(short, long)]
    config: Option<String>,

    /// Override the gateway listen port
    #[arg(short, long)]
    port: Option<u16>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "jinbot=debug,tower_http=debug"
    } else {
        "jinbot=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    let mut config = match &cli.config {
        Some(path) => {
            let path = shellexpand::tilde(path).to_string();
            JinbotConfig::load_from(std::path::Path::new(&path))?
        }
        None => JinbotConfig::load()?,
    };
    config.apply_env();
    if let Some(port) = cli.port {
        config.gateway.port = port;
    }

    let token = config.telegram.bot_token.clone();
    if token.is_empty() || token.starts_with("PASTE") {
        anyhow::bail!("Please set a valid bot token in TELEGRAM_TOKEN or config.toml");
    }

    let channel = Arc::new(TelegramChannel::new(&token));
    if let Err(e) = channel.connect().await {
        tracing::warn!("Could not verify bot identity: {e}");
    }

    // One service object owns catalog, rotation, tallies, timer, binding.
    let bot = JinBot::new(config.clone(), channel.clone(), channel.clone());
    bot.resume();

    match config.webhook_url() {
        Some(url) => {
            if let Err(e) = channel.set_webhook(&url).await {
                tracing::error!("Failed to register webhook: {e}");
            }
        }
        None => tracing::error!("Webhook URL not set! Please set WEBHOOK_BASE env"),
    }

    let state = jinbot_gateway::AppState {
        bot,
        webhook_token: token,
    };
    jinbot_gateway::start(state, &config.gateway.host, config.gateway.port).await
}
