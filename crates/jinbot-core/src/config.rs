//! JinBot configuration system.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::types::RotationMode;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JinbotConfig {
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub content: ContentConfig,
    #[serde(default)]
    pub rotation: RotationConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

impl JinbotConfig {
    /// Load config from the default path (~/.jinbot/config.toml).
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::error::JinbotError::Config(format!("Failed to read config: {e}")))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| crate::error::JinbotError::Config(format!("Failed to parse config: {e}")))?;
        Ok(config)
    }

    /// Save config to the default path.
    pub fn save(&self) -> Result<()> {
        let path = Self::default_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::JinbotError::Config(format!("Failed to serialize config: {e}")))?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    /// Get the default config path.
    pub fn default_path() -> PathBuf {
        Self::home_dir().join("config.toml")
    }

    /// Get the JinBot home directory (~/.jinbot).
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".jinbot")
    }

    /// Apply environment overrides on top of the loaded file.
    pub fn apply_env(&mut self) {
        if let Ok(token) = std::env::var("TELEGRAM_TOKEN") {
            self.telegram.bot_token = token;
        }
        if let Ok(base) = std::env::var("WEBHOOK_BASE") {
            self.telegram.webhook_base = base.trim_end_matches('/').to_string();
        }
        if let Ok(port) = std::env::var("PORT")
            && let Ok(port) = port.parse()
        {
            self.gateway.port = port;
        }
        if let Ok(dir) = std::env::var("MEME_DIR") {
            self.content.dir = dir;
        }
    }

    /// Content directory with `~` expanded.
    pub fn content_dir(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.content.dir).to_string())
    }

    /// The full webhook URL, if a public base is configured.
    pub fn webhook_url(&self) -> Option<String> {
        if self.telegram.webhook_base.is_empty() {
            return None;
        }
        Some(format!(
            "{}{}",
            self.telegram.webhook_base.trim_end_matches('/'),
            self.webhook_path()
        ))
    }

    /// The local webhook route, token-scoped so only Telegram can hit it.
    pub fn webhook_path(&self) -> String {
        format!("/webhook/{}", self.telegram.bot_token)
    }
}

/// Telegram bot credentials and webhook base.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TelegramConfig {
    #[serde(default)]
    pub bot_token: String,
    /// Public HTTPS base the webhook is registered under (empty = not set).
    #[serde(default)]
    pub webhook_base: String,
}

/// HTTP gateway listener.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    10000
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Where catalog content lives on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    #[serde(default = "default_content_dir")]
    pub dir: String,
}

fn default_content_dir() -> String {
    "~/.jinbot/memes".into()
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            dir: default_content_dir(),
        }
    }
}

/// Next-item selection strategy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RotationConfig {
    #[serde(default)]
    pub mode: RotationMode,
}

/// Publishing cadence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Minutes between scheduled posts (valid range 1..=60).
    #[serde(default = "default_interval")]
    pub interval_minutes: u64,
}

fn default_interval() -> u64 {
    10
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval_minutes: default_interval(),
        }
    }
}
