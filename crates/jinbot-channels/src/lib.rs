//! # JinBot Channels
//! Chat-platform adapters. Telegram is the only destination platform;
//! it satisfies the core's `Publisher` and `ChatControl` seams.

pub mod telegram;

pub use telegram::TelegramChannel;
