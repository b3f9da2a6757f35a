//! # JinBot Gateway
//! HTTP surface: health check, Telegram webhook inbound, and the manual
//! publish trigger.

pub mod routes;
pub mod server;

pub use server::{AppState, build_router, start};
