//! # JinBot Scheduler
//! One repeating posting timer whose period can change at runtime
//! without producing duplicate or orphaned timers.

pub mod controller;

pub use controller::{MAX_INTERVAL_MINUTES, MIN_INTERVAL_MINUTES, PostScheduler};
