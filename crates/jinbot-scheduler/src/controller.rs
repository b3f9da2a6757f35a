//! Posting timer controller.
//!
//! Two states: Idle (no timer) and Active (exactly one timer). Every
//! reconfiguration bumps a generation counter before aborting the old
//! task, so a tick that was already queued sees a stale generation and
//! bails instead of firing a duplicate publish.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::future::BoxFuture;
use tokio::task::JoinHandle;

use jinbot_core::error::{JinbotError, Result};

pub const MIN_INTERVAL_MINUTES: u64 = 1;
pub const MAX_INTERVAL_MINUTES: u64 = 60;

type TickFn = Arc<dyn Fn() -> BoxFuture<'static, Result<()>> + Send + Sync>;

/// Owns the single repeating publish timer.
pub struct PostScheduler {
    state: Mutex<TimerState>,
    generation: Arc<AtomicU64>,
    tick: TickFn,
}

struct TimerState {
    period_minutes: u64,
    timer: Option<JoinHandle<()>>,
}

impl PostScheduler {
    /// Create an Idle controller. `default_minutes` is the period used
    /// when the timer is first started without an explicit value; the
    /// tick callback fires once per period while Active.
    pub fn new<F, Fut>(default_minutes: u64, tick: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<()>> + Send + 'static,
    {
        Self {
            state: Mutex::new(TimerState {
                period_minutes: default_minutes.clamp(MIN_INTERVAL_MINUTES, MAX_INTERVAL_MINUTES),
                timer: None,
            }),
            generation: Arc::new(AtomicU64::new(0)),
            tick: Arc::new(move || Box::pin(tick()) as BoxFuture<'static, Result<()>>),
        }
    }

    /// Idle → Active with the given period.
    pub fn start(&self, minutes: u64) -> Result<()> {
        self.reconfigure(minutes)
    }

    /// Install a timer with a new period, cancelling any previous one
    /// first. Works from Idle as well. Out-of-range periods are rejected
    /// without touching the running timer.
    pub fn reconfigure(&self, minutes: u64) -> Result<()> {
        if !(MIN_INTERVAL_MINUTES..=MAX_INTERVAL_MINUTES).contains(&minutes) {
            return Err(JinbotError::Validation(format!(
                "Interval must be between {MIN_INTERVAL_MINUTES} and {MAX_INTERVAL_MINUTES} minutes, got {minutes}"
            )));
        }
        let mut state = self.state.lock().unwrap();
        // Invalidate before aborting: a tick already queued on the old
        // timer fails the generation check and never fires.
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(timer) = state.timer.take() {
            timer.abort();
        }
        state.period_minutes = minutes;
        state.timer = Some(self.spawn_timer(generation, minutes));
        Ok(())
    }

    /// Active → Idle. A no-op when already Idle.
    pub fn stop(&self) {
        let mut state = self.state.lock().unwrap();
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(timer) = state.timer.take() {
            timer.abort();
            tracing::info!("Posting timer stopped");
        }
    }

    pub fn is_active(&self) -> bool {
        self.state.lock().unwrap().timer.is_some()
    }

    /// The configured period in minutes (the default until first start).
    pub fn current_period(&self) -> u64 {
        self.state.lock().unwrap().period_minutes
    }

    fn spawn_timer(&self, generation: u64, minutes: u64) -> JoinHandle<()> {
        let tick = self.tick.clone();
        let live = self.generation.clone();
        tokio::spawn(async move {
            let period = Duration::from_secs(minutes * 60);
            // First tick one full period from now; missed ticks are
            // skipped, never replayed.
            let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            tracing::info!("Posting timer armed: every {minutes} minute(s)");
            loop {
                interval.tick().await;
                if live.load(Ordering::SeqCst) != generation {
                    break;
                }
                if let Err(e) = tick().await {
                    tracing::warn!("Scheduled post failed: {e}");
                }
            }
        })
    }
}
