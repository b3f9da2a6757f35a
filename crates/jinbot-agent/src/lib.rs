//! # JinBot Agent
//! The bot service object. One `JinBot` owns the catalog, rotation
//! state, engagement tallies, posting timer, and channel binding; every
//! handler borrows it through an `Arc`.

pub mod coordinator;
pub mod dispatch;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::{Arc, Mutex, RwLock, Weak};

use jinbot_catalog::{MemeCatalog, RotationSelector};
use jinbot_core::binding::BindingStore;
use jinbot_core::config::JinbotConfig;
use jinbot_core::traits::{ChatControl, Publisher};
use jinbot_engagement::{EngagementStore, EngagementTracker};
use jinbot_scheduler::PostScheduler;

/// The bot service: all mutable state plus the two channel seams.
pub struct JinBot {
    config: JinbotConfig,
    catalog: MemeCatalog,
    selector: Mutex<RotationSelector>,
    engagement: Mutex<EngagementTracker>,
    scheduler: PostScheduler,
    binding: RwLock<Option<i64>>,
    binding_store: BindingStore,
    publisher: Arc<dyn Publisher>,
    chat: Arc<dyn ChatControl>,
}

impl JinBot {
    /// Build the service. Mutable state (catalog content, likes.json,
    /// group_id.txt) all lives under the configured content directory;
    /// the persisted channel binding is restored immediately.
    pub fn new(
        config: JinbotConfig,
        publisher: Arc<dyn Publisher>,
        chat: Arc<dyn ChatControl>,
    ) -> Arc<Self> {
        let content_dir = config.content_dir();
        Arc::new_cyclic(|weak: &Weak<JinBot>| {
            let tick_ref = weak.clone();
            let scheduler = PostScheduler::new(config.schedule.interval_minutes, move || {
                let tick_ref = tick_ref.clone();
                async move {
                    match tick_ref.upgrade() {
                        Some(bot) => bot.scheduled_publish().await,
                        None => Ok(()),
                    }
                }
            });
            let binding_store = BindingStore::new(&content_dir.join("group_id.txt"));
            let binding = binding_store.load();
            Self {
                catalog: MemeCatalog::new(&content_dir),
                selector: Mutex::new(RotationSelector::default()),
                engagement: Mutex::new(EngagementTracker::load(EngagementStore::new(
                    &content_dir.join("likes.json"),
                ))),
                scheduler,
                binding: RwLock::new(binding),
                binding_store,
                publisher,
                chat,
                config,
            }
        })
    }

    /// Resume scheduled posting when a destination survived from a
    /// previous run. A no-op when unbound or already running.
    pub fn resume(&self) {
        if self.binding().is_none() || self.scheduler.is_active() {
            return;
        }
        match self.scheduler.start(self.scheduler.current_period()) {
            Ok(()) => tracing::info!("Started scheduled posting task"),
            Err(e) => tracing::warn!("Could not start posting timer: {e}"),
        }
    }

    /// The bound destination chat, if any.
    pub fn binding(&self) -> Option<i64> {
        *self.binding.read().unwrap()
    }

    /// Bind (or re-bind) the destination chat and persist it.
    fn bind(&self, chat_id: i64) {
        *self.binding.write().unwrap() = Some(chat_id);
        if let Err(e) = self.binding_store.save(chat_id) {
            tracing::error!("Failed to save group chat ID: {e}");
        }
    }

    pub fn catalog(&self) -> &MemeCatalog {
        &self.catalog
    }

    pub fn scheduler(&self) -> &PostScheduler {
        &self.scheduler
    }
}
