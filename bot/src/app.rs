use std::sync::Arc;

use teloxide::types::UserId;

use crate::database::SettingsStore;
use crate::executor::DeletionExecutor;
use crate::scheduler::RetentionScheduler;
use crate::transport::Transport;

/// Everything a handler needs, cheap to clone into each update.
#[derive(Clone)]
pub struct App {
    pub store: Arc<dyn SettingsStore>,
    pub transport: Arc<dyn Transport>,
    pub scheduler: RetentionScheduler,
    pub owner_id: UserId,
    /// Without the leading `@`; used to match `/command@bot_username`.
    pub bot_username: String,
}

impl App {
    pub fn new(
        store: Arc<dyn SettingsStore>,
        transport: Arc<dyn Transport>,
        owner_id: UserId,
        bot_username: String,
        max_pending_deletions: usize,
    ) -> Self {
        let executor = DeletionExecutor::new(transport.clone(), max_pending_deletions);
        let scheduler = RetentionScheduler::new(store.clone(), executor);
        Self {
            store,
            transport,
            scheduler,
            owner_id,
            bot_username,
        }
    }
}
