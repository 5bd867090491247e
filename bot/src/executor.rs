//! Runs scheduled deletions once their timer fires.
//!
//! Each deletion is its own tokio task. Pending deletions are tracked by
//! (chat, message) so the same message is never armed twice, and so the
//! number of live timers can be capped.

use std::sync::Arc;

use ahash::RandomState;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use teloxide::types::{ChatId, MessageId};
use tokio::time::Instant;

use crate::scheduler::ScheduledDeletion;
use crate::transport::Transport;

type PendingKey = (ChatId, MessageId);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    Scheduled,
    /// The message already has a pending deletion.
    Duplicate,
    /// The pending limit was reached; the deletion was dropped.
    Shed,
}

#[derive(Clone)]
pub struct DeletionExecutor {
    transport: Arc<dyn Transport>,
    pending: Arc<DashMap<PendingKey, Instant, RandomState>>,
    max_pending: usize,
}

impl DeletionExecutor {
    /// `max_pending == 0` means no limit.
    pub fn new(transport: Arc<dyn Transport>, max_pending: usize) -> Self {
        Self {
            transport,
            pending: Arc::new(DashMap::with_hasher(RandomState::new())),
            max_pending,
        }
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Arms a timer for `deletion` and returns immediately.
    pub fn submit(&self, deletion: ScheduledDeletion) -> Submission {
        // The limit is soft: concurrent submits may overshoot it slightly.
        if self.max_pending != 0 && self.pending.len() >= self.max_pending {
            log::warn!(
                "Pending deletion limit ({}) reached, dropping message {} in chat {}",
                self.max_pending,
                deletion.message_id.0,
                deletion.chat_id.0
            );
            return Submission::Shed;
        }

        let key = (deletion.chat_id, deletion.message_id);
        match self.pending.entry(key) {
            Entry::Occupied(_) => return Submission::Duplicate,
            Entry::Vacant(slot) => {
                slot.insert(deletion.fire_at);
            }
        }

        let executor = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep_until(deletion.fire_at).await;
            executor.execute(&deletion).await;
            executor.pending.remove(&key);
        });

        Submission::Scheduled
    }

    /// Deletes the message, then its reply parent if there is one.
    /// Failures are logged and never retried.
    pub async fn execute(&self, deletion: &ScheduledDeletion) {
        self.delete_quietly(deletion.chat_id, deletion.message_id).await;
        if let Some(parent) = deletion.reply_to {
            self.delete_quietly(deletion.chat_id, parent).await;
        }
    }

    async fn delete_quietly(&self, chat_id: ChatId, message_id: MessageId) {
        match self.transport.remove_message(chat_id, message_id).await {
            Ok(()) => log::debug!("Deleted message {} in chat {}", message_id.0, chat_id.0),
            // Already gone, too old or no rights: nothing left to do.
            Err(e) => log::debug!(
                "Could not delete message {} in chat {}: {}",
                message_id.0,
                chat_id.0,
                e
            ),
        }
    }
}
