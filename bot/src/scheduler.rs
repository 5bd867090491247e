//! Decides, per inbound group message, whether and when it gets deleted.
//!
//! Deletion timers live only in memory. A restart drops every pending
//! deletion, and clearing a group's retention does not cancel timers that
//! were already armed.

use std::sync::Arc;
use std::time::Duration;

use teloxide::types::{ChatId, MessageId};
use tokio::time::Instant;

use crate::database::SettingsStore;
use crate::duration::parse_retention;
use crate::executor::{DeletionExecutor, Submission};
use crate::transport::InboundMessage;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledDeletion {
    pub chat_id: ChatId,
    pub message_id: MessageId,
    pub reply_to: Option<MessageId>,
    pub created_at: Instant,
    pub fire_at: Instant,
}

impl ScheduledDeletion {
    pub fn span(&self) -> Duration {
        self.fire_at - self.created_at
    }
}

#[derive(Clone)]
pub struct RetentionScheduler {
    store: Arc<dyn SettingsStore>,
    executor: DeletionExecutor,
}

impl RetentionScheduler {
    pub fn new(store: Arc<dyn SettingsStore>, executor: DeletionExecutor) -> Self {
        Self { store, executor }
    }

    pub fn executor(&self) -> &DeletionExecutor {
        &self.executor
    }

    /// Looks up the group's retention and arms a deletion for `msg`.
    ///
    /// Never fails: a store error or a bad stored value just means the
    /// message is kept. Returns the armed deletion, if any.
    pub async fn observe(&self, msg: &InboundMessage) -> Option<ScheduledDeletion> {
        if !msg.is_group {
            return None;
        }

        let spec = match self.store.retention(msg.chat_id.0).await {
            Ok(Some(spec)) => spec,
            Ok(None) => return None,
            Err(e) => {
                log::warn!("Retention lookup for chat {} failed: {}", msg.chat_id.0, e);
                return None;
            }
        };

        let deletion = plan(&spec, msg, Instant::now())?;
        match self.executor.submit(deletion.clone()) {
            Submission::Scheduled => {
                log::debug!(
                    "Message {} in chat {} expires in {:?}",
                    msg.message_id.0,
                    msg.chat_id.0,
                    deletion.span()
                );
                Some(deletion)
            }
            Submission::Duplicate | Submission::Shed => None,
        }
    }
}

/// Builds the deletion for `msg` under retention `spec`, taking `now` as
/// the creation time. Unparseable and zero-length specs produce nothing.
pub fn plan(spec: &str, msg: &InboundMessage, now: Instant) -> Option<ScheduledDeletion> {
    let span = match parse_retention(spec) {
        Ok(span) => span,
        Err(e) => {
            log::warn!("Ignoring retention for chat {}: {}", msg.chat_id.0, e);
            return None;
        }
    };

    if span.is_zero() {
        log::warn!(
            "Retention {:?} for chat {} is zero-length, not scheduling",
            spec,
            msg.chat_id.0
        );
        return None;
    }

    let Some(fire_at) = now.checked_add(span) else {
        log::warn!("Retention {:?} for chat {} is out of range", spec, msg.chat_id.0);
        return None;
    };

    Some(ScheduledDeletion {
        chat_id: msg.chat_id,
        message_id: msg.message_id,
        reply_to: msg.reply_to,
        created_at: now,
        fire_at,
    })
}
