//! In-process fakes for the store and the chat transport.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use dashmap::DashMap;
use futures_util::future::BoxFuture;
use mongodb::bson::DateTime;
use parking_lot::Mutex;
use teloxide::types::{ChatId, MessageId, UserId};
use teloxide::{ApiError, RequestError};

use crate::database::SettingsStore;
use crate::error::{Error, Result};
use crate::models::{GroupSettings, UserRecord};
use crate::transport::{InboundMessage, Transport};

#[derive(Default)]
pub struct MemoryStore {
    users: DashMap<i64, UserRecord>,
    settings: DashMap<i64, GroupSettings>,
    count_queries: AtomicUsize,
    fail_reads: AtomicBool,
}

impl MemoryStore {
    pub fn insert_retention(&self, chat_id: i64, spec: &str) {
        self.settings.insert(
            chat_id,
            GroupSettings {
                chat_id,
                delete_time: spec.to_string(),
            },
        );
    }

    pub fn stored_retention(&self, chat_id: i64) -> Option<String> {
        self.settings.get(&chat_id).map(|s| s.delete_time.clone())
    }

    pub fn user_rows(&self, user_id: i64) -> usize {
        self.users.iter().filter(|u| u.user_id == user_id).count()
    }

    pub fn user(&self, user_id: i64) -> Option<UserRecord> {
        self.users.get(&user_id).map(|u| u.clone())
    }

    pub fn count_queries(&self) -> usize {
        self.count_queries.load(Ordering::SeqCst)
    }

    pub fn fail_reads(&self) {
        self.fail_reads.store(true, Ordering::SeqCst);
    }

    fn read_check(&self) -> Result<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Error::Config("store unavailable".to_string()));
        }
        Ok(())
    }
}

impl SettingsStore for MemoryStore {
    fn upsert_user(&self, user_id: i64) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            self.users.entry(user_id).or_insert_with(|| UserRecord {
                user_id,
                joined_at: DateTime::now(),
            });
            Ok(())
        })
    }

    fn set_retention(&self, chat_id: i64, spec: String) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            self.insert_retention(chat_id, &spec);
            Ok(())
        })
    }

    fn clear_retention(&self, chat_id: i64) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            self.settings.remove(&chat_id);
            Ok(())
        })
    }

    fn retention(&self, chat_id: i64) -> BoxFuture<'_, Result<Option<String>>> {
        Box::pin(async move {
            self.read_check()?;
            Ok(self.stored_retention(chat_id).filter(|s| !s.is_empty()))
        })
    }

    fn count_users(&self) -> BoxFuture<'_, Result<u64>> {
        Box::pin(async move {
            self.count_queries.fetch_add(1, Ordering::SeqCst);
            self.read_check()?;
            Ok(self.users.len() as u64)
        })
    }

    fn count_groups(&self) -> BoxFuture<'_, Result<u64>> {
        Box::pin(async move {
            self.count_queries.fetch_add(1, Ordering::SeqCst);
            self.read_check()?;
            Ok(self.settings.len() as u64)
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Text(ChatId, String),
    Delete(ChatId, MessageId),
}

#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<Sent>>,
    fail_deletes: AtomicBool,
}

impl RecordingTransport {
    /// Every delete is recorded, then reported as "message not found".
    pub fn fail_deletes(&self) {
        self.fail_deletes.store(true, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().clone()
    }

    pub fn deleted(&self) -> Vec<(ChatId, MessageId)> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Delete(chat, msg) => Some((chat, msg)),
                Sent::Text(..) => None,
            })
            .collect()
    }

    pub fn texts(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Text(_, text) => Some(text),
                Sent::Delete(..) => None,
            })
            .collect()
    }
}

impl Transport for RecordingTransport {
    fn send_text(&self, chat_id: ChatId, text: String) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            self.sent.lock().push(Sent::Text(chat_id, text));
            Ok(())
        })
    }

    fn remove_message(&self, chat_id: ChatId, message_id: MessageId) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            self.sent.lock().push(Sent::Delete(chat_id, message_id));
            if self.fail_deletes.load(Ordering::SeqCst) {
                return Err(RequestError::Api(ApiError::MessageToDeleteNotFound).into());
            }
            Ok(())
        })
    }
}

pub fn group_message(chat_id: i64, message_id: i32, text: &str) -> InboundMessage {
    InboundMessage {
        chat_id: ChatId(chat_id),
        message_id: MessageId(message_id),
        sender: Some(UserId(1000)),
        reply_to: None,
        text: Some(text.to_string()),
        is_group: true,
    }
}

pub fn private_message(chat_id: i64, message_id: i32, text: &str) -> InboundMessage {
    InboundMessage {
        is_group: false,
        ..group_message(chat_id, message_id, text)
    }
}

impl InboundMessage {
    pub fn replying_to(mut self, parent: i32) -> Self {
        self.reply_to = Some(MessageId(parent));
        self
    }

    pub fn sent_by(mut self, user_id: u64) -> Self {
        self.sender = Some(UserId(user_id));
        self
    }
}

/// Lets spawned store writes run to completion.
pub async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}
