use futures_util::future::BoxFuture;
use teloxide::prelude::*;
use teloxide::types::{MessageId, UserId};

use crate::error::Result;

/// What the bot needs from the chat service.
pub trait Transport: Send + Sync + 'static {
    fn send_text(&self, chat_id: ChatId, text: String) -> BoxFuture<'_, Result<()>>;

    fn remove_message(&self, chat_id: ChatId, message_id: MessageId) -> BoxFuture<'_, Result<()>>;
}

impl Transport for Bot {
    fn send_text(&self, chat_id: ChatId, text: String) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            self.send_message(chat_id, text).await?;
            Ok(())
        })
    }

    fn remove_message(&self, chat_id: ChatId, message_id: MessageId) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            self.delete_message(chat_id, message_id).await?;
            Ok(())
        })
    }
}

/// The fields of an incoming message the bot acts on.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub chat_id: ChatId,
    pub message_id: MessageId,
    pub sender: Option<UserId>,
    pub reply_to: Option<MessageId>,
    pub text: Option<String>,
    pub is_group: bool,
}

impl From<&Message> for InboundMessage {
    fn from(msg: &Message) -> Self {
        Self {
            chat_id: msg.chat.id,
            message_id: msg.id,
            sender: msg.from().map(|user| user.id),
            reply_to: msg.reply_to_message().map(|parent| parent.id),
            text: msg.text().map(str::to_owned),
            is_group: !msg.chat.is_private(),
        }
    }
}
