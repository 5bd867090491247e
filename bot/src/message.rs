use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use crate::app::App;
use crate::commands::{self, Command};
use crate::transport::InboundMessage;

pub async fn handle_message(app: App, msg: Message) -> ResponseResult<()> {
    process(&app, &InboundMessage::from(&msg)).await;
    Ok(())
}

/// Runs a recognised command, then applies the group's retention to the
/// message itself. Commands are not exempt from retention.
pub async fn process(app: &App, msg: &InboundMessage) {
    let command = msg
        .text
        .as_deref()
        .and_then(|text| Command::parse(text, &app.bot_username).ok());

    if let Some(cmd) = command {
        if let Err(e) = commands::handle_command(app, msg, cmd).await {
            log::warn!("Command error in chat {}: {}", msg.chat_id.0, e);
        }
    }

    app.scheduler.observe(msg).await;
}
