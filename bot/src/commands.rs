use std::future::Future;

use teloxide::utils::command::BotCommands;

use crate::app::App;
use crate::duration::is_schedulable;
use crate::error::Result;
use crate::transport::InboundMessage;

pub const GREETING: &str = "Hi! I'm an auto-delete bot!";
pub const GROUP_ONLY: &str = "Use this command in a group!";
pub const TIME_GUIDANCE: &str = "Please provide a valid time! E.g., 1s, 1m, 1h, 1d.";
pub const TIME_SET: &str = "Auto delete time set!";
pub const STOPPED: &str = "Auto delete stopped!";
pub const UNAUTHORIZED: &str = "You are not authorized to use this command!";

#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "snake_case", description = "Available commands:")]
pub enum Command {
    #[command(description = "register with the bot.")]
    Start,
    #[command(description = "auto-delete group messages after a time, e.g. 30s, 10m, 2h, 1d.")]
    SetTime(String),
    #[command(description = "stop auto-deleting messages in this group.")]
    StopDel,
    #[command(description = "show user and group counts (owner only).")]
    Stats,
}

/// Runs a store write in the background; failures are only logged.
fn spawn_write<F>(what: &'static str, write: F)
where
    F: Future<Output = Result<()>> + Send + 'static,
{
    tokio::spawn(async move {
        if let Err(e) = write.await {
            log::warn!("Error {}: {}", what, e);
        }
    });
}

async fn reply(app: &App, msg: &InboundMessage, text: &str) -> Result<()> {
    app.transport.send_text(msg.chat_id, text.to_string()).await
}

pub async fn handle_command(app: &App, msg: &InboundMessage, cmd: Command) -> Result<()> {
    match cmd {
        Command::Start => {
            if let Some(user) = msg.sender {
                let store = app.store.clone();
                spawn_write("adding user", async move { store.upsert_user(user.0 as i64).await });
            }
            reply(app, msg, GREETING).await?;
        }
        Command::SetTime(args) => {
            if !msg.is_group {
                reply(app, msg, GROUP_ONLY).await?;
                return Ok(());
            }

            let spec = match args.split_whitespace().next() {
                Some(spec) if is_schedulable(spec) => spec.to_string(),
                _ => {
                    reply(app, msg, TIME_GUIDANCE).await?;
                    return Ok(());
                }
            };

            let store = app.store.clone();
            let chat_id = msg.chat_id.0;
            log::info!("Chat {} retention set to {}", chat_id, spec);
            spawn_write("saving group settings", async move {
                store.set_retention(chat_id, spec).await
            });
            reply(app, msg, TIME_SET).await?;
        }
        Command::StopDel => {
            if !msg.is_group {
                reply(app, msg, GROUP_ONLY).await?;
                return Ok(());
            }

            let store = app.store.clone();
            let chat_id = msg.chat_id.0;
            log::info!("Chat {} retention cleared", chat_id);
            spawn_write("removing group settings", async move {
                store.clear_retention(chat_id).await
            });
            reply(app, msg, STOPPED).await?;
        }
        Command::Stats => {
            if msg.sender != Some(app.owner_id) {
                reply(app, msg, UNAUTHORIZED).await?;
                return Ok(());
            }

            let users = app.store.count_users().await.unwrap_or_else(|e| {
                log::warn!("Error fetching users count: {}", e);
                0
            });
            let groups = app.store.count_groups().await.unwrap_or_else(|e| {
                log::warn!("Error fetching groups count: {}", e);
                0
            });
            let text = format!("Stats:\nUsers: {}\nGroups: {}", users, groups);
            reply(app, msg, &text).await?;
        }
    }

    Ok(())
}
