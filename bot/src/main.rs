use std::fmt::Debug;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use teloxide::error_handlers::ErrorHandler;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

mod app;
mod commands;
mod config;
mod database;
mod duration;
mod error;
mod executor;
mod message;
mod models;
mod scheduler;
mod transport;

#[cfg(test)]
mod testing;

use app::App;
use commands::Command;
use config::Config;
use database::Database;

#[tokio::main(flavor = "multi_thread", worker_threads = 4)]
async fn main() {
    dotenv::dotenv().ok();
    pretty_env_logger::init();

    if let Err(e) = run().await {
        log::error!("Startup failed: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> error::Result<()> {
    let config = Config::from_env()?;
    log::info!("Starting auto-delete bot...");

    let db = Database::init(&config.mongodb_uri, &config.database).await?;

    let bot = Bot::from_env();
    let me = bot.get_me().await?;
    let username = me.username.clone().unwrap_or_default();
    log::info!("Authorized on account {}", username);

    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        log::warn!("Could not register command list: {}", e);
    }

    let app = App::new(
        Arc::new(db),
        Arc::new(bot.clone()),
        config.owner_id,
        username,
        config.max_pending_deletions,
    );

    let scheduler = app.scheduler.clone();
    let handler = Update::filter_message().endpoint(move |msg: Message| {
        let app = app.clone();
        async move { message::handle_message(app, msg).await }
    });

    Dispatcher::builder(bot, handler)
        .enable_ctrlc_handler()
        .error_handler(Arc::new(LoggingErrorHandler))
        .build()
        .dispatch()
        .await;

    log::info!(
        "Dispatcher stopped, dropping {} pending deletions",
        scheduler.executor().pending()
    );
    Ok(())
}

struct LoggingErrorHandler;

impl<E> ErrorHandler<E> for LoggingErrorHandler
where
    E: Debug + Send + 'static,
{
    fn handle_error(self: Arc<Self>, error: E) -> BoxFuture<'static, ()> {
        Box::pin(async move {
            log::warn!("Dispatcher error: {:?}", error);
        })
    }
}
