//! Long-polling transport: a teloxide dispatcher feeding the booking flow.

use std::sync::Arc;

use anyhow::{Context, Result};
use teloxide::prelude::*;
use teloxide::types::CallbackQuery;
use teloxide::utils::command::BotCommands;
use tracing::{info, warn};

use crate::bot::{self, Command, TelegramBookingBot};
use crate::config::Config;
use crate::session_store::spawn_session_purger;
use crate::shutdown::terminate_signal;

/// Run the update loop until Ctrl+C or SIGTERM
pub async fn run(config: Config) -> Result<()> {
    let bot = Bot::new(&config.bot_token);
    let me = bot
        .get_me()
        .await
        .context("Failed to fetch bot info, check BOT_TOKEN")?;
    info!(username = %me.username(), "Bot authorized");

    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        warn!(error = %e, "Failed to register bot commands");
    }

    let (app, store) = TelegramBookingBot::from_config(bot.clone(), &config, me.username());
    let purger = spawn_session_purger(store);

    info!("Bot initialized, starting dispatcher");

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(
            |msg: Message, app: Arc<TelegramBookingBot>| async move {
                bot::message_handler(&*app, msg).await
            },
        ))
        .branch(Update::filter_callback_query().endpoint(
            |q: CallbackQuery, app: Arc<TelegramBookingBot>| async move {
                bot::callback_handler(&*app, q).await
            },
        ));

    let mut dispatcher = Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![app])
        .error_handler(LoggingErrorHandler::with_custom_text(
            "An error has occurred in the dispatcher",
        ))
        .enable_ctrlc_handler()
        .build();

    // Ctrl+C is covered by the dispatcher itself
    let shutdown_token = dispatcher.shutdown_token();
    tokio::spawn(async move {
        terminate_signal().await;
        info!("SIGTERM received, stopping the update loop");
        match shutdown_token.shutdown() {
            Ok(stopped) => stopped.await,
            Err(e) => warn!(error = ?e, "Dispatcher was not running"),
        }
    });

    dispatcher.dispatch().await;

    if let Some(purger) = purger {
        purger.abort();
    }
    info!("Dispatcher stopped");
    Ok(())
}
