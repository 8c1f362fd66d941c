//! Bot module for handling Telegram interactions
//!
//! This module is split into several submodules:
//! - `message_handler`: Turns incoming text messages into booking events
//! - `callback_handler`: Turns inline keyboard presses into booking events
//! - `dialogue_manager`: The booking state machine
//! - `ui_builder`: Creates inline keyboards
//! - `outbox`: Sends replies through the Bot API

pub mod callback_handler;
pub mod dialogue_manager;
pub mod message_handler;
pub mod outbox;
pub mod ui_builder;

use std::sync::Arc;

use anyhow::Result;
use teloxide::dispatching::dialogue::Storage;
use teloxide::types::{Update, UpdateKind};
use teloxide::Bot;
use tracing::debug;

use crate::config::Config;
use crate::session_store::InMemorySessionStore;

pub use callback_handler::callback_handler;
pub use dialogue_manager::{Action, BookingFlow, Incoming};
pub use message_handler::{message_handler, Command};
pub use outbox::{Outbox, Reply, TelegramOutbox};

/// Booking flow paired with the outbox it replies through
pub struct BookingBot<O> {
    flow: BookingFlow,
    outbox: O,
    /// Username used to tell our `/cmd@bot` commands from other bots'
    bot_username: String,
}

/// The production wiring: the Telegram Bot API as outbox
pub type TelegramBookingBot = BookingBot<TelegramOutbox>;

impl<O: Outbox> BookingBot<O> {
    pub fn new(flow: BookingFlow, outbox: O, bot_username: impl Into<String>) -> Self {
        Self {
            flow,
            outbox,
            bot_username: bot_username.into(),
        }
    }

    pub fn flow(&self) -> &BookingFlow {
        &self.flow
    }

    pub fn outbox(&self) -> &O {
        &self.outbox
    }

    pub fn bot_username(&self) -> &str {
        &self.bot_username
    }

    /// Route a raw update to the message or button handler
    pub async fn dispatch_update(&self, update: Update) -> Result<()> {
        match update.kind {
            UpdateKind::Message(msg) => message_handler(self, msg).await,
            UpdateKind::CallbackQuery(q) => callback_handler(self, q).await,
            _ => {
                debug!("Ignoring update that is neither a message nor a button press");
                Ok(())
            }
        }
    }
}

impl TelegramBookingBot {
    /// Wire a bot from configuration, returning the session store as well so
    /// the caller can schedule expiry sweeps
    pub fn from_config(
        bot: Bot,
        config: &Config,
        bot_username: impl Into<String>,
    ) -> (Arc<Self>, Arc<InMemorySessionStore>) {
        let store = Arc::new(InMemorySessionStore::new(config.session_ttl));
        let flow = BookingFlow::from_config(Arc::clone(&store).erase(), config);
        let app = Arc::new(BookingBot::new(flow, TelegramOutbox::new(bot), bot_username));
        (app, store)
    }
}
