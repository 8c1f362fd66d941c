//! Callback Handler module for processing inline keyboard callback queries

use anyhow::{Context, Result};
use teloxide::prelude::*;
use teloxide::types::CallbackQuery;
use tracing::debug;

use crate::summary::Sender;

use super::dialogue_manager::{Action, Incoming};
use super::outbox::Outbox;
use super::BookingBot;

/// Handle a pressed inline button.
///
/// A failed acknowledgement does not stop the booking step; it is returned
/// afterwards for the caller's error hook.
pub async fn callback_handler<O: Outbox>(app: &BookingBot<O>, q: CallbackQuery) -> Result<()> {
    debug!(user_id = %q.from.id, "Received callback query from user");

    // Answer first so the button stops spinning even if handling takes a while
    let acknowledged = app.outbox().acknowledge(&q).await;

    let action = Action::from_callback_data(q.data.as_deref().unwrap_or_default());
    let sender = Sender::from(&q.from);
    let incoming = match &q.message {
        Some(msg) => Incoming::new(msg.chat().id, sender, action).from_message(msg.id()),
        // Buttons on inline-mode messages carry no chat; the private chat id equals the user id
        None => Incoming::new(ChatId(q.from.id.0 as i64), sender, action),
    };
    app.flow().handle(app.outbox(), incoming).await;

    acknowledged.with_context(|| format!("Failed to answer callback query from user {}", q.from.id))
}
