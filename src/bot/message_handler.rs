//! Message Handler module for processing incoming Telegram messages

use anyhow::Result;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::debug;

use crate::summary::Sender;

use super::dialogue_manager::{Action, Incoming};
use super::outbox::Outbox;
use super::BookingBot;

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "These commands are supported:")]
pub enum Command {
    #[command(description = "show the clinic info and start a booking.")]
    Start,
    #[command(description = "cancel the current booking.")]
    Cancel,
    #[command(description = "display this text.")]
    Help,
}

/// Classify the text of a message.
///
/// Commands may carry a `@botname` suffix; one naming another bot is not ours
/// and comes back as [`Action::UnknownCommand`].
pub fn parse_text(text: &str, bot_username: &str) -> Action {
    let text = text.trim();
    if !text.starts_with('/') {
        return Action::Text(text.to_string());
    }

    match Command::parse(text, bot_username) {
        Ok(Command::Start) => Action::Start,
        Ok(Command::Cancel) => Action::Cancel,
        Ok(Command::Help) => Action::Help,
        Err(_) => {
            let head = text.split_whitespace().next().unwrap_or(text);
            Action::UnknownCommand(head.to_string())
        }
    }
}

pub async fn message_handler<O: Outbox>(app: &BookingBot<O>, msg: Message) -> Result<()> {
    let Some(text) = msg.text() else {
        debug!(chat_id = %msg.chat.id, "Ignoring non-text message");
        return Ok(());
    };
    debug!(chat_id = %msg.chat.id, message_length = text.len(), "Received text message from user");

    let sender = msg.from.as_ref().map(Sender::from).unwrap_or_default();
    let incoming = Incoming::new(msg.chat.id, sender, parse_text(text, app.bot_username()));
    app.flow().handle(app.outbox(), incoming).await;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOT: &str = "nina_clinic_bot";

    #[test]
    fn test_plain_text_is_trimmed() {
        assert_eq!(parse_text("  Abebe  ", BOT), Action::Text("Abebe".to_string()));
        assert_eq!(
            parse_text("2025-10-27 14:00", BOT),
            Action::Text("2025-10-27 14:00".to_string())
        );
    }

    #[test]
    fn test_known_commands() {
        assert_eq!(parse_text("/start", BOT), Action::Start);
        assert_eq!(parse_text("/cancel", BOT), Action::Cancel);
        assert_eq!(parse_text("/help", BOT), Action::Help);
        assert_eq!(parse_text("/start@nina_clinic_bot", BOT), Action::Start);
        assert_eq!(parse_text("/cancel@Nina_Clinic_Bot", BOT), Action::Cancel);
        assert_eq!(parse_text("/start booking", BOT), Action::Start);
    }

    #[test]
    fn test_commands_for_other_bots_are_not_ours() {
        assert_eq!(
            parse_text("/cancel@some_other_bot", BOT),
            Action::UnknownCommand("/cancel@some_other_bot".to_string())
        );
        assert_eq!(
            parse_text("/start@some_other_bot now", BOT),
            Action::UnknownCommand("/start@some_other_bot".to_string())
        );
        // Without a known username no addressed command is accepted
        assert_eq!(
            parse_text("/start@nina_clinic_bot", ""),
            Action::UnknownCommand("/start@nina_clinic_bot".to_string())
        );
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(
            parse_text("/prices", BOT),
            Action::UnknownCommand("/prices".to_string())
        );
    }

    #[test]
    fn test_help_lists_commands() {
        let help = Command::descriptions().to_string();
        assert!(help.contains("/start"));
        assert!(help.contains("/cancel"));
    }
}
