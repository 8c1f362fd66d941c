//! Dialogue Manager module: the booking conversation state machine
//!
//! `BookingFlow` receives transport-neutral [`Incoming`] events, moves the
//! chat's session through the booking steps and emits replies through an
//! [`Outbox`]. It never learns whether the event came from long polling or
//! from a webhook.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use chrono::Datelike;
use teloxide::types::{ChatId, MessageId};
use teloxide::utils::command::BotCommands;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::dialogue::{Booking, BookingDialogue, BookingState, Service, TextOutcome};
use crate::session_store::SessionStorage;
use crate::summary::{format_admin_summary, format_user_summary, Sender};
use crate::texts::{
    datetime_prompt, welcome_html, CANCELLED, CANCELLED_NOTICE, CHOOSE_OPTION, CONTACT_PROMPT,
    GENERIC_ERROR, MESSAGE_PROMPT, NAME_PROMPT, SEND_START, SERVICE_PROMPT, SESSION_EXPIRED,
    USE_SERVICE_BUTTONS,
};

use super::message_handler::Command;
use super::outbox::{Outbox, Reply};
use super::ui_builder::{
    create_service_keyboard, create_start_again_keyboard, create_welcome_keyboard,
    BEGIN_BOOKING_DATA, CANCEL_BOOKING_DATA,
};

/// What the user did
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// `/start`
    Start,
    /// `/help`
    Help,
    /// `/cancel` or the Cancel button
    Cancel,
    /// The Start / Start Again button
    BeginBooking,
    SelectService(Service),
    /// Any text that is not a command, trimmed
    Text(String),
    UnknownCommand(String),
    UnknownButton(String),
}

impl Action {
    pub fn from_callback_data(data: &str) -> Self {
        match data {
            BEGIN_BOOKING_DATA => Action::BeginBooking,
            CANCEL_BOOKING_DATA => Action::Cancel,
            _ => match Service::from_callback_data(data) {
                Some(service) => Action::SelectService(service),
                None => Action::UnknownButton(data.to_string()),
            },
        }
    }
}

/// One inbound event for the state machine
#[derive(Clone, Debug)]
pub struct Incoming {
    pub chat_id: ChatId,
    pub sender: Sender,
    pub action: Action,
    /// Message carrying the pressed button, when the event is a button press
    pub origin: Option<MessageId>,
}

impl Incoming {
    pub fn new(chat_id: ChatId, sender: Sender, action: Action) -> Self {
        Self {
            chat_id,
            sender,
            action,
            origin: None,
        }
    }

    pub fn from_message(mut self, message_id: MessageId) -> Self {
        self.origin = Some(message_id);
        self
    }
}

/// Prompt asking for the answer a session is waiting for
pub fn prompt_for(state: &BookingState) -> Reply {
    match state {
        BookingState::AwaitingName => Reply::plain(NAME_PROMPT),
        BookingState::AwaitingContact { .. } => Reply::plain(CONTACT_PROMPT),
        BookingState::AwaitingService { .. } => {
            Reply::plain(SERVICE_PROMPT).with_keyboard(create_service_keyboard())
        }
        BookingState::AwaitingDatetime { .. } => {
            Reply::plain(datetime_prompt(chrono::Local::now().year()))
        }
        BookingState::AwaitingMessage { .. } => Reply::plain(MESSAGE_PROMPT),
    }
}

/// The booking conversation
pub struct BookingFlow {
    storage: Arc<SessionStorage>,
    admin_chat_id: Option<ChatId>,
    welcome_image: PathBuf,
}

impl BookingFlow {
    pub fn new(
        storage: Arc<SessionStorage>,
        admin_chat_id: Option<ChatId>,
        welcome_image: PathBuf,
    ) -> Self {
        Self {
            storage,
            admin_chat_id,
            welcome_image,
        }
    }

    pub fn from_config(storage: Arc<SessionStorage>, config: &Config) -> Self {
        Self::new(storage, config.admin_chat_id, config.welcome_image.clone())
    }

    /// The booking dialogue of a chat
    pub fn dialogue(&self, chat_id: ChatId) -> BookingDialogue {
        BookingDialogue::new(Arc::clone(&self.storage), chat_id)
    }

    /// Process one event to completion.
    ///
    /// Failures never escape: the session is dropped and the user is asked to
    /// start over.
    pub async fn handle<O: Outbox>(&self, outbox: &O, incoming: Incoming) {
        let chat_id = incoming.chat_id;
        if let Err(e) = self.route(outbox, incoming).await {
            error!(chat_id = %chat_id, error = %e, "Booking handler failed, resetting session");
            if let Err(e) = forget(&self.dialogue(chat_id)).await {
                error!(chat_id = %chat_id, error = %e, "Failed to clear session after handler error");
            }
            if let Err(e) = outbox.send(chat_id, Reply::plain(GENERIC_ERROR)).await {
                error!(chat_id = %chat_id, error = %e, "Failed to send error notice");
            }
        }
    }

    async fn route<O: Outbox>(&self, outbox: &O, incoming: Incoming) -> Result<()> {
        let Incoming {
            chat_id,
            sender,
            action,
            origin,
        } = incoming;
        debug!(chat_id = %chat_id, action = ?action, "Handling booking event");
        let dialogue = self.dialogue(chat_id);

        match action {
            Action::Start => self.start(outbox, &dialogue).await,
            Action::Help => {
                outbox
                    .send(chat_id, Reply::plain(Command::descriptions().to_string()))
                    .await
            }
            Action::Cancel => self.cancel(outbox, &dialogue, origin).await,
            Action::BeginBooking => self.begin_booking(outbox, &dialogue).await,
            Action::SelectService(service) => {
                self.select_service(outbox, &dialogue, origin, service).await
            }
            Action::Text(text) => self.accept_text(outbox, &dialogue, &sender, &text).await,
            Action::UnknownCommand(command) => {
                if current(&dialogue).await?.is_some() {
                    debug!(chat_id = %chat_id, command = %command, "Ignoring unknown command during booking");
                    Ok(())
                } else {
                    outbox.send(chat_id, Reply::plain(SEND_START)).await
                }
            }
            Action::UnknownButton(data) => {
                warn!(chat_id = %chat_id, data = %data, "Ignoring unknown button");
                Ok(())
            }
        }
    }

    async fn start<O: Outbox>(&self, outbox: &O, dialogue: &BookingDialogue) -> Result<()> {
        let chat_id = dialogue.chat_id();
        forget(dialogue).await?;

        let welcome = Reply::html(welcome_html());
        if self.welcome_image.is_file() {
            if let Err(e) = outbox
                .send_photo(chat_id, &self.welcome_image, welcome.clone())
                .await
            {
                error!(chat_id = %chat_id, error = %e, "Failed to send welcome photo, sending text only");
                outbox.send(chat_id, welcome).await?;
            }
        } else {
            warn!(path = %self.welcome_image.display(), "Welcome image not found, sending text only");
            outbox.send(chat_id, welcome).await?;
        }

        outbox
            .send(
                chat_id,
                Reply::plain(CHOOSE_OPTION).with_keyboard(create_welcome_keyboard()),
            )
            .await
    }

    async fn begin_booking<O: Outbox>(&self, outbox: &O, dialogue: &BookingDialogue) -> Result<()> {
        let state = BookingState::default();
        let prompt = prompt_for(&state);
        save(dialogue, state).await?;
        info!(chat_id = %dialogue.chat_id(), "Booking started");
        outbox.send(dialogue.chat_id(), prompt).await
    }

    async fn cancel<O: Outbox>(
        &self,
        outbox: &O,
        dialogue: &BookingDialogue,
        origin: Option<MessageId>,
    ) -> Result<()> {
        let chat_id = dialogue.chat_id();
        forget(dialogue).await?;
        info!(chat_id = %chat_id, "Booking cancelled");

        if let Some(message_id) = origin {
            if let Err(e) = outbox.edit_text(chat_id, message_id, CANCELLED_NOTICE).await {
                warn!(chat_id = %chat_id, error = %e, "Failed to edit message on cancel");
            }
        }
        outbox.send(chat_id, Reply::plain(CANCELLED)).await
    }

    async fn select_service<O: Outbox>(
        &self,
        outbox: &O,
        dialogue: &BookingDialogue,
        origin: Option<MessageId>,
        service: Service,
    ) -> Result<()> {
        let chat_id = dialogue.chat_id();
        let next = current(dialogue)
            .await?
            .and_then(|state| state.select_service(service));

        let Some(next) = next else {
            debug!(chat_id = %chat_id, service = ?service, "Service selected outside the service step");
            return outbox.send(chat_id, Reply::plain(SESSION_EXPIRED)).await;
        };

        let prompt = prompt_for(&next);
        save(dialogue, next).await?;

        // Replacing the menu removes its buttons, so a service cannot be picked twice
        if let Some(message_id) = origin {
            match outbox.edit_text(chat_id, message_id, &prompt.text).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    warn!(chat_id = %chat_id, error = %e, "Failed to edit service menu, sending a new message")
                }
            }
        }
        outbox.send(chat_id, prompt).await
    }

    async fn accept_text<O: Outbox>(
        &self,
        outbox: &O,
        dialogue: &BookingDialogue,
        sender: &Sender,
        text: &str,
    ) -> Result<()> {
        let chat_id = dialogue.chat_id();
        let Some(state) = current(dialogue).await? else {
            return outbox.send(chat_id, Reply::plain(SEND_START)).await;
        };

        match state.accept_text(text) {
            TextOutcome::Advanced(next) => {
                debug!(chat_id = %chat_id, step = ?next.step(), "Booking advanced");
                let prompt = prompt_for(&next);
                save(dialogue, next).await?;
                outbox.send(chat_id, prompt).await
            }
            TextOutcome::ExpectsButton => {
                outbox
                    .send(chat_id, Reply::plain(USE_SERVICE_BUTTONS))
                    .await
            }
            TextOutcome::Completed(booking) => {
                self.complete(outbox, dialogue, sender, booking).await
            }
        }
    }

    async fn complete<O: Outbox>(
        &self,
        outbox: &O,
        dialogue: &BookingDialogue,
        sender: &Sender,
        booking: Booking,
    ) -> Result<()> {
        let chat_id = dialogue.chat_id();

        // The patient's copy always goes out before the admin is contacted
        outbox
            .send(
                chat_id,
                Reply::plain(format_user_summary(&booking))
                    .with_keyboard(create_start_again_keyboard()),
            )
            .await?;
        info!(chat_id = %chat_id, service = ?booking.service, "Booking completed");

        self.notify_admin(outbox, &booking, sender).await;

        forget(dialogue).await
    }

    async fn notify_admin<O: Outbox>(&self, outbox: &O, booking: &Booking, sender: &Sender) {
        let Some(admin_chat_id) = self.admin_chat_id else {
            warn!("No ADMIN_ID set, booking was not sent to admin");
            return;
        };

        let summary = format_admin_summary(booking, sender);
        match outbox.send(admin_chat_id, Reply::markdown_v2(summary)).await {
            Ok(()) => info!(admin_chat_id = %admin_chat_id, "Sent booking to admin"),
            Err(e) => {
                error!(admin_chat_id = %admin_chat_id, error = %e, "Failed to send booking to admin")
            }
        }
    }
}

// The erased storage reports boxed errors
async fn current(dialogue: &BookingDialogue) -> Result<Option<BookingState>> {
    dialogue.get().await.map_err(anyhow::Error::from_boxed)
}

async fn save(dialogue: &BookingDialogue, state: BookingState) -> Result<()> {
    dialogue.update(state).await.map_err(anyhow::Error::from_boxed)
}

async fn forget(dialogue: &BookingDialogue) -> Result<()> {
    dialogue.exit().await.map_err(anyhow::Error::from_boxed)
}
