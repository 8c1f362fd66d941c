//! Test doubles shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};
use futures::future::BoxFuture;
use async_trait::async_trait;
use teloxide::types::{
    CallbackQuery, ChatId, InlineKeyboardButtonKind, InlineKeyboardMarkup, MessageId, ParseMode,
};

use clinic_booking_bot::bot::{BookingFlow, Outbox, Reply};
use clinic_booking_bot::dialogue::BookingState;
use clinic_booking_bot::session_store::InMemorySessionStore;
use teloxide::dispatching::dialogue::Storage;
use clinic_booking_bot::summary::Sender;

pub const USER_CHAT: ChatId = ChatId(1001);
pub const ADMIN_CHAT: ChatId = ChatId(9009);

/// Something the bot tried to send
#[derive(Clone, Debug)]
pub enum Sent {
    Text {
        chat_id: ChatId,
        text: String,
        parse_mode: Option<ParseMode>,
        buttons: Vec<String>,
    },
    Photo {
        chat_id: ChatId,
        path: PathBuf,
        caption: String,
    },
    Edit {
        chat_id: ChatId,
        message_id: MessageId,
        text: String,
    },
    Ack {
        data: Option<String>,
    },
}

impl Sent {
    pub fn text(&self) -> &str {
        match self {
            Sent::Text { text, .. } | Sent::Edit { text, .. } => text,
            Sent::Photo { caption, .. } => caption,
            Sent::Ack { .. } => "",
        }
    }

    pub fn chat_id(&self) -> Option<ChatId> {
        match self {
            Sent::Text { chat_id, .. } | Sent::Photo { chat_id, .. } | Sent::Edit { chat_id, .. } => {
                Some(*chat_id)
            }
            Sent::Ack { .. } => None,
        }
    }
}

fn button_data(keyboard: Option<&InlineKeyboardMarkup>) -> Vec<String> {
    keyboard
        .map(|keyboard| {
            keyboard
                .inline_keyboard
                .iter()
                .flatten()
                .filter_map(|button| match &button.kind {
                    InlineKeyboardButtonKind::CallbackData(data) => Some(data.clone()),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Outbox that records every call and fails on demand
#[derive(Default)]
pub struct RecordingOutbox {
    sent: Mutex<Vec<Sent>>,
    failing_chats: Mutex<HashSet<ChatId>>,
    fail_photos: AtomicBool,
    fail_edits: AtomicBool,
    fail_acks: AtomicBool,
}

impl RecordingOutbox {
    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn texts_to(&self, chat_id: ChatId) -> Vec<String> {
        self.sent()
            .iter()
            .filter(|sent| sent.chat_id() == Some(chat_id))
            .map(|sent| sent.text().to_string())
            .collect()
    }

    pub fn last(&self) -> Sent {
        self.sent().last().cloned().expect("nothing was sent")
    }

    pub fn clear(&self) {
        self.sent.lock().unwrap().clear();
    }

    /// Make every send to `chat_id` fail
    pub fn fail_sends_to(&self, chat_id: ChatId) {
        self.failing_chats.lock().unwrap().insert(chat_id);
    }

    pub fn fail_photos(&self) {
        self.fail_photos.store(true, Ordering::SeqCst);
    }

    pub fn fail_edits(&self) {
        self.fail_edits.store(true, Ordering::SeqCst);
    }

    pub fn fail_acks(&self) {
        self.fail_acks.store(true, Ordering::SeqCst);
    }

    fn record(&self, sent: Sent) {
        self.sent.lock().unwrap().push(sent);
    }
}

#[async_trait]
impl Outbox for RecordingOutbox {
    async fn send(&self, chat_id: ChatId, reply: Reply) -> Result<()> {
        if self.failing_chats.lock().unwrap().contains(&chat_id) {
            bail!("Bad Request: chat not found");
        }
        self.record(Sent::Text {
            chat_id,
            buttons: button_data(reply.keyboard.as_ref()),
            text: reply.text,
            parse_mode: reply.parse_mode,
        });
        Ok(())
    }

    async fn send_photo(&self, chat_id: ChatId, photo: &Path, caption: Reply) -> Result<()> {
        if self.fail_photos.load(Ordering::SeqCst) {
            bail!("Bad Request: IMAGE_PROCESS_FAILED");
        }
        self.record(Sent::Photo {
            chat_id,
            path: photo.to_path_buf(),
            caption: caption.text,
        });
        Ok(())
    }

    async fn edit_text(&self, chat_id: ChatId, message_id: MessageId, text: &str) -> Result<()> {
        if self.fail_edits.load(Ordering::SeqCst) {
            bail!("Bad Request: message to edit not found");
        }
        self.record(Sent::Edit {
            chat_id,
            message_id,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn acknowledge(&self, query: &CallbackQuery) -> Result<()> {
        if self.fail_acks.load(Ordering::SeqCst) {
            bail!("Bad Request: query is too old and response timeout expired");
        }
        self.record(Sent::Ack {
            data: query.data.clone(),
        });
        Ok(())
    }
}

/// In-memory store whose writes can be switched to fail
#[derive(Default)]
pub struct FlakyStore {
    inner: Arc<InMemorySessionStore>,
    fail_updates: AtomicBool,
}

impl FlakyStore {
    pub fn fail_updates(&self) {
        self.fail_updates.store(true, Ordering::SeqCst);
    }
}

impl Storage<BookingState> for FlakyStore {
    type Error = io::Error;

    fn remove_dialogue(self: Arc<Self>, chat_id: ChatId) -> BoxFuture<'static, Result<(), io::Error>> {
        Box::pin(async move {
            Arc::clone(&self.inner)
                .remove_dialogue(chat_id)
                .await
                .map_err(io::Error::other)
        })
    }

    fn update_dialogue(
        self: Arc<Self>,
        chat_id: ChatId,
        dialogue: BookingState,
    ) -> BoxFuture<'static, Result<(), io::Error>> {
        Box::pin(async move {
            if self.fail_updates.load(Ordering::SeqCst) {
                return Err(io::Error::other("session backend unavailable"));
            }
            Arc::clone(&self.inner)
                .update_dialogue(chat_id, dialogue)
                .await
                .map_err(io::Error::other)
        })
    }

    fn get_dialogue(
        self: Arc<Self>,
        chat_id: ChatId,
    ) -> BoxFuture<'static, Result<Option<BookingState>, io::Error>> {
        Box::pin(async move {
            Arc::clone(&self.inner)
                .get_dialogue(chat_id)
                .await
                .map_err(io::Error::other)
        })
    }
}

pub fn sender() -> Sender {
    Sender {
        first_name: "Abebe".to_string(),
        last_name: Some("Kebede".to_string()),
        username: Some("abebe_k".to_string()),
    }
}

pub fn missing_image() -> PathBuf {
    PathBuf::from("definitely-missing-welcome.jpg")
}

pub fn flow(admin: Option<ChatId>) -> BookingFlow {
    BookingFlow::new(
        Arc::new(InMemorySessionStore::new(None)).erase(),
        admin,
        missing_image(),
    )
}
