//! Outbox module: everything the conversation sends goes through [`Outbox`]

use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{CallbackQuery, InlineKeyboardMarkup, InputFile, MessageId, ParseMode};

/// Outgoing text with its rendering options
#[derive(Clone, Debug)]
pub struct Reply {
    pub text: String,
    pub parse_mode: Option<ParseMode>,
    pub keyboard: Option<InlineKeyboardMarkup>,
}

impl Reply {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            parse_mode: None,
            keyboard: None,
        }
    }

    pub fn html(text: impl Into<String>) -> Self {
        Self {
            parse_mode: Some(ParseMode::Html),
            ..Self::plain(text)
        }
    }

    pub fn markdown_v2(text: impl Into<String>) -> Self {
        Self {
            parse_mode: Some(ParseMode::MarkdownV2),
            ..Self::plain(text)
        }
    }

    pub fn with_keyboard(mut self, keyboard: InlineKeyboardMarkup) -> Self {
        self.keyboard = Some(keyboard);
        self
    }
}

/// Outbound side of the bot API
#[async_trait]
pub trait Outbox: Send + Sync {
    async fn send(&self, chat_id: ChatId, reply: Reply) -> Result<()>;

    /// Send a local photo with `caption` as its caption
    async fn send_photo(&self, chat_id: ChatId, photo: &Path, caption: Reply) -> Result<()>;

    /// Replace the text of an earlier message, dropping its buttons
    async fn edit_text(&self, chat_id: ChatId, message_id: MessageId, text: &str) -> Result<()>;

    /// Stop the loading indicator on a pressed button
    async fn acknowledge(&self, query: &CallbackQuery) -> Result<()>;
}

/// [`Outbox`] backed by the Telegram Bot API
#[derive(Clone)]
pub struct TelegramOutbox {
    bot: Bot,
}

impl TelegramOutbox {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Outbox for TelegramOutbox {
    async fn send(&self, chat_id: ChatId, reply: Reply) -> Result<()> {
        let mut request = self.bot.send_message(chat_id, reply.text);
        if let Some(mode) = reply.parse_mode {
            request = request.parse_mode(mode);
        }
        if let Some(keyboard) = reply.keyboard {
            request = request.reply_markup(keyboard);
        }
        request.await?;
        Ok(())
    }

    async fn send_photo(&self, chat_id: ChatId, photo: &Path, caption: Reply) -> Result<()> {
        let mut request = self
            .bot
            .send_photo(chat_id, InputFile::file(photo.to_path_buf()))
            .caption(caption.text);
        if let Some(mode) = caption.parse_mode {
            request = request.parse_mode(mode);
        }
        if let Some(keyboard) = caption.keyboard {
            request = request.reply_markup(keyboard);
        }
        request.await?;
        Ok(())
    }

    async fn edit_text(&self, chat_id: ChatId, message_id: MessageId, text: &str) -> Result<()> {
        self.bot.edit_message_text(chat_id, message_id, text).await?;
        Ok(())
    }

    async fn acknowledge(&self, query: &CallbackQuery) -> Result<()> {
        self.bot.answer_callback_query(query.id.clone()).await?;
        Ok(())
    }
}
