//! # Configuration Module
//!
//! Reads the bot settings from the process environment (after `.env` has been
//! loaded by `main`). Only the token is mandatory; everything else has a
//! default or degrades a feature with a logged warning.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use teloxide::types::ChatId;
use tracing::{info, warn};

use crate::errors::ConfigError;

pub const DEFAULT_WELCOME_IMAGE: &str = "nina.jpg";
pub const DEFAULT_SESSION_TTL_SECS: u64 = 24 * 60 * 60; // one day

/// Runtime configuration shared by both transports
#[derive(Debug, Clone)]
pub struct Config {
    /// Bot API token
    pub bot_token: String,
    /// Chat that receives a copy of every completed booking
    pub admin_chat_id: Option<ChatId>,
    /// Local photo sent with the welcome caption
    pub welcome_image: PathBuf,
    /// Idle time after which an unfinished booking is dropped; `None` keeps it forever
    pub session_ttl: Option<Duration>,
}

impl Config {
    /// Build the configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let bot_token = read("BOT_TOKEN").ok_or(ConfigError::MissingToken)?;

        let admin_chat_id = match read("ADMIN_ID") {
            None => {
                warn!("ADMIN_ID missing, admin will not receive booking messages");
                None
            }
            Some(raw) => match raw.parse::<i64>() {
                Ok(id) => {
                    info!(admin_chat_id = id, "Admin notifications enabled; the admin must have started a chat with the bot");
                    Some(ChatId(id))
                }
                Err(_) => {
                    warn!(value = %raw, "ADMIN_ID is not a numeric chat id, admin notifications disabled");
                    None
                }
            },
        };

        let welcome_image = read("WELCOME_IMAGE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_WELCOME_IMAGE));

        let ttl_secs = match read("SESSION_TTL_SECS") {
            None => DEFAULT_SESSION_TTL_SECS,
            Some(raw) => raw.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                name: "SESSION_TTL_SECS",
                value: raw.clone(),
            })?,
        };
        let session_ttl = (ttl_secs > 0).then(|| Duration::from_secs(ttl_secs));

        Ok(Self {
            bot_token,
            admin_chat_id,
            welcome_image,
            session_ttl,
        })
    }
}
