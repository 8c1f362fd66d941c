//! Webhook transport: Telegram POSTs each update to a single HTTP route.
//!
//! - `GET` answers a static liveness string
//! - `POST` processes the update to completion and always answers `200` so
//!   Telegram does not redeliver, unless the bot token is missing
//! - any other method gets `405 Method Not Allowed`

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use teloxide::prelude::*;
use teloxide::types::Update;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::bot::{BookingBot, Outbox, TelegramBookingBot};
use crate::config::Config;
use crate::errors::ConfigError;
use crate::session_store::spawn_session_purger;
use crate::shutdown::shutdown_signal;

pub const LIVENESS_TEXT: &str = "Clinic booking bot is running.";
pub const MISSING_TOKEN_TEXT: &str = "Configuration Error: BOT_TOKEN missing.";

/// Router state; `None` when the bot could not be configured
pub struct WebhookState<O> {
    bot: Option<Arc<BookingBot<O>>>,
}

// Manual impl: the derive would demand `O: Clone`
impl<O> Clone for WebhookState<O> {
    fn clone(&self) -> Self {
        Self {
            bot: self.bot.clone(),
        }
    }
}

impl<O> WebhookState<O> {
    pub fn new(bot: Arc<BookingBot<O>>) -> Self {
        Self { bot: Some(bot) }
    }

    /// State for a server started without a usable configuration
    pub fn unconfigured() -> Self {
        Self { bot: None }
    }
}

/// Build the webhook router serving `path`
pub fn build_router<O: Outbox + 'static>(path: &str, state: WebhookState<O>) -> Router {
    let path = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    };

    Router::new()
        .route(&path, get(liveness).post(receive_update::<O>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn liveness() -> &'static str {
    LIVENESS_TEXT
}

async fn receive_update<O: Outbox + 'static>(
    State(state): State<WebhookState<O>>,
    body: Bytes,
) -> (StatusCode, &'static str) {
    let Some(bot) = state.bot else {
        error!("BOT_TOKEN is not set, rejecting update");
        return (StatusCode::INTERNAL_SERVER_ERROR, MISSING_TOKEN_TEXT);
    };

    let update: Update = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(e) => {
            warn!(error = %e, "Ignoring request body that is not a Telegram update");
            return (StatusCode::OK, "OK");
        }
    };

    match bot.dispatch_update(update).await {
        Ok(()) => (StatusCode::OK, "OK"),
        Err(e) => {
            error!(error = %e, "Webhook processing error");
            (StatusCode::OK, "OK (Error Handled Internally)")
        }
    }
}

/// Serve the webhook until Ctrl+C or SIGTERM.
///
/// A configuration error does not stop the server: it is logged and every
/// update is answered with a configuration error instead.
pub async fn run(config: Result<Config, ConfigError>, addr: SocketAddr, path: &str) -> Result<()> {
    let mut purger = None;
    let state = match config {
        Ok(config) => {
            let bot = Bot::new(&config.bot_token);
            let username = match bot.get_me().await {
                Ok(me) => me.username().to_string(),
                Err(e) => {
                    error!(error = %e, "Failed to fetch the bot username, commands addressed with @ will be ignored");
                    String::new()
                }
            };
            let (app, store) = TelegramBookingBot::from_config(bot, &config, username);
            purger = spawn_session_purger(store);
            WebhookState::new(app)
        }
        Err(e) => {
            error!(error = %e, "Configuration error, updates will be rejected until it is fixed");
            WebhookState::unconfigured()
        }
    };

    let router = build_router(path, state);
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, path = %path, "Webhook listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(purger) = purger {
        purger.abort();
    }
    info!("Webhook server stopped");
    Ok(())
}
