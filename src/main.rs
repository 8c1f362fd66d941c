use std::env;
use std::net::SocketAddr;

use anyhow::Result;
use clap::{Parser, Subcommand};
use teloxide::prelude::*;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use clinic_booking_bot::config::Config;
use clinic_booking_bot::{polling, webhook};

#[derive(Parser)]
#[command(name = "clinic-booking-bot", version, about = "Telegram appointment booking bot")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Receive updates by long polling (default)
    Poll,
    /// Receive updates through an HTTP webhook
    Webhook {
        /// Address to listen on
        #[arg(long, env = "WEBHOOK_ADDR", default_value = "0.0.0.0:8080")]
        addr: SocketAddr,
        /// Route Telegram posts updates to
        #[arg(long, env = "WEBHOOK_PATH", default_value = "/api")]
        path: String,
    },
    /// Verify the bot token with getMe
    CheckToken,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file before anything reads them
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    init_tracing();

    info!("Starting Clinic Booking Telegram Bot");

    match cli.command.unwrap_or(Commands::Poll) {
        Commands::Poll => {
            let config = Config::from_env().inspect_err(|e| {
                error!(error = %e, "Configuration error, the bot cannot start");
            })?;
            polling::run(config).await.inspect_err(|e| {
                error!(error = %e, "Bot stopped with an error");
            })?;
        }
        Commands::Webhook { addr, path } => {
            webhook::run(Config::from_env(), addr, &path).await?;
        }
        Commands::CheckToken => {
            let config = Config::from_env().inspect_err(|e| {
                error!(error = %e, "Configuration error");
            })?;
            let me = Bot::new(config.bot_token).get_me().await?;
            println!(
                "Bot info: id={} username=@{}",
                me.user.id,
                me.user.username.as_deref().unwrap_or("N/A")
            );
        }
    }

    Ok(())
}
