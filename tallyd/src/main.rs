//! Tally Bot Daemon
//!
//! Chat-driven profit ledger over a sheet-like backing table.
//!
//! # Usage
//!
//! ```bash
//! # Start with default configuration
//! TALLY_BOT_TOKEN=123:abc cargo run -p tallyd
//! ```
//!
//! # Environment Variables
//!
//! - `TALLY_ENV`: Environment (test, development, production)
//! - `TALLY_BOT_TOKEN`: Telegram bot token (required)
//! - `TALLY_POLL_SECS`: Long-poll window in seconds (default: 30)
//! - `TALLY_SHEET_NAME`: Backing sheet name (default: SEED)
//! - `TALLY_ROSTER_PATH`: Subscriber roster file (default: subscribers.json)

use tallyd::{Bot, Config};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("tallyd=info".parse()?))
        .init();

    // Load configuration
    let config = Config::from_env()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %config.environment,
        sheet = %config.sheet.name,
        roster = %config.roster_path.display(),
        "Tally Bot Daemon"
    );

    // Create and run the bot
    let bot = Bot::new_memory(config);
    bot.run().await?;

    Ok(())
}
