//! Tally Bot Daemon Library
//!
//! Runtime orchestrator for the chat-driven profit ledger.
//!
//! # Architecture
//!
//! ```text
//! Telegram → Bot loop → Command Router → Ledger Engine → Table
//!                             │
//!                             ├→ Subscriber Registry (roster.json)
//!                             └→ Broadcast Notifier → other chats
//! ```
//!
//! # Components
//!
//! - **Bot**: main runtime (long-poll loop, reply delivery)
//! - **Router**: text command parsing and reply formatting
//! - **Config**: environment-based configuration
//!
//! # Example
//!
//! ```rust,ignore
//! use tallyd::{Bot, Config};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::from_env().expect("Failed to load config");
//!     let bot = Bot::new_memory(config);
//!     bot.run().await.expect("Bot error");
//! }
//! ```

#![warn(clippy::all)]

pub mod bot;
pub mod config;
pub mod error;
pub mod router;

// Re-exports for convenience
pub use bot::Bot;
pub use config::{month_sheet_name, Config, Environment, SheetConfig, TelegramConfig};
pub use error::{BotError, BotResult};
pub use router::{Command, Router};
