//! Tally Chat Connectors
//!
//! Adapters for chat transport APIs.
//! Normalizes transport-specific types to domain types.

#![warn(clippy::all)]

// Public modules
pub mod telegram;

// Re-exports
pub use telegram::{
    TelegramChat, TelegramClient, TelegramError, TelegramMessage, TelegramUpdate, TelegramUser,
};
