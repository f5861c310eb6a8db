//! Daemon error types.

use tally_connectors::TelegramError;
use tally_domain::DomainError;
use tally_engine::EngineError;
use tally_notify::NotifyError;
use tally_store::StoreError;
use thiserror::Error;

/// Daemon-level errors.
#[derive(Debug, Error)]
pub enum BotError {
    /// Domain error
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Engine error
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Store error
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Notification error
    #[error("Notify error: {0}")]
    Notify(#[from] NotifyError),

    /// Transport error
    #[error("Telegram error: {0}")]
    Telegram(#[from] TelegramError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for daemon operations.
pub type BotResult<T> = Result<T, BotError>;
