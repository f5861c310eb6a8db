//! Telegram Bot API client.
//!
//! Provides the chat transport:
//! - Long-polling for incoming updates (`getUpdates`)
//! - Sending text replies (`sendMessage`)
//!
//! Implements [`MessengerPort`] so the broadcast notifier can deliver
//! through real chats. Per-recipient failures map to delivery errors
//! the notifier turns into roster evictions.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tokio::time::timeout;
use tracing::debug;

use tally_domain::{ActorId, EndpointId};
use tally_notify::{MessengerPort, NotifyError};

// =============================================================================
// Constants
// =============================================================================

/// Telegram Bot API base URL
const TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Timeout for plain requests in seconds
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Extra slack on top of the long-poll window in seconds
const POLL_SLACK_SECS: u64 = 10;

// =============================================================================
// Errors
// =============================================================================

/// Errors that can occur in the Telegram client.
#[derive(Debug, Clone, Error)]
pub enum TelegramError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    /// API answered with ok=false
    #[error("Telegram API error: {description}")]
    ApiError {
        /// Telegram's error description
        description: String,
    },

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Request timed out
    #[error("Request timed out")]
    Timeout,
}

// =============================================================================
// Wire Types
// =============================================================================

/// Envelope every Bot API response arrives in.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

/// One incoming update.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramUpdate {
    /// Monotonic update id, used as the next poll offset
    pub update_id: i64,
    /// The message, when the update carries one
    pub message: Option<TelegramMessage>,
}

/// An incoming chat message.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramMessage {
    /// Message id within the chat
    pub message_id: i64,
    /// Sender, absent for channel posts
    pub from: Option<TelegramUser>,
    /// Chat the message arrived in
    pub chat: TelegramChat,
    /// Text content, absent for media messages
    pub text: Option<String>,
}

/// The sending user.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramUser {
    /// Telegram user id
    pub id: i64,
    /// Display name
    pub first_name: String,
    /// Handle, when the user has one
    pub username: Option<String>,
}

/// A chat (private, group, or channel).
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramChat {
    /// Telegram chat id
    pub id: i64,
}

impl TelegramMessage {
    /// Actor id of the sender (falls back to the chat id for channel
    /// posts, which carry no user).
    pub fn actor(&self) -> ActorId {
        ActorId(self.from.as_ref().map(|u| u.id).unwrap_or(self.chat.id))
    }

    /// Endpoint to reply to.
    pub fn endpoint(&self) -> EndpointId {
        EndpointId(self.chat.id)
    }

    /// Sender's display name for notifications.
    pub fn actor_name(&self) -> &str {
        self.from
            .as_ref()
            .map(|u| u.first_name.as_str())
            .unwrap_or("seseorang")
    }
}

// =============================================================================
// Telegram Client
// =============================================================================

/// Telegram Bot API client.
pub struct TelegramClient {
    /// HTTP client
    client: Client,
    /// Bot token
    token: String,
    /// Base URL, overridable for tests
    base_url: String,
}

impl TelegramClient {
    /// Create a new client for the given bot token.
    pub fn new(token: String) -> Self {
        Self {
            client: Client::new(),
            token,
            base_url: TELEGRAM_API_URL.to_string(),
        }
    }

    /// Create a client against a custom base URL (local test server).
    pub fn with_base_url(token: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            token,
            base_url,
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }

    /// Long-poll for updates after `offset`, waiting up to
    /// `poll_secs` server-side.
    pub async fn get_updates(
        &self,
        offset: i64,
        poll_secs: u64,
    ) -> Result<Vec<TelegramUpdate>, TelegramError> {
        let url = self.method_url("getUpdates");
        let body = json!({
            "offset": offset,
            "timeout": poll_secs,
            "allowed_updates": ["message"],
        });

        let response = timeout(
            Duration::from_secs(poll_secs + POLL_SLACK_SECS),
            self.client.post(&url).json(&body).send(),
        )
        .await
        .map_err(|_| TelegramError::Timeout)?
        .map_err(|e| TelegramError::RequestFailed(e.to_string()))?;

        let body = response
            .text()
            .await
            .map_err(|e| TelegramError::ParseError(e.to_string()))?;

        let parsed: ApiResponse<Vec<TelegramUpdate>> =
            serde_json::from_str(&body).map_err(|e| TelegramError::ParseError(e.to_string()))?;

        if !parsed.ok {
            return Err(TelegramError::ApiError {
                description: parsed
                    .description
                    .unwrap_or_else(|| "unknown error".to_string()),
            });
        }

        let updates = parsed.result.unwrap_or_default();
        debug!(count = updates.len(), "Polled updates");
        Ok(updates)
    }

    /// Send a plain text message to a chat.
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), TelegramError> {
        let url = self.method_url("sendMessage");
        let body = json!({
            "chat_id": chat_id,
            "text": text,
        });

        let response = timeout(
            Duration::from_secs(REQUEST_TIMEOUT_SECS),
            self.client.post(&url).json(&body).send(),
        )
        .await
        .map_err(|_| TelegramError::Timeout)?
        .map_err(|e| TelegramError::RequestFailed(e.to_string()))?;

        let body = response
            .text()
            .await
            .map_err(|e| TelegramError::ParseError(e.to_string()))?;

        let parsed: ApiResponse<serde_json::Value> =
            serde_json::from_str(&body).map_err(|e| TelegramError::ParseError(e.to_string()))?;

        if !parsed.ok {
            return Err(TelegramError::ApiError {
                description: parsed
                    .description
                    .unwrap_or_else(|| "unknown error".to_string()),
            });
        }

        Ok(())
    }
}

#[async_trait]
impl MessengerPort for TelegramClient {
    async fn send_text(&self, endpoint: EndpointId, text: &str) -> Result<(), NotifyError> {
        self.send_message(endpoint.0, text)
            .await
            .map_err(|e| NotifyError::Delivery {
                endpoint,
                reason: e.to_string(),
            })
    }
}

// =============================================================================
// Tests
// =============================================================================
