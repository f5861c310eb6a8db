//! Daemon configuration.
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::error::{BotError, BotResult};
use chrono::{Datelike, NaiveDate};
use std::env;
use std::path::PathBuf;

// =============================================================================
// Configuration
// =============================================================================

/// Daemon configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Telegram transport configuration
    pub telegram: TelegramConfig,

    /// Backing sheet configuration
    pub sheet: SheetConfig,

    /// Where the subscriber roster is persisted
    pub roster_path: PathBuf,

    /// Environment (test, development, production)
    pub environment: Environment,
}

/// Telegram transport configuration.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    /// Bot API token
    pub token: String,
    /// Long-poll window in seconds
    pub poll_secs: u64,
}

/// Backing sheet configuration.
#[derive(Debug, Clone)]
pub struct SheetConfig {
    /// Name of the sheet records live in
    pub name: String,
}

/// Environment type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Test environment (uses stubs)
    Test,
    /// Development environment
    Development,
    /// Production environment
    Production,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> BotResult<Self> {
        // Load .env file if present (ignore errors)
        let _ = dotenvy::dotenv();

        let environment = Self::load_environment()?;
        let telegram = Self::load_telegram_config()?;
        let sheet = Self::load_sheet_config();
        let roster_path = env::var("TALLY_ROSTER_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("subscribers.json"));

        Ok(Self {
            telegram,
            sheet,
            roster_path,
            environment,
        })
    }

    /// Create test configuration.
    pub fn test() -> Self {
        Self {
            telegram: TelegramConfig {
                token: "test-token".to_string(),
                poll_secs: 0,
            },
            sheet: SheetConfig {
                name: "SEED".to_string(),
            },
            roster_path: PathBuf::from("subscribers.json"),
            environment: Environment::Test,
        }
    }

    fn load_environment() -> BotResult<Environment> {
        let env_str = env::var("TALLY_ENV").unwrap_or_else(|_| "development".to_string());

        match env_str.to_lowercase().as_str() {
            "test" => Ok(Environment::Test),
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(BotError::Config(format!(
                "Invalid TALLY_ENV: {}. Expected: test, development, production",
                other
            ))),
        }
    }

    fn load_telegram_config() -> BotResult<TelegramConfig> {
        let token = env::var("TALLY_BOT_TOKEN")
            .map_err(|_| BotError::Config("TALLY_BOT_TOKEN is required".to_string()))?;

        let poll_str = env::var("TALLY_POLL_SECS").unwrap_or_else(|_| "30".to_string());
        let poll_secs = poll_str
            .parse::<u64>()
            .map_err(|_| BotError::Config(format!("Invalid TALLY_POLL_SECS: {}", poll_str)))?;

        Ok(TelegramConfig { token, poll_secs })
    }

    fn load_sheet_config() -> SheetConfig {
        let name = env::var("TALLY_SHEET_NAME").unwrap_or_else(|_| "SEED".to_string());
        SheetConfig { name }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Test => write!(f, "test"),
            Environment::Development => write!(f, "development"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Conventional name of a month tab: Indonesian month name plus a
/// two-digit year, e.g. `Maret24`. Operators pointing the bot at a
/// month tab set `TALLY_SHEET_NAME` to this.
pub fn month_sheet_name(date: NaiveDate) -> String {
    const MONTHS: [&str; 12] = [
        "Januari",
        "Februari",
        "Maret",
        "April",
        "Mei",
        "Juni",
        "Juli",
        "Agustus",
        "September",
        "Oktober",
        "November",
        "Desember",
    ];

    let month = MONTHS[date.month0() as usize];
    format!("{}{:02}", month, date.year() % 100)
}

// =============================================================================
// Tests
// =============================================================================
