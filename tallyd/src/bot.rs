//! Bot: main runtime orchestrator.
//!
//! Ties together the transport, the ledger engine, the subscriber
//! registry, and the notifier:
//!
//! 1. Load configuration
//! 2. Load the subscriber roster
//! 3. Long-poll the transport for updates
//! 4. Route each text message, reply, repeat
//! 5. Graceful shutdown on SIGINT
//!
//! Commands are handled to completion one at a time, in update order.
//! Polling errors are logged and polling resumes; no user input or
//! transport hiccup takes the process down.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{error, info};

use tally_connectors::{TelegramClient, TelegramMessage};
use tally_engine::{Ledger, UndoStore};
use tally_notify::{MessengerPort, Notifier, SubscriberRegistry};
use tally_store::{MemoryTable, TablePort};

use crate::config::Config;
use crate::error::BotResult;
use crate::router::Router;

/// Pause before retrying after a polling failure.
const POLL_RETRY_SECS: u64 = 3;

/// The ledger bot.
pub struct Bot<T: TablePort + 'static> {
    config: Config,
    client: Arc<TelegramClient>,
    router: Router<T, TelegramClient>,
}

impl Bot<MemoryTable> {
    /// Create a bot over an in-memory table (development and tests;
    /// records do not survive a restart).
    pub fn new_memory(config: Config) -> Self {
        let table = Arc::new(MemoryTable::new(&config.sheet.name));
        Self::new(config, table)
    }
}

impl<T: TablePort + 'static> Bot<T> {
    /// Create a bot over the given backing table.
    pub fn new(config: Config, table: Arc<T>) -> Self {
        let client = Arc::new(TelegramClient::new(config.telegram.token.clone()));
        let undo = Arc::new(UndoStore::new());
        let ledger = Arc::new(Ledger::new(table, undo));
        let registry = Arc::new(SubscriberRegistry::load(&config.roster_path));
        let notifier = Arc::new(Notifier::new(Arc::clone(&registry), Arc::clone(&client)));
        let router = Router::new(ledger, registry, notifier);

        Self {
            config,
            client,
            router,
        }
    }

    /// Run the bot.
    ///
    /// Blocks until shutdown is requested (SIGINT).
    pub async fn run(&self) -> BotResult<()> {
        info!(
            version = env!("CARGO_PKG_VERSION"),
            environment = %self.config.environment,
            sheet = %self.config.sheet.name,
            "Starting tally bot"
        );

        let mut offset = 0i64;

        loop {
            tokio::select! {
                result = self.client.get_updates(offset, self.config.telegram.poll_secs) => {
                    match result {
                        Ok(updates) => {
                            for update in updates {
                                offset = offset.max(update.update_id + 1);
                                if let Some(message) = update.message {
                                    self.handle_message(message).await;
                                }
                            }
                        }
                        Err(e) => {
                            error!(error = %e, "Polling error");
                            sleep(Duration::from_secs(POLL_RETRY_SECS)).await;
                        }
                    }
                }

                _ = tokio::signal::ctrl_c() => {
                    info!("Received shutdown signal");
                    break;
                }
            }
        }

        info!("Shutdown complete");
        Ok(())
    }

    async fn handle_message(&self, message: TelegramMessage) {
        let Some(text) = message.text.clone() else {
            return;
        };

        let reply = self
            .router
            .dispatch(message.actor(), message.endpoint(), message.actor_name(), &text)
            .await;

        if let Some(reply) = reply {
            if let Err(e) = self.client.send_text(message.endpoint(), &reply).await {
                error!(endpoint = %message.endpoint(), error = %e, "Could not send reply");
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
