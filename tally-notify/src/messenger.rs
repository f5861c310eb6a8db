//! Messenger port definition.
//!
//! The chat transport seen from the inside: deliver one text message
//! to one endpoint. Implementations adapt a real chat API; the stub
//! records traffic for tests.

use crate::error::NotifyError;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Mutex, RwLock};
use tally_domain::EndpointId;

/// Port for outbound chat delivery.
///
/// Implementations:
/// - `StubMessenger` - for testing (records messages, configurable failures)
/// - `TelegramClient` - real Telegram Bot API (tally-connectors)
#[async_trait]
pub trait MessengerPort: Send + Sync {
    /// Deliver a text message to a single endpoint.
    ///
    /// # Errors
    /// `NotifyError::Delivery` when the endpoint rejects or cannot be
    /// reached. Failures are per-endpoint; the caller decides policy.
    async fn send_text(&self, endpoint: EndpointId, text: &str) -> Result<(), NotifyError>;
}

// =============================================================================
// Stub Messenger
// =============================================================================

/// Stub messenger for testing.
///
/// Records every delivery and can be told to reject specific
/// endpoints.
#[derive(Debug, Default)]
pub struct StubMessenger {
    sent: Mutex<Vec<(EndpointId, String)>>,
    failing: RwLock<HashSet<EndpointId>>,
}

impl StubMessenger {
    /// Create a stub that accepts everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Make deliveries to `endpoint` fail from now on
    pub fn fail_endpoint(&self, endpoint: EndpointId) {
        self.failing.write().unwrap().insert(endpoint);
    }

    /// All deliveries made so far, in order
    pub fn sent(&self) -> Vec<(EndpointId, String)> {
        self.sent.lock().unwrap().clone()
    }

    /// Endpoints that received at least one message
    pub fn recipients(&self) -> Vec<EndpointId> {
        self.sent.lock().unwrap().iter().map(|(e, _)| *e).collect()
    }
}

#[async_trait]
impl MessengerPort for StubMessenger {
    async fn send_text(&self, endpoint: EndpointId, text: &str) -> Result<(), NotifyError> {
        if self.failing.read().unwrap().contains(&endpoint) {
            return Err(NotifyError::Delivery {
                endpoint,
                reason: "Simulated delivery failure".to_string(),
            });
        }
        self.sent.lock().unwrap().push((endpoint, text.to_string()));
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
