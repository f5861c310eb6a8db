//! Tally Notification Layer
//!
//! The messenger port (chat delivery interface), the durable
//! subscriber registry, and the broadcast notifier that fans a change
//! notification out to every registered endpoint except the
//! originator. Delivery is independent per recipient; an unreachable
//! endpoint is evicted from the registry rather than failing the
//! sender's command.

#![warn(clippy::all)]

// Modules
mod error;
mod messenger;
mod notifier;
mod registry;

// Re-exports
pub use error::NotifyError;
pub use messenger::{MessengerPort, StubMessenger};
pub use notifier::Notifier;
pub use registry::SubscriberRegistry;
