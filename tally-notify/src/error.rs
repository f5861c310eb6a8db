//! Notification layer errors

use tally_domain::EndpointId;
use thiserror::Error;

/// Errors that can occur while notifying subscribers
#[derive(Debug, Error)]
pub enum NotifyError {
    /// A single recipient could not be reached
    #[error("Delivery to endpoint {endpoint} failed: {reason}")]
    Delivery {
        /// The unreachable endpoint
        endpoint: EndpointId,
        /// Transport-level description
        reason: String,
    },

    /// The subscriber roster could not be written
    #[error("Roster persistence failed: {0}")]
    Persist(String),
}
