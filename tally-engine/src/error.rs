//! Ledger engine errors.

use tally_domain::DomainError;
use tally_store::StoreError;
use thiserror::Error;

/// Errors that can occur while executing a ledger operation
#[derive(Debug, Error)]
pub enum EngineError {
    /// Malformed or missing user input
    #[error("Validation error: {0}")]
    Validation(#[from] DomainError),

    /// Referenced sequence number does not exist
    #[error("Record not found: #{seq}")]
    NotFound {
        /// The sequence number the user asked for
        seq: u32,
    },

    /// Actor has no recorded add to undo
    #[error("Nothing to undo")]
    NothingToUndo,

    /// The undo slot points at a record that no longer exists
    #[error("Undo target changed")]
    UndoTargetChanged,

    /// Storage layer failure
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}
