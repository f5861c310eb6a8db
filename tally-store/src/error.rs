//! Storage layer errors

use thiserror::Error;

/// Errors that can occur in the storage layer
#[derive(Debug, Error)]
pub enum StoreError {
    /// The configured backing sheet does not exist
    #[error("Sheet tidak ditemukan: {name}")]
    SheetNotFound {
        /// Name of the missing sheet
        name: String,
    },

    /// A row referenced by id no longer exists
    #[error("Row not found: {id}")]
    RowNotFound {
        /// Backing-table row id
        id: u64,
    },

    /// A row could not be decoded into a ledger record
    #[error("Malformed row at index {index}: {reason}")]
    MalformedRow {
        /// Zero-based row index in the table
        index: usize,
        /// What failed to decode
        reason: String,
    },

    /// Backend I/O failure
    #[error("Table backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Create a sheet-not-found error
    pub fn sheet_not_found(name: impl Into<String>) -> Self {
        Self::SheetNotFound { name: name.into() }
    }

    /// Create a malformed-row error
    pub fn malformed_row(index: usize, reason: impl Into<String>) -> Self {
        Self::MalformedRow {
            index,
            reason: reason.into(),
        }
    }
}
