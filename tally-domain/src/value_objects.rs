//! Value Objects for the Tally Domain
//!
//! Immutable, validated domain primitives.
//! All value objects enforce invariants at construction time.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Domain errors for value object validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Application name must be non-empty after trimming
    #[error("Application name must not be empty")]
    EmptyApplication,

    /// Plan type must be non-empty after trimming
    #[error("Plan type must not be empty")]
    EmptyPlanType,

    /// Amount text could not be parsed at all
    #[error("Unparseable amount: {0}")]
    UnparseableAmount(String),

    /// Amount parsed but is zero or negative
    #[error("Amount must be positive, got {0}")]
    NonPositiveAmount(i64),

    /// Date text does not match DD/MM/YYYY
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Unknown editable field name
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// Sequence number must be a positive integer
    #[error("Invalid sequence number: {0}")]
    InvalidSequenceNo(String),
}

// =============================================================================
// Profit
// =============================================================================

/// Profit represents a positive integer amount in the ledger currency.
///
/// # Invariants
/// - Must be > 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Profit(i64);

impl Profit {
    /// Create a new Profit with validation
    ///
    /// # Errors
    /// Returns `DomainError::NonPositiveAmount` if value <= 0
    pub fn new(value: i64) -> Result<Self, DomainError> {
        if value <= 0 {
            return Err(DomainError::NonPositiveAmount(value));
        }
        Ok(Self(value))
    }

    /// Get the underlying integer amount
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Profit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", crate::amount::format_amount(self.0))
    }
}

// =============================================================================
// Identifiers
// =============================================================================

/// Actor issuing a command. Keys the per-user undo slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(pub i64);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Addressable chat destination that can receive broadcast notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EndpointId(pub i64);

impl fmt::Display for EndpointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Tests
// =============================================================================
