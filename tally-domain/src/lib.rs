//! Tally Domain Layer
//!
//! Pure domain logic with zero I/O dependencies.
//! Contains the ledger record, validated value objects, and the
//! localized amount codec.

#![warn(missing_docs)]
#![warn(clippy::all)]

// Public modules
pub mod amount;
pub mod record;
pub mod value_objects;

// Re-export commonly used types
pub use amount::{format_amount, parse_amount, parse_profit};
pub use record::{format_date, parse_date, LedgerRecord, RecordField};
pub use value_objects::{ActorId, DomainError, EndpointId, Profit};
