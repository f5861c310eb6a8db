//! Tally Ledger Engine
//!
//! The record engine: add, edit, delete with renumbering, single-slot
//! undo per actor, date-windowed queries, and aggregation. Every
//! operation re-reads the backing table; the table is the sole source
//! of truth between commands.

#![warn(clippy::all)]

// Modules
mod error;
mod ledger;
mod report;
mod undo;
pub mod window;

// Re-exports
pub use error::EngineError;
pub use ledger::{DeleteOutcome, EditOutcome, Ledger};
pub use report::{AppStat, DayStat, Listing, Statistics, Summary, TypeStat, WindowReport};
pub use undo::{UndoSlot, UndoStore};
