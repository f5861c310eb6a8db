//! Table port definition.
//!
//! The backing store is a sheet-like table: rows in insertion order,
//! each row carrying named cells (when the header row is intact) and a
//! raw positional record. Implementations can be an in-memory table or
//! a spreadsheet API adapter.

use crate::error::StoreError;
use async_trait::async_trait;
use std::collections::HashMap;

/// Identifier a table assigns to a row on append. Stable for the life
/// of the row; unrelated to the user-facing sequence number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowId(pub u64);

/// Named cell values in column order, used when appending.
pub type RowValues = Vec<(String, String)>;

/// One row as read back from the table.
///
/// `named` may be incomplete or empty when the header row is missing
/// or renamed; `positional` is the raw record and is always present.
/// Field access goes through [`crate::adapter::resolve_field`], never
/// directly, so the named-then-positional policy stays in one place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    /// Backing-table row id
    pub id: RowId,
    named: HashMap<String, String>,
    positional: Vec<String>,
}

impl TableRow {
    /// Build a row from named cells and the raw positional record.
    pub fn new(id: RowId, named: HashMap<String, String>, positional: Vec<String>) -> Self {
        Self { id, named, positional }
    }

    /// Build a row whose named cells mirror the positional record.
    pub fn from_values(id: RowId, values: &[(String, String)]) -> Self {
        let named = values.iter().cloned().collect();
        let positional = values.iter().map(|(_, v)| v.clone()).collect();
        Self { id, named, positional }
    }

    /// Named-cell lookup. Empty cells count as absent.
    pub fn get_named(&self, column: &str) -> Option<&str> {
        self.named
            .get(column)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    /// Raw positional lookup. Empty cells count as absent.
    pub fn get_positional(&self, position: usize) -> Option<&str> {
        self.positional
            .get(position)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    /// Overwrite a named cell.
    pub fn set_named(&mut self, column: &str, value: &str) {
        self.named.insert(column.to_string(), value.to_string());
    }
}

/// Port for the sheet-like backing table.
///
/// Implementations:
/// - `MemoryTable` - in-memory, for tests and development
/// - spreadsheet adapters - real backing stores
#[async_trait]
pub trait TablePort: Send + Sync {
    /// Name of the backing sheet (record set id). Shown in replies and
    /// stored in undo slots to detect a sheet switch.
    fn sheet_name(&self) -> &str;

    /// All rows in insertion order.
    async fn rows(&self) -> Result<Vec<TableRow>, StoreError>;

    /// Append a row; returns it as stored.
    async fn append(&self, values: RowValues) -> Result<TableRow, StoreError>;

    /// Overwrite one cell of an existing row.
    async fn set_value(&self, row: RowId, column: &str, value: &str) -> Result<(), StoreError>;

    /// Delete a row.
    async fn remove(&self, row: RowId) -> Result<(), StoreError>;
}
