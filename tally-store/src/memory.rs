//! In-memory table implementation
//!
//! Used for testing and development without a real spreadsheet.
//! Thread-safe using RwLock for concurrent access.

use crate::error::StoreError;
use crate::table::{RowId, RowValues, TablePort, TableRow};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

/// In-memory table for testing
pub struct MemoryTable {
    name: String,
    rows: RwLock<Vec<TableRow>>,
    next_id: AtomicU64,
    /// Pretend the backing sheet does not exist
    missing: bool,
    /// Whether to simulate failures
    fail_next: RwLock<bool>,
}

impl MemoryTable {
    /// Create a new empty table with the given sheet name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(0),
            missing: false,
            fail_next: RwLock::new(false),
        }
    }

    /// Create a table whose backing sheet is absent: every operation
    /// fails with `StoreError::SheetNotFound` (the configuration
    /// points at a tab that does not exist).
    pub fn missing(name: impl Into<String>) -> Self {
        Self {
            missing: true,
            ..Self::new(name)
        }
    }

    /// Get the number of rows
    pub fn row_count(&self) -> usize {
        self.rows.read().unwrap().len()
    }

    /// Clear all rows (useful for test setup)
    pub fn clear(&self) {
        self.rows.write().unwrap().clear();
    }

    /// Insert a raw row directly, bypassing the port (test setup for
    /// corrupted or header-less data)
    pub fn push_raw(&self, row: TableRow) {
        self.rows.write().unwrap().push(row);
    }

    /// Configure the next operation to fail
    pub fn set_fail_next(&self, fail: bool) {
        let mut fail_next = self.fail_next.write().unwrap();
        *fail_next = fail;
    }

    /// Check if we should fail the next operation
    fn should_fail(&self) -> bool {
        let mut fail_next = self.fail_next.write().unwrap();
        let fail = *fail_next;
        *fail_next = false; // Reset after check
        fail
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.missing {
            return Err(StoreError::sheet_not_found(&self.name));
        }
        if self.should_fail() {
            return Err(StoreError::Backend("Simulated table failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl TablePort for MemoryTable {
    fn sheet_name(&self) -> &str {
        &self.name
    }

    async fn rows(&self) -> Result<Vec<TableRow>, StoreError> {
        self.check()?;
        Ok(self.rows.read().unwrap().clone())
    }

    async fn append(&self, values: RowValues) -> Result<TableRow, StoreError> {
        self.check()?;
        let id = RowId(self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        let row = TableRow::from_values(id, &values);
        self.rows.write().unwrap().push(row.clone());
        Ok(row)
    }

    async fn set_value(&self, row: RowId, column: &str, value: &str) -> Result<(), StoreError> {
        self.check()?;
        let mut rows = self.rows.write().unwrap();
        let target = rows
            .iter_mut()
            .find(|r| r.id == row)
            .ok_or(StoreError::RowNotFound { id: row.0 })?;
        target.set_named(column, value);
        Ok(())
    }

    async fn remove(&self, row: RowId) -> Result<(), StoreError> {
        self.check()?;
        let mut rows = self.rows.write().unwrap();
        let index = rows
            .iter()
            .position(|r| r.id == row)
            .ok_or(StoreError::RowNotFound { id: row.0 })?;
        rows.remove(index);
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
