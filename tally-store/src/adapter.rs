//! Row ⇄ record adapter.
//!
//! The backing table's header row may be missing, renamed, or a row may
//! be a raw positional record, so every field read is a two-step
//! resolution: named column first, fixed positional offset second.

use crate::error::StoreError;
use crate::table::{RowValues, TableRow};
use tally_domain::{format_date, parse_amount, parse_date, LedgerRecord, Profit, RecordField};

/// Sequence number column, position 0.
pub const COL_SEQ: &str = "No";
/// Date column, position 1.
pub const COL_DATE: &str = "Tanggal";
/// Application column, position 2.
pub const COL_APPLICATION: &str = "Aplikasi";
/// Plan type column, position 3.
pub const COL_PLAN_TYPE: &str = "Jenis";
/// Profit column, position 4.
pub const COL_PROFIT: &str = "Laba";

/// Resolve a field: prefer the named cell, fall back to the positional
/// offset when the name is absent or empty.
pub fn resolve_field<'a>(row: &'a TableRow, column: &str, position: usize) -> Option<&'a str> {
    row.get_named(column).or_else(|| row.get_positional(position))
}

/// Sequence number the next appended record should get.
///
/// Empty table starts at 1. Otherwise the last row's number + 1; when
/// the last row does not carry a positive integer there (corrupted or
/// foreign trailing data), fall back to row count + 1 so Add keeps
/// working.
pub fn next_sequence_no(rows: &[TableRow]) -> u32 {
    let Some(last) = rows.last() else {
        return 1;
    };

    match resolve_field(last, COL_SEQ, 0).and_then(|v| v.trim().parse::<u32>().ok()) {
        Some(no) if no > 0 => no + 1,
        _ => rows.len() as u32 + 1,
    }
}

/// Parse a row's sequence number, if it carries one.
pub fn row_sequence_no(row: &TableRow) -> Option<u32> {
    resolve_field(row, COL_SEQ, 0)
        .and_then(|v| v.trim().parse::<u32>().ok())
        .filter(|no| *no > 0)
}

/// Find the row holding a given sequence number.
pub fn find_by_seq(rows: &[TableRow], seq: u32) -> Option<&TableRow> {
    rows.iter().find(|row| row_sequence_no(row) == Some(seq))
}

/// Decode a row into a ledger record.
///
/// # Errors
/// `StoreError::MalformedRow` naming the first cell that failed.
pub fn record_from_row(row: &TableRow, index: usize) -> Result<LedgerRecord, StoreError> {
    let seq = row_sequence_no(row)
        .ok_or_else(|| StoreError::malformed_row(index, "missing or invalid sequence number"))?;

    let date = resolve_field(row, COL_DATE, 1)
        .ok_or_else(|| StoreError::malformed_row(index, "missing date"))
        .and_then(|v| {
            parse_date(v).map_err(|e| StoreError::malformed_row(index, e.to_string()))
        })?;

    let application = resolve_field(row, COL_APPLICATION, RecordField::Application.position())
        .ok_or_else(|| StoreError::malformed_row(index, "missing application"))?;

    let plan_type = resolve_field(row, COL_PLAN_TYPE, RecordField::PlanType.position())
        .ok_or_else(|| StoreError::malformed_row(index, "missing plan type"))?;

    let profit = resolve_field(row, COL_PROFIT, RecordField::Profit.position())
        .ok_or_else(|| StoreError::malformed_row(index, "missing profit"))
        .and_then(|v| {
            parse_amount(v)
                .and_then(Profit::new)
                .map_err(|e| StoreError::malformed_row(index, e.to_string()))
        })?;

    LedgerRecord::new(seq, date, application, plan_type, profit)
        .map_err(|e| StoreError::malformed_row(index, e.to_string()))
}

/// Named cell values for appending a record, in column order.
pub fn row_values(record: &LedgerRecord) -> RowValues {
    vec![
        (COL_SEQ.to_string(), record.seq.to_string()),
        (COL_DATE.to_string(), format_date(record.date)),
        (COL_APPLICATION.to_string(), record.application.clone()),
        (COL_PLAN_TYPE.to_string(), record.plan_type.clone()),
        (COL_PROFIT.to_string(), record.profit.value().to_string()),
    ]
}

// =============================================================================
// Tests
// =============================================================================
