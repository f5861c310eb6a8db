//! Ledger operations.
//!
//! Each operation re-reads the full row set before acting. There is no
//! cache between commands: another chat session may have changed the
//! table, and the table is the sole source of truth. Races at the
//! table's I/O boundary between two in-flight commands are an accepted
//! limitation of the design, not detected or resolved here.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tracing::info;

use tally_domain::{
    format_amount, parse_amount, parse_profit, ActorId, DomainError, LedgerRecord, RecordField,
};
use tally_store::{adapter, TablePort, TableRow};

use crate::error::EngineError;
use crate::report::{AppStat, DayStat, Listing, Statistics, Summary, TypeStat, WindowReport};
use crate::undo::{UndoSlot, UndoStore};

/// Outcome of an Edit, for the confirmation reply.
#[derive(Debug, Clone)]
pub struct EditOutcome {
    /// Edited record's sequence number
    pub seq: u32,
    /// Which field changed
    pub field: RecordField,
    /// Display form of the previous value
    pub old: String,
    /// Display form of the new value
    pub new: String,
}

/// Outcome of a Delete, for the confirmation reply.
#[derive(Debug, Clone)]
pub struct DeleteOutcome {
    /// The removed record
    pub removed: LedgerRecord,
    /// Records left after the renumber pass
    pub remaining: usize,
}

/// The ledger record engine.
///
/// Owns no record identity itself: sequence numbers come from the
/// store adapter, and the only way they change is the renumber pass
/// after a Delete. Undo state is injected so tests can run against a
/// fake store.
pub struct Ledger<T: TablePort> {
    table: Arc<T>,
    undo: Arc<UndoStore>,
}

impl<T: TablePort> Ledger<T> {
    /// Create an engine over a backing table and shared undo state
    pub fn new(table: Arc<T>, undo: Arc<UndoStore>) -> Self {
        Self { table, undo }
    }

    /// Name of the backing sheet, for replies
    pub fn sheet_name(&self) -> &str {
        self.table.sheet_name()
    }

    async fn load_rows(&self) -> Result<Vec<TableRow>, EngineError> {
        Ok(self.table.rows().await?)
    }

    async fn load_records(&self) -> Result<Vec<LedgerRecord>, EngineError> {
        let rows = self.load_rows().await?;
        let mut records = Vec::with_capacity(rows.len());
        for (index, row) in rows.iter().enumerate() {
            records.push(adapter::record_from_row(row, index)?);
        }
        Ok(records)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Record a new entry dated today and remember it in the actor's
    /// undo slot.
    ///
    /// # Errors
    /// `EngineError::Validation` naming the first violated constraint:
    /// empty application, empty plan type, then unparseable or
    /// non-positive profit.
    pub async fn add(
        &self,
        actor: ActorId,
        application: &str,
        plan_type: &str,
        raw_profit: &str,
    ) -> Result<LedgerRecord, EngineError> {
        let application = application.trim();
        if application.is_empty() {
            return Err(DomainError::EmptyApplication.into());
        }

        let plan_type = plan_type.trim();
        if plan_type.is_empty() {
            return Err(DomainError::EmptyPlanType.into());
        }

        let profit = parse_profit(raw_profit)?;

        let rows = self.load_rows().await?;
        let seq = adapter::next_sequence_no(&rows);
        let date = Local::now().date_naive();

        let record = LedgerRecord::new(seq, date, application, plan_type, profit)?;
        self.table.append(adapter::row_values(&record)).await?;

        self.undo.remember(
            actor,
            UndoSlot {
                sheet: self.table.sheet_name().to_string(),
                seq,
            },
        );

        info!(
            %actor,
            seq = record.seq,
            application = %record.application,
            profit = record.profit.value(),
            "Recorded ledger entry"
        );

        Ok(record)
    }

    /// Change one editable field of an existing record.
    ///
    /// Sequence number and date are immutable here. Profit goes back
    /// through the amount codec and must stay positive.
    pub async fn edit(
        &self,
        seq: u32,
        field: RecordField,
        raw_value: &str,
    ) -> Result<EditOutcome, EngineError> {
        let rows = self.load_rows().await?;
        let row = adapter::find_by_seq(&rows, seq).ok_or(EngineError::NotFound { seq })?;

        let old_raw = adapter::resolve_field(row, field.column(), field.position())
            .unwrap_or("-")
            .to_string();

        let (stored, old, new) = match field {
            RecordField::Profit => {
                let profit = parse_profit(raw_value)?;
                let old = parse_amount(&old_raw)
                    .map(format_amount)
                    .unwrap_or(old_raw);
                (
                    profit.value().to_string(),
                    old,
                    format_amount(profit.value()),
                )
            }
            RecordField::Application => {
                let value = raw_value.trim();
                if value.is_empty() {
                    return Err(DomainError::EmptyApplication.into());
                }
                (value.to_string(), old_raw, value.to_string())
            }
            RecordField::PlanType => {
                let value = raw_value.trim();
                if value.is_empty() {
                    return Err(DomainError::EmptyPlanType.into());
                }
                (value.to_string(), old_raw, value.to_string())
            }
        };

        self.table.set_value(row.id, field.column(), &stored).await?;

        info!(seq, field = %field, "Edited ledger entry");

        Ok(EditOutcome { seq, field, old, new })
    }

    /// Remove a record, then renumber every remaining record 1..N in
    /// store order.
    ///
    /// The renumber pass is authoritative: it is the only mechanism
    /// keeping sequence numbers dense, and it runs even though it
    /// costs one mutation per remaining row.
    pub async fn delete(&self, seq: u32) -> Result<DeleteOutcome, EngineError> {
        let rows = self.load_rows().await?;
        let (index, row) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| adapter::row_sequence_no(row) == Some(seq))
            .ok_or(EngineError::NotFound { seq })?;

        let removed = adapter::record_from_row(row, index)?;
        self.table.remove(row.id).await?;

        let remaining = self.renumber().await?;

        info!(seq, remaining, "Deleted ledger entry and renumbered");

        Ok(DeleteOutcome { removed, remaining })
    }

    /// Remove the actor's most recent add.
    ///
    /// Unlike Delete this does NOT renumber: an undo is a correction
    /// of the latest addition, and the numbers below it are untouched.
    ///
    /// # Errors
    /// `NothingToUndo` when the actor holds no slot; `UndoTargetChanged`
    /// when the slot is stale (sheet switched, or the sequence number
    /// was deleted or renumbered away). Neither failure mutates state.
    pub async fn undo(&self, actor: ActorId) -> Result<LedgerRecord, EngineError> {
        let slot = self.undo.peek(actor).ok_or(EngineError::NothingToUndo)?;

        if slot.sheet != self.table.sheet_name() {
            return Err(EngineError::UndoTargetChanged);
        }

        let rows = self.load_rows().await?;
        let (index, row) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| adapter::row_sequence_no(row) == Some(slot.seq))
            .ok_or(EngineError::UndoTargetChanged)?;

        let removed = adapter::record_from_row(row, index)?;
        self.table.remove(row.id).await?;
        self.undo.clear(actor);

        info!(%actor, seq = slot.seq, "Undid last add");

        Ok(removed)
    }

    async fn renumber(&self) -> Result<usize, EngineError> {
        let rows = self.load_rows().await?;
        for (index, row) in rows.iter().enumerate() {
            let no = (index + 1).to_string();
            self.table.set_value(row.id, adapter::COL_SEQ, &no).await?;
        }
        Ok(rows.len())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// All records in store order, with their profit sum.
    pub async fn list_all(&self) -> Result<Listing, EngineError> {
        let records = self.load_records().await?;
        let total = profit_sum(&records);
        Ok(Listing { records, total })
    }

    /// Records whose date equals `date` exactly.
    pub async fn list_by_date(&self, date: NaiveDate) -> Result<Listing, EngineError> {
        let records: Vec<_> = self
            .load_records()
            .await?
            .into_iter()
            .filter(|r| r.date == date)
            .collect();
        let total = profit_sum(&records);
        Ok(Listing { records, total })
    }

    /// Records whose date falls within `[start, end]`, both inclusive,
    /// with per-day aggregates and the average over active days.
    pub async fn list_window(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<WindowReport, EngineError> {
        let records: Vec<_> = self
            .load_records()
            .await?
            .into_iter()
            .filter(|r| r.date >= start && r.date <= end)
            .collect();

        let total = profit_sum(&records);
        let mut days = group_by_day(&records);
        days.sort_by_key(|d| d.date);

        let active_days = days.len();
        let average_per_active_day = if active_days == 0 {
            0
        } else {
            total / active_days as i64
        };

        Ok(WindowReport {
            records,
            total,
            days,
            active_days,
            average_per_active_day,
        })
    }

    /// Group all records by application, descending by total.
    ///
    /// The sort is stable, so applications with equal totals keep the
    /// order they first appeared in.
    pub async fn summary_by_application(&self) -> Result<Summary, EngineError> {
        let records = self.load_records().await?;
        let mut apps = group_by_app(&records);
        apps.sort_by(|a, b| b.total.cmp(&a.total));
        let grand_total = apps.iter().map(|a| a.total).sum();
        Ok(Summary { apps, grand_total })
    }

    /// The first `limit` groups of [`Self::summary_by_application`].
    pub async fn top_applications(&self, limit: usize) -> Result<Vec<AppStat>, EngineError> {
        let mut apps = self.summary_by_application().await?.apps;
        apps.truncate(limit);
        Ok(apps)
    }

    /// Single-pass statistics over the whole record set.
    ///
    /// Returns `None` for an empty set. Ties for max/min/busiest/best
    /// resolve to the first encountered in store order.
    pub async fn statistics(&self) -> Result<Option<Statistics>, EngineError> {
        let records = self.load_records().await?;
        let Some(first) = records.first() else {
            return Ok(None);
        };

        let mut max_record = first.clone();
        let mut min_record = first.clone();
        let mut total = 0i64;

        for record in &records {
            total += record.profit.value();
            if record.profit > max_record.profit {
                max_record = record.clone();
            }
            if record.profit < min_record.profit {
                min_record = record.clone();
            }
        }

        let apps = group_by_app(&records);
        let types = group_by_type(&records);
        let days = group_by_day(&records);

        // Groups are in first-encounter order; strict comparison keeps
        // the earliest group on ties. The set is non-empty here, so
        // every grouping has at least one entry.
        let Some(busiest_application) = first_max_by(&apps, |a, b| a.count > b.count) else {
            return Ok(None);
        };
        let Some(busiest_plan_type) = first_max_by(&types, |a, b| a.count > b.count) else {
            return Ok(None);
        };
        let Some(best_day) = first_max_by(&days, |a, b| a.total > b.total) else {
            return Ok(None);
        };
        let busiest_application = busiest_application.clone();
        let busiest_plan_type = busiest_plan_type.clone();
        let best_day = best_day.clone();

        let count = records.len();
        let active_days = days.len();

        Ok(Some(Statistics {
            count,
            total,
            active_days,
            average_per_transaction: total / count as i64,
            average_per_active_day: total / active_days as i64,
            max_record,
            min_record,
            busiest_application,
            busiest_plan_type,
            best_day,
        }))
    }
}

/// First element that strictly beats every earlier one; ties resolve
/// to the earliest.
fn first_max_by<T>(items: &[T], better: impl Fn(&T, &T) -> bool) -> Option<&T> {
    items.iter().fold(None, |best, item| match best {
        Some(b) if !better(item, b) => Some(b),
        _ => Some(item),
    })
}

fn profit_sum(records: &[LedgerRecord]) -> i64 {
    records.iter().map(|r| r.profit.value()).sum()
}

fn group_by_app(records: &[LedgerRecord]) -> Vec<AppStat> {
    let mut stats: Vec<AppStat> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in records {
        let slot = *index.entry(record.application.clone()).or_insert_with(|| {
            stats.push(AppStat {
                application: record.application.clone(),
                count: 0,
                total: 0,
            });
            stats.len() - 1
        });
        stats[slot].count += 1;
        stats[slot].total += record.profit.value();
    }

    stats
}

fn group_by_type(records: &[LedgerRecord]) -> Vec<TypeStat> {
    let mut stats: Vec<TypeStat> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in records {
        let slot = *index.entry(record.plan_type.clone()).or_insert_with(|| {
            stats.push(TypeStat {
                plan_type: record.plan_type.clone(),
                count: 0,
                total: 0,
            });
            stats.len() - 1
        });
        stats[slot].count += 1;
        stats[slot].total += record.profit.value();
    }

    stats
}

fn group_by_day(records: &[LedgerRecord]) -> Vec<DayStat> {
    let mut stats: Vec<DayStat> = Vec::new();
    let mut index: HashMap<NaiveDate, usize> = HashMap::new();

    for record in records {
        let slot = *index.entry(record.date).or_insert_with(|| {
            stats.push(DayStat {
                date: record.date,
                count: 0,
                total: 0,
            });
            stats.len() - 1
        });
        stats[slot].count += 1;
        stats[slot].total += record.profit.value();
    }

    stats
}

// =============================================================================
// Tests
// =============================================================================
