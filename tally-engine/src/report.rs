//! Derived aggregates. Computed per query, never persisted.

use chrono::NaiveDate;
use tally_domain::LedgerRecord;

/// Records plus their profit sum, for list replies.
#[derive(Debug, Clone)]
pub struct Listing {
    /// Matching records in store order
    pub records: Vec<LedgerRecord>,
    /// Sum of the matching records' profit
    pub total: i64,
}

impl Listing {
    /// Whether the listing matched nothing
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Per-application aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppStat {
    /// Application name (grouping key)
    pub application: String,
    /// Number of transactions
    pub count: usize,
    /// Summed profit
    pub total: i64,
}

/// Per-day aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayStat {
    /// Calendar date (grouping key)
    pub date: NaiveDate,
    /// Number of transactions
    pub count: usize,
    /// Summed profit
    pub total: i64,
}

/// Per-plan-type aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeStat {
    /// Plan type (grouping key)
    pub plan_type: String,
    /// Number of transactions
    pub count: usize,
    /// Summed profit
    pub total: i64,
}

/// Date-window query result.
#[derive(Debug, Clone)]
pub struct WindowReport {
    /// Matching records in store order
    pub records: Vec<LedgerRecord>,
    /// Sum of the matching records' profit
    pub total: i64,
    /// Per-day aggregates in chronological order
    pub days: Vec<DayStat>,
    /// Number of distinct dates with at least one record
    pub active_days: usize,
    /// total / active_days, zero when the window is empty
    pub average_per_active_day: i64,
}

impl WindowReport {
    /// Whether the window matched nothing
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Per-application summary, sorted descending by total.
#[derive(Debug, Clone)]
pub struct Summary {
    /// Application groups, descending by total; ties keep the order
    /// the applications first appeared in the record set
    pub apps: Vec<AppStat>,
    /// Sum of all group totals; equals the sum of all record profits
    pub grand_total: i64,
}

/// Full single-pass statistics over the whole record set.
#[derive(Debug, Clone)]
pub struct Statistics {
    /// Total transaction count
    pub count: usize,
    /// Total profit
    pub total: i64,
    /// Distinct dates with at least one record
    pub active_days: usize,
    /// total / count
    pub average_per_transaction: i64,
    /// total / active_days
    pub average_per_active_day: i64,
    /// Highest-profit record; first encountered wins ties
    pub max_record: LedgerRecord,
    /// Lowest-profit record; first encountered wins ties
    pub min_record: LedgerRecord,
    /// Application with the most transactions (by count, not total)
    pub busiest_application: AppStat,
    /// Plan type with the most transactions
    pub busiest_plan_type: TypeStat,
    /// Date with the highest summed profit
    pub best_day: DayStat,
}
