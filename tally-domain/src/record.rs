//! The ledger record and its editable fields.

use crate::value_objects::{DomainError, Profit};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Date rendering used everywhere a date faces the user or the table.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// One ledger entry.
///
/// # Invariants
/// - `seq` is unique and dense (1..N) within the active record set
/// - `application` and `plan_type` are non-empty after trimming
/// - `profit` is positive
///
/// `seq` and `date` are immutable through Edit; `seq` is reassigned
/// only by the renumber pass after a Delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRecord {
    /// Dense 1-based sequence number exposed to users
    pub seq: u32,
    /// Calendar date of the transaction (no time component)
    pub date: NaiveDate,
    /// Application the sale belongs to
    pub application: String,
    /// Plan type sold (e.g. "1 bulan", "lifetime")
    pub plan_type: String,
    /// Profit amount
    pub profit: Profit,
}

impl LedgerRecord {
    /// Create a record, trimming and validating the text fields.
    ///
    /// # Errors
    /// `DomainError::EmptyApplication` / `DomainError::EmptyPlanType`
    /// when a text field is empty after trimming.
    pub fn new(
        seq: u32,
        date: NaiveDate,
        application: &str,
        plan_type: &str,
        profit: Profit,
    ) -> Result<Self, DomainError> {
        let application = application.trim();
        if application.is_empty() {
            return Err(DomainError::EmptyApplication);
        }

        let plan_type = plan_type.trim();
        if plan_type.is_empty() {
            return Err(DomainError::EmptyPlanType);
        }

        Ok(Self {
            seq,
            date,
            application: application.to_string(),
            plan_type: plan_type.to_string(),
            profit,
        })
    }

    /// One-line rendering used in list replies: `#N App | Plan | Rp X`.
    pub fn summary_line(&self) -> String {
        format!(
            "#{} {} | {} | {}",
            self.seq, self.application, self.plan_type, self.profit
        )
    }

    /// One-line rendering including the date, used in the full listing.
    pub fn detail_line(&self) -> String {
        format!(
            "#{} {} | {} | {} | {}",
            self.seq,
            format_date(self.date),
            self.application,
            self.plan_type,
            self.profit
        )
    }
}

/// Fields a user may change through Edit.
///
/// Sequence number and date are deliberately not editable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordField {
    /// The application name
    Application,
    /// The plan type
    PlanType,
    /// The profit amount
    Profit,
}

impl RecordField {
    /// Parse a user-supplied field token (`aplikasi`, `jenis`, `laba`).
    ///
    /// # Errors
    /// `DomainError::UnknownField` for anything else.
    pub fn parse(token: &str) -> Result<Self, DomainError> {
        match token.trim().to_lowercase().as_str() {
            "aplikasi" => Ok(Self::Application),
            "jenis" => Ok(Self::PlanType),
            "laba" => Ok(Self::Profit),
            other => Err(DomainError::UnknownField(other.to_string())),
        }
    }

    /// Backing-table column name for this field.
    pub fn column(&self) -> &'static str {
        match self {
            Self::Application => "Aplikasi",
            Self::PlanType => "Jenis",
            Self::Profit => "Laba",
        }
    }

    /// Positional offset of this field in a raw table row.
    pub fn position(&self) -> usize {
        match self {
            Self::Application => 2,
            Self::PlanType => 3,
            Self::Profit => 4,
        }
    }
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column())
    }
}

/// Render a date as `DD/MM/YYYY`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse a `DD/MM/YYYY` date.
///
/// # Errors
/// `DomainError::InvalidDate` when the text does not match.
pub fn parse_date(text: &str) -> Result<NaiveDate, DomainError> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT)
        .map_err(|_| DomainError::InvalidDate(text.trim().to_string()))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_record() -> LedgerRecord {
        LedgerRecord::new(
            1,
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            "Canva",
            "lifetime",
            Profit::new(15000).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_record_trims_text_fields() {
        let record = LedgerRecord::new(
            1,
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            "  Canva ",
            " lifetime",
            Profit::new(15000).unwrap(),
        )
        .unwrap();

        assert_eq!(record.application, "Canva");
        assert_eq!(record.plan_type, "lifetime");
    }

    #[test]
    fn test_record_rejects_empty_application() {
        let result = LedgerRecord::new(
            1,
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            "   ",
            "lifetime",
            Profit::new(15000).unwrap(),
        );
        assert_eq!(result, Err(DomainError::EmptyApplication));
    }

    #[test]
    fn test_record_rejects_empty_plan_type() {
        let result = LedgerRecord::new(
            1,
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            "Canva",
            "",
            Profit::new(15000).unwrap(),
        );
        assert_eq!(result, Err(DomainError::EmptyPlanType));
    }

    #[test]
    fn test_summary_and_detail_lines() {
        let record = create_test_record();
        assert_eq!(record.summary_line(), "#1 Canva | lifetime | Rp 15.000");
        assert_eq!(record.detail_line(), "#1 15/03/2024 | Canva | lifetime | Rp 15.000");
    }

    #[test]
    fn test_field_parse() {
        assert_eq!(RecordField::parse("aplikasi"), Ok(RecordField::Application));
        assert_eq!(RecordField::parse("JENIS"), Ok(RecordField::PlanType));
        assert_eq!(RecordField::parse(" laba "), Ok(RecordField::Profit));
        assert!(matches!(
            RecordField::parse("tanggal"),
            Err(DomainError::UnknownField(_))
        ));
    }

    #[test]
    fn test_field_columns_and_positions() {
        assert_eq!(RecordField::Application.column(), "Aplikasi");
        assert_eq!(RecordField::Application.position(), 2);
        assert_eq!(RecordField::PlanType.column(), "Jenis");
        assert_eq!(RecordField::PlanType.position(), 3);
        assert_eq!(RecordField::Profit.column(), "Laba");
        assert_eq!(RecordField::Profit.position(), 4);
    }

    #[test]
    fn test_date_round_trip() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let rendered = format_date(date);
        assert_eq!(rendered, "05/01/2024");
        assert_eq!(parse_date(&rendered), Ok(date));
    }

    #[test]
    fn test_date_rejects_garbage() {
        assert!(matches!(parse_date("2024-01-05"), Err(DomainError::InvalidDate(_))));
    }
}
