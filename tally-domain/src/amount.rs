//! Localized amount codec.
//!
//! Amounts travel through chat and the backing table as text in the
//! Indonesian rupiah convention: `Rp` prefix, `.` thousands grouping,
//! `,` decimal comma. Internally an amount is a plain integer.

use crate::value_objects::{DomainError, Profit};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Parse a localized amount string into an integer.
///
/// Strips whitespace and the `Rp` marker, drops `.` thousands
/// separators, maps the decimal comma to a decimal point, then rounds
/// to the nearest integer (half away from zero).
///
/// # Errors
/// Returns `DomainError::UnparseableAmount` if nothing numeric remains.
pub fn parse_amount(text: &str) -> Result<i64, DomainError> {
    let unmarked = strip_currency_marker(text);
    let cleaned = unmarked.replace('.', "").replace(',', ".");

    let value = Decimal::from_str(&cleaned)
        .map_err(|_| DomainError::UnparseableAmount(text.trim().to_string()))?;

    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or_else(|| DomainError::UnparseableAmount(text.trim().to_string()))
}

/// Parse a localized amount string into a validated positive [`Profit`].
///
/// # Errors
/// `DomainError::UnparseableAmount` for non-numeric input,
/// `DomainError::NonPositiveAmount` for zero or negative results.
/// The distinction lets callers word the validation reply precisely.
pub fn parse_profit(text: &str) -> Result<Profit, DomainError> {
    Profit::new(parse_amount(text)?)
}

/// Render an integer amount with the `Rp` prefix and `.` grouping.
///
/// Round-trip property: `parse_amount(&format_amount(n)) == Ok(n)`.
pub fn format_amount(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    let leading = digits.len() % 3;
    for (i, c) in digits.chars().enumerate() {
        if i != 0 && (i + 3 - leading) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    if value < 0 {
        format!("Rp -{}", grouped)
    } else {
        format!("Rp {}", grouped)
    }
}

/// Remove every `Rp`/`rp` marker and all whitespace from the input.
fn strip_currency_marker(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c.is_whitespace() {
            continue;
        }
        if (c == 'r' || c == 'R') && matches!(chars.peek(), Some('p') | Some('P')) {
            chars.next();
            continue;
        }
        out.push(c);
    }

    out
}

// =============================================================================
// Tests
// =============================================================================
