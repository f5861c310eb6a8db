//! Calendar window helpers for the week and month queries.

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};

/// Monday through Sunday of the week containing `today`.
///
/// The week starts on Monday regardless of locale.
pub fn week_range(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let week = today.week(Weekday::Mon);
    (week.first_day(), week.last_day())
}

/// First through last calendar day of the month containing `today`.
pub fn month_range(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = today.with_day(1).unwrap_or(today);
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.checked_sub_days(Days::new(1)))
        .unwrap_or(today);
    (first, last)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_range_midweek() {
        // 2024-03-13 is a Wednesday
        let (start, end) = week_range(date(2024, 3, 13));
        assert_eq!(start, date(2024, 3, 11));
        assert_eq!(end, date(2024, 3, 17));
    }

    #[test]
    fn test_week_range_on_monday_and_sunday() {
        let (start, end) = week_range(date(2024, 3, 11));
        assert_eq!((start, end), (date(2024, 3, 11), date(2024, 3, 17)));

        let (start, end) = week_range(date(2024, 3, 17));
        assert_eq!((start, end), (date(2024, 3, 11), date(2024, 3, 17)));
    }

    #[test]
    fn test_week_range_spans_month_boundary() {
        // 2024-04-01 is a Monday; 2024-03-31 belongs to the prior week
        let (start, end) = week_range(date(2024, 3, 31));
        assert_eq!((start, end), (date(2024, 3, 25), date(2024, 3, 31)));
    }

    #[test]
    fn test_month_range() {
        let (start, end) = month_range(date(2024, 3, 13));
        assert_eq!((start, end), (date(2024, 3, 1), date(2024, 3, 31)));
    }

    #[test]
    fn test_month_range_february_leap() {
        let (start, end) = month_range(date(2024, 2, 10));
        assert_eq!((start, end), (date(2024, 2, 1), date(2024, 2, 29)));
    }

    #[test]
    fn test_month_range_december() {
        let (start, end) = month_range(date(2023, 12, 31));
        assert_eq!((start, end), (date(2023, 12, 1), date(2023, 12, 31)));
    }
}
