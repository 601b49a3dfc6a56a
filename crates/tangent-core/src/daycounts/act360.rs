//! Actual/360 day count convention.

use super::DayCount;
use crate::types::Date;

/// Actual/360 day count convention.
///
/// The day count is the actual number of days between dates.
/// The year basis is always 360 days.
///
/// # Usage
///
/// - Money market instruments
/// - USD, EUR, CHF overnight indices
///
/// # Formula
///
/// Year Fraction = Actual Days / 360
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Act360;

impl DayCount for Act360 {
    fn name(&self) -> &'static str {
        "ACT/360"
    }

    fn year_fraction(&self, start: Date, end: Date) -> f64 {
        start.days_between(&end) as f64 / 360.0
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        start.days_between(&end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_one_day() {
        let start = Date::from_ymd(2025, 1, 15).unwrap();
        let end = start.add_days(1);
        assert_relative_eq!(Act360.year_fraction(start, end), 1.0 / 360.0);
        assert_eq!(Act360.day_count(start, end), 1);
    }

    #[test]
    fn test_full_year() {
        let start = Date::from_ymd(2025, 1, 1).unwrap();
        let end = Date::from_ymd(2026, 1, 1).unwrap();
        assert_relative_eq!(Act360.year_fraction(start, end), 365.0 / 360.0);
    }
}
