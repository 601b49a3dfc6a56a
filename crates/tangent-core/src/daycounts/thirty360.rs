//! 30E/360 day count convention.

use super::DayCount;
use crate::types::Date;

/// 30E/360 (Eurobond) day count convention.
///
/// Assumes 30-day months and a 360-day year. Any day-of-month of 31 is
/// treated as 30 on both the start and end date.
///
/// # Formula
///
/// Days = 360(y2 - y1) + 30(m2 - m1) + (d2 - d1), with d1, d2 capped at 30.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Thirty360E;

impl DayCount for Thirty360E {
    fn name(&self) -> &'static str {
        "30E/360"
    }

    fn year_fraction(&self, start: Date, end: Date) -> f64 {
        self.day_count(start, end) as f64 / 360.0
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        let d1 = i64::from(start.day().min(30));
        let d2 = i64::from(end.day().min(30));

        360 * i64::from(end.year() - start.year())
            + 30 * (i64::from(end.month()) - i64::from(start.month()))
            + (d2 - d1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_half_year() {
        let start = Date::from_ymd(2025, 1, 15).unwrap();
        let end = Date::from_ymd(2025, 7, 15).unwrap();
        assert_relative_eq!(Thirty360E.year_fraction(start, end), 0.5);
    }

    #[test]
    fn test_day_31_capped() {
        let start = Date::from_ymd(2025, 1, 31).unwrap();
        let end = Date::from_ymd(2025, 3, 31).unwrap();
        // Both 31sts count as 30th: exactly two 30-day months.
        assert_eq!(Thirty360E.day_count(start, end), 60);
    }
}
