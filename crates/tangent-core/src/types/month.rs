//! Year-month type for price index observations.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, CoreResult};
use crate::types::Date;

/// A calendar month in a specific year.
///
/// Price indices (CPI and friends) publish one value per month, so inflation
/// observations are keyed by month rather than by date.
///
/// # Example
///
/// ```rust
/// use tangent_core::types::YearMonth;
///
/// let jan = YearMonth::of(2014, 1).unwrap();
/// assert_eq!(jan.plus_months(13), YearMonth::of(2015, 2).unwrap());
/// assert_eq!(jan.months_until(&jan.plus_months(13)), 13);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Creates a year-month.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidDate` if `month` is not in 1..=12.
    pub fn of(year: i32, month: u32) -> CoreResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(CoreError::invalid_date(format!(
                "month must be in 1..=12, got {month}"
            )));
        }
        Ok(Self { year, month })
    }

    /// Returns the month containing the given date.
    #[must_use]
    pub fn from_date(date: Date) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Returns the year component.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Returns the month component (1-12).
    #[must_use]
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Returns this month shifted by a number of months.
    #[must_use]
    pub fn plus_months(&self, months: i32) -> Self {
        let total = self.year * 12 + self.month as i32 - 1 + months;
        Self {
            year: total.div_euclid(12),
            month: (total.rem_euclid(12) + 1) as u32,
        }
    }

    /// Returns the number of whole months from this month to `other`.
    ///
    /// Positive if `other` is later.
    #[must_use]
    pub fn months_until(&self, other: &YearMonth) -> i32 {
        (other.year - self.year) * 12 + other.month as i32 - self.month as i32
    }

    /// Returns the first day of the month.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidDate` if the year is out of the supported
    /// date range.
    pub fn first_day(&self) -> CoreResult<Date> {
        Date::from_ymd(self.year, self.month, 1)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_of_validates_month() {
        assert!(YearMonth::of(2014, 12).is_ok());
        assert!(YearMonth::of(2014, 0).is_err());
        assert!(YearMonth::of(2014, 13).is_err());
    }

    #[test]
    fn test_plus_months_crosses_year() {
        let nov = YearMonth::of(2014, 11).unwrap();
        assert_eq!(nov.plus_months(2), YearMonth::of(2015, 1).unwrap());
        assert_eq!(nov.plus_months(-11), YearMonth::of(2013, 12).unwrap());
    }

    #[test]
    fn test_months_until() {
        let a = YearMonth::of(2014, 3).unwrap();
        let b = YearMonth::of(2015, 1).unwrap();
        assert_eq!(a.months_until(&b), 10);
        assert_eq!(b.months_until(&a), -10);
    }

    #[test]
    fn test_from_date_and_first_day() {
        let date = Date::from_ymd(2014, 7, 19).unwrap();
        let month = YearMonth::from_date(date);
        assert_eq!(month, YearMonth::of(2014, 7).unwrap());
        assert_eq!(month.first_day().unwrap(), Date::from_ymd(2014, 7, 1).unwrap());
    }

    #[test]
    fn test_ordering_and_display() {
        let a = YearMonth::of(2014, 3).unwrap();
        let b = YearMonth::of(2014, 10).unwrap();
        assert!(a < b);
        assert_eq!(format!("{a}"), "2014-03");
    }
}
