//! Date type for financial calculations.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, CoreResult};

/// A calendar date for financial calculations.
///
/// This is a newtype wrapper around `chrono::NaiveDate` providing
/// financial-specific operations and ensuring type safety.
///
/// Business-day arithmetic here uses a weekend-only calendar. Holiday
/// calendars are owned by upstream schedule generation; this crate only
/// needs the weekday stepping used by overnight index conventions.
///
/// # Example
///
/// ```rust
/// use tangent_core::types::Date;
///
/// let date = Date::from_ymd(2025, 6, 13).unwrap();
/// let next = date.add_business_days(1);
/// assert_eq!(next, Date::from_ymd(2025, 6, 16).unwrap()); // skips the weekend
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Date(NaiveDate);

impl Date {
    /// Creates a new date from year, month, and day.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidDate` if the date is invalid.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> CoreResult<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Date)
            .ok_or_else(|| CoreError::invalid_date(format!("{year}-{month:02}-{day:02}")))
    }

    /// Creates a date from an ISO 8601 string (YYYY-MM-DD).
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidDate` if the string is not a valid date.
    pub fn parse(s: &str) -> CoreResult<Self> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Date)
            .map_err(|_| CoreError::invalid_date(format!("Cannot parse: {s}")))
    }

    /// Returns the year component.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Returns the month component (1-12).
    #[must_use]
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Returns the day component (1-31).
    #[must_use]
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Checks if the year is a leap year.
    #[must_use]
    pub fn is_leap_year(&self) -> bool {
        self.0.leap_year()
    }

    /// Adds a number of days to the date.
    #[must_use]
    pub fn add_days(&self, days: i64) -> Self {
        Date(self.0 + chrono::Duration::days(days))
    }

    /// Adds a number of months to the date.
    ///
    /// If the resulting day would be invalid (e.g., Jan 31 + 1 month),
    /// it rolls back to the last valid day of the month.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidDate` if the result is out of range.
    pub fn add_months(&self, months: i32) -> CoreResult<Self> {
        let total_months = self.year() * 12 + self.month() as i32 - 1 + months;
        let new_year = total_months.div_euclid(12);
        let new_month = (total_months.rem_euclid(12) + 1) as u32;

        let max_day = days_in_month(new_year, new_month);
        let new_day = self.day().min(max_day);

        Self::from_ymd(new_year, new_month, new_day)
    }

    /// Calculates the number of calendar days between two dates.
    #[must_use]
    pub fn days_between(&self, other: &Date) -> i64 {
        (other.0 - self.0).num_days()
    }

    /// Returns the underlying `NaiveDate`.
    #[must_use]
    pub fn as_naive_date(&self) -> NaiveDate {
        self.0
    }

    /// Returns the first day of the month.
    #[must_use]
    pub fn start_of_month(&self) -> Self {
        Date(
            NaiveDate::from_ymd_opt(self.year(), self.month(), 1)
                .expect("first of month should always be valid"),
        )
    }

    /// Returns the last day of the month.
    #[must_use]
    pub fn end_of_month(&self) -> Self {
        Date(
            NaiveDate::from_ymd_opt(self.year(), self.month(), days_in_month(self.year(), self.month()))
                .expect("end of month should always be valid"),
        )
    }

    /// Returns the day of week.
    #[must_use]
    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    /// Checks if the date is a weekend (Saturday or Sunday).
    #[must_use]
    pub fn is_weekend(&self) -> bool {
        matches!(self.weekday(), Weekday::Sat | Weekday::Sun)
    }

    /// Checks if the date is a weekday (Monday through Friday).
    #[must_use]
    pub fn is_weekday(&self) -> bool {
        !self.is_weekend()
    }

    /// Returns the next weekday (skipping weekends).
    ///
    /// If the date is already a weekday, returns itself.
    #[must_use]
    pub fn next_weekday(&self) -> Self {
        let mut date = *self;
        while date.is_weekend() {
            date = date.add_days(1);
        }
        date
    }

    /// Returns the previous weekday (skipping weekends).
    ///
    /// If the date is already a weekday, returns itself.
    #[must_use]
    pub fn prev_weekday(&self) -> Self {
        let mut date = *self;
        while date.is_weekend() {
            date = date.add_days(-1);
        }
        date
    }

    /// Adds business days (weekdays only) to the date.
    ///
    /// Positive values move forward, negative values move backward.
    /// Zero returns the date unchanged even when it falls on a weekend.
    #[must_use]
    pub fn add_business_days(&self, days: i32) -> Self {
        if days == 0 {
            return *self;
        }

        let direction = if days > 0 { 1i64 } else { -1i64 };
        let mut remaining = days.abs();
        let mut current = *self;

        while remaining > 0 {
            current = current.add_days(direction);
            if current.is_weekday() {
                remaining -= 1;
            }
        }

        current
    }

    /// Calculates the number of business days between two dates.
    ///
    /// Returns positive if `other` is after `self`, negative otherwise.
    #[must_use]
    pub fn business_days_between(&self, other: &Date) -> i64 {
        if self == other {
            return 0;
        }

        let (start, end, sign) = if self < other {
            (*self, *other, 1i64)
        } else {
            (*other, *self, -1i64)
        };

        let mut count = 0i64;
        let mut current = start.add_days(1);

        while current <= end {
            if current.is_weekday() {
                count += 1;
            }
            current = current.add_days(1);
        }

        count * sign
    }

    /// Returns the minimum of two dates.
    #[must_use]
    pub fn min(self, other: Self) -> Self {
        if self <= other {
            self
        } else {
            other
        }
    }

    /// Returns the maximum of two dates.
    #[must_use]
    pub fn max(self, other: Self) -> Self {
        if self >= other {
            self
        } else {
            other
        }
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if NaiveDate::from_ymd_opt(year, 1, 1).is_some_and(|d| d.leap_year()) => 29,
        2 => 28,
        _ => unreachable!(),
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl From<NaiveDate> for Date {
    fn from(date: NaiveDate) -> Self {
        Date(date)
    }
}

impl From<Date> for NaiveDate {
    fn from(date: Date) -> Self {
        date.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_ymd_valid() {
        let date = Date::from_ymd(2025, 6, 15).unwrap();
        assert_eq!(date.year(), 2025);
        assert_eq!(date.month(), 6);
        assert_eq!(date.day(), 15);
    }

    #[test]
    fn test_from_ymd_invalid() {
        assert!(Date::from_ymd(2025, 2, 30).is_err());
        assert!(Date::from_ymd(2025, 13, 1).is_err());
    }

    #[test]
    fn test_parse() {
        let date = Date::parse("2014-01-22").unwrap();
        assert_eq!(date, Date::from_ymd(2014, 1, 22).unwrap());
        assert!(Date::parse("not a date").is_err());
    }

    #[test]
    fn test_add_months_end_of_month() {
        let date = Date::from_ymd(2025, 1, 31).unwrap();
        let result = date.add_months(1).unwrap();
        assert_eq!(result, Date::from_ymd(2025, 2, 28).unwrap());
    }

    #[test]
    fn test_add_months_negative() {
        let date = Date::from_ymd(2025, 1, 15).unwrap();
        let result = date.add_months(-3).unwrap();
        assert_eq!(result, Date::from_ymd(2024, 10, 15).unwrap());
    }

    #[test]
    fn test_days_between() {
        let d1 = Date::from_ymd(2014, 1, 22).unwrap();
        let d2 = d1.add_days(56);
        assert_eq!(d1.days_between(&d2), 56);
        assert_eq!(d2.days_between(&d1), -56);
    }

    #[test]
    fn test_weekend_detection() {
        // 2025-06-14 is a Saturday
        let sat = Date::from_ymd(2025, 6, 14).unwrap();
        assert!(sat.is_weekend());
        assert!(!sat.is_weekday());

        let mon = Date::from_ymd(2025, 6, 16).unwrap();
        assert!(mon.is_weekday());
    }

    #[test]
    fn test_add_business_days() {
        // 2025-06-13 is a Friday
        let fri = Date::from_ymd(2025, 6, 13).unwrap();
        assert_eq!(fri.add_business_days(1), Date::from_ymd(2025, 6, 16).unwrap());
        assert_eq!(fri.add_business_days(-5), Date::from_ymd(2025, 6, 6).unwrap());
        assert_eq!(fri.add_business_days(0), fri);
    }

    #[test]
    fn test_business_days_between() {
        let fri = Date::from_ymd(2025, 6, 13).unwrap();
        let next_fri = Date::from_ymd(2025, 6, 20).unwrap();
        assert_eq!(fri.business_days_between(&next_fri), 5);
        assert_eq!(next_fri.business_days_between(&fri), -5);
    }

    #[test]
    fn test_next_prev_weekday() {
        let sat = Date::from_ymd(2025, 6, 14).unwrap();
        assert_eq!(sat.next_weekday(), Date::from_ymd(2025, 6, 16).unwrap());
        assert_eq!(sat.prev_weekday(), Date::from_ymd(2025, 6, 13).unwrap());
    }

    #[test]
    fn test_end_of_month_leap() {
        let date = Date::from_ymd(2024, 2, 10).unwrap();
        assert_eq!(date.end_of_month(), Date::from_ymd(2024, 2, 29).unwrap());
    }

    #[test]
    fn test_display() {
        let date = Date::from_ymd(2025, 1, 5).unwrap();
        assert_eq!(format!("{date}"), "2025-01-05");
    }

    #[test]
    fn test_serde_roundtrip() {
        let date = Date::from_ymd(2025, 6, 15).unwrap();
        let json = serde_json::to_string(&date).unwrap();
        assert_eq!(json, "\"2025-06-15\"");
        let back: Date = serde_json::from_str(&json).unwrap();
        assert_eq!(back, date);
    }
}
