//! Day count conventions for rates calculations.
//!
//! Day count conventions determine how year fractions between two dates are
//! computed. The engine uses them for curve time coordinates and accrual
//! factors of overnight observations.
//!
//! # Supported Conventions
//!
//! - [`Act360`]: Actual/360 - money market convention (overnight indices)
//! - [`Act365Fixed`]: Actual/365 Fixed - curve time coordinate default
//! - [`Thirty360E`]: 30E/360 - Eurobond convention
//!
//! # Usage
//!
//! ```rust
//! use tangent_core::daycounts::{DayCount, Act360};
//! use tangent_core::types::Date;
//!
//! let dc = Act360;
//! let start = Date::from_ymd(2025, 1, 15).unwrap();
//! let end = Date::from_ymd(2025, 7, 15).unwrap();
//!
//! let year_fraction = dc.year_fraction(start, end);
//! assert!((year_fraction - 181.0 / 360.0).abs() < 1e-15);
//! ```

mod act360;
mod act365;
mod thirty360;

pub use act360::Act360;
pub use act365::Act365Fixed;
pub use thirty360::Thirty360E;

use serde::{Deserialize, Serialize};

use crate::types::Date;

/// Trait for day count conventions.
///
/// Implementations provide the year fraction calculation between two dates
/// according to specific market conventions.
///
/// # Implementation Notes
///
/// - `year_fraction` can be negative when `end < start`; discount factor
///   implementations rely on this to express dates before the valuation date
/// - Implementations must be thread-safe (`Send + Sync`)
pub trait DayCount: Send + Sync {
    /// Returns the name of the day count convention.
    fn name(&self) -> &'static str;

    /// Calculates the year fraction between two dates.
    fn year_fraction(&self, start: Date, end: Date) -> f64;

    /// Calculates the day count between two dates.
    ///
    /// For ACT conventions this is actual calendar days; for 30/360
    /// conventions it uses the 30-day month assumption.
    fn day_count(&self, start: Date, end: Date) -> i64;
}

/// Enumeration of the supported day count conventions.
///
/// This enum is the serializable form carried in curve metadata; it converts
/// to trait objects when polymorphism is needed, but most call sites use the
/// direct [`year_fraction`](DayCountConvention::year_fraction) method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DayCountConvention {
    /// Actual/360.
    Act360,
    /// Actual/365 Fixed.
    #[default]
    Act365Fixed,
    /// 30E/360 (Eurobond).
    Thirty360E,
}

impl DayCountConvention {
    /// Converts to a boxed day count implementation.
    #[must_use]
    pub fn to_day_count(&self) -> Box<dyn DayCount> {
        match self {
            Self::Act360 => Box::new(Act360),
            Self::Act365Fixed => Box::new(Act365Fixed),
            Self::Thirty360E => Box::new(Thirty360E),
        }
    }

    /// Returns the convention name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Act360 => "ACT/360",
            Self::Act365Fixed => "ACT/365F",
            Self::Thirty360E => "30E/360",
        }
    }

    /// Calculates the year fraction between two dates.
    #[must_use]
    pub fn year_fraction(&self, start: Date, end: Date) -> f64 {
        match self {
            Self::Act360 => Act360.year_fraction(start, end),
            Self::Act365Fixed => Act365Fixed.year_fraction(start, end),
            Self::Thirty360E => Thirty360E.year_fraction(start, end),
        }
    }
}

impl std::fmt::Display for DayCountConvention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
