//! # Tangent Core
//!
//! Core types for the Tangent curve discounting and sensitivity engine.
//!
//! This crate provides the foundational building blocks used throughout Tangent:
//!
//! - **Types**: Domain-specific types like [`Date`], [`Currency`], [`CurrencyAmount`]
//! - **Day Count Conventions**: Industry-standard year fraction calculations
//!
//! ## Design Philosophy
//!
//! - **Type Safety**: Newtypes prevent mixing incompatible values
//! - **Immutability**: Every value type is immutable; mutators return new instances
//! - **Explicit Over Implicit**: Clear, self-documenting APIs
//!
//! ## Example
//!
//! ```rust
//! use tangent_core::prelude::*;
//!
//! let valuation = Date::from_ymd(2014, 1, 22).unwrap();
//! let payment = valuation.add_days(56);
//!
//! let yf = DayCountConvention::Act365Fixed.year_fraction(valuation, payment);
//! assert!((yf - 56.0 / 365.0).abs() < 1e-15);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::must_use_candidate)]

pub mod daycounts;
pub mod error;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::daycounts::{DayCount, DayCountConvention};
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::types::{
        Currency, CurrencyAmount, CurrencyPair, Date, MultiCurrencyAmount, YearMonth,
    };
}

pub use daycounts::{DayCount, DayCountConvention};
pub use error::{CoreError, CoreResult};
pub use types::{Currency, CurrencyAmount, CurrencyPair, Date, MultiCurrencyAmount, YearMonth};
