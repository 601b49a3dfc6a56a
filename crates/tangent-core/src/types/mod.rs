//! Core domain types.

mod amount;
mod currency;
mod date;
mod month;

pub use amount::{CurrencyAmount, MultiCurrencyAmount};
pub use currency::{Currency, CurrencyPair};
pub use date::Date;
pub use month::YearMonth;
