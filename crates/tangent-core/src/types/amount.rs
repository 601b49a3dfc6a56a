//! Monetary amounts in one or more currencies.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, CoreResult};
use crate::types::Currency;

/// A monetary amount in a single currency.
///
/// Amounts are plain `f64` values; the engine is a derivative calculator and
/// its tolerances are expressed in floating point, not in cents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurrencyAmount {
    /// The currency of the amount.
    pub currency: Currency,
    /// The amount value.
    pub amount: f64,
}

impl CurrencyAmount {
    /// Creates a new amount.
    #[must_use]
    pub fn new(currency: Currency, amount: f64) -> Self {
        Self { currency, amount }
    }

    /// Creates a zero amount in the given currency.
    #[must_use]
    pub fn zero(currency: Currency) -> Self {
        Self {
            currency,
            amount: 0.0,
        }
    }

    /// Adds another amount in the same currency.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::CurrencyMismatch` if the currencies differ.
    pub fn plus(&self, other: CurrencyAmount) -> CoreResult<Self> {
        if self.currency != other.currency {
            return Err(CoreError::CurrencyMismatch {
                left: self.currency.code(),
                right: other.currency.code(),
            });
        }
        Ok(Self::new(self.currency, self.amount + other.amount))
    }

    /// Returns the amount scaled by a factor.
    #[must_use]
    pub fn multiplied_by(&self, factor: f64) -> Self {
        Self::new(self.currency, self.amount * factor)
    }

    /// Returns the negated amount.
    #[must_use]
    pub fn negated(&self) -> Self {
        Self::new(self.currency, -self.amount)
    }
}

impl fmt::Display for CurrencyAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:.2}", self.currency, self.amount)
    }
}

/// A set of monetary amounts, at most one per currency.
///
/// Stored sorted by currency so that equal sets compare equal.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MultiCurrencyAmount {
    amounts: Vec<CurrencyAmount>,
}

impl MultiCurrencyAmount {
    /// Creates an empty set.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a set from a single amount.
    #[must_use]
    pub fn of(amount: CurrencyAmount) -> Self {
        Self {
            amounts: vec![amount],
        }
    }

    /// Returns the amounts, sorted by currency.
    #[must_use]
    pub fn amounts(&self) -> &[CurrencyAmount] {
        &self.amounts
    }

    /// Returns the amount in the given currency, zero if absent.
    #[must_use]
    pub fn amount(&self, currency: Currency) -> f64 {
        self.amounts
            .iter()
            .find(|a| a.currency == currency)
            .map_or(0.0, |a| a.amount)
    }

    /// Adds an amount, merging with any existing amount in the same currency.
    #[must_use]
    pub fn plus(mut self, amount: CurrencyAmount) -> Self {
        match self
            .amounts
            .binary_search_by(|a| a.currency.cmp(&amount.currency))
        {
            Ok(i) => self.amounts[i].amount += amount.amount,
            Err(i) => self.amounts.insert(i, amount),
        }
        self
    }

    /// Merges another set into this one.
    #[must_use]
    pub fn plus_all(self, other: &MultiCurrencyAmount) -> Self {
        other
            .amounts
            .iter()
            .fold(self, |acc, &amount| acc.plus(amount))
    }

    /// Scales every amount by a factor.
    #[must_use]
    pub fn multiplied_by(mut self, factor: f64) -> Self {
        for a in &mut self.amounts {
            a.amount *= factor;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_plus_same_currency() {
        let a = CurrencyAmount::new(Currency::Usd, 100.0);
        let b = CurrencyAmount::new(Currency::Usd, 50.0);
        assert_relative_eq!(a.plus(b).unwrap().amount, 150.0);
    }

    #[test]
    fn test_plus_mismatched_currency() {
        let a = CurrencyAmount::new(Currency::Usd, 100.0);
        let b = CurrencyAmount::new(Currency::Eur, 50.0);
        assert!(a.plus(b).is_err());
    }

    #[test]
    fn test_multiplied_and_negated() {
        let a = CurrencyAmount::new(Currency::Gbp, 10.0);
        assert_relative_eq!(a.multiplied_by(2.5).amount, 25.0);
        assert_relative_eq!(a.negated().amount, -10.0);
    }

    #[test]
    fn test_multi_currency_merge() {
        let total = MultiCurrencyAmount::empty()
            .plus(CurrencyAmount::new(Currency::Usd, 100.0))
            .plus(CurrencyAmount::new(Currency::Eur, 80.0))
            .plus(CurrencyAmount::new(Currency::Usd, -30.0));

        assert_eq!(total.amounts().len(), 2);
        assert_relative_eq!(total.amount(Currency::Usd), 70.0);
        assert_relative_eq!(total.amount(Currency::Eur), 80.0);
        assert_relative_eq!(total.amount(Currency::Jpy), 0.0);
    }

    #[test]
    fn test_multi_currency_sorted_equality() {
        let a = MultiCurrencyAmount::empty()
            .plus(CurrencyAmount::new(Currency::Usd, 1.0))
            .plus(CurrencyAmount::new(Currency::Eur, 2.0));
        let b = MultiCurrencyAmount::empty()
            .plus(CurrencyAmount::new(Currency::Eur, 2.0))
            .plus(CurrencyAmount::new(Currency::Usd, 1.0));
        assert_eq!(a, b);
    }
}
