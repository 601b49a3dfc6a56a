//! Value type definitions for curves.
//!
//! This module defines [`ValueType`], which describes what a curve's node
//! values represent. Discount factor wrappers check the value type at
//! construction time; a mismatch is a configuration error, not a runtime
//! pricing failure.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Describes what a curve's node values represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ValueType {
    /// Zero rate, continuously or periodically compounded depending on the
    /// curve's compounding-per-year metadata.
    #[default]
    ZeroRate,

    /// Discount factor: P(t) with P(0) = 1.
    DiscountFactor,

    /// Price index level (e.g. CPI), keyed by reference month.
    PriceIndex,

    /// Black volatility.
    BlackVolatility,
}

impl ValueType {
    /// Returns a short market-style label for the value type.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::ZeroRate => "ZeroRate",
            Self::DiscountFactor => "DiscountFactor",
            Self::PriceIndex => "PriceIndex",
            Self::BlackVolatility => "BlackVolatility",
        }
    }

    /// Returns true if node values of this type must be strictly positive.
    #[must_use]
    pub fn requires_positive_values(&self) -> bool {
        matches!(self, Self::DiscountFactor | Self::PriceIndex)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_and_display() {
        assert_eq!(ValueType::ZeroRate.label(), "ZeroRate");
        assert_eq!(format!("{}", ValueType::PriceIndex), "PriceIndex");
    }

    #[test]
    fn test_positivity_requirement() {
        assert!(ValueType::DiscountFactor.requires_positive_values());
        assert!(ValueType::PriceIndex.requires_positive_values());
        assert!(!ValueType::ZeroRate.requires_positive_values());
    }
}
