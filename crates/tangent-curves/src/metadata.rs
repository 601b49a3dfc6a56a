//! Curve metadata: name, value type, day count, compounding.

use serde::{Deserialize, Serialize};
use std::fmt;

use tangent_core::daycounts::DayCountConvention;

use crate::error::{CurveError, CurveResult};
use crate::value_type::ValueType;

/// The name of a curve, used as the key of parameter sensitivity vectors.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurveName(String);

impl CurveName {
    /// Creates a curve name.
    #[must_use]
    pub fn of(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurveName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CurveName {
    fn from(name: &str) -> Self {
        Self::of(name)
    }
}

/// Metadata describing how to interpret a curve's node values.
///
/// Constructed through the factory functions, which enforce the metadata
/// invariants eagerly: compounding-per-year, when present, must be a
/// positive integer, and value types that require a day count carry one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveMetadata {
    name: CurveName,
    value_type: ValueType,
    day_count: Option<DayCountConvention>,
    compounding_per_year: Option<u32>,
}

impl CurveMetadata {
    /// Creates metadata for a continuously compounded zero-rate curve.
    #[must_use]
    pub fn zero_rate(name: impl Into<CurveName>, day_count: DayCountConvention) -> Self {
        Self {
            name: name.into(),
            value_type: ValueType::ZeroRate,
            day_count: Some(day_count),
            compounding_per_year: None,
        }
    }

    /// Creates metadata for a periodically compounded zero-rate curve.
    ///
    /// # Errors
    ///
    /// Returns an error if `compounding_per_year` is zero.
    pub fn periodic_zero_rate(
        name: impl Into<CurveName>,
        day_count: DayCountConvention,
        compounding_per_year: u32,
    ) -> CurveResult<Self> {
        let name = name.into();
        if compounding_per_year == 0 {
            return Err(CurveError::invalid_metadata(
                name.as_str(),
                "compounding-per-year must be a positive integer",
            ));
        }
        Ok(Self {
            name,
            value_type: ValueType::ZeroRate,
            day_count: Some(day_count),
            compounding_per_year: Some(compounding_per_year),
        })
    }

    /// Creates metadata for a discount-factor curve.
    #[must_use]
    pub fn discount_factor(name: impl Into<CurveName>, day_count: DayCountConvention) -> Self {
        Self {
            name: name.into(),
            value_type: ValueType::DiscountFactor,
            day_count: Some(day_count),
            compounding_per_year: None,
        }
    }

    /// Creates metadata for a price-index curve.
    ///
    /// Price-index curves are keyed by month, so they carry no day count.
    #[must_use]
    pub fn price_index(name: impl Into<CurveName>) -> Self {
        Self {
            name: name.into(),
            value_type: ValueType::PriceIndex,
            day_count: None,
            compounding_per_year: None,
        }
    }

    /// Returns the curve name.
    #[must_use]
    pub fn name(&self) -> &CurveName {
        &self.name
    }

    /// Returns the value type.
    #[must_use]
    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// Returns the day count convention, if present.
    #[must_use]
    pub fn day_count(&self) -> Option<DayCountConvention> {
        self.day_count
    }

    /// Returns the compounding frequency per year, if present.
    ///
    /// Absent means continuous compounding for zero-rate curves.
    #[must_use]
    pub fn compounding_per_year(&self) -> Option<u32> {
        self.compounding_per_year
    }
}
