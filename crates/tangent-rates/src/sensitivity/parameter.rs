//! Parameter sensitivities: per-node derivative vectors.
//!
//! A parameter sensitivity is the derivative of an output with respect to
//! each of a curve's fitted node values. It is produced only by routing a
//! point sensitivity through the owning curve's interpolation weight row;
//! the vector length always equals the owning curve's parameter count.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use tangent_core::types::Currency;
use tangent_curves::CurveName;

use crate::error::{PricingError, PricingResult};

/// Derivatives of an output with respect to one curve's node values,
/// expressed in one currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyParameterSensitivity {
    curve_name: CurveName,
    currency: Currency,
    sensitivity: Vec<f64>,
}

impl CurrencyParameterSensitivity {
    /// Creates a parameter sensitivity vector for one curve.
    #[must_use]
    pub fn of(curve_name: CurveName, currency: Currency, sensitivity: Vec<f64>) -> Self {
        Self {
            curve_name,
            currency,
            sensitivity,
        }
    }

    /// Returns the owning curve name.
    #[must_use]
    pub fn curve_name(&self) -> &CurveName {
        &self.curve_name
    }

    /// Returns the sensitivity currency.
    #[must_use]
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Returns the per-parameter derivative values.
    #[must_use]
    pub fn sensitivity(&self) -> &[f64] {
        &self.sensitivity
    }

    /// Returns the sum of all parameter sensitivities.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.sensitivity.iter().sum()
    }

    /// Returns this vector scaled by a factor.
    #[must_use]
    pub fn multiplied_by(&self, factor: f64) -> Self {
        Self {
            curve_name: self.curve_name.clone(),
            currency: self.currency,
            sensitivity: self.sensitivity.iter().map(|v| v * factor).collect(),
        }
    }

    /// Adds another vector for the same (curve, currency).
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the curve name, currency, or vector
    /// length differ.
    pub fn plus(&self, other: &Self) -> PricingResult<Self> {
        if self.curve_name != other.curve_name
            || self.currency != other.currency
            || self.sensitivity.len() != other.sensitivity.len()
        {
            return Err(PricingError::configuration(format!(
                "cannot add parameter sensitivities for ({}, {}) and ({}, {})",
                self.curve_name, self.currency, other.curve_name, other.currency
            )));
        }
        let sensitivity = self
            .sensitivity
            .iter()
            .zip(&other.sensitivity)
            .map(|(a, b)| a + b)
            .collect();
        Ok(Self {
            curve_name: self.curve_name.clone(),
            currency: self.currency,
            sensitivity,
        })
    }

    fn compare_key(&self, other: &Self) -> Ordering {
        self.curve_name
            .cmp(&other.curve_name)
            .then_with(|| self.currency.cmp(&other.currency))
    }
}

/// A collection of parameter sensitivity vectors, one per (curve, currency),
/// kept sorted and merged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CurrencyParameterSensitivities {
    sensitivities: Vec<CurrencyParameterSensitivity>,
}

impl CurrencyParameterSensitivities {
    /// Returns the empty collection.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a collection from one entry.
    #[must_use]
    pub fn of(sensitivity: CurrencyParameterSensitivity) -> Self {
        Self {
            sensitivities: vec![sensitivity],
        }
    }

    /// Returns the entries, sorted by (curve name, currency).
    #[must_use]
    pub fn sensitivities(&self) -> &[CurrencyParameterSensitivity] {
        &self.sensitivities
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sensitivities.len()
    }

    /// Returns true if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sensitivities.is_empty()
    }

    /// Returns the entry for a (curve, currency), if present.
    #[must_use]
    pub fn find(&self, curve_name: &CurveName, currency: Currency) -> Option<&CurrencyParameterSensitivity> {
        self.sensitivities
            .iter()
            .find(|s| s.curve_name() == curve_name && s.currency() == currency)
    }

    /// Merges one entry into the collection, summing with any existing
    /// entry for the same (curve, currency).
    ///
    /// # Errors
    ///
    /// Returns a configuration error if an existing entry has a different
    /// parameter count.
    pub fn combined_with(mut self, sensitivity: CurrencyParameterSensitivity) -> PricingResult<Self> {
        match self
            .sensitivities
            .iter_mut()
            .find(|s| s.compare_key(&sensitivity) == Ordering::Equal)
        {
            Some(existing) => {
                *existing = existing.plus(&sensitivity)?;
            }
            None => {
                self.sensitivities.push(sensitivity);
                self.sensitivities.sort_by(CurrencyParameterSensitivity::compare_key);
            }
        }
        Ok(self)
    }

    /// Merges all entries of another collection into this one.
    ///
    /// # Errors
    ///
    /// Returns a configuration error on mismatched parameter counts.
    pub fn merged_with(self, other: Self) -> PricingResult<Self> {
        other
            .sensitivities
            .into_iter()
            .try_fold(self, Self::combined_with)
    }

    /// Scales every entry by a factor.
    #[must_use]
    pub fn multiplied_by(&self, factor: f64) -> Self {
        Self {
            sensitivities: self
                .sensitivities
                .iter()
                .map(|s| s.multiplied_by(factor))
                .collect(),
        }
    }

    /// Compares against another collection within an absolute tolerance.
    ///
    /// Entries absent on one side are compared against zero. This is the
    /// comparison used to validate analytic sensitivities against the
    /// finite-difference calculator.
    #[must_use]
    pub fn equal_within_tolerance(&self, other: &Self, tolerance: f64) -> bool {
        let within = |s: &CurrencyParameterSensitivity, counterpart: Option<&CurrencyParameterSensitivity>| {
            match counterpart {
                Some(c) => {
                    s.sensitivity().len() == c.sensitivity().len()
                        && s.sensitivity()
                            .iter()
                            .zip(c.sensitivity())
                            .all(|(a, b)| (a - b).abs() <= tolerance)
                }
                None => s.sensitivity().iter().all(|v| v.abs() <= tolerance),
            }
        };
        self.sensitivities
            .iter()
            .all(|s| within(s, other.find(s.curve_name(), s.currency())))
            && other
                .sensitivities
                .iter()
                .all(|s| within(s, self.find(s.curve_name(), s.currency())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usd(name: &str, values: Vec<f64>) -> CurrencyParameterSensitivity {
        CurrencyParameterSensitivity::of(CurveName::of(name), Currency::Usd, values)
    }

    #[test]
    fn test_plus_same_key() {
        let a = usd("USD-Disc", vec![1.0, 2.0]);
        let b = usd("USD-Disc", vec![0.5, -1.0]);
        let sum = a.plus(&b).unwrap();
        assert_eq!(sum.sensitivity(), &[1.5, 1.0]);
        assert_eq!(sum.total(), 2.5);
    }

    #[test]
    fn test_plus_rejects_mismatch() {
        let a = usd("USD-Disc", vec![1.0, 2.0]);
        let b = usd("USD-Fwd", vec![0.5, -1.0]);
        assert!(a.plus(&b).is_err());
        let c = usd("USD-Disc", vec![1.0]);
        assert!(a.plus(&c).is_err());
    }

    #[test]
    fn test_combined_with_merges_and_sorts() {
        let result = CurrencyParameterSensitivities::empty()
            .combined_with(usd("USD-Fwd", vec![1.0]))
            .unwrap()
            .combined_with(usd("USD-Disc", vec![2.0]))
            .unwrap()
            .combined_with(usd("USD-Disc", vec![3.0]))
            .unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result.sensitivities()[0].curve_name().as_str(), "USD-Disc");
        assert_eq!(result.sensitivities()[0].sensitivity(), &[5.0]);
    }

    #[test]
    fn test_equal_within_tolerance_treats_missing_as_zero() {
        let a = CurrencyParameterSensitivities::of(usd("USD-Disc", vec![1.0]));
        let b = a
            .clone()
            .combined_with(usd("USD-Fwd", vec![1e-10]))
            .unwrap();
        assert!(a.equal_within_tolerance(&b, 1e-8));
        let c = a.clone().combined_with(usd("USD-Fwd", vec![0.5])).unwrap();
        assert!(!a.equal_within_tolerance(&c, 1e-8));
    }

    #[test]
    fn test_multiplied_by() {
        let a = CurrencyParameterSensitivities::of(usd("USD-Disc", vec![1.0, -2.0]));
        let scaled = a.multiplied_by(-0.5);
        assert_eq!(scaled.sensitivities()[0].sensitivity(), &[-0.5, 1.0]);
    }
}
