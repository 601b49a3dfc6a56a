//! Point sensitivities: atomic derivative records per rate observation.
//!
//! A point sensitivity is the derivative of an output with respect to one
//! curve observation at one specific time, before that derivative is
//! distributed across the owning curve's parameters. Pricers accumulate
//! point sensitivities across many cash flows through
//! [`PointSensitivityBuilder`], in whatever order the pricing walk visits
//! them; [`PointSensitivities::normalized`] makes the result order
//! independent.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use tangent_core::types::{Currency, Date, YearMonth};

use crate::index::{IborIndex, OvernightIndex, PriceIndex};

/// Entries smaller than this in absolute value are dropped by
/// [`PointSensitivities::normalized`].
pub const NEGLIGIBLE_SENSITIVITY: f64 = 1e-14;

/// Identifies which curve observation a sensitivity is taken against.
///
/// One variant per rate-observation family, dispatched exhaustively by the
/// provider when converting point sensitivities to parameter sensitivities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SensitivityKey {
    /// Sensitivity to a discount curve's zero rate at a year fraction.
    ZeroRate {
        /// Currency of the owning discount curve.
        curve_currency: Currency,
        /// Year fraction from the valuation date under the curve day count.
        year_fraction: f64,
    },

    /// Sensitivity to a term index forward rate.
    IborRate {
        /// The observed index.
        index: IborIndex,
        /// Date the rate fixes.
        fixing_date: Date,
    },

    /// Sensitivity to an overnight index forward rate.
    ///
    /// `end_date` is the maturity of the discount-factor query behind the
    /// rate: the deposit maturity for a daily rate, the period end for an
    /// aggregate period rate.
    OvernightRate {
        /// The observed index.
        index: OvernightIndex,
        /// Date the rate fixes (period start fixing for aggregate rates).
        fixing_date: Date,
        /// End of the observed accrual period.
        end_date: Date,
    },

    /// Sensitivity to a price index value.
    InflationRate {
        /// The observed index.
        index: PriceIndex,
        /// Reference month of the index value.
        reference_month: YearMonth,
    },
}

impl SensitivityKey {
    fn rank(&self) -> u8 {
        match self {
            Self::ZeroRate { .. } => 0,
            Self::IborRate { .. } => 1,
            Self::OvernightRate { .. } => 2,
            Self::InflationRate { .. } => 3,
        }
    }

    /// Total order over keys, used for deterministic merging.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (
                Self::ZeroRate {
                    curve_currency: c1,
                    year_fraction: t1,
                },
                Self::ZeroRate {
                    curve_currency: c2,
                    year_fraction: t2,
                },
            ) => c1.cmp(c2).then_with(|| t1.total_cmp(t2)),
            (
                Self::IborRate {
                    index: i1,
                    fixing_date: d1,
                },
                Self::IborRate {
                    index: i2,
                    fixing_date: d2,
                },
            ) => i1.cmp(i2).then_with(|| d1.cmp(d2)),
            (
                Self::OvernightRate {
                    index: i1,
                    fixing_date: d1,
                    end_date: e1,
                },
                Self::OvernightRate {
                    index: i2,
                    fixing_date: d2,
                    end_date: e2,
                },
            ) => i1.cmp(i2).then_with(|| d1.cmp(d2)).then_with(|| e1.cmp(e2)),
            (
                Self::InflationRate {
                    index: i1,
                    reference_month: m1,
                },
                Self::InflationRate {
                    index: i2,
                    reference_month: m2,
                },
            ) => i1.cmp(i2).then_with(|| m1.cmp(m2)),
            _ => self.rank().cmp(&other.rank()),
        }
    }

    /// Short description used in routing error messages.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::ZeroRate {
                curve_currency,
                year_fraction,
            } => format!("ZeroRate[{curve_currency} @ {year_fraction:.6}]"),
            Self::IborRate { index, fixing_date } => {
                format!("IborRate[{index} @ {fixing_date}]")
            }
            Self::OvernightRate {
                index,
                fixing_date,
                end_date,
            } => format!("OvernightRate[{index} @ {fixing_date}..{end_date}]"),
            Self::InflationRate {
                index,
                reference_month,
            } => format!("InflationRate[{index} @ {reference_month}]"),
        }
    }
}

/// One sensitivity entry: a key, the currency the value is expressed in,
/// and the derivative value itself.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointSensitivity {
    /// Which observation the sensitivity is against.
    pub key: SensitivityKey,
    /// Currency the sensitivity value is expressed in. May differ from the
    /// owning curve's currency for cross-currency measures.
    pub currency: Currency,
    /// The derivative value.
    pub value: f64,
}

impl PointSensitivity {
    /// Creates a point sensitivity.
    #[must_use]
    pub fn new(key: SensitivityKey, currency: Currency, value: f64) -> Self {
        Self {
            key,
            currency,
            value,
        }
    }

    /// Returns this sensitivity scaled by a factor.
    #[must_use]
    pub fn multiplied_by(&self, factor: f64) -> Self {
        Self {
            value: self.value * factor,
            ..*self
        }
    }

    /// Returns this sensitivity re-expressed in a different currency tag.
    ///
    /// No FX conversion is applied; conversion of the value is the
    /// provider's job.
    #[must_use]
    pub fn with_currency(&self, currency: Currency) -> Self {
        Self { currency, ..*self }
    }

    /// Total order over (key, currency), used for deterministic merging.
    #[must_use]
    pub fn compare_key(&self, other: &Self) -> Ordering {
        self.key
            .compare(&other.key)
            .then_with(|| self.currency.cmp(&other.currency))
    }
}

/// Accumulates point sensitivities during a pricing walk.
///
/// `none()` is a true identity: combining with it changes nothing.
/// Combination is associative and commutative with respect to the final
/// `build().normalized()` output.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PointSensitivityBuilder {
    /// No sensitivity. Identity for combination.
    #[default]
    None,
    /// Exactly one entry.
    Single(PointSensitivity),
    /// Two or more entries, not yet merged.
    Many(Vec<PointSensitivity>),
}

impl PointSensitivityBuilder {
    /// Returns the no-op identity builder.
    #[must_use]
    pub fn none() -> Self {
        Self::None
    }

    /// Returns a builder holding one entry.
    #[must_use]
    pub fn of(sensitivity: PointSensitivity) -> Self {
        Self::Single(sensitivity)
    }

    /// Combines two builders.
    #[must_use]
    pub fn combined_with(self, other: Self) -> Self {
        match (self, other) {
            (Self::None, other) => other,
            (this, Self::None) => this,
            (Self::Single(a), Self::Single(b)) => Self::Many(vec![a, b]),
            (Self::Single(a), Self::Many(mut v)) => {
                v.insert(0, a);
                Self::Many(v)
            }
            (Self::Many(mut v), Self::Single(b)) => {
                v.push(b);
                Self::Many(v)
            }
            (Self::Many(mut v), Self::Many(w)) => {
                v.extend(w);
                Self::Many(v)
            }
        }
    }

    /// Scales every entry by a factor.
    #[must_use]
    pub fn multiplied_by(self, factor: f64) -> Self {
        match self {
            Self::None => Self::None,
            Self::Single(s) => Self::Single(s.multiplied_by(factor)),
            Self::Many(v) => Self::Many(v.iter().map(|s| s.multiplied_by(factor)).collect()),
        }
    }

    /// Re-tags every entry with a different sensitivity currency.
    #[must_use]
    pub fn map_currency(self, currency: Currency) -> Self {
        match self {
            Self::None => Self::None,
            Self::Single(s) => Self::Single(s.with_currency(currency)),
            Self::Many(v) => Self::Many(v.iter().map(|s| s.with_currency(currency)).collect()),
        }
    }

    /// Finalizes the accumulated entries.
    #[must_use]
    pub fn build(self) -> PointSensitivities {
        match self {
            Self::None => PointSensitivities::empty(),
            Self::Single(s) => PointSensitivities::of(vec![s]),
            Self::Many(v) => PointSensitivities::of(v),
        }
    }
}

/// An ordered sequence of point sensitivities.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PointSensitivities {
    sensitivities: Vec<PointSensitivity>,
}

impl PointSensitivities {
    /// Returns the empty sequence.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a sequence from raw entries, unmerged.
    #[must_use]
    pub fn of(sensitivities: Vec<PointSensitivity>) -> Self {
        Self { sensitivities }
    }

    /// Returns the entries.
    #[must_use]
    pub fn sensitivities(&self) -> &[PointSensitivity] {
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

    /// Concatenates two sequences.
    #[must_use]
    pub fn combined_with(mut self, other: Self) -> Self {
        self.sensitivities.extend(other.sensitivities);
        self
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

    /// Sorts by (key, currency), merges entries with identical keys, and
    /// drops numerically negligible entries.
    ///
    /// Two sequences accumulated in different orders normalize to the same
    /// result.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.sensitivities.sort_by(PointSensitivity::compare_key);
        let mut merged: Vec<PointSensitivity> = Vec::with_capacity(self.sensitivities.len());
        for entry in self.sensitivities {
            match merged.last_mut() {
                Some(last) if last.compare_key(&entry) == Ordering::Equal => {
                    last.value += entry.value;
                }
                _ => merged.push(entry),
            }
        }
        merged.retain(|s| s.value.abs() >= NEGLIGIBLE_SENSITIVITY);
        Self {
            sensitivities: merged,
        }
    }

    /// Compares two normalized sequences entry-by-entry within a tolerance.
    #[must_use]
    pub fn equal_within_tolerance(&self, other: &Self, tolerance: f64) -> bool {
        let a = self.clone().normalized();
        let b = other.clone().normalized();
        let (mut i, mut j) = (0, 0);
        while i < a.sensitivities.len() && j < b.sensitivities.len() {
            let (x, y) = (&a.sensitivities[i], &b.sensitivities[j]);
            match x.compare_key(y) {
                Ordering::Equal => {
                    if (x.value - y.value).abs() > tolerance {
                        return false;
                    }
                    i += 1;
                    j += 1;
                }
                Ordering::Less => {
                    if x.value.abs() > tolerance {
                        return false;
                    }
                    i += 1;
                }
                Ordering::Greater => {
                    if y.value.abs() > tolerance {
                        return false;
                    }
                    j += 1;
                }
            }
        }
        a.sensitivities[i..].iter().all(|s| s.value.abs() <= tolerance)
            && b.sensitivities[j..].iter().all(|s| s.value.abs() <= tolerance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn zero_rate(ccy: Currency, t: f64, value: f64) -> PointSensitivity {
        PointSensitivity::new(
            SensitivityKey::ZeroRate {
                curve_currency: ccy,
                year_fraction: t,
            },
            ccy,
            value,
        )
    }

    #[test]
    fn test_none_is_identity() {
        let s = PointSensitivityBuilder::of(zero_rate(Currency::Usd, 1.0, 2.5));
        let combined = s.clone().combined_with(PointSensitivityBuilder::none());
        assert_eq!(combined.build(), s.build());
        assert_eq!(
            PointSensitivityBuilder::none().build(),
            PointSensitivities::empty()
        );
    }

    #[test]
    fn test_normalized_merges_identical_keys() {
        let builder = PointSensitivityBuilder::of(zero_rate(Currency::Usd, 1.0, 2.0))
            .combined_with(PointSensitivityBuilder::of(zero_rate(Currency::Usd, 1.0, 3.0)))
            .combined_with(PointSensitivityBuilder::of(zero_rate(Currency::Usd, 2.0, 5.0)));
        let result = builder.build().normalized();
        assert_eq!(result.len(), 2);
        assert_eq!(result.sensitivities()[0].value, 5.0);
        assert_eq!(result.sensitivities()[1].value, 5.0);
    }

    #[test]
    fn test_normalized_keeps_distinct_currencies() {
        let usd = zero_rate(Currency::Usd, 1.0, 2.0);
        let gbp = usd.with_currency(Currency::Gbp);
        let result = PointSensitivities::of(vec![usd, gbp]).normalized();
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_normalized_drops_negligible() {
        let result = PointSensitivities::of(vec![
            zero_rate(Currency::Usd, 1.0, 1e-15),
            zero_rate(Currency::Usd, 2.0, 1.0),
        ])
        .normalized();
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_multiplied_by_scales_all() {
        let builder = PointSensitivityBuilder::of(zero_rate(Currency::Usd, 1.0, 2.0))
            .combined_with(PointSensitivityBuilder::of(zero_rate(Currency::Usd, 2.0, -4.0)))
            .multiplied_by(0.5);
        let result = builder.build().normalized();
        assert_eq!(result.sensitivities()[0].value, 1.0);
        assert_eq!(result.sensitivities()[1].value, -2.0);
    }

    #[test]
    fn test_equal_within_tolerance() {
        let a = PointSensitivities::of(vec![zero_rate(Currency::Usd, 1.0, 2.0)]);
        let b = PointSensitivities::of(vec![zero_rate(Currency::Usd, 1.0, 2.0 + 1e-9)]);
        assert!(a.equal_within_tolerance(&b, 1e-8));
        assert!(!a.equal_within_tolerance(&b, 1e-10));
    }

    #[test]
    fn test_cross_kind_ordering_is_stable() {
        let zero = zero_rate(Currency::Usd, 1.0, 1.0);
        let inflation = PointSensitivity::new(
            SensitivityKey::InflationRate {
                index: crate::index::PriceIndex::UsCpiU,
                reference_month: YearMonth::of(2014, 7).unwrap(),
            },
            Currency::Usd,
            1.0,
        );
        let result = PointSensitivities::of(vec![inflation, zero]).normalized();
        assert!(matches!(
            result.sensitivities()[0].key,
            SensitivityKey::ZeroRate { .. }
        ));
    }

    proptest! {
        // Accumulation order never changes the normalized output.
        #[test]
        fn prop_combination_is_order_independent(
            values in prop::collection::vec((0u8..4, -100.0f64..100.0), 1..12),
            seed in any::<u64>(),
        ) {
            let entries: Vec<PointSensitivity> = values
                .iter()
                .map(|(slot, v)| zero_rate(Currency::Usd, f64::from(*slot), *v))
                .collect();

            let forward = entries
                .iter()
                .fold(PointSensitivityBuilder::none(), |acc, s| {
                    acc.combined_with(PointSensitivityBuilder::of(*s))
                });

            let mut shuffled = entries;
            // Cheap deterministic shuffle from the seed.
            let n = shuffled.len();
            let mut state = seed | 1;
            for i in (1..n).rev() {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                let j = (state >> 33) as usize % (i + 1);
                shuffled.swap(i, j);
            }
            let backward = shuffled
                .iter()
                .fold(PointSensitivityBuilder::none(), |acc, s| {
                    PointSensitivityBuilder::of(*s).combined_with(acc)
                });

            let a = forward.build().normalized();
            let b = backward.build().normalized();
            prop_assert!(a.equal_within_tolerance(&b, 1e-9));
        }
    }
}
