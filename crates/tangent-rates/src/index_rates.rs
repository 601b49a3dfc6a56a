//! Forward index rate sources.
//!
//! Overnight and term rates are estimated from a discount curve: the simply
//! compounded forward over `[start, end)` is `(DF(start)/DF(end) - 1) / af`.
//! Price index values are read from a dedicated index-level curve. All three
//! sources apply the same fixing priority rule: a recorded fixing at or
//! before the valuation date wins over the curve, and a fixing that should
//! already have been published but is absent is a calculation error, never a
//! silent forward fallback.

use std::collections::BTreeMap;
use std::sync::Arc;

use tangent_core::types::{Date, YearMonth};
use tangent_curves::NodalCurve;

use crate::discount::DiscountFactors;
use crate::error::{PricingError, PricingResult};
use crate::fixings::FixingSeries;
use crate::index::{IborIndex, IborRateObservation, OvernightIndex, PriceIndex};
use crate::sensitivity::{
    CurrencyParameterSensitivity, PointSensitivity, PointSensitivityBuilder, SensitivityKey,
};

/// Overnight index forward rates estimated from a discount curve.
#[derive(Debug, Clone)]
pub struct DiscountOvernightIndexRates {
    index: OvernightIndex,
    discount_factors: Arc<dyn DiscountFactors>,
    fixings: FixingSeries,
}

impl DiscountOvernightIndexRates {
    /// Creates an overnight rate source.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the discount curve currency differs
    /// from the index currency.
    pub fn new(
        index: OvernightIndex,
        discount_factors: Arc<dyn DiscountFactors>,
        fixings: FixingSeries,
    ) -> PricingResult<Self> {
        if discount_factors.currency() != index.currency() {
            return Err(PricingError::configuration(format!(
                "discount curve currency {} does not match index {}",
                discount_factors.currency(),
                index
            )));
        }
        Ok(Self {
            index,
            discount_factors,
            fixings,
        })
    }

    /// Returns the index.
    #[must_use]
    pub fn index(&self) -> OvernightIndex {
        self.index
    }

    /// Returns the valuation date.
    #[must_use]
    pub fn valuation_date(&self) -> Date {
        self.discount_factors.valuation_date()
    }

    /// Returns the underlying discount factors.
    #[must_use]
    pub fn discount_factors(&self) -> &Arc<dyn DiscountFactors> {
        &self.discount_factors
    }

    /// Returns the recorded fixings.
    #[must_use]
    pub fn fixings(&self) -> &FixingSeries {
        &self.fixings
    }

    /// Returns the rate for one fixing date: the recorded fixing when it is
    /// available, the forward rate when the fixing is not yet published.
    ///
    /// # Errors
    ///
    /// Returns `MissingFixing` if the fixing should already be published
    /// but is not recorded.
    pub fn rate(&self, fixing_date: Date) -> PricingResult<f64> {
        if fixing_date <= self.valuation_date() {
            if let Some(fixed) = self.fixings.value_on(fixing_date) {
                return Ok(fixed);
            }
            // Published strictly before valuation means the record must exist.
            // A same-day publication may not have landed yet, fall through to
            // the forward estimate.
            if self.index.publication_date(fixing_date) < self.valuation_date() {
                return Err(PricingError::missing_fixing(self.index.name(), fixing_date));
            }
        }
        let (start, end) = self.index.accrual_period(fixing_date);
        self.forward_over(start, end)
    }

    /// Returns the aggregate simply compounded forward rate over
    /// `[start_date, end_date)`, both effective dates.
    ///
    /// # Errors
    ///
    /// Returns a domain error if the period is not strictly forward of the
    /// valuation date or is empty.
    pub fn period_rate(&self, start_date: Date, end_date: Date) -> PricingResult<f64> {
        self.check_period(start_date, end_date)?;
        self.forward_over(start_date, end_date)
    }

    fn check_period(&self, start_date: Date, end_date: Date) -> PricingResult<()> {
        if start_date < self.valuation_date() || start_date >= end_date {
            return Err(PricingError::domain(format!(
                "invalid forward period [{start_date}, {end_date}) for {} as of {}",
                self.index,
                self.valuation_date()
            )));
        }
        Ok(())
    }

    fn forward_over(&self, start: Date, end: Date) -> PricingResult<f64> {
        let af = self.index.day_count().year_fraction(start, end);
        let df_start = self.discount_factors.discount_factor(start)?;
        let df_end = self.discount_factors.discount_factor(end)?;
        Ok((df_start / df_end - 1.0) / af)
    }

    /// Point sensitivity of [`rate`](Self::rate): the identity for a
    /// forward-estimated rate, none for a recorded fixing.
    pub fn rate_point_sensitivity(&self, fixing_date: Date) -> PricingResult<PointSensitivityBuilder> {
        if fixing_date <= self.valuation_date() {
            if self.fixings.value_on(fixing_date).is_some() {
                return Ok(PointSensitivityBuilder::none());
            }
            if self.index.publication_date(fixing_date) < self.valuation_date() {
                return Err(PricingError::missing_fixing(self.index.name(), fixing_date));
            }
        }
        let (_, end) = self.index.accrual_period(fixing_date);
        Ok(PointSensitivityBuilder::of(PointSensitivity::new(
            SensitivityKey::OvernightRate {
                index: self.index,
                fixing_date,
                end_date: end,
            },
            self.index.currency(),
            1.0,
        )))
    }

    /// Point sensitivity of [`period_rate`](Self::period_rate).
    pub fn period_rate_point_sensitivity(
        &self,
        start_date: Date,
        end_date: Date,
    ) -> PricingResult<PointSensitivityBuilder> {
        self.check_period(start_date, end_date)?;
        Ok(PointSensitivityBuilder::of(PointSensitivity::new(
            SensitivityKey::OvernightRate {
                index: self.index,
                fixing_date: self.index.fixing_from_effective(start_date),
                end_date,
            },
            self.index.currency(),
            1.0,
        )))
    }

    /// Converts an overnight-rate point sensitivity into parameter
    /// sensitivities on the underlying discount curve by chain rule through
    /// the two discount factors defining the forward rate.
    pub fn parameter_sensitivity(
        &self,
        point: &PointSensitivity,
    ) -> PricingResult<CurrencyParameterSensitivity> {
        let (fixing_date, end) = match point.key {
            SensitivityKey::OvernightRate {
                index,
                fixing_date,
                end_date,
            } if index == self.index => (fixing_date, end_date),
            _ => {
                return Err(PricingError::UnroutableSensitivity {
                    key: point.key.describe(),
                    context: format!("overnight rates for {}", self.index),
                })
            }
        };
        let start = self.index.effective_date(fixing_date);
        chain_through_discount_factors(
            &self.discount_factors,
            self.index.day_count().year_fraction(start, end),
            start,
            end,
            point,
        )
    }

    /// Returns a copy with one discount curve parameter replaced.
    pub fn with_parameter(&self, index: usize, value: f64) -> PricingResult<Self> {
        Ok(Self {
            index: self.index,
            discount_factors: self.discount_factors.with_parameter(index, value)?,
            fixings: self.fixings.clone(),
        })
    }
}

/// Term index forward rates estimated from a discount curve.
#[derive(Debug, Clone)]
pub struct DiscountIborIndexRates {
    index: IborIndex,
    discount_factors: Arc<dyn DiscountFactors>,
    fixings: FixingSeries,
}

impl DiscountIborIndexRates {
    /// Creates a term rate source.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the discount curve currency differs
    /// from the index currency.
    pub fn new(
        index: IborIndex,
        discount_factors: Arc<dyn DiscountFactors>,
        fixings: FixingSeries,
    ) -> PricingResult<Self> {
        if discount_factors.currency() != index.currency() {
            return Err(PricingError::configuration(format!(
                "discount curve currency {} does not match index {}",
                discount_factors.currency(),
                index
            )));
        }
        Ok(Self {
            index,
            discount_factors,
            fixings,
        })
    }

    /// Returns the index.
    #[must_use]
    pub fn index(&self) -> IborIndex {
        self.index
    }

    /// Returns the valuation date.
    #[must_use]
    pub fn valuation_date(&self) -> Date {
        self.discount_factors.valuation_date()
    }

    /// Returns the underlying discount factors.
    #[must_use]
    pub fn discount_factors(&self) -> &Arc<dyn DiscountFactors> {
        &self.discount_factors
    }

    /// Returns the recorded fixings.
    #[must_use]
    pub fn fixings(&self) -> &FixingSeries {
        &self.fixings
    }

    /// Returns the rate for a resolved observation, recorded fixing first.
    ///
    /// On the valuation date itself a recorded fixing wins but its absence
    /// falls back to the forward estimate; strictly earlier fixing dates
    /// require a recorded fixing.
    pub fn rate(&self, observation: &IborRateObservation) -> PricingResult<f64> {
        if observation.fixing_date <= self.valuation_date() {
            if let Some(fixed) = self.fixings.value_on(observation.fixing_date) {
                return Ok(fixed);
            }
            if observation.fixing_date < self.valuation_date() {
                return Err(PricingError::missing_fixing(
                    self.index.name(),
                    observation.fixing_date,
                ));
            }
        }
        self.forward(observation)
    }

    fn forward(&self, observation: &IborRateObservation) -> PricingResult<f64> {
        let df_start = self.discount_factors.discount_factor(observation.effective_date)?;
        let df_end = self.discount_factors.discount_factor(observation.maturity_date)?;
        Ok((df_start / df_end - 1.0) / observation.year_fraction)
    }

    /// Point sensitivity of [`rate`](Self::rate).
    pub fn rate_point_sensitivity(
        &self,
        observation: &IborRateObservation,
    ) -> PricingResult<PointSensitivityBuilder> {
        if observation.fixing_date <= self.valuation_date() {
            if self.fixings.value_on(observation.fixing_date).is_some() {
                return Ok(PointSensitivityBuilder::none());
            }
            if observation.fixing_date < self.valuation_date() {
                return Err(PricingError::missing_fixing(
                    self.index.name(),
                    observation.fixing_date,
                ));
            }
        }
        Ok(PointSensitivityBuilder::of(PointSensitivity::new(
            SensitivityKey::IborRate {
                index: self.index,
                fixing_date: observation.fixing_date,
            },
            self.index.currency(),
            1.0,
        )))
    }

    /// Converts a term-rate point sensitivity into parameter sensitivities
    /// on the underlying discount curve.
    pub fn parameter_sensitivity(
        &self,
        point: &PointSensitivity,
    ) -> PricingResult<CurrencyParameterSensitivity> {
        let fixing_date = match point.key {
            SensitivityKey::IborRate { index, fixing_date } if index == self.index => fixing_date,
            _ => {
                return Err(PricingError::UnroutableSensitivity {
                    key: point.key.describe(),
                    context: format!("term rates for {}", self.index),
                })
            }
        };
        let observation = self.index.observation(fixing_date)?;
        chain_through_discount_factors(
            &self.discount_factors,
            observation.year_fraction,
            observation.effective_date,
            observation.maturity_date,
            point,
        )
    }

    /// Returns a copy with one discount curve parameter replaced.
    pub fn with_parameter(&self, index: usize, value: f64) -> PricingResult<Self> {
        Ok(Self {
            index: self.index,
            discount_factors: self.discount_factors.with_parameter(index, value)?,
            fixings: self.fixings.clone(),
        })
    }
}

/// Chain rule for a simply compounded forward rate
/// `R = (DF(start)/DF(end) - 1)/af` through the zero-rate sensitivities of
/// the two discount factors.
fn chain_through_discount_factors(
    discount_factors: &Arc<dyn DiscountFactors>,
    accrual_factor: f64,
    start: Date,
    end: Date,
    point: &PointSensitivity,
) -> PricingResult<CurrencyParameterSensitivity> {
    let df_start = discount_factors.discount_factor(start)?;
    let df_end = discount_factors.discount_factor(end)?;
    let d_rate_d_start = 1.0 / (accrual_factor * df_end);
    let d_rate_d_end = -df_start / (accrual_factor * df_end * df_end);

    let zero_start = discount_factors.zero_rate_point_sensitivity_in(start, point.currency)?;
    let zero_end = discount_factors.zero_rate_point_sensitivity_in(end, point.currency)?;

    let start_part = discount_factors
        .parameter_sensitivity(&zero_start.multiplied_by(point.value * d_rate_d_start))?;
    let end_part = discount_factors
        .parameter_sensitivity(&zero_end.multiplied_by(point.value * d_rate_d_end))?;
    start_part.plus(&end_part)
}

/// Price index values from a forward curve plus published monthly fixings.
///
/// The curve's x axis is whole months since the valuation month.
#[derive(Debug, Clone)]
pub struct SimplePriceIndexValues {
    index: PriceIndex,
    valuation_date: Date,
    curve: NodalCurve,
    fixings: BTreeMap<YearMonth, f64>,
}

impl SimplePriceIndexValues {
    /// Creates a price index source.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the curve value type is not
    /// `PriceIndex`.
    pub fn new(
        index: PriceIndex,
        valuation_date: Date,
        curve: NodalCurve,
        fixings: impl IntoIterator<Item = (YearMonth, f64)>,
    ) -> PricingResult<Self> {
        if curve.metadata().value_type() != tangent_curves::ValueType::PriceIndex {
            return Err(PricingError::configuration(format!(
                "curve '{}' has value type {}, expected PriceIndex",
                curve.name(),
                curve.metadata().value_type()
            )));
        }
        Ok(Self {
            index,
            valuation_date,
            curve,
            fixings: fixings.into_iter().collect(),
        })
    }

    /// Returns the index.
    #[must_use]
    pub fn index(&self) -> PriceIndex {
        self.index
    }

    /// Returns the valuation date.
    #[must_use]
    pub fn valuation_date(&self) -> Date {
        self.valuation_date
    }

    /// Returns the underlying forward curve.
    #[must_use]
    pub fn curve(&self) -> &NodalCurve {
        &self.curve
    }

    fn valuation_month(&self) -> YearMonth {
        YearMonth::from_date(self.valuation_date)
    }

    fn months_from_valuation(&self, month: YearMonth) -> f64 {
        f64::from(self.valuation_month().months_until(&month))
    }

    fn is_published(&self, month: YearMonth) -> bool {
        month.plus_months(self.index.publication_lag_months()) <= self.valuation_month()
    }

    /// Returns the index value for a reference month, published fixing
    /// first.
    ///
    /// # Errors
    ///
    /// Returns `MissingIndexValue` if the month's value should already be
    /// published but is not recorded.
    pub fn value(&self, month: YearMonth) -> PricingResult<f64> {
        if month <= self.valuation_month() {
            if let Some(fixed) = self.fixings.get(&month) {
                return Ok(*fixed);
            }
            if self.is_published(month) {
                return Err(PricingError::MissingIndexValue {
                    index: self.index.name(),
                    month,
                });
            }
        }
        Ok(self.curve.value_at(self.months_from_valuation(month))?)
    }

    /// Point sensitivity of [`value`](Self::value).
    pub fn value_point_sensitivity(&self, month: YearMonth) -> PricingResult<PointSensitivityBuilder> {
        if month <= self.valuation_month() {
            if self.fixings.contains_key(&month) {
                return Ok(PointSensitivityBuilder::none());
            }
            if self.is_published(month) {
                return Err(PricingError::MissingIndexValue {
                    index: self.index.name(),
                    month,
                });
            }
        }
        Ok(PointSensitivityBuilder::of(PointSensitivity::new(
            SensitivityKey::InflationRate {
                index: self.index,
                reference_month: month,
            },
            self.index.currency(),
            1.0,
        )))
    }

    /// Converts an inflation point sensitivity into parameter sensitivities
    /// on the forward curve.
    pub fn parameter_sensitivity(
        &self,
        point: &PointSensitivity,
    ) -> PricingResult<CurrencyParameterSensitivity> {
        let month = match point.key {
            SensitivityKey::InflationRate {
                index,
                reference_month,
            } if index == self.index => reference_month,
            _ => {
                return Err(PricingError::UnroutableSensitivity {
                    key: point.key.describe(),
                    context: format!("price index values for {}", self.index),
                })
            }
        };
        let row = self
            .curve
            .parameter_sensitivities(self.months_from_valuation(month), point.value)?;
        Ok(CurrencyParameterSensitivity::of(
            self.curve.name().clone(),
            point.currency,
            row,
        ))
    }

    /// Returns a copy with one forward curve parameter replaced.
    pub fn with_parameter(&self, index: usize, value: f64) -> PricingResult<Self> {
        Ok(Self {
            index: self.index,
            valuation_date: self.valuation_date,
            curve: self.curve.with_parameter(index, value)?,
            fixings: self.fixings.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tangent_core::daycounts::DayCountConvention;
    use tangent_core::types::Currency;
    use tangent_curves::{CurveMetadata, InterpolationMethod};

    use crate::discount::ZeroRateDiscountFactors;

    fn valuation() -> Date {
        // A Wednesday.
        Date::from_ymd(2014, 1, 22).unwrap()
    }

    fn usd_discount_factors() -> Arc<dyn DiscountFactors> {
        let curve = NodalCurve::new(
            CurveMetadata::zero_rate("USD-Fwd", DayCountConvention::Act365Fixed),
            vec![0.05, 0.5, 1.0, 5.0],
            vec![0.0010, 0.0015, 0.0020, 0.0080],
            InterpolationMethod::Linear,
        )
        .unwrap();
        Arc::new(ZeroRateDiscountFactors::new(Currency::Usd, valuation(), curve).unwrap())
    }

    fn fed_fund_rates(fixings: FixingSeries) -> DiscountOvernightIndexRates {
        DiscountOvernightIndexRates::new(OvernightIndex::UsdFedFund, usd_discount_factors(), fixings)
            .unwrap()
    }

    #[test]
    fn test_recorded_fixing_wins() {
        let monday = Date::from_ymd(2014, 1, 20).unwrap();
        let rates = fed_fund_rates(FixingSeries::of([(monday, 0.0009)]));
        assert_relative_eq!(rates.rate(monday).unwrap(), 0.0009);
        // Recorded fixings carry no sensitivity.
        assert_eq!(
            rates.rate_point_sensitivity(monday).unwrap(),
            PointSensitivityBuilder::none()
        );
    }

    #[test]
    fn test_missing_published_fixing_errors() {
        let monday = Date::from_ymd(2014, 1, 20).unwrap();
        let rates = fed_fund_rates(FixingSeries::empty());
        assert!(matches!(
            rates.rate(monday),
            Err(PricingError::MissingFixing { .. })
        ));
        assert!(rates.rate_point_sensitivity(monday).is_err());
    }

    #[test]
    fn test_publication_lag_allows_forward_on_valuation_eve() {
        // Fed Funds publishes one business day in arrears: the fixing for
        // the Tuesday before a Wednesday valuation lands on the valuation
        // date itself, so its absence falls back to the forward estimate.
        let tuesday = Date::from_ymd(2014, 1, 21).unwrap();
        let rates = fed_fund_rates(FixingSeries::empty());
        assert!(rates.rate(tuesday).is_ok());

        // SONIA publishes same-day, so Tuesday's fixing is mandatory on
        // Wednesday while the valuation-day fixing is still optional.
        let sonia_curve = NodalCurve::new(
            CurveMetadata::zero_rate("GBP-Fwd", DayCountConvention::Act365Fixed),
            vec![0.05, 1.0],
            vec![0.004, 0.005],
            InterpolationMethod::Linear,
        )
        .unwrap();
        let sonia = DiscountOvernightIndexRates::new(
            OvernightIndex::GbpSonia,
            Arc::new(ZeroRateDiscountFactors::new(Currency::Gbp, valuation(), sonia_curve).unwrap()),
            FixingSeries::empty(),
        )
        .unwrap();
        assert!(sonia.rate(tuesday).is_err());
        assert!(sonia.rate(valuation()).is_ok());
    }

    #[test]
    fn test_forward_rate_matches_discount_factors() {
        let rates = fed_fund_rates(FixingSeries::empty());
        let fixing = valuation().add_days(30).next_weekday();
        let (start, end) = OvernightIndex::UsdFedFund.accrual_period(fixing);
        let dfs = rates.discount_factors();
        let af = OvernightIndex::UsdFedFund.day_count().year_fraction(start, end);
        let expected = (dfs.discount_factor(start).unwrap() / dfs.discount_factor(end).unwrap()
            - 1.0)
            / af;
        assert_relative_eq!(rates.rate(fixing).unwrap(), expected, epsilon = 1e-15);
    }

    #[test]
    fn test_period_rate_validation() {
        let rates = fed_fund_rates(FixingSeries::empty());
        let start = valuation().add_days(10);
        assert!(rates.period_rate(start, start).is_err());
        assert!(rates
            .period_rate(valuation().add_days(-5), start)
            .is_err());
        assert!(rates.period_rate(start, start.add_days(30)).is_ok());
    }

    #[test]
    fn test_overnight_parameter_sensitivity_matches_bump() {
        let rates = fed_fund_rates(FixingSeries::empty());
        let fixing = valuation().add_days(60).next_weekday();
        let builder = rates.rate_point_sensitivity(fixing).unwrap();
        let built = builder.build().normalized();
        assert_eq!(built.len(), 1);
        let param = rates.parameter_sensitivity(&built.sensitivities()[0]).unwrap();

        let eps = 1e-7;
        for i in 0..rates.discount_factors().parameter_count() {
            let v = rates.discount_factors().curve().values()[i];
            let up = rates.with_parameter(i, v + eps).unwrap();
            let down = rates.with_parameter(i, v - eps).unwrap();
            let fd = (up.rate(fixing).unwrap() - down.rate(fixing).unwrap()) / (2.0 * eps);
            assert_relative_eq!(param.sensitivity()[i], fd, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_ibor_rate_and_sensitivity() {
        let curve = NodalCurve::new(
            CurveMetadata::zero_rate("USD-Libor3M", DayCountConvention::Act365Fixed),
            vec![0.05, 0.5, 1.0, 5.0],
            vec![0.0020, 0.0025, 0.0030, 0.0090],
            InterpolationMethod::Linear,
        )
        .unwrap();
        let rates = DiscountIborIndexRates::new(
            IborIndex::UsdLibor3M,
            Arc::new(ZeroRateDiscountFactors::new(Currency::Usd, valuation(), curve).unwrap()),
            FixingSeries::empty(),
        )
        .unwrap();

        let obs = IborIndex::UsdLibor3M
            .observation(valuation().add_days(30).next_weekday())
            .unwrap();
        let rate = rates.rate(&obs).unwrap();
        assert!(rate > 0.0 && rate < 0.02);

        // Elapsed fixing without a record is an error.
        let past = IborIndex::UsdLibor3M
            .observation(Date::from_ymd(2014, 1, 20).unwrap())
            .unwrap();
        assert!(matches!(
            rates.rate(&past),
            Err(PricingError::MissingFixing { .. })
        ));

        let built = rates.rate_point_sensitivity(&obs).unwrap().build().normalized();
        let param = rates.parameter_sensitivity(&built.sensitivities()[0]).unwrap();
        let eps = 1e-7;
        for i in 0..rates.discount_factors().parameter_count() {
            let v = rates.discount_factors().curve().values()[i];
            let up = rates.with_parameter(i, v + eps).unwrap();
            let down = rates.with_parameter(i, v - eps).unwrap();
            let fd = (up.rate(&obs).unwrap() - down.rate(&obs).unwrap()) / (2.0 * eps);
            assert_relative_eq!(param.sensitivity()[i], fd, epsilon = 1e-6);
        }
    }

    fn cpi_values() -> SimplePriceIndexValues {
        let curve = NodalCurve::new(
            CurveMetadata::price_index("US-CPI-U"),
            vec![1.0, 6.0, 12.0, 24.0],
            vec![236.0, 237.5, 239.2, 243.0],
            InterpolationMethod::LogLinear,
        )
        .unwrap();
        SimplePriceIndexValues::new(
            PriceIndex::UsCpiU,
            valuation(),
            curve,
            [
                (YearMonth::of(2013, 9).unwrap(), 234.1),
                (YearMonth::of(2013, 10).unwrap(), 233.5),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_price_index_fixing_priority() {
        let values = cpi_values();
        let sep = YearMonth::of(2013, 9).unwrap();
        assert_relative_eq!(values.value(sep).unwrap(), 234.1);
        assert_eq!(
            values.value_point_sensitivity(sep).unwrap(),
            PointSensitivityBuilder::none()
        );

        // August 2013 is published (lag 3) but unrecorded.
        let aug = YearMonth::of(2013, 8).unwrap();
        assert!(matches!(
            values.value(aug),
            Err(PricingError::MissingIndexValue { .. })
        ));
    }

    #[test]
    fn test_price_index_forward_from_curve() {
        let values = cpi_values();
        let month = YearMonth::of(2014, 7).unwrap(); // 6 months out
        assert_relative_eq!(values.value(month).unwrap(), 237.5, epsilon = 1e-12);

        let built = values
            .value_point_sensitivity(month)
            .unwrap()
            .build()
            .normalized();
        let param = values.parameter_sensitivity(&built.sensitivities()[0]).unwrap();
        assert_eq!(param.sensitivity().len(), 4);
        // At a node the weight concentrates there.
        assert_relative_eq!(param.sensitivity()[1], 1.0, epsilon = 1e-12);
    }
}
