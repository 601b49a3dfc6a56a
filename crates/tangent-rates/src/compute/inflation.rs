//! Month-interpolated inflation rate computation.

use tangent_core::types::YearMonth;

use crate::compute::{ExplainedRate, ExplainedRateEntry, RateComputation, RateSource};
use crate::error::{PricingError, PricingResult};
use crate::index::PriceIndex;
use crate::index_rates::SimplePriceIndexValues;
use crate::provider::RatesProvider;
use crate::sensitivity::PointSensitivityBuilder;

/// An inflation rate from month-pair interpolated index values.
///
/// Each endpoint blends two consecutive reference months with a fixed
/// weight, `I = w * v(month) + (1 - w) * v(month + 1)`, and the rate is the
/// relative change `I_end / I_start - 1`. The weight usually encodes the
/// day-of-month position of the payment date and applies to both endpoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InflationInterpolatedRateComputation {
    index: PriceIndex,
    start_first: YearMonth,
    start_second: YearMonth,
    end_first: YearMonth,
    end_second: YearMonth,
    weight: f64,
}

impl InflationInterpolatedRateComputation {
    /// Creates an interpolated computation between two reference months.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the weight is outside `[0, 1]` or
    /// the start month is not strictly before the end month.
    pub fn new(
        index: PriceIndex,
        start_month: YearMonth,
        end_month: YearMonth,
        weight: f64,
    ) -> PricingResult<Self> {
        if !(0.0..=1.0).contains(&weight) {
            return Err(PricingError::configuration(format!(
                "interpolation weight {weight} outside [0, 1]"
            )));
        }
        if start_month >= end_month {
            return Err(PricingError::configuration(format!(
                "inflation reference months out of order: {start_month} to {end_month}"
            )));
        }
        Ok(Self {
            index,
            start_first: start_month,
            start_second: start_month.plus_months(1),
            end_first: end_month,
            end_second: end_month.plus_months(1),
            weight,
        })
    }

    /// Returns the observed index.
    #[must_use]
    pub fn index(&self) -> PriceIndex {
        self.index
    }

    /// Returns the interpolation weight on the first month of each pair.
    #[must_use]
    pub fn weight(&self) -> f64 {
        self.weight
    }

    fn blended(&self, values: &SimplePriceIndexValues, first: YearMonth, second: YearMonth)
        -> PricingResult<f64> {
        Ok(self.weight * values.value(first)? + (1.0 - self.weight) * values.value(second)?)
    }

    fn blended_sensitivity(
        &self,
        values: &SimplePriceIndexValues,
        first: YearMonth,
        second: YearMonth,
        scale: f64,
    ) -> PricingResult<PointSensitivityBuilder> {
        let first_part = values
            .value_point_sensitivity(first)?
            .multiplied_by(self.weight * scale);
        let second_part = values
            .value_point_sensitivity(second)?
            .multiplied_by((1.0 - self.weight) * scale);
        Ok(first_part.combined_with(second_part))
    }
}

impl RateComputation for InflationInterpolatedRateComputation {
    fn rate(&self, provider: &RatesProvider) -> PricingResult<f64> {
        let values = provider.price_index_values(self.index)?;
        let start = self.blended(values, self.start_first, self.start_second)?;
        let end = self.blended(values, self.end_first, self.end_second)?;
        Ok(end / start - 1.0)
    }

    fn rate_sensitivity(
        &self,
        provider: &RatesProvider,
    ) -> PricingResult<PointSensitivityBuilder> {
        let values = provider.price_index_values(self.index)?;
        let start = self.blended(values, self.start_first, self.start_second)?;
        let end = self.blended(values, self.end_first, self.end_second)?;

        // d rate / d I_end = 1 / I_start, d rate / d I_start = -I_end / I_start^2,
        // each distributed over its month pair by the blend weights.
        let end_part =
            self.blended_sensitivity(values, self.end_first, self.end_second, 1.0 / start)?;
        let start_part = self.blended_sensitivity(
            values,
            self.start_first,
            self.start_second,
            -end / (start * start),
        )?;
        Ok(end_part.combined_with(start_part))
    }

    fn explain_rate(&self, provider: &RatesProvider) -> PricingResult<ExplainedRate> {
        let values = provider.price_index_values(self.index)?;
        let months = [
            (self.start_first, self.weight),
            (self.start_second, 1.0 - self.weight),
            (self.end_first, self.weight),
            (self.end_second, 1.0 - self.weight),
        ];
        let mut entries = Vec::with_capacity(months.len());
        for (month, weight) in months {
            let recorded = values.value_point_sensitivity(month)? == PointSensitivityBuilder::none();
            let day = month.first_day()?;
            entries.push(ExplainedRateEntry {
                fixing_date: day,
                start_date: day,
                end_date: month.plus_months(1).first_day()?,
                rate: values.value(month)?,
                accrual_factor: weight,
                source: if recorded {
                    RateSource::HistoricFixing
                } else {
                    RateSource::Forward
                },
            });
        }
        Ok(ExplainedRate::new(self.rate(provider)?, entries))
    }
}
