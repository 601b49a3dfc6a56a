//! Arithmetically averaged overnight rate computation.

use tangent_core::types::Date;

use crate::compute::{
    effective_cutoff, first_forward_index, observed_index, overnight_schedule, ExplainedRate,
    ExplainedRateEntry, RateComputation, RateSource, SubObservation,
};
use crate::error::PricingResult;
use crate::index::OvernightIndex;
use crate::index_rates::DiscountOvernightIndexRates;
use crate::provider::RatesProvider;
use crate::sensitivity::PointSensitivityBuilder;

/// An arithmetically averaged overnight observation over `[start, end)`.
///
/// The blended rate is the accrual-factor-weighted mean of the daily rates.
/// With `approximate_forward` the forward region is collapsed into one
/// aggregate period rate and re-expressed through the logarithmic transform
/// `ln(1 + R·af)`, which agrees with the exact daily loop to second order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OvernightAveragedRateComputation {
    index: OvernightIndex,
    start_date: Date,
    end_date: Date,
    rate_cutoff: usize,
    approximate_forward: bool,
}

impl OvernightAveragedRateComputation {
    /// Creates an averaged overnight computation.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the period is empty or its
    /// boundaries fall on weekends.
    pub fn new(
        index: OvernightIndex,
        start_date: Date,
        end_date: Date,
        rate_cutoff: usize,
    ) -> PricingResult<Self> {
        overnight_schedule(index, start_date, end_date)?;
        Ok(Self {
            index,
            start_date,
            end_date,
            rate_cutoff,
            approximate_forward: false,
        })
    }

    /// Selects the approximate or exact forward-region evaluation.
    #[must_use]
    pub fn with_approximate_forward(self, approximate_forward: bool) -> Self {
        Self {
            approximate_forward,
            ..self
        }
    }

    /// Returns the observed index.
    #[must_use]
    pub fn index(&self) -> OvernightIndex {
        self.index
    }

    /// Returns the rate cutoff in business days.
    #[must_use]
    pub fn rate_cutoff(&self) -> usize {
        self.rate_cutoff
    }

    fn schedule(&self) -> PricingResult<(Vec<SubObservation>, usize)> {
        let subs = overnight_schedule(self.index, self.start_date, self.end_date)?;
        let cutoff = effective_cutoff(self.rate_cutoff, subs.len())?;
        Ok((subs, cutoff))
    }

    fn rate_exact(&self, rates: &DiscountOvernightIndexRates) -> PricingResult<f64> {
        let (subs, cutoff) = self.schedule()?;
        let n = subs.len();
        let mut accrued = 0.0;
        let mut total_af = 0.0;
        for (i, sub) in subs.iter().enumerate() {
            let observed = &subs[observed_index(i, n, cutoff)];
            accrued += rates.rate(observed.fixing_date)? * sub.accrual_factor;
            total_af += sub.accrual_factor;
        }
        Ok(accrued / total_af)
    }

    fn rate_approximate(&self, rates: &DiscountOvernightIndexRates) -> PricingResult<f64> {
        let (subs, cutoff) = self.schedule()?;
        let n = subs.len();
        let own = n - (cutoff - 1);
        let total_af: f64 = subs.iter().map(|s| s.accrual_factor).sum();

        let mut accrued = 0.0;
        let first_forward = first_forward_index(rates, &subs, own)?;
        for sub in &subs[..first_forward] {
            accrued += rates.rate(sub.fixing_date)? * sub.accrual_factor;
        }
        // Forward deposits whose period starts before valuation cannot go
        // through the aggregate period query; loop them daily.
        let mut cursor = first_forward;
        while cursor < own && subs[cursor].start_date < rates.valuation_date() {
            accrued += rates.rate(subs[cursor].fixing_date)? * subs[cursor].accrual_factor;
            cursor += 1;
        }
        if cursor < own {
            let period_start = subs[cursor].start_date;
            let period_end = subs[own - 1].end_date;
            let forward_af: f64 = subs[cursor..own].iter().map(|s| s.accrual_factor).sum();
            let period_rate = rates.period_rate(period_start, period_end)?;
            accrued += (1.0 + period_rate * forward_af).ln();
        }
        if cutoff > 1 {
            let frozen = rates.rate(subs[n - cutoff].fixing_date)?;
            let tail_af: f64 = subs[own..].iter().map(|s| s.accrual_factor).sum();
            accrued += frozen * tail_af;
        }
        Ok(accrued / total_af)
    }

    fn sensitivity_exact(
        &self,
        rates: &DiscountOvernightIndexRates,
    ) -> PricingResult<PointSensitivityBuilder> {
        let (subs, cutoff) = self.schedule()?;
        let n = subs.len();
        let total_af: f64 = subs.iter().map(|s| s.accrual_factor).sum();
        let mut builder = PointSensitivityBuilder::none();
        for (i, sub) in subs.iter().enumerate() {
            let observed = &subs[observed_index(i, n, cutoff)];
            let part = rates.rate_point_sensitivity(observed.fixing_date)?;
            builder = builder.combined_with(part.multiplied_by(sub.accrual_factor / total_af));
        }
        Ok(builder)
    }

    fn sensitivity_approximate(
        &self,
        rates: &DiscountOvernightIndexRates,
    ) -> PricingResult<PointSensitivityBuilder> {
        let (subs, cutoff) = self.schedule()?;
        let n = subs.len();
        let own = n - (cutoff - 1);
        let total_af: f64 = subs.iter().map(|s| s.accrual_factor).sum();

        let mut builder = PointSensitivityBuilder::none();
        let first_forward = first_forward_index(rates, &subs, own)?;
        let mut cursor = first_forward;
        while cursor < own && subs[cursor].start_date < rates.valuation_date() {
            let part = rates.rate_point_sensitivity(subs[cursor].fixing_date)?;
            builder = builder
                .combined_with(part.multiplied_by(subs[cursor].accrual_factor / total_af));
            cursor += 1;
        }
        if cursor < own {
            let period_start = subs[cursor].start_date;
            let period_end = subs[own - 1].end_date;
            let forward_af: f64 = subs[cursor..own].iter().map(|s| s.accrual_factor).sum();
            let period_rate = rates.period_rate(period_start, period_end)?;
            let weight = forward_af / (1.0 + period_rate * forward_af) / total_af;
            let part = rates.period_rate_point_sensitivity(period_start, period_end)?;
            builder = builder.combined_with(part.multiplied_by(weight));
        }
        if cutoff > 1 {
            let tail_af: f64 = subs[own..].iter().map(|s| s.accrual_factor).sum();
            let part = rates.rate_point_sensitivity(subs[n - cutoff].fixing_date)?;
            builder = builder.combined_with(part.multiplied_by(tail_af / total_af));
        }
        Ok(builder)
    }
}

impl RateComputation for OvernightAveragedRateComputation {
    fn rate(&self, provider: &RatesProvider) -> PricingResult<f64> {
        let rates = provider.overnight_index_rates(self.index)?;
        if self.approximate_forward {
            self.rate_approximate(rates)
        } else {
            self.rate_exact(rates)
        }
    }

    fn rate_sensitivity(
        &self,
        provider: &RatesProvider,
    ) -> PricingResult<PointSensitivityBuilder> {
        let rates = provider.overnight_index_rates(self.index)?;
        if self.approximate_forward {
            self.sensitivity_approximate(rates)
        } else {
            self.sensitivity_exact(rates)
        }
    }

    fn explain_rate(&self, provider: &RatesProvider) -> PricingResult<ExplainedRate> {
        let rates = provider.overnight_index_rates(self.index)?;
        let (subs, cutoff) = self.schedule()?;
        let n = subs.len();
        let own = n - (cutoff - 1);
        let mut entries = Vec::with_capacity(n);
        for (i, sub) in subs.iter().enumerate() {
            let observed = &subs[observed_index(i, n, cutoff)];
            let source = if i >= own {
                RateSource::RateCutoff
            } else if sub.fixing_date <= rates.valuation_date()
                && rates.fixings().value_on(sub.fixing_date).is_some()
            {
                RateSource::HistoricFixing
            } else {
                RateSource::Forward
            };
            entries.push(ExplainedRateEntry {
                fixing_date: observed.fixing_date,
                start_date: sub.start_date,
                end_date: sub.end_date,
                rate: rates.rate(observed.fixing_date)?,
                accrual_factor: sub.accrual_factor,
                source,
            });
        }
        Ok(ExplainedRate::new(self.rate(provider)?, entries))
    }
}
