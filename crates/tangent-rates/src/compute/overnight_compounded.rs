//! Geometrically compounded overnight rate computation.

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

/// A geometrically compounded overnight observation over `[start, end)`.
///
/// The blended rate is `(prod(1 + r_i * af_i) - 1) / total_af`. With
/// `approximate_forward` the forward region is covered by one aggregate
/// period rate, which reproduces the exact daily product because the
/// aggregate forward telescopes through the same discount factors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OvernightCompoundedRateComputation {
    index: OvernightIndex,
    start_date: Date,
    end_date: Date,
    rate_cutoff: usize,
    approximate_forward: bool,
}

impl OvernightCompoundedRateComputation {
    /// Creates a compounded overnight computation.
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
        let mut growth = 1.0;
        let mut total_af = 0.0;
        for (i, sub) in subs.iter().enumerate() {
            let observed = &subs[observed_index(i, n, cutoff)];
            growth *= 1.0 + rates.rate(observed.fixing_date)? * sub.accrual_factor;
            total_af += sub.accrual_factor;
        }
        Ok((growth - 1.0) / total_af)
    }

    /// Growth factors of the three regions: recorded fixings, a pre-valuation
    /// forward remainder looped daily, the aggregate forward period, and the
    /// frozen cutoff tail. Also reports the forward query bounds.
    fn growth_parts(
        &self,
        rates: &DiscountOvernightIndexRates,
    ) -> PricingResult<GrowthParts> {
        let (subs, cutoff) = self.schedule()?;
        let n = subs.len();
        let own = n - (cutoff - 1);
        let total_af: f64 = subs.iter().map(|s| s.accrual_factor).sum();

        let mut historic = 1.0;
        let first_forward = first_forward_index(rates, &subs, own)?;
        for sub in &subs[..first_forward] {
            historic *= 1.0 + rates.rate(sub.fixing_date)? * sub.accrual_factor;
        }
        // Forward deposits starting before valuation are outside the
        // aggregate period query; loop them daily.
        let mut cursor = first_forward;
        let mut pre_forward = Vec::new();
        while cursor < own && subs[cursor].start_date < rates.valuation_date() {
            pre_forward.push(subs[cursor]);
            cursor += 1;
        }
        let forward = if cursor < own {
            let period_start = subs[cursor].start_date;
            let period_end = subs[own - 1].end_date;
            let forward_af: f64 = subs[cursor..own].iter().map(|s| s.accrual_factor).sum();
            let period_rate = rates.period_rate(period_start, period_end)?;
            Some(ForwardRegion {
                start: period_start,
                end: period_end,
                accrual_factor: forward_af,
                rate: period_rate,
            })
        } else {
            None
        };
        let tail = if cutoff > 1 {
            Some(CutoffTail {
                fixing_date: subs[n - cutoff].fixing_date,
                accrual_factors: subs[own..].iter().map(|s| s.accrual_factor).collect(),
            })
        } else {
            None
        };
        Ok(GrowthParts {
            total_af,
            historic,
            pre_forward,
            forward,
            tail,
        })
    }

    fn rate_approximate(&self, rates: &DiscountOvernightIndexRates) -> PricingResult<f64> {
        let parts = self.growth_parts(rates)?;
        let mut growth = parts.historic;
        for sub in &parts.pre_forward {
            growth *= 1.0 + rates.rate(sub.fixing_date)? * sub.accrual_factor;
        }
        if let Some(forward) = &parts.forward {
            growth *= 1.0 + forward.rate * forward.accrual_factor;
        }
        if let Some(tail) = &parts.tail {
            let frozen = rates.rate(tail.fixing_date)?;
            for af in &tail.accrual_factors {
                growth *= 1.0 + frozen * af;
            }
        }
        Ok((growth - 1.0) / parts.total_af)
    }

    fn sensitivity_exact(
        &self,
        rates: &DiscountOvernightIndexRates,
    ) -> PricingResult<PointSensitivityBuilder> {
        let (subs, cutoff) = self.schedule()?;
        let n = subs.len();
        let total_af: f64 = subs.iter().map(|s| s.accrual_factor).sum();

        // d rate / d r_i = (G / (1 + r_i af_i)) * af_i / total_af where G is
        // the full growth product. Duplicate keys from a frozen tail merge in
        // the builder.
        let mut terms = Vec::with_capacity(n);
        let mut growth = 1.0;
        for (i, sub) in subs.iter().enumerate() {
            let observed = &subs[observed_index(i, n, cutoff)];
            let term = 1.0 + rates.rate(observed.fixing_date)? * sub.accrual_factor;
            growth *= term;
            terms.push((observed.fixing_date, term, sub.accrual_factor));
        }
        let mut builder = PointSensitivityBuilder::none();
        for (fixing_date, term, af) in terms {
            let weight = growth / term * af / total_af;
            let part = rates.rate_point_sensitivity(fixing_date)?;
            builder = builder.combined_with(part.multiplied_by(weight));
        }
        Ok(builder)
    }

    fn sensitivity_approximate(
        &self,
        rates: &DiscountOvernightIndexRates,
    ) -> PricingResult<PointSensitivityBuilder> {
        let parts = self.growth_parts(rates)?;

        let mut pre_terms = Vec::with_capacity(parts.pre_forward.len());
        let mut growth = parts.historic;
        for sub in &parts.pre_forward {
            let term = 1.0 + rates.rate(sub.fixing_date)? * sub.accrual_factor;
            growth *= term;
            pre_terms.push((sub.fixing_date, term, sub.accrual_factor));
        }
        let forward_term = parts
            .forward
            .as_ref()
            .map(|f| 1.0 + f.rate * f.accrual_factor)
            .unwrap_or(1.0);
        growth *= forward_term;
        let mut tail_terms = Vec::new();
        if let Some(tail) = &parts.tail {
            let frozen = rates.rate(tail.fixing_date)?;
            for af in &tail.accrual_factors {
                let term = 1.0 + frozen * af;
                growth *= term;
                tail_terms.push((term, *af));
            }
        }

        let mut builder = PointSensitivityBuilder::none();
        for (fixing_date, term, af) in pre_terms {
            let weight = growth / term * af / parts.total_af;
            let part = rates.rate_point_sensitivity(fixing_date)?;
            builder = builder.combined_with(part.multiplied_by(weight));
        }
        if let Some(forward) = &parts.forward {
            let weight = growth / forward_term * forward.accrual_factor / parts.total_af;
            let part = rates.period_rate_point_sensitivity(forward.start, forward.end)?;
            builder = builder.combined_with(part.multiplied_by(weight));
        }
        if let Some(tail) = &parts.tail {
            // The frozen rate enters every tail term; sum the per-term
            // derivatives of the product.
            let weight: f64 = tail_terms
                .iter()
                .map(|(term, af)| growth / term * af)
                .sum::<f64>()
                / parts.total_af;
            let part = rates.rate_point_sensitivity(tail.fixing_date)?;
            builder = builder.combined_with(part.multiplied_by(weight));
        }
        Ok(builder)
    }
}

struct ForwardRegion {
    start: Date,
    end: Date,
    accrual_factor: f64,
    rate: f64,
}

struct CutoffTail {
    fixing_date: Date,
    accrual_factors: Vec<f64>,
}

struct GrowthParts {
    total_af: f64,
    historic: f64,
    pre_forward: Vec<SubObservation>,
    forward: Option<ForwardRegion>,
    tail: Option<CutoffTail>,
}

impl RateComputation for OvernightCompoundedRateComputation {
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

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::sync::Arc;
    use tangent_core::daycounts::DayCountConvention;
    use tangent_curves::{CurveMetadata, InterpolationMethod, NodalCurve};

    use crate::discount::{DiscountFactors, ZeroRateDiscountFactors};
    use crate::error::PricingError;
    use crate::fixings::FixingSeries;

    fn valuation() -> Date {
        // Wednesday.
        Date::from_ymd(2014, 1, 22).unwrap()
    }

    fn provider_with(index: OvernightIndex, fixings: FixingSeries) -> RatesProvider {
        let curve = NodalCurve::new(
            CurveMetadata::zero_rate("ON-Fwd", DayCountConvention::Act365Fixed),
            vec![0.01, 0.25, 1.0, 5.0],
            vec![0.0010, 0.0014, 0.0022, 0.0080],
            InterpolationMethod::Linear,
        )
        .unwrap();
        let dfs: Arc<dyn DiscountFactors> = Arc::new(
            ZeroRateDiscountFactors::new(index.currency(), valuation(), curve).unwrap(),
        );
        let rates = DiscountOvernightIndexRates::new(index, dfs, fixings).unwrap();
        RatesProvider::builder(valuation())
            .overnight_index_rates(rates)
            .unwrap()
            .build()
    }

    fn historic_fixings() -> FixingSeries {
        let mut series = FixingSeries::empty();
        let mut date = Date::from_ymd(2014, 1, 6).unwrap();
        let mut rate = 0.00080;
        while date <= valuation() {
            series = series.with_fixing(date, rate);
            rate += 0.00001;
            date = date.add_business_days(1);
        }
        series
    }

    #[test]
    fn test_forward_only_exact_matches_approximate() {
        // The aggregate forward telescopes through the same discount curve,
        // so without a cutoff the two evaluations agree almost exactly.
        let provider = provider_with(OvernightIndex::GbpSonia, FixingSeries::empty());
        let start = Date::from_ymd(2014, 2, 3).unwrap();
        let end = Date::from_ymd(2014, 3, 3).unwrap();
        let comp = OvernightCompoundedRateComputation::new(OvernightIndex::GbpSonia, start, end, 0)
            .unwrap();
        let r_exact = comp.rate(&provider).unwrap();
        let r_approx = comp.with_approximate_forward(true).rate(&provider).unwrap();
        assert_relative_eq!(r_exact, r_approx, epsilon = 1e-9);
    }

    #[test]
    fn test_spanning_period_blends_fixed_and_forward() {
        let provider = provider_with(OvernightIndex::GbpSonia, historic_fixings());
        let start = Date::from_ymd(2014, 1, 13).unwrap();
        let end = Date::from_ymd(2014, 2, 13).unwrap();
        let comp = OvernightCompoundedRateComputation::new(OvernightIndex::GbpSonia, start, end, 0)
            .unwrap();
        let r_exact = comp.rate(&provider).unwrap();
        let r_approx = comp.with_approximate_forward(true).rate(&provider).unwrap();
        assert_relative_eq!(r_exact, r_approx, epsilon = 1e-9);

        let explained = comp.explain_rate(&provider).unwrap();
        assert!(explained
            .entries()
            .iter()
            .any(|e| e.source == RateSource::HistoricFixing));
        assert!(explained
            .entries()
            .iter()
            .any(|e| e.source == RateSource::Forward));
    }

    #[test]
    fn test_compounding_exceeds_averaging_of_same_rates() {
        let provider = provider_with(OvernightIndex::GbpSonia, FixingSeries::empty());
        let start = Date::from_ymd(2014, 2, 3).unwrap();
        let end = Date::from_ymd(2015, 2, 3).unwrap();
        let compounded =
            OvernightCompoundedRateComputation::new(OvernightIndex::GbpSonia, start, end, 0)
                .unwrap()
                .rate(&provider)
                .unwrap();
        let averaged = crate::compute::OvernightAveragedRateComputation::new(
            OvernightIndex::GbpSonia,
            start,
            end,
            0,
        )
        .unwrap()
        .rate(&provider)
        .unwrap();
        assert!(compounded > averaged);
        assert_relative_eq!(compounded, averaged, epsilon = 1e-4);
    }

    #[test]
    fn test_rate_cutoff_freezes_tail() {
        let provider = provider_with(OvernightIndex::GbpSonia, FixingSeries::empty());
        let start = Date::from_ymd(2014, 2, 3).unwrap();
        let end = Date::from_ymd(2014, 2, 17).unwrap();
        let cut = OvernightCompoundedRateComputation::new(OvernightIndex::GbpSonia, start, end, 2)
            .unwrap();
        let plain = OvernightCompoundedRateComputation::new(OvernightIndex::GbpSonia, start, end, 0)
            .unwrap();
        // Freezing replaces the last forward fixing with an earlier one;
        // rates differ but only slightly on an upward-sloping curve.
        let r_cut = cut.rate(&provider).unwrap();
        let r_plain = plain.rate(&provider).unwrap();
        assert!(r_cut != r_plain);
        assert_relative_eq!(r_cut, r_plain, epsilon = 1e-4);

        // Both evaluations honor the cutoff.
        let r_cut_approx = cut.with_approximate_forward(true).rate(&provider).unwrap();
        assert_relative_eq!(r_cut, r_cut_approx, epsilon = 1e-9);

        let explained = cut.explain_rate(&provider).unwrap();
        let entries = explained.entries();
        assert_eq!(entries[entries.len() - 1].source, RateSource::RateCutoff);
    }

    #[test]
    fn test_missing_fixing_is_an_error() {
        let provider = provider_with(OvernightIndex::GbpSonia, FixingSeries::empty());
        let start = Date::from_ymd(2014, 1, 13).unwrap();
        let end = Date::from_ymd(2014, 2, 13).unwrap();
        let comp = OvernightCompoundedRateComputation::new(OvernightIndex::GbpSonia, start, end, 0)
            .unwrap();
        assert!(matches!(
            comp.rate(&provider),
            Err(PricingError::MissingFixing { .. })
        ));
        assert!(matches!(
            comp.with_approximate_forward(true).rate_sensitivity(&provider),
            Err(PricingError::MissingFixing { .. })
        ));
    }
}
