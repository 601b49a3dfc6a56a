//! Weighted average of term rate observations.

use crate::compute::{ExplainedRate, ExplainedRateEntry, RateComputation, RateSource};
use crate::error::{PricingError, PricingResult};
use crate::index::{IborIndex, IborRateObservation};
use crate::provider::RatesProvider;
use crate::sensitivity::PointSensitivityBuilder;

/// A weight-averaged set of term rate observations on one index.
///
/// Used for stub and averaged-reset accruals where a single period blends
/// several fixings, each with an explicit weight.
#[derive(Debug, Clone, PartialEq)]
pub struct IborAveragedRateComputation {
    index: IborIndex,
    observations: Vec<(IborRateObservation, f64)>,
}

impl IborAveragedRateComputation {
    /// Creates an averaged computation from `(observation, weight)` pairs.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if there are no observations, a weight
    /// is not positive, or an observation belongs to a different index.
    pub fn new(
        index: IborIndex,
        observations: Vec<(IborRateObservation, f64)>,
    ) -> PricingResult<Self> {
        if observations.is_empty() {
            return Err(PricingError::configuration(format!(
                "averaged {index} computation needs at least one observation"
            )));
        }
        for (observation, weight) in &observations {
            if observation.index != index {
                return Err(PricingError::configuration(format!(
                    "observation on {} mixed into an averaged {index} computation",
                    observation.index
                )));
            }
            if !weight.is_finite() || *weight <= 0.0 {
                return Err(PricingError::configuration(format!(
                    "non-positive weight {weight} in averaged {index} computation"
                )));
            }
        }
        Ok(Self {
            index,
            observations,
        })
    }

    /// Returns the observed index.
    #[must_use]
    pub fn index(&self) -> IborIndex {
        self.index
    }

    /// Returns the weighted observations.
    #[must_use]
    pub fn observations(&self) -> &[(IborRateObservation, f64)] {
        &self.observations
    }

    fn total_weight(&self) -> f64 {
        self.observations.iter().map(|(_, w)| w).sum()
    }
}

impl RateComputation for IborAveragedRateComputation {
    fn rate(&self, provider: &RatesProvider) -> PricingResult<f64> {
        let rates = provider.ibor_index_rates(self.index)?;
        let total = self.total_weight();
        let mut accrued = 0.0;
        for (observation, weight) in &self.observations {
            accrued += rates.rate(observation)? * weight;
        }
        Ok(accrued / total)
    }

    fn rate_sensitivity(
        &self,
        provider: &RatesProvider,
    ) -> PricingResult<PointSensitivityBuilder> {
        let rates = provider.ibor_index_rates(self.index)?;
        let total = self.total_weight();
        let mut builder = PointSensitivityBuilder::none();
        for (observation, weight) in &self.observations {
            let part = rates.rate_point_sensitivity(observation)?;
            builder = builder.combined_with(part.multiplied_by(weight / total));
        }
        Ok(builder)
    }

    fn explain_rate(&self, provider: &RatesProvider) -> PricingResult<ExplainedRate> {
        let rates = provider.ibor_index_rates(self.index)?;
        let mut entries = Vec::with_capacity(self.observations.len());
        for (observation, weight) in &self.observations {
            let recorded = observation.fixing_date <= rates.valuation_date()
                && rates.fixings().value_on(observation.fixing_date).is_some();
            entries.push(ExplainedRateEntry {
                fixing_date: observation.fixing_date,
                start_date: observation.effective_date,
                end_date: observation.maturity_date,
                rate: rates.rate(observation)?,
                accrual_factor: *weight,
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
