//! Finite difference validation of analytic sensitivities.

use log::debug;
use rayon::prelude::*;

use crate::error::PricingResult;
use crate::provider::RatesProvider;
use crate::sensitivity::{CurrencyParameterSensitivities, CurrencyParameterSensitivity};

/// Central finite difference over every curve parameter of a provider.
///
/// Bumps one node at a time through [`RatesProvider::with_curve_parameter`]
/// and revalues, so the output is directly comparable to an analytic
/// [`CurrencyParameterSensitivities`]. Parameters of one curve are bumped in
/// parallel.
#[derive(Debug, Clone, Copy)]
pub struct RatesFiniteDifferenceCalculator {
    bump: f64,
}

impl Default for RatesFiniteDifferenceCalculator {
    fn default() -> Self {
        Self { bump: 1e-6 }
    }
}

impl RatesFiniteDifferenceCalculator {
    /// Creates a calculator with an explicit bump size.
    #[must_use]
    pub fn new(bump: f64) -> Self {
        Self { bump }
    }

    /// Returns the bump size.
    #[must_use]
    pub fn bump(&self) -> f64 {
        self.bump
    }

    /// Differentiates `value_fn` against every parameter of every curve.
    ///
    /// # Errors
    ///
    /// Propagates any valuation error from `value_fn` or from rebuilding the
    /// bumped providers.
    pub fn sensitivity<F>(
        &self,
        provider: &RatesProvider,
        value_fn: F,
    ) -> PricingResult<CurrencyParameterSensitivities>
    where
        F: Fn(&RatesProvider) -> PricingResult<tangent_core::types::CurrencyAmount> + Sync,
    {
        let base_currency = value_fn(provider)?.currency;
        let mut result = CurrencyParameterSensitivities::empty();
        for id in provider.curve_ids() {
            let curve = provider.curve(id)?;
            let name = curve.name().clone();
            let count = curve.parameter_count();
            debug!("bumping {count} parameters of curve {name} by {:.1e}", self.bump);
            let row: Vec<f64> = (0..count)
                .into_par_iter()
                .map(|i| -> PricingResult<f64> {
                    let base = provider.curve_parameter(id, i)?;
                    let up = value_fn(&provider.with_curve_parameter(id, i, base + self.bump)?)?;
                    let down = value_fn(&provider.with_curve_parameter(id, i, base - self.bump)?)?;
                    Ok((up.amount - down.amount) / (2.0 * self.bump))
                })
                .collect::<PricingResult<Vec<f64>>>()?;
            result = result.combined_with(CurrencyParameterSensitivity::of(
                name,
                base_currency,
                row,
            ))?;
        }
        Ok(result)
    }
}
