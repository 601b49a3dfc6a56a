//! Forward rate computation functions.
//!
//! Each computation describes one compound accrual observation and knows how
//! to produce three things from a [`RatesProvider`]: the blended rate, the
//! chain-rule-weighted point sensitivities of that rate, and a structured
//! per-sub-observation breakdown for audit.
//!
//! Overnight computations partition the accrual period into three regions:
//! fixings already published (accrued from the recorded series, no
//! sensitivity), fixings still in the future (estimated from the forward
//! curve), and a rate-cutoff tail whose fixings are frozen to an earlier
//! rate. The forward region can be evaluated exactly by looping daily rates,
//! or approximately through one aggregate period rate.

mod explain;
mod ibor_averaged;
mod inflation;
mod overnight_averaged;
mod overnight_compounded;

pub use explain::{ExplainedRate, ExplainedRateEntry, RateSource};
pub use ibor_averaged::IborAveragedRateComputation;
pub use inflation::InflationInterpolatedRateComputation;
pub use overnight_averaged::OvernightAveragedRateComputation;
pub use overnight_compounded::OvernightCompoundedRateComputation;

use tangent_core::types::Date;

use crate::error::{PricingError, PricingResult};
use crate::index::OvernightIndex;
use crate::provider::RatesProvider;
use crate::sensitivity::PointSensitivityBuilder;

/// A forward rate computation over one accrual period.
pub trait RateComputation {
    /// The blended rate for the whole accrual period.
    fn rate(&self, provider: &RatesProvider) -> PricingResult<f64>;

    /// Point sensitivities of [`rate`](Self::rate), with the same accrual
    /// weights the rate itself uses.
    fn rate_sensitivity(&self, provider: &RatesProvider)
        -> PricingResult<PointSensitivityBuilder>;

    /// Per-sub-observation breakdown of [`rate`](Self::rate).
    fn explain_rate(&self, provider: &RatesProvider) -> PricingResult<ExplainedRate>;
}

/// One overnight deposit inside a computation period.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SubObservation {
    pub fixing_date: Date,
    pub start_date: Date,
    pub end_date: Date,
    pub accrual_factor: f64,
}

/// Tiles `[start, end)` with consecutive overnight deposit periods.
///
/// `start` and `end` are effective dates; the fixing behind each deposit is
/// shifted back by the index effective-date offset.
pub(crate) fn overnight_schedule(
    index: OvernightIndex,
    start: Date,
    end: Date,
) -> PricingResult<Vec<SubObservation>> {
    if !start.is_weekday() || !end.is_weekday() || start >= end {
        return Err(PricingError::configuration(format!(
            "invalid overnight accrual period [{start}, {end}) for {index}"
        )));
    }
    let day_count = index.day_count();
    let mut subs = Vec::new();
    let mut current = start;
    while current < end {
        let next = index.maturity_date(current).min(end);
        subs.push(SubObservation {
            fixing_date: index.fixing_from_effective(current),
            start_date: current,
            end_date: next,
            accrual_factor: day_count.year_fraction(current, next),
        });
        current = next;
    }
    Ok(subs)
}

/// Index of the fixing observed for deposit `i` under a rate cutoff: the
/// last `cutoff - 1` deposits observe the fixing of deposit `n - cutoff`
/// while keeping their own accrual factors.
pub(crate) fn observed_index(i: usize, periods: usize, cutoff: usize) -> usize {
    if cutoff > 1 && i >= periods - (cutoff - 1) {
        periods - cutoff
    } else {
        i
    }
}

/// First deposit in `subs[..limit]` whose rate must come from the forward
/// curve. Errors if a fixing that should already be published is absent.
pub(crate) fn first_forward_index(
    rates: &crate::index_rates::DiscountOvernightIndexRates,
    subs: &[SubObservation],
    limit: usize,
) -> PricingResult<usize> {
    let valuation = rates.valuation_date();
    for (i, sub) in subs.iter().take(limit).enumerate() {
        if sub.fixing_date > valuation {
            return Ok(i);
        }
        if rates.fixings().value_on(sub.fixing_date).is_some() {
            continue;
        }
        if rates.index().publication_date(sub.fixing_date) < valuation {
            return Err(PricingError::missing_fixing(
                rates.index().name(),
                sub.fixing_date,
            ));
        }
        return Ok(i);
    }
    Ok(limit)
}

/// Resolves the effective rate cutoff and validates it against the period
/// length. A cutoff of 0 or 1 freezes nothing; a cutoff of `c` freezes the
/// last `c - 1` fixings to the rate of the fixing `c` deposits from the end.
pub(crate) fn effective_cutoff(rate_cutoff: usize, periods: usize) -> PricingResult<usize> {
    let cutoff = rate_cutoff.max(1);
    if cutoff > periods {
        return Err(PricingError::configuration(format!(
            "rate cutoff {rate_cutoff} exceeds the {periods} deposits in the period"
        )));
    }
    Ok(cutoff)
}
