//! The rates provider: one immutable view of all market curves.
//!
//! A provider is constructed once per valuation scenario from calibrated
//! curves and never mutated; `with_curve_parameter` returns a rebound copy.
//! It is the single place where point sensitivities become parameter
//! sensitivities: every [`SensitivityKey`] variant is dispatched to the
//! source that owns the observed curve.

use log::debug;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tangent_core::types::{
    Currency, CurrencyAmount, CurrencyPair, Date, MultiCurrencyAmount, YearMonth,
};
use tangent_curves::NodalCurve;

use crate::discount::DiscountFactors;
use crate::error::{PricingError, PricingResult};
use crate::index::{IborIndex, IborRateObservation, OvernightIndex, PriceIndex};
use crate::index_rates::{DiscountIborIndexRates, DiscountOvernightIndexRates, SimplePriceIndexValues};
use crate::sensitivity::{
    CurrencyParameterSensitivities, PointSensitivities, PointSensitivityBuilder, SensitivityKey,
};

/// Spot FX rates keyed by currency pair.
#[derive(Debug, Clone, Default)]
pub struct FxMatrix {
    rates: BTreeMap<CurrencyPair, f64>,
}

impl FxMatrix {
    /// Creates an empty matrix. Identity pairs always resolve to 1.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a matrix from (pair, rate) entries.
    #[must_use]
    pub fn of(entries: impl IntoIterator<Item = (CurrencyPair, f64)>) -> Self {
        Self {
            rates: entries.into_iter().collect(),
        }
    }

    /// Returns a new matrix with one additional quote.
    #[must_use]
    pub fn with_rate(&self, pair: CurrencyPair, rate: f64) -> Self {
        let mut rates = self.rates.clone();
        rates.insert(pair, rate);
        Self { rates }
    }

    /// Returns the rate for a pair, inverting a stored quote if needed.
    ///
    /// # Errors
    ///
    /// Returns a domain error if neither direction is quoted.
    pub fn rate(&self, pair: CurrencyPair) -> PricingResult<f64> {
        if pair.is_identity() {
            return Ok(1.0);
        }
        if let Some(rate) = self.rates.get(&pair) {
            return Ok(*rate);
        }
        if let Some(rate) = self.rates.get(&pair.invert()) {
            return Ok(1.0 / rate);
        }
        Err(PricingError::domain(format!("no FX rate for {pair}")))
    }
}

/// Identifies one curve held by a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CurveId {
    /// The discount curve for a currency.
    Discount(Currency),
    /// The forward curve behind an overnight index.
    Overnight(OvernightIndex),
    /// The forward curve behind a term index.
    Ibor(IborIndex),
    /// The forward curve behind a price index.
    Price(PriceIndex),
}

impl fmt::Display for CurveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Discount(ccy) => write!(f, "Discount/{ccy}"),
            Self::Overnight(index) => write!(f, "Overnight/{index}"),
            Self::Ibor(index) => write!(f, "Ibor/{index}"),
            Self::Price(index) => write!(f, "Price/{index}"),
        }
    }
}

/// An immutable aggregate of discount curves, forward index curves, fixing
/// series, and FX rates, as of one valuation date.
#[derive(Debug, Clone)]
pub struct RatesProvider {
    valuation_date: Date,
    discount: BTreeMap<Currency, Arc<dyn DiscountFactors>>,
    overnight: BTreeMap<OvernightIndex, DiscountOvernightIndexRates>,
    ibor: BTreeMap<IborIndex, DiscountIborIndexRates>,
    price: BTreeMap<PriceIndex, SimplePriceIndexValues>,
    fx: FxMatrix,
}

impl RatesProvider {
    /// Starts building a provider for a valuation date.
    #[must_use]
    pub fn builder(valuation_date: Date) -> RatesProviderBuilder {
        RatesProviderBuilder {
            valuation_date,
            discount: BTreeMap::new(),
            overnight: BTreeMap::new(),
            ibor: BTreeMap::new(),
            price: BTreeMap::new(),
            fx: FxMatrix::empty(),
        }
    }

    /// Returns the valuation date.
    #[must_use]
    pub fn valuation_date(&self) -> Date {
        self.valuation_date
    }

    /// Returns the discount factors for a currency.
    pub fn discount_factors(&self, currency: Currency) -> PricingResult<&Arc<dyn DiscountFactors>> {
        self.discount
            .get(&currency)
            .ok_or_else(|| PricingError::unsupported_currency(currency, "discount curves"))
    }

    /// Returns the discount factor for a payment in `currency` on `date`.
    pub fn discount_factor(&self, currency: Currency, date: Date) -> PricingResult<f64> {
        self.discount_factors(currency)?.discount_factor(date)
    }

    /// Returns the overnight rate source for an index.
    pub fn overnight_index_rates(
        &self,
        index: OvernightIndex,
    ) -> PricingResult<&DiscountOvernightIndexRates> {
        self.overnight.get(&index).ok_or(PricingError::UnsupportedIndex {
            index: index.name(),
            context: "overnight rate sources".to_string(),
        })
    }

    /// Returns the term rate source for an index.
    pub fn ibor_index_rates(&self, index: IborIndex) -> PricingResult<&DiscountIborIndexRates> {
        self.ibor.get(&index).ok_or(PricingError::UnsupportedIndex {
            index: index.name(),
            context: "term rate sources".to_string(),
        })
    }

    /// Returns the price index source for an index.
    pub fn price_index_values(&self, index: PriceIndex) -> PricingResult<&SimplePriceIndexValues> {
        self.price.get(&index).ok_or(PricingError::UnsupportedIndex {
            index: index.name(),
            context: "price index sources".to_string(),
        })
    }

    /// Returns the overnight rate for one fixing date.
    pub fn overnight_index_rate(&self, index: OvernightIndex, fixing_date: Date) -> PricingResult<f64> {
        self.overnight_index_rates(index)?.rate(fixing_date)
    }

    /// Returns the aggregate forward rate over an effective-date period.
    pub fn overnight_index_rate_period(
        &self,
        index: OvernightIndex,
        start_date: Date,
        end_date: Date,
    ) -> PricingResult<f64> {
        self.overnight_index_rates(index)?.period_rate(start_date, end_date)
    }

    /// Returns the term rate for a resolved observation.
    pub fn ibor_index_rate(&self, observation: &IborRateObservation) -> PricingResult<f64> {
        self.ibor_index_rates(observation.index)?.rate(observation)
    }

    /// Returns the price index value for a reference month.
    pub fn price_index_value(&self, index: PriceIndex, month: YearMonth) -> PricingResult<f64> {
        self.price_index_values(index)?.value(month)
    }

    /// Returns the spot FX rate for a pair.
    pub fn fx_rate(&self, pair: CurrencyPair) -> PricingResult<f64> {
        self.fx.rate(pair)
    }

    /// Converts point sensitivities into parameter sensitivities.
    ///
    /// Each entry is routed to the curve that owns the observed value and
    /// distributed across that curve's parameters; results are summed per
    /// (curve, currency). The operation is linear: it respects the
    /// `combined_with` / `multiplied_by` algebra of the inputs.
    pub fn parameter_sensitivity(
        &self,
        sensitivities: &PointSensitivities,
    ) -> PricingResult<CurrencyParameterSensitivities> {
        let mut result = CurrencyParameterSensitivities::empty();
        for point in sensitivities.sensitivities() {
            debug!("routing {} ({})", point.key.describe(), point.currency);
            let part = match point.key {
                SensitivityKey::ZeroRate { curve_currency, .. } => self
                    .discount_factors(curve_currency)?
                    .parameter_sensitivity(point)?,
                SensitivityKey::OvernightRate { index, .. } => self
                    .overnight_index_rates(index)?
                    .parameter_sensitivity(point)?,
                SensitivityKey::IborRate { index, .. } => {
                    self.ibor_index_rates(index)?.parameter_sensitivity(point)?
                }
                SensitivityKey::InflationRate { index, .. } => self
                    .price_index_values(index)?
                    .parameter_sensitivity(point)?,
            };
            result = result.combined_with(part)?;
        }
        Ok(result)
    }

    /// Sums point sensitivities into per-currency monetary exposure.
    ///
    /// Values are grouped by their sensitivity currency without FX
    /// conversion; use [`convert`](Self::convert) to collapse the result
    /// into a base currency.
    #[must_use]
    pub fn currency_exposure(&self, sensitivities: &PointSensitivities) -> MultiCurrencyAmount {
        sensitivities
            .sensitivities()
            .iter()
            .fold(MultiCurrencyAmount::empty(), |acc, point| {
                acc.plus(CurrencyAmount::new(point.currency, point.value))
            })
    }

    /// Converts a multi-currency amount into one currency at spot rates.
    pub fn convert(
        &self,
        amounts: &MultiCurrencyAmount,
        base: Currency,
    ) -> PricingResult<CurrencyAmount> {
        let mut total = 0.0;
        for amount in amounts.amounts() {
            let rate = self.fx.rate(CurrencyPair::new(amount.currency, base))?;
            total += amount.amount * rate;
        }
        Ok(CurrencyAmount::new(base, total))
    }

    /// Returns the identifiers of every curve held by this provider.
    #[must_use]
    pub fn curve_ids(&self) -> Vec<CurveId> {
        let mut ids: Vec<CurveId> = self.discount.keys().map(|c| CurveId::Discount(*c)).collect();
        ids.extend(self.overnight.keys().map(|i| CurveId::Overnight(*i)));
        ids.extend(self.ibor.keys().map(|i| CurveId::Ibor(*i)));
        ids.extend(self.price.keys().map(|i| CurveId::Price(*i)));
        ids
    }

    /// Returns the curve behind an identifier.
    pub fn curve(&self, id: CurveId) -> PricingResult<&NodalCurve> {
        match id {
            CurveId::Discount(ccy) => Ok(self.discount_factors(ccy)?.curve()),
            CurveId::Overnight(index) => {
                Ok(self.overnight_index_rates(index)?.discount_factors().curve())
            }
            CurveId::Ibor(index) => Ok(self.ibor_index_rates(index)?.discount_factors().curve()),
            CurveId::Price(index) => Ok(self.price_index_values(index)?.curve()),
        }
    }

    /// Returns the current value of one curve parameter.
    pub fn curve_parameter(&self, id: CurveId, index: usize) -> PricingResult<f64> {
        let curve = self.curve(id)?;
        curve
            .values()
            .get(index)
            .copied()
            .ok_or_else(|| {
                PricingError::configuration(format!(
                    "parameter {index} out of range for curve {id}"
                ))
            })
    }

    /// Returns a copy of this provider with one curve parameter replaced.
    ///
    /// This is the rebind used by the finite-difference calculator; the
    /// original provider is untouched.
    pub fn with_curve_parameter(
        &self,
        id: CurveId,
        index: usize,
        value: f64,
    ) -> PricingResult<Self> {
        let mut bumped = self.clone();
        match id {
            CurveId::Discount(ccy) => {
                let dfs = bumped
                    .discount
                    .get(&ccy)
                    .ok_or_else(|| PricingError::unsupported_currency(ccy, "discount curves"))?
                    .with_parameter(index, value)?;
                bumped.discount.insert(ccy, dfs);
            }
            CurveId::Overnight(idx) => {
                let rates = bumped
                    .overnight_index_rates(idx)?
                    .with_parameter(index, value)?;
                bumped.overnight.insert(idx, rates);
            }
            CurveId::Ibor(idx) => {
                let rates = bumped.ibor_index_rates(idx)?.with_parameter(index, value)?;
                bumped.ibor.insert(idx, rates);
            }
            CurveId::Price(idx) => {
                let values = bumped.price_index_values(idx)?.with_parameter(index, value)?;
                bumped.price.insert(idx, values);
            }
        }
        Ok(bumped)
    }

    /// Convenience: routes a builder's worth of point sensitivities.
    pub fn parameter_sensitivity_of(
        &self,
        builder: PointSensitivityBuilder,
    ) -> PricingResult<CurrencyParameterSensitivities> {
        self.parameter_sensitivity(&builder.build().normalized())
    }
}

/// Builds a [`RatesProvider`], validating that every curve shares the
/// provider valuation date.
#[derive(Debug)]
pub struct RatesProviderBuilder {
    valuation_date: Date,
    discount: BTreeMap<Currency, Arc<dyn DiscountFactors>>,
    overnight: BTreeMap<OvernightIndex, DiscountOvernightIndexRates>,
    ibor: BTreeMap<IborIndex, DiscountIborIndexRates>,
    price: BTreeMap<PriceIndex, SimplePriceIndexValues>,
    fx: FxMatrix,
}

impl RatesProviderBuilder {
    fn check_date(&self, what: impl fmt::Display, date: Date) -> PricingResult<()> {
        if date != self.valuation_date {
            return Err(PricingError::configuration(format!(
                "{what} has valuation date {date}, provider expects {}",
                self.valuation_date
            )));
        }
        Ok(())
    }

    /// Adds the discount curve for a currency.
    ///
    /// # Errors
    ///
    /// Returns a configuration error on a valuation date mismatch.
    pub fn discount_curve(
        mut self,
        currency: Currency,
        discount_factors: Arc<dyn DiscountFactors>,
    ) -> PricingResult<Self> {
        self.check_date(
            format_args!("discount curve for {currency}"),
            discount_factors.valuation_date(),
        )?;
        self.discount.insert(currency, discount_factors);
        Ok(self)
    }

    /// Adds an overnight rate source.
    ///
    /// # Errors
    ///
    /// Returns a configuration error on a valuation date mismatch.
    pub fn overnight_index_rates(mut self, rates: DiscountOvernightIndexRates) -> PricingResult<Self> {
        self.check_date(rates.index(), rates.valuation_date())?;
        self.overnight.insert(rates.index(), rates);
        Ok(self)
    }

    /// Adds a term rate source.
    ///
    /// # Errors
    ///
    /// Returns a configuration error on a valuation date mismatch.
    pub fn ibor_index_rates(mut self, rates: DiscountIborIndexRates) -> PricingResult<Self> {
        self.check_date(rates.index(), rates.valuation_date())?;
        self.ibor.insert(rates.index(), rates);
        Ok(self)
    }

    /// Adds a price index source.
    ///
    /// # Errors
    ///
    /// Returns a configuration error on a valuation date mismatch.
    pub fn price_index_values(mut self, values: SimplePriceIndexValues) -> PricingResult<Self> {
        self.check_date(values.index(), values.valuation_date())?;
        self.price.insert(values.index(), values);
        Ok(self)
    }

    /// Sets the FX matrix.
    #[must_use]
    pub fn fx_matrix(mut self, fx: FxMatrix) -> Self {
        self.fx = fx;
        self
    }

    /// Finishes the provider.
    #[must_use]
    pub fn build(self) -> RatesProvider {
        RatesProvider {
            valuation_date: self.valuation_date,
            discount: self.discount,
            overnight: self.overnight,
            ibor: self.ibor,
            price: self.price,
            fx: self.fx,
        }
    }
}
