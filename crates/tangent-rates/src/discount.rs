//! Discount factor providers backed by nodal curves.
//!
//! Three implementations of [`DiscountFactors`]:
//!
//! - [`ZeroRateDiscountFactors`]: continuously compounded zero-rate curve,
//!   `DF(t) = exp(-z(t)·t)`.
//! - [`ZeroRatePeriodicDiscountFactors`]: periodically compounded zero-rate
//!   curve with frequency `m`, `DF(t) = (1 + z(t)/m)^(-m·t)`.
//! - [`SimpleDiscountFactors`]: curve nodes hold discount factors directly.
//!
//! All metadata checks happen at construction. A curve whose value type does
//! not match the wrapper is a configuration error before any computation is
//! attempted.

use std::fmt;
use std::sync::Arc;

use tangent_core::daycounts::DayCountConvention;
use tangent_core::types::{Currency, Date};
use tangent_curves::{CurveName, NodalCurve, ValueType};

use crate::error::{PricingError, PricingResult};
use crate::sensitivity::{CurrencyParameterSensitivity, PointSensitivity, SensitivityKey};

/// Year fractions below this are treated as zero.
pub const EFFECTIVE_ZERO: f64 = 1e-10;

/// Compounding basis used when applying a spread to a discount factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpreadCompounding {
    /// Spread added to the continuously compounded rate.
    Continuous,
    /// Spread added to the periodically compounded rate.
    Periodic,
}

/// Discount factors for one currency as of one valuation date.
///
/// Implementations are immutable; [`with_parameter`](Self::with_parameter)
/// returns a rebuilt instance with one curve node replaced, which is how the
/// finite-difference calculator bumps curves.
pub trait DiscountFactors: Send + Sync + fmt::Debug {
    /// Currency the discount factors apply to.
    fn currency(&self) -> Currency;

    /// Date all discounting is relative to.
    fn valuation_date(&self) -> Date;

    /// The underlying curve.
    fn curve(&self) -> &NodalCurve;

    /// Number of underlying curve parameters.
    fn parameter_count(&self) -> usize {
        self.curve().parameter_count()
    }

    /// Year fraction from the valuation date to `date` under the curve day
    /// count. Negative for dates before valuation.
    fn relative_year_fraction(&self, date: Date) -> f64;

    /// Discount factor for payment on `date`.
    ///
    /// For dates before the valuation date this returns the raw formula
    /// value; treating an elapsed payment as settled is the caller's policy.
    fn discount_factor(&self, date: Date) -> PricingResult<f64>;

    /// Zero rate to `date` under the curve's own compounding.
    fn zero_rate(&self, date: Date) -> PricingResult<f64>;

    /// Derivative of the discount factor with respect to time, at year
    /// fraction `t`.
    fn discount_factor_time_derivative(&self, t: f64) -> PricingResult<f64>;

    /// Discount factor with a spread applied in the requested compounding
    /// basis.
    ///
    /// Returns exactly 1.0 when the year fraction to `date` is numerically
    /// zero, regardless of the spread. `periods_per_year` is only used for
    /// [`SpreadCompounding::Periodic`] and must be positive.
    fn discount_factor_with_spread(
        &self,
        date: Date,
        spread: f64,
        compounding: SpreadCompounding,
        periods_per_year: u32,
    ) -> PricingResult<f64> {
        let t = self.relative_year_fraction(date);
        if t.abs() < EFFECTIVE_ZERO {
            return Ok(1.0);
        }
        let periods = f64::from(check_periods(periods_per_year, compounding)?);
        let df = self.discount_factor(date)?;
        Ok(spread_adjusted(df, t, spread, compounding, periods))
    }

    /// Sensitivity of the discount factor at `date` to the curve's zero
    /// rate at that date, expressed in the curve currency.
    fn zero_rate_point_sensitivity(&self, date: Date) -> PricingResult<PointSensitivity> {
        self.zero_rate_point_sensitivity_in(date, self.currency())
    }

    /// Sensitivity of the discount factor at `date` to the curve's zero
    /// rate at that date, expressed in a chosen sensitivity currency.
    fn zero_rate_point_sensitivity_in(
        &self,
        date: Date,
        sensitivity_currency: Currency,
    ) -> PricingResult<PointSensitivity>;

    /// Sensitivity of the spread-adjusted discount factor to the base
    /// curve's zero rate. The spread itself is not a curve parameter.
    ///
    /// Reduces to [`zero_rate_point_sensitivity_in`](Self::zero_rate_point_sensitivity_in)
    /// when the spread is zero.
    fn zero_rate_point_sensitivity_with_spread(
        &self,
        date: Date,
        sensitivity_currency: Currency,
        spread: f64,
        compounding: SpreadCompounding,
        periods_per_year: u32,
    ) -> PricingResult<PointSensitivity> {
        let base = self.zero_rate_point_sensitivity_in(date, sensitivity_currency)?;
        let t = self.relative_year_fraction(date);
        if t.abs() < EFFECTIVE_ZERO {
            return Ok(base.multiplied_by(0.0));
        }
        let periods = f64::from(check_periods(periods_per_year, compounding)?);
        let df = self.discount_factor(date)?;
        let chain = spread_adjusted_gradient(df, t, spread, compounding, periods);
        Ok(base.multiplied_by(chain))
    }

    /// Distributes a zero-rate point sensitivity across this curve's
    /// parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the point sensitivity does not belong to this
    /// curve.
    fn parameter_sensitivity(
        &self,
        point: &PointSensitivity,
    ) -> PricingResult<CurrencyParameterSensitivity>;

    /// Returns a copy with curve parameter `index` replaced by `value`.
    fn with_parameter(&self, index: usize, value: f64) -> PricingResult<Arc<dyn DiscountFactors>>;
}

fn check_periods(periods_per_year: u32, compounding: SpreadCompounding) -> PricingResult<u32> {
    if compounding == SpreadCompounding::Periodic && periods_per_year == 0 {
        return Err(PricingError::configuration(
            "periods-per-year must be positive for periodic spread compounding",
        ));
    }
    Ok(periods_per_year.max(1))
}

/// Applies a spread to a base discount factor over year fraction `t`.
fn spread_adjusted(df: f64, t: f64, spread: f64, compounding: SpreadCompounding, periods: f64) -> f64 {
    match compounding {
        SpreadCompounding::Continuous => df * (-spread * t).exp(),
        SpreadCompounding::Periodic => {
            // Re-express the base rate periodically, add the spread, convert back.
            let rate = periods * (df.powf(-1.0 / (periods * t)) - 1.0);
            (1.0 + (rate + spread) / periods).powf(-periods * t)
        }
    }
}

/// Derivative of the spread-adjusted discount factor with respect to the
/// base discount factor. Equals 1 when the spread is zero.
fn spread_adjusted_gradient(
    df: f64,
    t: f64,
    spread: f64,
    compounding: SpreadCompounding,
    periods: f64,
) -> f64 {
    match compounding {
        SpreadCompounding::Continuous => (-spread * t).exp(),
        SpreadCompounding::Periodic => {
            let rate = periods * (df.powf(-1.0 / (periods * t)) - 1.0);
            (1.0 + (rate + spread) / periods).powf(-periods * t - 1.0)
                * df.powf(-1.0 / (periods * t) - 1.0)
        }
    }
}

fn require_value_type(curve: &NodalCurve, expected: ValueType) -> PricingResult<()> {
    let actual = curve.metadata().value_type();
    if actual != expected {
        return Err(PricingError::configuration(format!(
            "curve '{}' has value type {actual}, expected {expected}",
            curve.name()
        )));
    }
    Ok(())
}

fn require_day_count(curve: &NodalCurve) -> PricingResult<DayCountConvention> {
    curve.metadata().day_count().ok_or_else(|| {
        PricingError::configuration(format!("curve '{}' has no day count", curve.name()))
    })
}

fn route_zero_rate(
    point: &PointSensitivity,
    currency: Currency,
    curve_name: &CurveName,
) -> PricingResult<f64> {
    match point.key {
        SensitivityKey::ZeroRate {
            curve_currency,
            year_fraction,
        } if curve_currency == currency => Ok(year_fraction),
        _ => Err(PricingError::UnroutableSensitivity {
            key: point.key.describe(),
            context: format!("discount factors for {currency} ({curve_name})"),
        }),
    }
}

/// Discount factors from a continuously compounded zero-rate curve.
#[derive(Debug, Clone)]
pub struct ZeroRateDiscountFactors {
    currency: Currency,
    valuation_date: Date,
    curve: NodalCurve,
    day_count: DayCountConvention,
}

impl ZeroRateDiscountFactors {
    /// Creates continuous discount factors from a zero-rate curve.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the curve value type is not
    /// `ZeroRate`, the day count is missing, or the curve declares a
    /// periodic compounding frequency.
    pub fn new(currency: Currency, valuation_date: Date, curve: NodalCurve) -> PricingResult<Self> {
        require_value_type(&curve, ValueType::ZeroRate)?;
        let day_count = require_day_count(&curve)?;
        if curve.metadata().compounding_per_year().is_some() {
            return Err(PricingError::configuration(format!(
                "curve '{}' declares periodic compounding, use ZeroRatePeriodicDiscountFactors",
                curve.name()
            )));
        }
        Ok(Self {
            currency,
            valuation_date,
            curve,
            day_count,
        })
    }
}

impl DiscountFactors for ZeroRateDiscountFactors {
    fn currency(&self) -> Currency {
        self.currency
    }

    fn valuation_date(&self) -> Date {
        self.valuation_date
    }

    fn curve(&self) -> &NodalCurve {
        &self.curve
    }

    fn relative_year_fraction(&self, date: Date) -> f64 {
        self.day_count.year_fraction(self.valuation_date, date)
    }

    fn discount_factor(&self, date: Date) -> PricingResult<f64> {
        let t = self.relative_year_fraction(date);
        let zero = self.curve.value_at(t)?;
        Ok((-zero * t).exp())
    }

    fn zero_rate(&self, date: Date) -> PricingResult<f64> {
        let t = self.relative_year_fraction(date);
        Ok(self.curve.value_at(t)?)
    }

    fn discount_factor_time_derivative(&self, t: f64) -> PricingResult<f64> {
        let zero = self.curve.value_at(t)?;
        let slope = self.curve.derivative_at(t)?;
        let df = (-zero * t).exp();
        Ok((-zero - slope * t) * df)
    }

    fn zero_rate_point_sensitivity_in(
        &self,
        date: Date,
        sensitivity_currency: Currency,
    ) -> PricingResult<PointSensitivity> {
        let t = self.relative_year_fraction(date);
        let df = self.discount_factor(date)?;
        Ok(PointSensitivity::new(
            SensitivityKey::ZeroRate {
                curve_currency: self.currency,
                year_fraction: t,
            },
            sensitivity_currency,
            -t * df,
        ))
    }

    fn parameter_sensitivity(
        &self,
        point: &PointSensitivity,
    ) -> PricingResult<CurrencyParameterSensitivity> {
        let t = route_zero_rate(point, self.currency, self.curve.name())?;
        let row = self.curve.parameter_sensitivities(t, point.value)?;
        Ok(CurrencyParameterSensitivity::of(
            self.curve.name().clone(),
            point.currency,
            row,
        ))
    }

    fn with_parameter(&self, index: usize, value: f64) -> PricingResult<Arc<dyn DiscountFactors>> {
        let curve = self.curve.with_parameter(index, value)?;
        Ok(Arc::new(Self {
            curve,
            ..self.clone()
        }))
    }
}

/// Discount factors from a periodically compounded zero-rate curve.
#[derive(Debug, Clone)]
pub struct ZeroRatePeriodicDiscountFactors {
    currency: Currency,
    valuation_date: Date,
    curve: NodalCurve,
    day_count: DayCountConvention,
    frequency: f64,
}

impl ZeroRatePeriodicDiscountFactors {
    /// Creates periodic discount factors from a zero-rate curve whose
    /// metadata declares a compounding frequency.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the curve value type is not
    /// `ZeroRate`, the day count is missing, or no compounding frequency is
    /// declared.
    pub fn new(currency: Currency, valuation_date: Date, curve: NodalCurve) -> PricingResult<Self> {
        require_value_type(&curve, ValueType::ZeroRate)?;
        let day_count = require_day_count(&curve)?;
        let frequency = curve.metadata().compounding_per_year().ok_or_else(|| {
            PricingError::configuration(format!(
                "curve '{}' has no compounding-per-year, use ZeroRateDiscountFactors",
                curve.name()
            ))
        })?;
        Ok(Self {
            currency,
            valuation_date,
            curve,
            day_count,
            frequency: f64::from(frequency),
        })
    }

    fn growth(&self, zero: f64) -> f64 {
        1.0 + zero / self.frequency
    }
}

impl DiscountFactors for ZeroRatePeriodicDiscountFactors {
    fn currency(&self) -> Currency {
        self.currency
    }

    fn valuation_date(&self) -> Date {
        self.valuation_date
    }

    fn curve(&self) -> &NodalCurve {
        &self.curve
    }

    fn relative_year_fraction(&self, date: Date) -> f64 {
        self.day_count.year_fraction(self.valuation_date, date)
    }

    fn discount_factor(&self, date: Date) -> PricingResult<f64> {
        let t = self.relative_year_fraction(date);
        let zero = self.curve.value_at(t)?;
        Ok(self.growth(zero).powf(-self.frequency * t))
    }

    fn zero_rate(&self, date: Date) -> PricingResult<f64> {
        let t = self.relative_year_fraction(date);
        Ok(self.curve.value_at(t)?)
    }

    fn discount_factor_time_derivative(&self, t: f64) -> PricingResult<f64> {
        let zero = self.curve.value_at(t)?;
        let slope = self.curve.derivative_at(t)?;
        let base = self.growth(zero);
        let df = base.powf(-self.frequency * t);
        let d_dz = -t * base.powf(-self.frequency * t - 1.0);
        Ok(-self.frequency * base.ln() * df + d_dz * slope)
    }

    fn zero_rate_point_sensitivity_in(
        &self,
        date: Date,
        sensitivity_currency: Currency,
    ) -> PricingResult<PointSensitivity> {
        let t = self.relative_year_fraction(date);
        let zero = self.curve.value_at(t)?;
        let value = -t * self.growth(zero).powf(-self.frequency * t - 1.0);
        Ok(PointSensitivity::new(
            SensitivityKey::ZeroRate {
                curve_currency: self.currency,
                year_fraction: t,
            },
            sensitivity_currency,
            value,
        ))
    }

    fn parameter_sensitivity(
        &self,
        point: &PointSensitivity,
    ) -> PricingResult<CurrencyParameterSensitivity> {
        let t = route_zero_rate(point, self.currency, self.curve.name())?;
        let row = self.curve.parameter_sensitivities(t, point.value)?;
        Ok(CurrencyParameterSensitivity::of(
            self.curve.name().clone(),
            point.currency,
            row,
        ))
    }

    fn with_parameter(&self, index: usize, value: f64) -> PricingResult<Arc<dyn DiscountFactors>> {
        let curve = self.curve.with_parameter(index, value)?;
        Ok(Arc::new(Self {
            curve,
            ..self.clone()
        }))
    }
}

/// Discount factors read directly off a discount-factor curve.
///
/// The zero-rate sensitivity abstraction is preserved: point sensitivities
/// are expressed against the equivalent continuously compounded zero rate,
/// and [`parameter_sensitivity`](DiscountFactors::parameter_sensitivity)
/// converts back to the stored discount-factor parameters.
#[derive(Debug, Clone)]
pub struct SimpleDiscountFactors {
    currency: Currency,
    valuation_date: Date,
    curve: NodalCurve,
    day_count: DayCountConvention,
}

impl SimpleDiscountFactors {
    /// Creates discount factors from a discount-factor curve.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the curve value type is not
    /// `DiscountFactor` or the day count is missing.
    pub fn new(currency: Currency, valuation_date: Date, curve: NodalCurve) -> PricingResult<Self> {
        require_value_type(&curve, ValueType::DiscountFactor)?;
        let day_count = require_day_count(&curve)?;
        Ok(Self {
            currency,
            valuation_date,
            curve,
            day_count,
        })
    }
}

impl DiscountFactors for SimpleDiscountFactors {
    fn currency(&self) -> Currency {
        self.currency
    }

    fn valuation_date(&self) -> Date {
        self.valuation_date
    }

    fn curve(&self) -> &NodalCurve {
        &self.curve
    }

    fn relative_year_fraction(&self, date: Date) -> f64 {
        self.day_count.year_fraction(self.valuation_date, date)
    }

    fn discount_factor(&self, date: Date) -> PricingResult<f64> {
        let t = self.relative_year_fraction(date);
        Ok(self.curve.value_at(t)?)
    }

    fn zero_rate(&self, date: Date) -> PricingResult<f64> {
        let t = self.relative_year_fraction(date);
        if t.abs() < EFFECTIVE_ZERO {
            return Err(PricingError::domain(format!(
                "zero rate to {date} is undefined at the valuation date"
            )));
        }
        let df = self.curve.value_at(t)?;
        Ok(-df.ln() / t)
    }

    fn discount_factor_time_derivative(&self, t: f64) -> PricingResult<f64> {
        Ok(self.curve.derivative_at(t)?)
    }

    fn zero_rate_point_sensitivity_in(
        &self,
        date: Date,
        sensitivity_currency: Currency,
    ) -> PricingResult<PointSensitivity> {
        let t = self.relative_year_fraction(date);
        let df = self.discount_factor(date)?;
        Ok(PointSensitivity::new(
            SensitivityKey::ZeroRate {
                curve_currency: self.currency,
                year_fraction: t,
            },
            sensitivity_currency,
            -t * df,
        ))
    }

    fn parameter_sensitivity(
        &self,
        point: &PointSensitivity,
    ) -> PricingResult<CurrencyParameterSensitivity> {
        let t = route_zero_rate(point, self.currency, self.curve.name())?;
        // The point value is against the equivalent zero rate z = -ln(P)/t,
        // so dz/dP = -1/(t·P) converts to the stored parameters. At t = 0
        // the sensitivity is degenerate and the row is zero.
        let row = if t.abs() < EFFECTIVE_ZERO {
            vec![0.0; self.curve.parameter_count()]
        } else {
            let df = self.curve.value_at(t)?;
            self.curve
                .parameter_sensitivities(t, point.value * (-1.0 / (t * df)))?
        };
        Ok(CurrencyParameterSensitivity::of(
            self.curve.name().clone(),
            point.currency,
            row,
        ))
    }

    fn with_parameter(&self, index: usize, value: f64) -> PricingResult<Arc<dyn DiscountFactors>> {
        let curve = self.curve.with_parameter(index, value)?;
        Ok(Arc::new(Self {
            curve,
            ..self.clone()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tangent_curves::{CurveMetadata, InterpolationMethod};

    fn valuation() -> Date {
        Date::from_ymd(2014, 1, 22).unwrap()
    }

    fn continuous() -> ZeroRateDiscountFactors {
        let curve = NodalCurve::new(
            CurveMetadata::zero_rate("USD-Disc", DayCountConvention::Act365Fixed),
            vec![0.25, 1.0, 3.0, 7.0],
            vec![0.010, 0.014, 0.018, 0.021],
            InterpolationMethod::Linear,
        )
        .unwrap();
        ZeroRateDiscountFactors::new(Currency::Usd, valuation(), curve).unwrap()
    }

    fn periodic() -> ZeroRatePeriodicDiscountFactors {
        let metadata =
            CurveMetadata::periodic_zero_rate("GBP-Disc", DayCountConvention::Act365Fixed, 4)
                .unwrap();
        let curve = NodalCurve::new(
            metadata,
            vec![0.25, 1.0, 3.0, 7.0],
            vec![0.012, 0.015, 0.019, 0.022],
            InterpolationMethod::Linear,
        )
        .unwrap();
        ZeroRatePeriodicDiscountFactors::new(Currency::Gbp, valuation(), curve).unwrap()
    }

    fn test_dates() -> Vec<Date> {
        // Before, at, between, and after the curve nodes.
        [30i64, 91, 365, 700, 1095, 2000, 3000]
            .iter()
            .map(|d| valuation().add_days(*d))
            .collect()
    }

    #[test]
    fn test_continuous_inversion_identity() {
        let dfs = continuous();
        for date in test_dates() {
            let t = dfs.relative_year_fraction(date);
            let df = dfs.discount_factor(date).unwrap();
            let z = dfs.zero_rate(date).unwrap();
            assert_relative_eq!((-z * t).exp(), df, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_periodic_inversion_identity() {
        let dfs = periodic();
        for date in test_dates() {
            let t = dfs.relative_year_fraction(date);
            let df = dfs.discount_factor(date).unwrap();
            let z = dfs.zero_rate(date).unwrap();
            assert_relative_eq!((1.0 + z / 4.0).powf(-4.0 * t), df, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_discount_factor_at_valuation_is_one() {
        assert_relative_eq!(continuous().discount_factor(valuation()).unwrap(), 1.0);
        assert_relative_eq!(periodic().discount_factor(valuation()).unwrap(), 1.0);
    }

    #[test]
    fn test_time_derivative_against_finite_difference() {
        let eps = 1e-6;
        // Interior points only: the interpolant has kinks at the nodes where
        // the one-sided analytic derivative and a central difference differ.
        for t in [0.3, 0.8, 2.5, 5.0] {
            for dfs in [&continuous() as &dyn DiscountFactors, &periodic()] {
                let analytic = dfs.discount_factor_time_derivative(t).unwrap();
                let df_at = |x: f64| {
                    let z = dfs.curve().value_at(x).unwrap();
                    match dfs.currency() {
                        Currency::Gbp => (1.0 + z / 4.0).powf(-4.0 * x),
                        _ => (-z * x).exp(),
                    }
                };
                let fd = (df_at(t + eps) - df_at(t - eps)) / (2.0 * eps);
                assert_relative_eq!(analytic, fd, epsilon = 1e-8);
            }
        }
    }

    #[test]
    fn test_point_sensitivity_against_finite_difference() {
        let eps = 1e-6;
        for date in test_dates() {
            for dfs in [&continuous() as &dyn DiscountFactors, &periodic()] {
                let t = dfs.relative_year_fraction(date);
                let z = dfs.curve().value_at(t).unwrap();
                let df_of_z = |z: f64| match dfs.currency() {
                    Currency::Gbp => (1.0 + z / 4.0).powf(-4.0 * t),
                    _ => (-z * t).exp(),
                };
                let fd = (df_of_z(z + eps) - df_of_z(z - eps)) / (2.0 * eps);
                let analytic = dfs.zero_rate_point_sensitivity(date).unwrap().value;
                assert_relative_eq!(analytic, fd, max_relative = 1e-8);
            }
        }
    }

    #[test]
    fn test_spread_zero_equals_base() {
        for date in test_dates() {
            for dfs in [&continuous() as &dyn DiscountFactors, &periodic()] {
                let base = dfs.discount_factor(date).unwrap();
                for compounding in [SpreadCompounding::Continuous, SpreadCompounding::Periodic] {
                    let spread = dfs
                        .discount_factor_with_spread(date, 0.0, compounding, 2)
                        .unwrap();
                    assert_relative_eq!(spread, base, epsilon = 1e-12);
                }
            }
        }
    }

    #[test]
    fn test_spread_at_valuation_date_is_exactly_one() {
        let dfs = continuous();
        for compounding in [SpreadCompounding::Continuous, SpreadCompounding::Periodic] {
            let df = dfs
                .discount_factor_with_spread(valuation(), 0.05, compounding, 4)
                .unwrap();
            assert_eq!(df, 1.0);
        }
    }

    #[test]
    fn test_spread_sensitivity_against_finite_difference() {
        let eps = 1e-6;
        let spread = 0.0150;
        for date in test_dates() {
            for dfs in [&continuous() as &dyn DiscountFactors, &periodic()] {
                let t = dfs.relative_year_fraction(date);
                let z = dfs.curve().value_at(t).unwrap();
                for compounding in [SpreadCompounding::Continuous, SpreadCompounding::Periodic] {
                    let df_of_z = |z: f64| {
                        let base = match dfs.currency() {
                            Currency::Gbp => (1.0 + z / 4.0).powf(-4.0 * t),
                            _ => (-z * t).exp(),
                        };
                        match compounding {
                            SpreadCompounding::Continuous => base * (-spread * t).exp(),
                            SpreadCompounding::Periodic => {
                                let rate = 2.0 * (base.powf(-1.0 / (2.0 * t)) - 1.0);
                                (1.0 + (rate + spread) / 2.0).powf(-2.0 * t)
                            }
                        }
                    };
                    let fd = (df_of_z(z + eps) - df_of_z(z - eps)) / (2.0 * eps);
                    let analytic = dfs
                        .zero_rate_point_sensitivity_with_spread(
                            date,
                            dfs.currency(),
                            spread,
                            compounding,
                            2,
                        )
                        .unwrap()
                        .value;
                    assert_relative_eq!(analytic, fd, max_relative = 1e-8);
                }
            }
        }
    }

    #[test]
    fn test_parameter_sensitivity_length_and_routing() {
        let dfs = continuous();
        let date = valuation().add_days(700);
        let point = dfs.zero_rate_point_sensitivity(date).unwrap();
        let param = dfs.parameter_sensitivity(&point).unwrap();
        assert_eq!(param.sensitivity().len(), dfs.parameter_count());
        assert_eq!(param.curve_name().as_str(), "USD-Disc");

        let foreign = point.with_currency(Currency::Gbp);
        let mismatched = PointSensitivity::new(
            SensitivityKey::ZeroRate {
                curve_currency: Currency::Gbp,
                year_fraction: 1.0,
            },
            Currency::Gbp,
            1.0,
        );
        assert!(dfs.parameter_sensitivity(&mismatched).is_err());
        // A different sensitivity currency is fine, only the curve currency routes.
        assert!(dfs.parameter_sensitivity(&foreign).is_ok());
    }

    #[test]
    fn test_construction_validation() {
        let df_curve = NodalCurve::new(
            CurveMetadata::discount_factor("USD-Disc", DayCountConvention::Act365Fixed),
            vec![0.5, 1.0],
            vec![0.99, 0.98],
            InterpolationMethod::LogLinear,
        )
        .unwrap();
        assert!(ZeroRateDiscountFactors::new(Currency::Usd, valuation(), df_curve.clone()).is_err());
        assert!(SimpleDiscountFactors::new(Currency::Usd, valuation(), df_curve).is_ok());

        let zero_curve = continuous().curve.clone();
        assert!(ZeroRatePeriodicDiscountFactors::new(Currency::Usd, valuation(), zero_curve).is_err());
    }

    #[test]
    fn test_simple_discount_factors_flat_curve() {
        let curve = NodalCurve::new(
            CurveMetadata::discount_factor("USD-Disc", DayCountConvention::Act365Fixed),
            vec![0.1, 10.0],
            vec![0.96, 0.96],
            InterpolationMethod::LogLinear,
        )
        .unwrap();
        let dfs = SimpleDiscountFactors::new(Currency::Usd, valuation(), curve).unwrap();
        let date = valuation().add_days(56);
        assert_relative_eq!(dfs.discount_factor(date).unwrap(), 0.96, epsilon = 1e-14);

        let t = dfs.relative_year_fraction(date);
        assert_relative_eq!(dfs.zero_rate(date).unwrap(), -0.96f64.ln() / t, epsilon = 1e-12);
    }

    #[test]
    fn test_simple_parameter_sensitivity_matches_node_bump() {
        let curve = NodalCurve::new(
            CurveMetadata::discount_factor("USD-Disc", DayCountConvention::Act365Fixed),
            vec![0.5, 2.0],
            vec![0.99, 0.95],
            InterpolationMethod::LogLinear,
        )
        .unwrap();
        let dfs = SimpleDiscountFactors::new(Currency::Usd, valuation(), curve).unwrap();
        let date = valuation().add_days(365);
        let point = dfs.zero_rate_point_sensitivity(date).unwrap();
        let param = dfs.parameter_sensitivity(&point).unwrap();

        // Bump each stored discount factor node and difference the output DF.
        let eps = 1e-7;
        for i in 0..dfs.parameter_count() {
            let v = dfs.curve().values()[i];
            let up = dfs.with_parameter(i, v + eps).unwrap();
            let down = dfs.with_parameter(i, v - eps).unwrap();
            let fd = (up.discount_factor(date).unwrap() - down.discount_factor(date).unwrap())
                / (2.0 * eps);
            assert_relative_eq!(param.sensitivity()[i], fd, epsilon = 1e-7);
        }
    }

    #[test]
    fn test_with_parameter_bumps_discounting() {
        let dfs = continuous();
        let date = valuation().add_days(365);
        let base = dfs.discount_factor(date).unwrap();
        let bumped = dfs.with_parameter(1, 0.020).unwrap();
        assert!(bumped.discount_factor(date).unwrap() < base);
        // Original untouched.
        assert_relative_eq!(dfs.discount_factor(date).unwrap(), base);
    }
}
