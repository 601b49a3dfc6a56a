//! Present value of a fixed payment against a flat discount-factor curve.

use std::sync::Arc;

use tangent_core::daycounts::DayCountConvention;
use tangent_core::types::{Currency, CurrencyAmount, Date};
use tangent_curves::{CurveMetadata, InterpolationMethod, NodalCurve};
use tangent_rates::prelude::*;

const NOTIONAL: f64 = 100_000_000.0;

fn valuation() -> Date {
    Date::from_ymd(2014, 1, 22).unwrap()
}

fn flat_discount_provider(df: f64) -> RatesProvider {
    let curve = NodalCurve::new(
        CurveMetadata::discount_factor("USD-Disc", DayCountConvention::Act365Fixed),
        vec![0.003, 10.0],
        vec![df, df],
        InterpolationMethod::Linear,
    )
    .unwrap();
    let dfs: Arc<dyn DiscountFactors> = Arc::new(
        SimpleDiscountFactors::new(Currency::Usd, valuation(), curve).unwrap(),
    );
    RatesProvider::builder(valuation())
        .discount_curve(Currency::Usd, dfs)
        .unwrap()
        .build()
}

/// Payments strictly before the valuation date are worth nothing.
fn present_value(
    provider: &RatesProvider,
    payment: CurrencyAmount,
    payment_date: Date,
) -> PricingResult<CurrencyAmount> {
    if payment_date < provider.valuation_date() {
        return Ok(CurrencyAmount::zero(payment.currency));
    }
    let df = provider.discount_factor(payment.currency, payment_date)?;
    Ok(payment.multiplied_by(df))
}

#[test]
fn fixed_payment_discounts_at_the_flat_factor() {
    let provider = flat_discount_provider(0.96);
    let payment_date = valuation().add_days(56); // 8 weeks
    let pv = present_value(
        &provider,
        CurrencyAmount::new(Currency::Usd, NOTIONAL),
        payment_date,
    )
    .unwrap();
    assert_eq!(pv.currency, Currency::Usd);
    assert!((pv.amount - 0.96 * NOTIONAL).abs() < 1e-12 * NOTIONAL);
}

#[test]
fn payment_before_valuation_is_worthless() {
    let provider = flat_discount_provider(0.96);
    let pv = present_value(
        &provider,
        CurrencyAmount::new(Currency::Usd, NOTIONAL),
        valuation().add_days(-1),
    )
    .unwrap();
    assert_eq!(pv.amount, 0.0);

    // On the valuation date itself the payment is still alive.
    let alive = present_value(
        &provider,
        CurrencyAmount::new(Currency::Usd, NOTIONAL),
        valuation(),
    )
    .unwrap();
    assert!(alive.amount > 0.0);
}

#[test]
fn pv_sensitivity_routes_to_the_discount_nodes() {
    let provider = flat_discount_provider(0.96);
    let payment_date = valuation().add_days(56);
    let dfs = provider.discount_factors(Currency::Usd).unwrap();

    let point = dfs
        .zero_rate_point_sensitivity(payment_date)
        .unwrap()
        .multiplied_by(NOTIONAL);
    let analytic = provider
        .parameter_sensitivity_of(PointSensitivityBuilder::of(point))
        .unwrap();
    let fd = RatesFiniteDifferenceCalculator::default()
        .sensitivity(&provider, |p| {
            present_value(
                p,
                CurrencyAmount::new(Currency::Usd, NOTIONAL),
                payment_date,
            )
        })
        .unwrap();
    // Scale of the PV is 1e8; compare at a proportionate tolerance.
    assert!(analytic.equal_within_tolerance(&fd, 1e-2));
}
