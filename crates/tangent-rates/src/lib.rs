//! # Tangent Rates
//!
//! Discounting, forward rates, and analytic sensitivity propagation for the
//! Tangent engine.
//!
//! This crate provides:
//!
//! - **[`DiscountFactors`](discount::DiscountFactors)**: discount factors
//!   and zero rates from a pre-calibrated curve, continuous or periodic,
//!   with optional z-spread adjustment
//! - **Index rates**: overnight, term, and price index forward estimation
//!   with recorded-fixing priority in [`index_rates`]
//! - **Rate computations**: averaged and compounded overnight accruals,
//!   weighted term averages, and interpolated inflation rates in
//!   [`compute`]
//! - **Sensitivities**: point sensitivities keyed by market risk factor in
//!   [`sensitivity`], routed to per-curve parameter vectors by the
//!   [`RatesProvider`](provider::RatesProvider)
//! - **Validation**: a central finite-difference calculator in [`fd`] that
//!   bumps every curve node and revalues
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use tangent_core::daycounts::DayCountConvention;
//! use tangent_core::types::{Currency, Date};
//! use tangent_curves::prelude::*;
//! use tangent_rates::discount::{DiscountFactors, ZeroRateDiscountFactors};
//! use tangent_rates::provider::RatesProvider;
//!
//! let valuation = Date::from_ymd(2014, 1, 22).unwrap();
//! let curve = NodalCurve::new(
//!     CurveMetadata::zero_rate("USD-Disc", DayCountConvention::Act365Fixed),
//!     vec![0.25, 1.0, 5.0],
//!     vec![0.0010, 0.0025, 0.0080],
//!     InterpolationMethod::Linear,
//! )
//! .unwrap();
//! let dfs: Arc<dyn DiscountFactors> =
//!     Arc::new(ZeroRateDiscountFactors::new(Currency::Usd, valuation, curve).unwrap());
//! let provider = RatesProvider::builder(valuation)
//!     .discount_curve(Currency::Usd, dfs)
//!     .unwrap()
//!     .build();
//!
//! let df = provider
//!     .discount_factor(Currency::Usd, Date::from_ymd(2015, 1, 22).unwrap())
//!     .unwrap();
//! assert!(df < 1.0 && df > 0.99);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod compute;
pub mod discount;
pub mod error;
pub mod fd;
pub mod fixings;
pub mod index;
pub mod index_rates;
pub mod provider;
pub mod sensitivity;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::compute::{
        ExplainedRate, ExplainedRateEntry, IborAveragedRateComputation,
        InflationInterpolatedRateComputation, OvernightAveragedRateComputation,
        OvernightCompoundedRateComputation, RateComputation, RateSource,
    };
    pub use crate::discount::{
        DiscountFactors, SimpleDiscountFactors, SpreadCompounding, ZeroRateDiscountFactors,
        ZeroRatePeriodicDiscountFactors,
    };
    pub use crate::error::{PricingError, PricingResult};
    pub use crate::fd::RatesFiniteDifferenceCalculator;
    pub use crate::fixings::FixingSeries;
    pub use crate::index::{IborIndex, IborRateObservation, OvernightIndex, PriceIndex};
    pub use crate::index_rates::{
        DiscountIborIndexRates, DiscountOvernightIndexRates, SimplePriceIndexValues,
    };
    pub use crate::provider::{CurveId, FxMatrix, RatesProvider, RatesProviderBuilder};
    pub use crate::sensitivity::{
        CurrencyParameterSensitivities, CurrencyParameterSensitivity, PointSensitivities,
        PointSensitivity, PointSensitivityBuilder, SensitivityKey,
    };
}

pub use error::{PricingError, PricingResult};
pub use provider::RatesProvider;
