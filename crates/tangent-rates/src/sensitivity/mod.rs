//! Sensitivity value types.
//!
//! Two representations, connected by the rates provider:
//!
//! - [`PointSensitivity`] / [`PointSensitivities`]: derivatives against
//!   individual curve observations, accumulated during a pricing walk.
//! - [`CurrencyParameterSensitivity`] / [`CurrencyParameterSensitivities`]:
//!   derivatives against curve node values, produced by routing point
//!   sensitivities through the owning curve's interpolation weights.

mod parameter;
mod point;

pub use parameter::{CurrencyParameterSensitivities, CurrencyParameterSensitivity};
pub use point::{
    PointSensitivities, PointSensitivity, PointSensitivityBuilder, SensitivityKey,
    NEGLIGIBLE_SENSITIVITY,
};
