//! # Tangent Math
//!
//! Interpolation kernels for the Tangent curve engine.
//!
//! This crate provides:
//!
//! - **Interpolation**: Linear and log-linear interpolation with analytic
//!   derivatives in both the query coordinate and the node values
//!
//! The distinguishing feature relative to a generic interpolation library is
//! [`Interpolator::node_weights`]: the row of partial derivatives of the
//! interpolated value with respect to each node value. Curve parameter
//! sensitivities are built directly from these rows, so they must agree
//! exactly with `interpolate` under node bumping.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod error;
pub mod interpolation;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult};
    pub use crate::interpolation::{Interpolator, LinearInterpolator, LogLinearInterpolator};
}

pub use error::{MathError, MathResult};
pub use interpolation::{Interpolator, LinearInterpolator, LogLinearInterpolator};
