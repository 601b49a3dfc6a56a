//! # Tangent Curves
//!
//! Nodal curve structure for the Tangent discounting and sensitivity engine.
//!
//! This crate provides:
//!
//! - **[`NodalCurve`]**: immutable (time, value) curve with metadata and
//!   interpolation
//! - **[`CurveMetadata`]**: value type, day count, and optional compounding
//!   frequency describing what the node values mean
//! - **Sensitivity basis**: [`NodalCurve::parameter_sensitivities`]
//!   distributes a point sensitivity at one time across the curve's node
//!   parameters via the interpolation weight row
//!
//! Curves are pre-calibrated inputs here; solving for node values from
//! market instruments lives with the calibrator, not in this crate.
//!
//! ## Quick Start
//!
//! ```rust
//! use tangent_curves::prelude::*;
//! use tangent_core::daycounts::DayCountConvention;
//!
//! let metadata = CurveMetadata::zero_rate("USD-Disc", DayCountConvention::Act365Fixed);
//! let curve = NodalCurve::new(
//!     metadata,
//!     vec![0.25, 1.0, 3.0, 7.0],
//!     vec![0.010, 0.014, 0.018, 0.021],
//!     InterpolationMethod::Linear,
//! )
//! .unwrap();
//!
//! let z = curve.value_at(2.0).unwrap();
//! assert!(z > 0.014 && z < 0.018);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod curve;
pub mod error;
pub mod interpolation;
pub mod metadata;
pub mod value_type;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::curve::NodalCurve;
    pub use crate::error::{CurveError, CurveResult};
    pub use crate::interpolation::InterpolationMethod;
    pub use crate::metadata::{CurveMetadata, CurveName};
    pub use crate::value_type::ValueType;
}

pub use curve::NodalCurve;
pub use error::{CurveError, CurveResult};
pub use interpolation::InterpolationMethod;
pub use metadata::{CurveMetadata, CurveName};
pub use value_type::ValueType;
