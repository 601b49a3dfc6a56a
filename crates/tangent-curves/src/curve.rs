//! Nodal curve implementation.
//!
//! A [`NodalCurve`] is constructed from discrete (time, value) nodes with
//! interpolation between them. The node values are the curve's parameters:
//! sensitivity vectors produced elsewhere in the engine have exactly one
//! entry per node.

use std::sync::Arc;

use tangent_math::interpolation::{Interpolator, LinearInterpolator, LogLinearInterpolator};

use crate::error::{CurveError, CurveResult};
use crate::interpolation::InterpolationMethod;
use crate::metadata::{CurveMetadata, CurveName};

/// An immutable curve defined by interpolated nodes.
///
/// Node times must be strictly increasing; queries outside the node range
/// extrapolate by extending the end segment. Every mutator returns a new
/// curve instance, re-running construction validation.
///
/// # Example
///
/// ```rust
/// use tangent_curves::{CurveMetadata, InterpolationMethod, NodalCurve};
/// use tangent_core::daycounts::DayCountConvention;
///
/// let curve = NodalCurve::new(
///     CurveMetadata::zero_rate("USD-Disc", DayCountConvention::Act365Fixed),
///     vec![0.5, 1.0, 2.0, 5.0],
///     vec![0.011, 0.012, 0.014, 0.017],
///     InterpolationMethod::Linear,
/// )
/// .unwrap();
///
/// let bumped = curve.with_parameter(2, 0.015).unwrap();
/// assert_ne!(curve.value_at(2.0).unwrap(), bumped.value_at(2.0).unwrap());
/// ```
#[derive(Clone)]
pub struct NodalCurve {
    metadata: CurveMetadata,
    times: Vec<f64>,
    values: Vec<f64>,
    interpolation: InterpolationMethod,
    interpolator: Arc<dyn Interpolator>,
}

impl std::fmt::Debug for NodalCurve {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodalCurve")
            .field("metadata", &self.metadata)
            .field("times", &self.times)
            .field("values", &self.values)
            .field("interpolation", &self.interpolation)
            .finish()
    }
}

impl NodalCurve {
    /// Creates a new nodal curve.
    ///
    /// # Arguments
    ///
    /// * `metadata` - What the node values represent
    /// * `times` - Node times in years (strictly increasing)
    /// * `values` - Node values, one per time
    /// * `interpolation` - Interpolation method
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Fewer than 2 nodes are provided
    /// - Times and values have different lengths
    /// - Times are not strictly increasing
    /// - The value type requires positive values and one is non-positive
    pub fn new(
        metadata: CurveMetadata,
        times: Vec<f64>,
        values: Vec<f64>,
        interpolation: InterpolationMethod,
    ) -> CurveResult<Self> {
        if times.len() != values.len() {
            return Err(CurveError::LengthMismatch {
                times: times.len(),
                values: values.len(),
            });
        }
        if times.len() < 2 {
            return Err(CurveError::insufficient_nodes(2, times.len()));
        }
        for i in 1..times.len() {
            if times[i] <= times[i - 1] {
                return Err(CurveError::non_monotonic_times(i, times[i - 1], times[i]));
            }
        }
        if metadata.value_type().requires_positive_values() {
            if let Some(&bad) = values.iter().find(|v| **v <= 0.0) {
                return Err(CurveError::invalid_metadata(
                    metadata.name().as_str(),
                    format!("{} curve requires positive values, got {bad}", metadata.value_type()),
                ));
            }
        }

        let interpolator: Arc<dyn Interpolator> = match interpolation {
            InterpolationMethod::Linear => Arc::new(
                LinearInterpolator::new(times.clone(), values.clone())?.with_extrapolation(),
            ),
            InterpolationMethod::LogLinear => Arc::new(
                LogLinearInterpolator::new(times.clone(), values.clone())?.with_extrapolation(),
            ),
        };

        Ok(Self {
            metadata,
            times,
            values,
            interpolation,
            interpolator,
        })
    }

    /// Returns the curve metadata.
    #[must_use]
    pub fn metadata(&self) -> &CurveMetadata {
        &self.metadata
    }

    /// Returns the curve name.
    #[must_use]
    pub fn name(&self) -> &CurveName {
        self.metadata.name()
    }

    /// Returns the node times.
    #[must_use]
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Returns the node values.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Returns the interpolation method.
    #[must_use]
    pub fn interpolation(&self) -> InterpolationMethod {
        self.interpolation
    }

    /// Returns the number of curve parameters (nodes).
    #[must_use]
    pub fn parameter_count(&self) -> usize {
        self.values.len()
    }

    /// Returns the interpolated value at time `t`.
    pub fn value_at(&self, t: f64) -> CurveResult<f64> {
        Ok(self.interpolator.interpolate(t)?)
    }

    /// Returns the first derivative of the curve value with respect to time.
    pub fn derivative_at(&self, t: f64) -> CurveResult<f64> {
        Ok(self.interpolator.derivative(t)?)
    }

    /// Returns the unit sensitivity basis at time `t`.
    ///
    /// Entry `i` is the partial derivative of `value_at(t)` with respect to
    /// node value `i`. The vector length equals [`parameter_count`](Self::parameter_count).
    pub fn node_sensitivities(&self, t: f64) -> CurveResult<Vec<f64>> {
        Ok(self.interpolator.node_weights(t)?)
    }

    /// Distributes a point sensitivity at time `t` across the curve
    /// parameters.
    ///
    /// This is the curve-local step of converting a point sensitivity into a
    /// parameter sensitivity vector: the interpolation weight row at `t`
    /// scaled by the point sensitivity value.
    pub fn parameter_sensitivities(&self, t: f64, point_value: f64) -> CurveResult<Vec<f64>> {
        let mut weights = self.node_sensitivities(t)?;
        for w in &mut weights {
            *w *= point_value;
        }
        Ok(weights)
    }

    /// Returns a new curve with parameter `index` replaced by `value`.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is out of range.
    pub fn with_parameter(&self, index: usize, value: f64) -> CurveResult<Self> {
        if index >= self.values.len() {
            return Err(CurveError::ParameterIndexOutOfRange {
                index,
                count: self.values.len(),
            });
        }
        let mut values = self.values.clone();
        values[index] = value;
        self.with_values(values)
    }

    /// Returns a new curve with all node values replaced.
    pub fn with_values(&self, values: Vec<f64>) -> CurveResult<Self> {
        Self::new(
            self.metadata.clone(),
            self.times.clone(),
            values,
            self.interpolation,
        )
    }

    /// Returns a new curve with every node value shifted by `delta`.
    ///
    /// Meaningful for rate-valued curves; a parallel shift of a
    /// discount-factor curve is rarely what a caller wants.
    pub fn shifted(&self, delta: f64) -> CurveResult<Self> {
        let values = self.values.iter().map(|v| v + delta).collect();
        self.with_values(values)
    }
}
