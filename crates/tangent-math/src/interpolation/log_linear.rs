//! Log-linear interpolation.
//!
//! Interpolates the logarithm of values, which is useful for discount factors
//! and price indices as it guarantees positive values.

use crate::error::{MathError, MathResult};
use crate::interpolation::Interpolator;

/// Log-linear interpolation between data points.
///
/// Interpolates the natural logarithm of the y values, then exponentiates.
/// Commonly used for discount factor interpolation as it:
/// - Guarantees positive interpolated values
/// - Produces piecewise constant forward rates
///
/// The interpolation formula is:
/// ```text
/// y(x) = exp(linear_interpolate(x, ln(y)))
/// ```
///
/// # Example
///
/// ```rust
/// use tangent_math::interpolation::{LogLinearInterpolator, Interpolator};
///
/// let times = vec![0.25, 1.0, 2.0, 3.0];
/// let discount_factors = vec![0.995, 0.97, 0.94, 0.91];
///
/// let interp = LogLinearInterpolator::new(times, discount_factors).unwrap();
/// let df = interp.interpolate(1.5).unwrap();
/// assert!(df > 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct LogLinearInterpolator {
    xs: Vec<f64>,
    ys: Vec<f64>,
    /// Precomputed log(y) values.
    log_ys: Vec<f64>,
    allow_extrapolation: bool,
}

impl LogLinearInterpolator {
    /// Creates a new log-linear interpolator.
    ///
    /// # Arguments
    ///
    /// * `xs` - X coordinates (must be strictly increasing)
    /// * `ys` - Y coordinates (must all be positive)
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - There are fewer than 2 points
    /// - Lengths differ
    /// - Any y value is non-positive
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        if xs.len() < 2 {
            return Err(MathError::insufficient_data(2, xs.len()));
        }
        if xs.len() != ys.len() {
            return Err(MathError::invalid_input(format!(
                "xs and ys must have same length: {} vs {}",
                xs.len(),
                ys.len()
            )));
        }

        for i in 1..xs.len() {
            if xs[i] <= xs[i - 1] {
                return Err(MathError::invalid_input(
                    "x values must be strictly increasing",
                ));
            }
        }

        let mut log_ys = Vec::with_capacity(ys.len());
        for (i, &y) in ys.iter().enumerate() {
            if y <= 0.0 {
                return Err(MathError::invalid_input(format!(
                    "y[{i}] = {y} is not positive; log-linear requires positive values"
                )));
            }
            log_ys.push(y.ln());
        }

        Ok(Self {
            xs,
            ys,
            log_ys,
            allow_extrapolation: false,
        })
    }

    /// Enables extrapolation beyond the data range.
    #[must_use]
    pub fn with_extrapolation(mut self) -> Self {
        self.allow_extrapolation = true;
        self
    }

    /// Finds the index i such that xs[i] <= x < xs[i+1], clamped to the
    /// end segments.
    fn find_segment(&self, x: f64) -> usize {
        match self
            .xs
            .binary_search_by(|probe| probe.partial_cmp(&x).unwrap_or(std::cmp::Ordering::Equal))
        {
            Ok(i) => i.min(self.xs.len() - 2),
            Err(i) => (i.saturating_sub(1)).min(self.xs.len() - 2),
        }
    }

    fn check_bounds(&self, x: f64) -> MathResult<()> {
        if !self.allow_extrapolation && (x < self.xs[0] || x > self.xs[self.xs.len() - 1]) {
            return Err(MathError::ExtrapolationNotAllowed {
                x,
                min: self.xs[0],
                max: self.xs[self.xs.len() - 1],
            });
        }
        Ok(())
    }

    /// Returns the original y values.
    #[must_use]
    pub fn y_values(&self) -> &[f64] {
        &self.ys
    }
}

impl Interpolator for LogLinearInterpolator {
    fn interpolate(&self, x: f64) -> MathResult<f64> {
        self.check_bounds(x)?;

        let i = self.find_segment(x);
        let s = (x - self.xs[i]) / (self.xs[i + 1] - self.xs[i]);
        let log_y = self.log_ys[i] + s * (self.log_ys[i + 1] - self.log_ys[i]);
        Ok(log_y.exp())
    }

    fn derivative(&self, x: f64) -> MathResult<f64> {
        self.check_bounds(x)?;

        let i = self.find_segment(x);
        let slope = (self.log_ys[i + 1] - self.log_ys[i]) / (self.xs[i + 1] - self.xs[i]);

        // d/dx exp(L(x)) = exp(L(x)) * L'(x)
        Ok(self.interpolate(x)? * slope)
    }

    fn node_weights(&self, x: f64) -> MathResult<Vec<f64>> {
        self.check_bounds(x)?;

        let i = self.find_segment(x);
        let s = (x - self.xs[i]) / (self.xs[i + 1] - self.xs[i]);
        let value = self.interpolate(x)?;

        // y(x) = exp((1-s) ln y_i + s ln y_{i+1})
        // dy/dy_i = y(x) * (1-s) / y_i
        let mut weights = vec![0.0; self.ys.len()];
        weights[i] = value * (1.0 - s) / self.ys[i];
        weights[i + 1] = value * s / self.ys[i + 1];
        Ok(weights)
    }

    fn allows_extrapolation(&self) -> bool {
        self.allow_extrapolation
    }

    fn min_x(&self) -> f64 {
        self.xs[0]
    }

    fn max_x(&self) -> f64 {
        self.xs[self.xs.len() - 1]
    }
}
