//! Interpolation methods for curve construction.
//!
//! # Available Methods
//!
//! - [`LinearInterpolator`]: Linear interpolation on the stored values
//! - [`LogLinearInterpolator`]: Linear interpolation on the log of the values
//!
//! # Choosing a Method
//!
//! | Method | Smoothness | Positive Values | Use Case |
//! |--------|------------|-----------------|----------|
//! | Linear | C0 | No | Zero-rate curves |
//! | Log-Linear | C0 | Yes | Discount-factor and price-index curves |
//!
//! Both methods extrapolate linearly (in the interpolated space) using the
//! slope of the end segment when extrapolation is enabled. The extrapolation
//! rule matters for sensitivities: `node_weights` uses the same segment
//! formula outside the range, so analytic parameter sensitivities remain
//! consistent with bump-and-reprice beyond the last node.

mod linear;
mod log_linear;

pub use linear::LinearInterpolator;
pub use log_linear::LogLinearInterpolator;

use crate::error::MathResult;

/// Trait for interpolation methods.
///
/// All interpolation methods implement this trait, providing a unified
/// interface for curve construction and sensitivity distribution.
pub trait Interpolator: Send + Sync {
    /// Returns the interpolated value at x.
    fn interpolate(&self, x: f64) -> MathResult<f64>;

    /// Returns the first derivative with respect to x.
    ///
    /// Needed for discount factor time derivatives.
    fn derivative(&self, x: f64) -> MathResult<f64>;

    /// Returns the partial derivatives of the interpolated value with
    /// respect to each node value.
    ///
    /// The returned vector has one entry per node. For piecewise methods at
    /// most two entries are non-zero. This is the sensitivity basis used to
    /// convert point sensitivities into per-parameter sensitivities, so it
    /// must be the exact gradient of [`interpolate`](Self::interpolate) in
    /// the node values.
    fn node_weights(&self, x: f64) -> MathResult<Vec<f64>>;

    /// Returns true if extrapolation is allowed.
    fn allows_extrapolation(&self) -> bool {
        false
    }

    /// Returns the minimum x value in the data.
    fn min_x(&self) -> f64;

    /// Returns the maximum x value in the data.
    fn max_x(&self) -> f64;

    /// Checks if x is within the interpolation range.
    fn in_range(&self, x: f64) -> bool {
        x >= self.min_x() && x <= self.max_x()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // Gradient check shared by both interpolators: node_weights must match
    // central finite differences of interpolate under node bumps.
    fn check_node_weights<F>(make: F, xs: &[f64], ys: &[f64], queries: &[f64])
    where
        F: Fn(Vec<f64>, Vec<f64>) -> Box<dyn Interpolator>,
    {
        let eps = 1e-7;
        let base = make(xs.to_vec(), ys.to_vec());

        for &x in queries {
            let weights = base.node_weights(x).unwrap();
            assert_eq!(weights.len(), ys.len());

            for i in 0..ys.len() {
                let mut up = ys.to_vec();
                let mut down = ys.to_vec();
                up[i] += eps;
                down[i] -= eps;

                let v_up = make(xs.to_vec(), up).interpolate(x).unwrap();
                let v_down = make(xs.to_vec(), down).interpolate(x).unwrap();
                let fd = (v_up - v_down) / (2.0 * eps);

                assert_relative_eq!(weights[i], fd, epsilon = 1e-6, max_relative = 1e-6);
            }
        }
    }

    #[test]
    fn test_linear_node_weights_match_fd() {
        let xs = [0.25, 1.0, 3.0, 7.0];
        let ys = [0.01, 0.015, 0.02, 0.025];
        check_node_weights(
            |x, y| Box::new(LinearInterpolator::new(x, y).unwrap().with_extrapolation()),
            &xs,
            &ys,
            &[0.1, 0.25, 0.6, 1.0, 2.5, 7.0, 9.0],
        );
    }

    #[test]
    fn test_log_linear_node_weights_match_fd() {
        let xs = [0.5, 1.0, 2.0, 5.0];
        let ys = [0.99, 0.97, 0.93, 0.82];
        check_node_weights(
            |x, y| {
                Box::new(
                    LogLinearInterpolator::new(x, y)
                        .unwrap()
                        .with_extrapolation(),
                )
            },
            &xs,
            &ys,
            &[0.2, 0.5, 1.5, 3.0, 5.0, 6.0],
        );
    }
}
