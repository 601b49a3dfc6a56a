//! Error types for curve operations.

use thiserror::Error;

/// A specialized Result type for curve operations.
pub type CurveResult<T> = Result<T, CurveError>;

/// Error types for curve construction and evaluation.
#[derive(Error, Debug, Clone)]
pub enum CurveError {
    /// Not enough nodes for interpolation.
    #[error("Insufficient nodes: need at least {required}, got {got}")]
    InsufficientNodes {
        /// Minimum required nodes.
        required: usize,
        /// Actual number of nodes provided.
        got: usize,
    },

    /// Node times are not strictly increasing.
    #[error("Non-monotonic node times at index {index}: {prev:.6} >= {current:.6}")]
    NonMonotonicTimes {
        /// Index where the violation occurred.
        index: usize,
        /// Previous node time.
        prev: f64,
        /// Current node time.
        current: f64,
    },

    /// Times and values have different lengths.
    #[error("Length mismatch: {times} node times vs {values} values")]
    LengthMismatch {
        /// Number of node times.
        times: usize,
        /// Number of node values.
        values: usize,
    },

    /// Parameter index out of range.
    #[error("Parameter index {index} out of range for curve with {count} parameters")]
    ParameterIndexOutOfRange {
        /// Requested parameter index.
        index: usize,
        /// Number of curve parameters.
        count: usize,
    },

    /// Malformed curve metadata.
    #[error("Invalid metadata for curve '{name}': {reason}")]
    InvalidMetadata {
        /// Name of the offending curve.
        name: String,
        /// Description of the problem.
        reason: String,
    },

    /// Interpolation failed.
    #[error("Interpolation error: {0}")]
    Interpolation(#[from] tangent_math::MathError),
}

impl CurveError {
    /// Creates an insufficient nodes error.
    #[must_use]
    pub fn insufficient_nodes(required: usize, got: usize) -> Self {
        Self::InsufficientNodes { required, got }
    }

    /// Creates a non-monotonic times error.
    #[must_use]
    pub fn non_monotonic_times(index: usize, prev: f64, current: f64) -> Self {
        Self::NonMonotonicTimes {
            index,
            prev,
            current,
        }
    }

    /// Creates an invalid metadata error.
    #[must_use]
    pub fn invalid_metadata(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidMetadata {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CurveError::insufficient_nodes(2, 1);
        assert!(format!("{err}").contains("need at least 2"));

        let err = CurveError::non_monotonic_times(3, 2.0, 1.5);
        assert!(format!("{err}").contains("index 3"));

        let err = CurveError::invalid_metadata("USD-Disc", "missing day count");
        assert!(format!("{err}").contains("USD-Disc"));
    }
}
