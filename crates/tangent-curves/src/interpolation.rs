//! Interpolation method selection for nodal curves.

use serde::{Deserialize, Serialize};

/// Interpolation methods available for nodal curves.
///
/// Both methods extrapolate by extending the end segment, which keeps the
/// node sensitivity basis consistent with bump-and-reprice outside the node
/// range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum InterpolationMethod {
    /// Linear interpolation on the node values (zero-rate curves).
    #[default]
    Linear,

    /// Linear interpolation on the log of the node values (discount-factor
    /// and price-index curves).
    LogLinear,
}

impl std::fmt::Display for InterpolationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Linear => "Linear",
            Self::LogLinear => "Log-Linear",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", InterpolationMethod::Linear), "Linear");
        assert_eq!(format!("{}", InterpolationMethod::LogLinear), "Log-Linear");
    }
}
