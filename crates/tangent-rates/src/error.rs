//! Error types for discounting and sensitivity calculations.

use thiserror::Error;

use tangent_core::types::{Currency, Date, YearMonth};
use tangent_curves::CurveError;

/// A specialized Result type for pricing operations.
pub type PricingResult<T> = Result<T, PricingError>;

/// Error types for rate and sensitivity calculations.
///
/// Three families: configuration errors are raised eagerly when a composite
/// object is constructed from mismatched inputs; domain errors mean the
/// caller asked for something this object does not cover; calculation errors
/// mean a required market observation is absent at computation time. A
/// failed computation is never replaced by zero or NaN.
#[derive(Error, Debug, Clone)]
pub enum PricingError {
    /// Malformed or mismatched inputs at construction time.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the problem.
        message: String,
    },

    /// The caller asked for something this object does not support.
    #[error("Unsupported request: {message}")]
    Domain {
        /// Description of the unsupported request.
        message: String,
    },

    /// No curve or rate source covers the requested currency.
    #[error("Unsupported currency {currency} in {context}")]
    UnsupportedCurrency {
        /// The unsupported currency code.
        currency: &'static str,
        /// Where the lookup failed.
        context: String,
    },

    /// No rate source covers the requested index.
    #[error("Unsupported index {index} in {context}")]
    UnsupportedIndex {
        /// The unsupported index name.
        index: &'static str,
        /// Where the lookup failed.
        context: String,
    },

    /// A required historical fixing is absent.
    #[error("Missing fixing for {index} on {date}")]
    MissingFixing {
        /// Name of the index.
        index: &'static str,
        /// Fixing date with no recorded value.
        date: Date,
    },

    /// A required historical price index value is absent.
    #[error("Missing price index value for {index} in {month}")]
    MissingIndexValue {
        /// Name of the price index.
        index: &'static str,
        /// Reference month with no recorded value.
        month: YearMonth,
    },

    /// Point sensitivity routed to a source that does not own it.
    #[error("Sensitivity key {key} cannot be routed in {context}")]
    UnroutableSensitivity {
        /// Short description of the key.
        key: String,
        /// Where the routing failed.
        context: String,
    },

    /// Underlying curve operation failed.
    #[error("Curve error: {0}")]
    Curve(#[from] CurveError),

    /// Underlying core operation failed.
    #[error("Core error: {0}")]
    Core(#[from] tangent_core::CoreError),
}

impl PricingError {
    /// Creates a configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a domain error.
    #[must_use]
    pub fn domain(message: impl Into<String>) -> Self {
        Self::Domain {
            message: message.into(),
        }
    }

    /// Creates an unsupported currency error.
    #[must_use]
    pub fn unsupported_currency(currency: Currency, context: impl Into<String>) -> Self {
        Self::UnsupportedCurrency {
            currency: currency.code(),
            context: context.into(),
        }
    }

    /// Creates a missing fixing error.
    #[must_use]
    pub fn missing_fixing(index: &'static str, date: Date) -> Self {
        Self::MissingFixing { index, date }
    }
}
