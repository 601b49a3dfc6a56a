//! Structured rate breakdowns for audit and reporting.

use serde::{Deserialize, Serialize};
use std::fmt;

use tangent_core::types::Date;

/// Where the rate of one sub-observation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RateSource {
    /// A recorded historical fixing.
    HistoricFixing,
    /// Estimated from the forward curve.
    Forward,
    /// Frozen to an earlier fixing by the rate-cutoff convention.
    RateCutoff,
}

impl fmt::Display for RateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::HistoricFixing => "HistoricFixing",
            Self::Forward => "Forward",
            Self::RateCutoff => "RateCutoff",
        };
        write!(f, "{name}")
    }
}

/// One sub-observation of an explained rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExplainedRateEntry {
    /// Date the contributing rate fixes.
    pub fixing_date: Date,
    /// Start of the sub-observation's accrual period.
    pub start_date: Date,
    /// End of the sub-observation's accrual period.
    pub end_date: Date,
    /// The contributing rate (or index value for inflation).
    pub rate: f64,
    /// The accrual-factor weight the rate enters the blend with.
    pub accrual_factor: f64,
    /// Where the rate came from.
    pub source: RateSource,
}

/// A blended rate together with its per-sub-observation breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplainedRate {
    rate: f64,
    entries: Vec<ExplainedRateEntry>,
}

impl ExplainedRate {
    /// Creates an explained rate.
    #[must_use]
    pub fn new(rate: f64, entries: Vec<ExplainedRateEntry>) -> Self {
        Self { rate, entries }
    }

    /// The blended rate, identical to the computation's `rate` output.
    #[must_use]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// The per-sub-observation entries, in period order.
    #[must_use]
    pub fn entries(&self) -> &[ExplainedRateEntry] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_accessors() {
        assert_eq!(format!("{}", RateSource::RateCutoff), "RateCutoff");
        let explained = ExplainedRate::new(0.0025, Vec::new());
        assert_eq!(explained.rate(), 0.0025);
        assert!(explained.entries().is_empty());
    }

    #[test]
    fn test_serializes_for_reporting() {
        let entry = ExplainedRateEntry {
            fixing_date: Date::from_ymd(2014, 1, 20).unwrap(),
            start_date: Date::from_ymd(2014, 1, 20).unwrap(),
            end_date: Date::from_ymd(2014, 1, 21).unwrap(),
            rate: 0.0009,
            accrual_factor: 1.0 / 360.0,
            source: RateSource::HistoricFixing,
        };
        let explained = ExplainedRate::new(0.0009, vec![entry]);
        let json = serde_json::to_string(&explained).unwrap();
        let back: ExplainedRate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, explained);
        assert!(json.contains("HistoricFixing"));
    }
}
