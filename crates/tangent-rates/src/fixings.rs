//! Historical fixing time series.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use tangent_core::types::Date;

/// An immutable time series of recorded index fixings.
///
/// Dates at or before the valuation date with a recorded fixing take
/// priority over the forward curve; the priority rule itself lives with the
/// rate sources, this is plain keyed storage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FixingSeries {
    fixings: BTreeMap<Date, f64>,
}

impl FixingSeries {
    /// Creates an empty series.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a series from (date, rate) pairs.
    #[must_use]
    pub fn of(entries: impl IntoIterator<Item = (Date, f64)>) -> Self {
        Self {
            fixings: entries.into_iter().collect(),
        }
    }

    /// Returns a new series with one additional fixing.
    #[must_use]
    pub fn with_fixing(&self, date: Date, rate: f64) -> Self {
        let mut fixings = self.fixings.clone();
        fixings.insert(date, rate);
        Self { fixings }
    }

    /// Returns the fixing recorded on the given date, if any.
    #[must_use]
    pub fn value_on(&self, date: Date) -> Option<f64> {
        self.fixings.get(&date).copied()
    }

    /// Returns the most recent fixing at or before the given date.
    #[must_use]
    pub fn latest_on_or_before(&self, date: Date) -> Option<(Date, f64)> {
        self.fixings
            .range(..=date)
            .next_back()
            .map(|(d, r)| (*d, *r))
    }

    /// Returns true if no fixings are recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fixings.is_empty()
    }

    /// Returns the number of recorded fixings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fixings.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> Date {
        Date::from_ymd(2014, 1, d).unwrap()
    }

    #[test]
    fn test_lookup() {
        let series = FixingSeries::of([(date(20), 0.0009), (date(21), 0.0010)]);
        assert_eq!(series.value_on(date(20)), Some(0.0009));
        assert_eq!(series.value_on(date(22)), None);
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn test_latest_on_or_before() {
        let series = FixingSeries::of([(date(17), 0.0008), (date(20), 0.0009)]);
        assert_eq!(series.latest_on_or_before(date(19)), Some((date(17), 0.0008)));
        assert_eq!(series.latest_on_or_before(date(16)), None);
    }

    #[test]
    fn test_with_fixing_is_immutable() {
        let base = FixingSeries::empty();
        let extended = base.with_fixing(date(20), 0.0009);
        assert!(base.is_empty());
        assert_eq!(extended.value_on(date(20)), Some(0.0009));
    }
}
