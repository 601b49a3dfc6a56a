//! Rate index conventions.
//!
//! Indices are closed enums rather than open registries: the engine receives
//! resolved observations from upstream schedule generation, so the convention
//! data it needs per index is small and fixed. Business-day arithmetic uses
//! the weekend-only calendar from `tangent-core`; holiday handling belongs to
//! the schedule layer.

use serde::{Deserialize, Serialize};
use std::fmt;

use tangent_core::daycounts::DayCountConvention;
use tangent_core::types::{Currency, Date};

use crate::error::{PricingError, PricingResult};

/// Overnight rate index conventions.
///
/// The two convention parameters that matter for sensitivity propagation are
/// the publication lag (whether the fixing for date `d` is published on `d`
/// or the next business day) and the effective-date offset (whether the
/// deposit period starts on `d` or the next business day).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OvernightIndex {
    /// USD Fed Funds effective rate. Published one business day in arrears.
    UsdFedFund,
    /// GBP SONIA.
    GbpSonia,
    /// CHF SARON. Deposit period starts one business day after the fixing.
    ChfSaron,
    /// EUR ESTR.
    EurEstr,
}

impl OvernightIndex {
    /// Returns the conventional index name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::UsdFedFund => "USD-FED-FUND",
            Self::GbpSonia => "GBP-SONIA",
            Self::ChfSaron => "CHF-SARON",
            Self::EurEstr => "EUR-ESTR",
        }
    }

    /// Returns the index currency.
    #[must_use]
    pub fn currency(&self) -> Currency {
        match self {
            Self::UsdFedFund => Currency::Usd,
            Self::GbpSonia => Currency::Gbp,
            Self::ChfSaron => Currency::Chf,
            Self::EurEstr => Currency::Eur,
        }
    }

    /// Returns the accrual day count convention.
    #[must_use]
    pub fn day_count(&self) -> DayCountConvention {
        match self {
            Self::GbpSonia => DayCountConvention::Act365Fixed,
            _ => DayCountConvention::Act360,
        }
    }

    /// Returns the publication lag in business days (0 or 1).
    #[must_use]
    pub fn publication_lag(&self) -> i32 {
        match self {
            Self::UsdFedFund => 1,
            _ => 0,
        }
    }

    /// Returns the effective-date offset in business days (0 or 1).
    #[must_use]
    pub fn effective_date_offset(&self) -> i32 {
        match self {
            Self::ChfSaron => 1,
            _ => 0,
        }
    }

    /// Returns the date the fixing for `fixing_date` is published.
    #[must_use]
    pub fn publication_date(&self, fixing_date: Date) -> Date {
        fixing_date.add_business_days(self.publication_lag())
    }

    /// Returns the start of the deposit period for a fixing date.
    #[must_use]
    pub fn effective_date(&self, fixing_date: Date) -> Date {
        fixing_date.add_business_days(self.effective_date_offset())
    }

    /// Returns the fixing date whose deposit period starts on `effective`.
    #[must_use]
    pub fn fixing_from_effective(&self, effective: Date) -> Date {
        effective.add_business_days(-self.effective_date_offset())
    }

    /// Returns the end of the deposit period starting at `effective`.
    #[must_use]
    pub fn maturity_date(&self, effective: Date) -> Date {
        effective.add_business_days(1)
    }

    /// Returns the (start, end) deposit period for a fixing date.
    #[must_use]
    pub fn accrual_period(&self, fixing_date: Date) -> (Date, Date) {
        let start = self.effective_date(fixing_date);
        (start, self.maturity_date(start))
    }

    /// Returns the accrual factor of the deposit period for a fixing date.
    #[must_use]
    pub fn accrual_factor(&self, fixing_date: Date) -> f64 {
        let (start, end) = self.accrual_period(fixing_date);
        self.day_count().year_fraction(start, end)
    }
}

impl fmt::Display for OvernightIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Term deposit (Ibor-style) index conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IborIndex {
    /// USD LIBOR 3 month.
    UsdLibor3M,
    /// EUR EURIBOR 3 month.
    EurEuribor3M,
    /// EUR EURIBOR 6 month.
    EurEuribor6M,
}

impl IborIndex {
    /// Returns the conventional index name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::UsdLibor3M => "USD-LIBOR-3M",
            Self::EurEuribor3M => "EUR-EURIBOR-3M",
            Self::EurEuribor6M => "EUR-EURIBOR-6M",
        }
    }

    /// Returns the index currency.
    #[must_use]
    pub fn currency(&self) -> Currency {
        match self {
            Self::UsdLibor3M => Currency::Usd,
            Self::EurEuribor3M | Self::EurEuribor6M => Currency::Eur,
        }
    }

    /// Returns the accrual day count convention.
    #[must_use]
    pub fn day_count(&self) -> DayCountConvention {
        DayCountConvention::Act360
    }

    /// Returns the deposit tenor in months.
    #[must_use]
    pub fn tenor_months(&self) -> i32 {
        match self {
            Self::UsdLibor3M | Self::EurEuribor3M => 3,
            Self::EurEuribor6M => 6,
        }
    }

    /// Returns the spot lag in business days from fixing to effective date.
    #[must_use]
    pub fn spot_lag(&self) -> i32 {
        2
    }

    /// Resolves the full deposit period implied by a fixing date.
    ///
    /// # Errors
    ///
    /// Returns an error if the maturity date falls outside the supported
    /// date range.
    pub fn observation(&self, fixing_date: Date) -> PricingResult<IborRateObservation> {
        let effective_date = fixing_date.add_business_days(self.spot_lag());
        let maturity_date = effective_date
            .add_months(self.tenor_months())
            .map_err(PricingError::from)?
            .next_weekday();
        let year_fraction = self.day_count().year_fraction(effective_date, maturity_date);
        Ok(IborRateObservation {
            index: *self,
            fixing_date,
            effective_date,
            maturity_date,
            year_fraction,
        })
    }
}

impl fmt::Display for IborIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A fully-resolved term rate observation.
///
/// Carries the deposit period dates alongside the fixing date so that rate
/// and sensitivity computations never re-derive calendar arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IborRateObservation {
    /// The observed index.
    pub index: IborIndex,
    /// Date the rate fixes.
    pub fixing_date: Date,
    /// Start of the deposit period.
    pub effective_date: Date,
    /// End of the deposit period.
    pub maturity_date: Date,
    /// Accrual factor of the deposit period under the index day count.
    pub year_fraction: f64,
}

/// Price index conventions for inflation observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PriceIndex {
    /// US CPI for All Urban Consumers, non-seasonally adjusted.
    UsCpiU,
    /// UK Retail Price Index.
    GbRpi,
    /// Eurozone HICP excluding tobacco.
    EuHicp,
}

impl PriceIndex {
    /// Returns the conventional index name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::UsCpiU => "US-CPI-U",
            Self::GbRpi => "GB-RPI",
            Self::EuHicp => "EU-HICP",
        }
    }

    /// Returns the index currency.
    #[must_use]
    pub fn currency(&self) -> Currency {
        match self {
            Self::UsCpiU => Currency::Usd,
            Self::GbRpi => Currency::Gbp,
            Self::EuHicp => Currency::Eur,
        }
    }

    /// Returns the publication lag in months.
    ///
    /// The value for reference month `m` is considered published once the
    /// valuation month reaches `m + lag`.
    #[must_use]
    pub fn publication_lag_months(&self) -> i32 {
        3
    }
}

impl fmt::Display for PriceIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_fed_fund_conventions() {
        let index = OvernightIndex::UsdFedFund;
        assert_eq!(index.currency(), Currency::Usd);
        assert_eq!(index.publication_lag(), 1);
        assert_eq!(index.effective_date_offset(), 0);

        // 2014-01-17 is a Friday; publication the following Monday.
        let fri = Date::from_ymd(2014, 1, 17).unwrap();
        assert_eq!(index.publication_date(fri), Date::from_ymd(2014, 1, 20).unwrap());
    }

    #[test]
    fn test_saron_effective_offset() {
        let index = OvernightIndex::ChfSaron;
        let fri = Date::from_ymd(2014, 1, 17).unwrap();
        let (start, end) = index.accrual_period(fri);
        assert_eq!(start, Date::from_ymd(2014, 1, 20).unwrap());
        assert_eq!(end, Date::from_ymd(2014, 1, 21).unwrap());
        assert_eq!(index.fixing_from_effective(start), fri);
    }

    #[test]
    fn test_overnight_accrual_factor_over_weekend() {
        let index = OvernightIndex::GbpSonia;
        let fri = Date::from_ymd(2014, 1, 17).unwrap();
        // Friday fixing accrues three calendar days under ACT/365F.
        assert_relative_eq!(index.accrual_factor(fri), 3.0 / 365.0);
    }

    #[test]
    fn test_ibor_observation() {
        let index = IborIndex::UsdLibor3M;
        let fixing = Date::from_ymd(2014, 1, 20).unwrap();
        let obs = index.observation(fixing).unwrap();
        assert_eq!(obs.effective_date, Date::from_ymd(2014, 1, 22).unwrap());
        assert_eq!(obs.maturity_date, Date::from_ymd(2014, 4, 22).unwrap());
        assert!(obs.year_fraction > 0.24 && obs.year_fraction < 0.26);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(format!("{}", OvernightIndex::GbpSonia), "GBP-SONIA");
        assert_eq!(format!("{}", IborIndex::EurEuribor6M), "EUR-EURIBOR-6M");
        assert_eq!(format!("{}", PriceIndex::UsCpiU), "US-CPI-U");
    }
}
