//! Market data snapshots.
//!
//! A snapshot is a valuation date plus quotes keyed by [`QuoteId`] and fixing
//! history keyed by [`RateIndex`]. All lookups are read-only so a snapshot can
//! be shared across threads while curves are calibrated.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{CoreError, CoreResult};
use crate::types::{Currency, Date, RateIndex};

/// Identifier of an observable market quote.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuoteId(String);

impl QuoteId {
    /// Creates a quote identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Identifier of the FX quote for `base/counter`, e.g. `FX/EURUSD`.
    #[must_use]
    pub fn fx(base: Currency, counter: Currency) -> Self {
        Self(format!("FX/{}{}", base.code(), counter.code()))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QuoteId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Date-ordered series of historic fixings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    points: BTreeMap<Date, f64>,
}

impl TimeSeries {
    /// Creates an empty series.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the value on a date.
    #[must_use]
    pub fn with_point(mut self, date: Date, value: f64) -> Self {
        self.points.insert(date, value);
        self
    }

    /// Returns the value on a date, if present.
    #[must_use]
    pub fn get(&self, date: Date) -> Option<f64> {
        self.points.get(&date).copied()
    }

    /// Returns the latest date in the series.
    #[must_use]
    pub fn latest_date(&self) -> Option<Date> {
        self.points.keys().next_back().copied()
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if the series has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl FromIterator<(Date, f64)> for TimeSeries {
    fn from_iter<I: IntoIterator<Item = (Date, f64)>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

/// Read access to a market data snapshot.
pub trait MarketData: Send + Sync {
    /// Returns the valuation date of the snapshot.
    fn valuation_date(&self) -> Date;

    /// Looks up a quote, returning `None` if absent.
    fn find_value(&self, id: &QuoteId) -> Option<f64>;

    /// Looks up a quote.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::QuoteNotFound` if the quote is absent.
    fn value(&self, id: &QuoteId) -> CoreResult<f64> {
        self.find_value(id)
            .ok_or_else(|| CoreError::quote_not_found(id.as_str()))
    }

    /// Returns the fixing history of an index, if any.
    fn time_series(&self, index: &RateIndex) -> Option<&TimeSeries>;

    /// Returns all fixing histories held by the snapshot.
    fn all_time_series(&self) -> BTreeMap<RateIndex, TimeSeries>;
}

/// Immutable in-memory market data snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct ImmutableMarketData {
    valuation_date: Date,
    values: BTreeMap<QuoteId, f64>,
    time_series: BTreeMap<RateIndex, TimeSeries>,
}

impl ImmutableMarketData {
    /// Starts a builder for the given valuation date.
    #[must_use]
    pub fn builder(valuation_date: Date) -> ImmutableMarketDataBuilder {
        ImmutableMarketDataBuilder {
            valuation_date,
            values: BTreeMap::new(),
            time_series: BTreeMap::new(),
        }
    }

    /// Returns a builder pre-populated with this snapshot's content.
    #[must_use]
    pub fn to_builder(&self) -> ImmutableMarketDataBuilder {
        ImmutableMarketDataBuilder {
            valuation_date: self.valuation_date,
            values: self.values.clone(),
            time_series: self.time_series.clone(),
        }
    }

    /// Returns all quotes.
    #[must_use]
    pub fn values(&self) -> &BTreeMap<QuoteId, f64> {
        &self.values
    }
}

impl MarketData for ImmutableMarketData {
    fn valuation_date(&self) -> Date {
        self.valuation_date
    }

    fn find_value(&self, id: &QuoteId) -> Option<f64> {
        self.values.get(id).copied()
    }

    fn time_series(&self, index: &RateIndex) -> Option<&TimeSeries> {
        self.time_series.get(index)
    }

    fn all_time_series(&self) -> BTreeMap<RateIndex, TimeSeries> {
        self.time_series.clone()
    }
}

/// Builder for [`ImmutableMarketData`].
#[derive(Debug, Clone)]
pub struct ImmutableMarketDataBuilder {
    valuation_date: Date,
    values: BTreeMap<QuoteId, f64>,
    time_series: BTreeMap<RateIndex, TimeSeries>,
}

impl ImmutableMarketDataBuilder {
    /// Adds or replaces a quote.
    #[must_use]
    pub fn add_value(mut self, id: QuoteId, value: f64) -> Self {
        self.values.insert(id, value);
        self
    }

    /// Adds or replaces the fixing history of an index.
    #[must_use]
    pub fn add_time_series(mut self, index: RateIndex, series: TimeSeries) -> Self {
        self.time_series.insert(index, series);
        self
    }

    /// Builds the snapshot.
    #[must_use]
    pub fn build(self) -> ImmutableMarketData {
        ImmutableMarketData {
            valuation_date: self.valuation_date,
            values: self.values,
            time_series: self.time_series,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OvernightIndex;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn test_quote_lookup() {
        let market = ImmutableMarketData::builder(date(2025, 3, 14))
            .add_value(QuoteId::new("USD-DEP-1M"), 0.043)
            .build();

        assert_eq!(market.value(&"USD-DEP-1M".into()).unwrap(), 0.043);
        let err = market.value(&"USD-DEP-2M".into()).unwrap_err();
        assert!(err.is_market_data_missing());
    }

    #[test]
    fn test_time_series_lookup() {
        let sofr = RateIndex::from(OvernightIndex::Sofr);
        let series = TimeSeries::new()
            .with_point(date(2025, 3, 12), 0.0431)
            .with_point(date(2025, 3, 13), 0.0433);
        let market = ImmutableMarketData::builder(date(2025, 3, 14))
            .add_time_series(sofr, series)
            .build();

        let series = market.time_series(&sofr).unwrap();
        assert_eq!(series.get(date(2025, 3, 13)), Some(0.0433));
        assert_eq!(series.latest_date(), Some(date(2025, 3, 13)));
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn test_fx_quote_id() {
        assert_eq!(QuoteId::fx(Currency::EUR, Currency::USD).as_str(), "FX/EURUSD");
    }
}
