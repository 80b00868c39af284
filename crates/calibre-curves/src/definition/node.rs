//! Curve nodes.

use std::collections::BTreeSet;
use std::fmt;

use calibre_core::market_data::{MarketData, QuoteId};
use calibre_core::reference_data::ReferenceData;
use calibre_core::types::Date;

use crate::curves::ValueType;
use crate::error::CurveResult;
use crate::instruments::ResolvedTrade;

/// A single calibration point on a curve.
///
/// Each node is backed by one market quote, resolves into one trade and
/// contributes one curve parameter.
pub trait CurveNode: Send + Sync + fmt::Debug {
    /// Returns the node label.
    fn label(&self) -> &str;

    /// Returns the quotes the node reads.
    fn requirements(&self) -> BTreeSet<QuoteId>;

    /// Returns the date the node's parameter sits at.
    fn date(&self, valuation_date: Date, ref_data: &dyn ReferenceData) -> CurveResult<Date>;

    /// Resolves the node into a trade at the quoted rate.
    fn trade(
        &self,
        valuation_date: Date,
        market_data: &dyn MarketData,
        ref_data: &dyn ReferenceData,
    ) -> CurveResult<ResolvedTrade>;

    /// Returns a starting value for the node's parameter.
    fn initial_guess(
        &self,
        valuation_date: Date,
        market_data: &dyn MarketData,
        value_type: ValueType,
    ) -> CurveResult<f64>;
}
