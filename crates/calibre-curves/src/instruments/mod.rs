//! Resolved calibration trades.
//!
//! A curve node resolves into one of these: every date fixed, every
//! convention applied, ready to be priced against a rates provider. All
//! trades have unit notional.

mod deposit;
mod fra;
mod swap;

pub use deposit::ResolvedTermDeposit;
pub use fra::ResolvedFra;
pub use swap::{ResolvedFixedPeriod, ResolvedFloatPeriod, ResolvedSwap};

use serde::{Deserialize, Serialize};
use std::fmt;

use calibre_core::types::{Date, RateIndex};

use crate::error::{CurveError, CurveResult};
use crate::provider::ImmutableRatesProvider;
use crate::sensitivity::CurveParameterSensitivities;

/// Kind of a resolved trade, used to pick its calibration measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TradeKind {
    /// Term deposit.
    TermDeposit,
    /// Forward rate agreement.
    Fra,
    /// Fixed versus floating swap.
    Swap,
}

impl fmt::Display for TradeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeKind::TermDeposit => write!(f, "Term Deposit"),
            TradeKind::Fra => write!(f, "FRA"),
            TradeKind::Swap => write!(f, "Swap"),
        }
    }
}

/// A trade ready for pricing.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedTrade {
    /// Term deposit.
    TermDeposit(ResolvedTermDeposit),
    /// Forward rate agreement.
    Fra(ResolvedFra),
    /// Fixed versus floating swap.
    Swap(ResolvedSwap),
}

impl ResolvedTrade {
    /// Returns the trade kind.
    #[must_use]
    pub fn kind(&self) -> TradeKind {
        match self {
            ResolvedTrade::TermDeposit(_) => TradeKind::TermDeposit,
            ResolvedTrade::Fra(_) => TradeKind::Fra,
            ResolvedTrade::Swap(_) => TradeKind::Swap,
        }
    }

    /// Model rate minus the traded rate.
    pub fn par_spread(&self, provider: &ImmutableRatesProvider) -> CurveResult<f64> {
        match self {
            ResolvedTrade::TermDeposit(trade) => trade.par_spread(provider),
            ResolvedTrade::Fra(trade) => trade.par_spread(provider),
            ResolvedTrade::Swap(trade) => trade.par_spread(provider),
        }
    }

    /// Sensitivity of [`par_spread`](Self::par_spread) to curve parameters.
    pub fn par_spread_sensitivity(
        &self,
        provider: &ImmutableRatesProvider,
    ) -> CurveResult<CurveParameterSensitivities> {
        match self {
            ResolvedTrade::TermDeposit(trade) => trade.par_rate_sensitivity(provider),
            ResolvedTrade::Fra(trade) => trade.forward_rate_sensitivity(provider),
            ResolvedTrade::Swap(trade) => trade.par_rate_sensitivity(provider),
        }
    }

    /// Present value of the unit notional trade.
    pub fn present_value(&self, provider: &ImmutableRatesProvider) -> CurveResult<f64> {
        match self {
            ResolvedTrade::TermDeposit(trade) => trade.present_value(provider),
            ResolvedTrade::Fra(trade) => trade.present_value(provider),
            ResolvedTrade::Swap(trade) => trade.present_value(provider),
        }
    }

    /// Sensitivity of [`present_value`](Self::present_value) to curve parameters.
    pub fn present_value_sensitivity(
        &self,
        provider: &ImmutableRatesProvider,
    ) -> CurveResult<CurveParameterSensitivities> {
        match self {
            ResolvedTrade::TermDeposit(trade) => trade.present_value_sensitivity(provider),
            ResolvedTrade::Fra(trade) => trade.present_value_sensitivity(provider),
            ResolvedTrade::Swap(trade) => trade.present_value_sensitivity(provider),
        }
    }
}

impl From<ResolvedTermDeposit> for ResolvedTrade {
    fn from(trade: ResolvedTermDeposit) -> Self {
        ResolvedTrade::TermDeposit(trade)
    }
}

impl From<ResolvedFra> for ResolvedTrade {
    fn from(trade: ResolvedFra) -> Self {
        ResolvedTrade::Fra(trade)
    }
}

impl From<ResolvedSwap> for ResolvedTrade {
    fn from(trade: ResolvedSwap) -> Self {
        ResolvedTrade::Swap(trade)
    }
}

/// Rate of a floating period: the historic fixing when one applies, the
/// curve forward otherwise.
///
/// Returns the rate and its parameter sensitivity, which is empty for a
/// fixed rate.
pub(crate) fn floating_rate(
    provider: &ImmutableRatesProvider,
    index: RateIndex,
    fixing_date: Date,
    start: Date,
    end: Date,
    year_fraction: f64,
) -> CurveResult<(f64, CurveParameterSensitivities)> {
    let valuation_date = provider.valuation_date();
    if fixing_date <= valuation_date {
        match provider.fixing(index, fixing_date) {
            Some(rate) => return Ok((rate, CurveParameterSensitivities::empty())),
            None if fixing_date < valuation_date => {
                return Err(CurveError::market_data_missing(format!(
                    "no fixing of {index} on {fixing_date}"
                )))
            }
            None => {}
        }
    }

    let rate = provider.forward_rate(index, start, end, year_fraction)?;
    let sensitivity = provider.forward_rate_sensitivity(index, start, end, year_fraction)?;
    Ok((rate, sensitivity))
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use calibre_core::daycounts::DayCountConvention;
    use calibre_core::types::{Currency, Date, IborIndex, OvernightIndex, Tenor};

    use crate::curves::{
        CurveMetadata, InterpolatedNodalCurve, NodalCurve, ParameterMetadata, ValueType,
    };
    use crate::provider::ImmutableRatesProvider;
    use calibre_math::interpolation::InterpolatorKind;

    pub fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    pub fn valuation_date() -> Date {
        date(2026, 1, 2)
    }

    pub fn curve(name: &str, rates: &[f64]) -> Arc<dyn NodalCurve> {
        let parameters = (1..=rates.len())
            .map(|i| ParameterMetadata::new(format!("{i}Y"), valuation_date(), i as f64))
            .collect();
        let metadata = CurveMetadata::new(
            name.into(),
            ValueType::ZeroRate,
            DayCountConvention::Act365Fixed,
            parameters,
        );
        Arc::new(
            InterpolatedNodalCurve::new(metadata, InterpolatorKind::Linear, rates.to_vec()).unwrap(),
        )
    }

    /// USD discounting on one curve, Term SOFR 3M projected on another.
    pub fn provider(ois: &[f64], ibor: &[f64]) -> ImmutableRatesProvider {
        let ois = curve("USD-OIS", ois);
        ImmutableRatesProvider::builder(valuation_date())
            .discount_curve(Currency::USD, Arc::clone(&ois))
            .index_curve(OvernightIndex::Sofr.into(), ois)
            .index_curve(IborIndex::TermSofr(Tenor::M3).into(), curve("USD-3M", ibor))
            .build()
    }

    /// Checks a sensitivity against central differences of `value` for each
    /// parameter of both curves.
    pub fn assert_matches_bumping<F>(
        ois: &[f64],
        ibor: &[f64],
        analytic: &crate::sensitivity::CurveParameterSensitivities,
        value: F,
    ) where
        F: Fn(&ImmutableRatesProvider) -> f64,
    {
        let h = 1e-7;
        for (name, base) in [("USD-OIS", ois), ("USD-3M", ibor)] {
            for i in 0..base.len() {
                let bump = |shift: f64| {
                    let mut rates = base.to_vec();
                    rates[i] += shift;
                    let p = if name == "USD-OIS" {
                        provider(&rates, ibor)
                    } else {
                        provider(ois, &rates)
                    };
                    value(&p)
                };
                let fd = (bump(h) - bump(-h)) / (2.0 * h);
                let computed = analytic.get(&name.into()).map_or(0.0, |s| s[i]);
                approx::assert_relative_eq!(computed, fd, epsilon = 1e-6);
            }
        }
    }
}
