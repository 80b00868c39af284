//! FX rate lookup.

use std::fmt;
use std::sync::Arc;

use crate::error::{CoreError, CoreResult};
use crate::market_data::{MarketData, QuoteId};
use crate::types::Currency;

/// Source of FX rates.
pub trait FxRateProvider: Send + Sync + fmt::Debug {
    /// Returns the number of `counter` units per unit of `base`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::FxRateNotFound` if the pair cannot be resolved.
    fn fx_rate(&self, base: Currency, counter: Currency) -> CoreResult<f64>;
}

/// FX provider reading `FX/<BASE><COUNTER>` quotes from market data.
///
/// Falls back to the inverse of the reverse quote. Same-currency rates are 1.
#[derive(Clone)]
pub struct MarketDataFxRateProvider {
    market_data: Arc<dyn MarketData>,
}

impl MarketDataFxRateProvider {
    /// Creates a provider over a market data snapshot.
    #[must_use]
    pub fn new(market_data: Arc<dyn MarketData>) -> Self {
        Self { market_data }
    }
}

impl fmt::Debug for MarketDataFxRateProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarketDataFxRateProvider")
            .field("valuation_date", &self.market_data.valuation_date())
            .finish()
    }
}

impl FxRateProvider for MarketDataFxRateProvider {
    fn fx_rate(&self, base: Currency, counter: Currency) -> CoreResult<f64> {
        if base == counter {
            return Ok(1.0);
        }
        if let Some(rate) = self.market_data.find_value(&QuoteId::fx(base, counter)) {
            return Ok(rate);
        }
        match self.market_data.find_value(&QuoteId::fx(counter, base)) {
            Some(inverse) if inverse != 0.0 => Ok(1.0 / inverse),
            _ => Err(CoreError::FxRateNotFound {
                pair: format!("{base}/{counter}"),
            }),
        }
    }
}

/// FX provider that knows no rates other than identity.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFxRateProvider;

impl FxRateProvider for NoFxRateProvider {
    fn fx_rate(&self, base: Currency, counter: Currency) -> CoreResult<f64> {
        if base == counter {
            Ok(1.0)
        } else {
            Err(CoreError::FxRateNotFound {
                pair: format!("{base}/{counter}"),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::ImmutableMarketData;
    use crate::types::Date;
    use approx::assert_relative_eq;

    fn provider() -> MarketDataFxRateProvider {
        let market = ImmutableMarketData::builder(Date::from_ymd(2025, 3, 14).unwrap())
            .add_value(QuoteId::fx(Currency::EUR, Currency::USD), 1.08)
            .build();
        MarketDataFxRateProvider::new(Arc::new(market))
    }

    #[test]
    fn test_direct_and_inverse() {
        let fx = provider();
        assert_relative_eq!(fx.fx_rate(Currency::EUR, Currency::USD).unwrap(), 1.08);
        assert_relative_eq!(
            fx.fx_rate(Currency::USD, Currency::EUR).unwrap(),
            1.0 / 1.08,
            epsilon = 1e-15
        );
        assert_relative_eq!(fx.fx_rate(Currency::GBP, Currency::GBP).unwrap(), 1.0);
    }

    #[test]
    fn test_missing_pair() {
        let err = provider().fx_rate(Currency::GBP, Currency::USD).unwrap_err();
        assert!(err.is_market_data_missing());
        assert!(NoFxRateProvider.fx_rate(Currency::GBP, Currency::USD).is_err());
    }
}
