//! Forward rate agreement.

use calibre_core::types::{Currency, Date, IborIndex};

use super::floating_rate;
use crate::error::CurveResult;
use crate::provider::ImmutableRatesProvider;
use crate::sensitivity::CurveParameterSensitivities;

/// A resolved FRA paying `τ·(F - K)` at the end of the accrual period.
///
/// Settlement is taken at the period end rather than discounted to the
/// start, so the present value is `P(e)·τ·(F - K)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedFra {
    /// Index the FRA fixes against.
    pub index: IborIndex,
    /// Date the index rate is observed.
    pub fixing_date: Date,
    /// Accrual start date.
    pub start_date: Date,
    /// Accrual end date.
    pub end_date: Date,
    /// Accrual factor under the index day count.
    pub year_fraction: f64,
    /// Agreed fixed rate.
    pub fixed_rate: f64,
}

impl ResolvedFra {
    /// Returns the settlement currency.
    #[must_use]
    pub fn currency(&self) -> Currency {
        self.index.currency()
    }

    /// Forward (or fixed) index rate and its parameter sensitivity.
    fn rate(
        &self,
        provider: &ImmutableRatesProvider,
    ) -> CurveResult<(f64, CurveParameterSensitivities)> {
        floating_rate(
            provider,
            self.index.into(),
            self.fixing_date,
            self.start_date,
            self.end_date,
            self.year_fraction,
        )
    }

    /// Index rate for the period.
    pub fn forward_rate(&self, provider: &ImmutableRatesProvider) -> CurveResult<f64> {
        Ok(self.rate(provider)?.0)
    }

    /// Sensitivity of the index rate to curve parameters.
    pub fn forward_rate_sensitivity(
        &self,
        provider: &ImmutableRatesProvider,
    ) -> CurveResult<CurveParameterSensitivities> {
        Ok(self.rate(provider)?.1)
    }

    /// Index rate minus the fixed rate.
    pub fn par_spread(&self, provider: &ImmutableRatesProvider) -> CurveResult<f64> {
        Ok(self.forward_rate(provider)? - self.fixed_rate)
    }

    /// `P(e)·τ·(F - K)`.
    pub fn present_value(&self, provider: &ImmutableRatesProvider) -> CurveResult<f64> {
        let df = provider.discount_factor(self.currency(), self.end_date)?;
        Ok(df * self.year_fraction * (self.forward_rate(provider)? - self.fixed_rate))
    }

    /// Sensitivity of the present value to curve parameters.
    pub fn present_value_sensitivity(
        &self,
        provider: &ImmutableRatesProvider,
    ) -> CurveResult<CurveParameterSensitivities> {
        let df = provider.discount_factor(self.currency(), self.end_date)?;
        let d_df = provider.discount_factor_sensitivity(self.currency(), self.end_date)?;
        let (forward, d_forward) = self.rate(provider)?;

        d_df.multiplied_by(self.year_fraction * (forward - self.fixed_rate))
            .combined_with(&d_forward.multiplied_by(df * self.year_fraction))
    }
}
