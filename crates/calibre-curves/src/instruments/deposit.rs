//! Term deposit.

use calibre_core::types::{Currency, Date};

use crate::error::CurveResult;
use crate::provider::ImmutableRatesProvider;
use crate::sensitivity::CurveParameterSensitivities;

/// A resolved term deposit: 1 is lent at `start_date` and `1 + r·τ` is
/// repaid at `end_date`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTermDeposit {
    /// Currency of the deposit.
    pub currency: Currency,
    /// Start date.
    pub start_date: Date,
    /// End date.
    pub end_date: Date,
    /// Accrual factor between start and end.
    pub year_fraction: f64,
    /// Deposit rate.
    pub rate: f64,
}

impl ResolvedTermDeposit {
    /// Rate implied by the discount curve, `(P(s)/P(e) - 1)/τ`.
    pub fn par_rate(&self, provider: &ImmutableRatesProvider) -> CurveResult<f64> {
        let df_start = provider.discount_factor(self.currency, self.start_date)?;
        let df_end = provider.discount_factor(self.currency, self.end_date)?;
        Ok((df_start / df_end - 1.0) / self.year_fraction)
    }

    /// Par rate minus the deposit rate.
    pub fn par_spread(&self, provider: &ImmutableRatesProvider) -> CurveResult<f64> {
        Ok(self.par_rate(provider)? - self.rate)
    }

    /// Sensitivity of the par rate to curve parameters.
    pub fn par_rate_sensitivity(
        &self,
        provider: &ImmutableRatesProvider,
    ) -> CurveResult<CurveParameterSensitivities> {
        let df_start = provider.discount_factor(self.currency, self.start_date)?;
        let df_end = provider.discount_factor(self.currency, self.end_date)?;
        let d_start = provider.discount_factor_sensitivity(self.currency, self.start_date)?;
        let d_end = provider.discount_factor_sensitivity(self.currency, self.end_date)?;

        d_start
            .multiplied_by(1.0 / (df_end * self.year_fraction))
            .combined_with(&d_end.multiplied_by(-df_start / (df_end * df_end * self.year_fraction)))
    }

    /// `-P(s) + (1 + r·τ)·P(e)`.
    pub fn present_value(&self, provider: &ImmutableRatesProvider) -> CurveResult<f64> {
        let df_start = provider.discount_factor(self.currency, self.start_date)?;
        let df_end = provider.discount_factor(self.currency, self.end_date)?;
        Ok(-df_start + (1.0 + self.rate * self.year_fraction) * df_end)
    }

    /// Sensitivity of the present value to curve parameters.
    pub fn present_value_sensitivity(
        &self,
        provider: &ImmutableRatesProvider,
    ) -> CurveResult<CurveParameterSensitivities> {
        let d_start = provider.discount_factor_sensitivity(self.currency, self.start_date)?;
        let d_end = provider.discount_factor_sensitivity(self.currency, self.end_date)?;

        d_start
            .multiplied_by(-1.0)
            .combined_with(&d_end.multiplied_by(1.0 + self.rate * self.year_fraction))
    }
}
