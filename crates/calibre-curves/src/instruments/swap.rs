//! Fixed versus floating swap.

use calibre_core::types::{Currency, Date, RateIndex};

use super::floating_rate;
use crate::error::{CurveError, CurveResult};
use crate::provider::ImmutableRatesProvider;
use crate::sensitivity::CurveParameterSensitivities;

/// A fixed leg accrual period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedFixedPeriod {
    /// Accrual start date.
    pub start_date: Date,
    /// Accrual end date.
    pub end_date: Date,
    /// Payment date.
    pub payment_date: Date,
    /// Accrual factor.
    pub year_fraction: f64,
}

/// A floating leg accrual period.
///
/// Overnight periods are priced off the compounded rate implied by the
/// forward curve over the whole period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedFloatPeriod {
    /// Date the index rate is observed.
    pub fixing_date: Date,
    /// Accrual start date.
    pub start_date: Date,
    /// Accrual end date.
    pub end_date: Date,
    /// Payment date.
    pub payment_date: Date,
    /// Accrual factor.
    pub year_fraction: f64,
}

/// A resolved swap receiving the floating leg and paying the fixed rate.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSwap {
    /// Currency of both legs.
    pub currency: Currency,
    /// Fixed rate.
    pub fixed_rate: f64,
    /// Fixed leg periods.
    pub fixed_periods: Vec<ResolvedFixedPeriod>,
    /// Floating index.
    pub index: RateIndex,
    /// Floating leg periods.
    pub float_periods: Vec<ResolvedFloatPeriod>,
}

impl ResolvedSwap {
    /// Creates a swap.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::Configuration` if either leg has no periods.
    pub fn new(
        currency: Currency,
        fixed_rate: f64,
        fixed_periods: Vec<ResolvedFixedPeriod>,
        index: RateIndex,
        float_periods: Vec<ResolvedFloatPeriod>,
    ) -> CurveResult<Self> {
        if fixed_periods.is_empty() || float_periods.is_empty() {
            return Err(CurveError::configuration("swap legs must have at least one period"));
        }
        Ok(Self {
            currency,
            fixed_rate,
            fixed_periods,
            index,
            float_periods,
        })
    }

    /// Fixed leg PV01: `Σ P(pⱼ)·τⱼ`.
    pub fn annuity(&self, provider: &ImmutableRatesProvider) -> CurveResult<f64> {
        let mut annuity = 0.0;
        for period in &self.fixed_periods {
            annuity += provider.discount_factor(self.currency, period.payment_date)? * period.year_fraction;
        }
        Ok(annuity)
    }

    fn annuity_sensitivity(
        &self,
        provider: &ImmutableRatesProvider,
    ) -> CurveResult<CurveParameterSensitivities> {
        let mut sensitivity = CurveParameterSensitivities::empty();
        for period in &self.fixed_periods {
            let d_df = provider.discount_factor_sensitivity(self.currency, period.payment_date)?;
            sensitivity = sensitivity.combined_with(&d_df.multiplied_by(period.year_fraction))?;
        }
        Ok(sensitivity)
    }

    /// Floating leg value `Σ P(pᵢ)·τᵢ·Fᵢ` and its parameter sensitivity.
    fn float_leg(
        &self,
        provider: &ImmutableRatesProvider,
        with_sensitivity: bool,
    ) -> CurveResult<(f64, CurveParameterSensitivities)> {
        let mut value = 0.0;
        let mut sensitivity = CurveParameterSensitivities::empty();
        for period in &self.float_periods {
            let (rate, d_rate) = floating_rate(
                provider,
                self.index,
                period.fixing_date,
                period.start_date,
                period.end_date,
                period.year_fraction,
            )?;
            let df = provider.discount_factor(self.currency, period.payment_date)?;
            value += df * period.year_fraction * rate;

            if with_sensitivity {
                let d_df = provider.discount_factor_sensitivity(self.currency, period.payment_date)?;
                sensitivity = sensitivity
                    .combined_with(&d_df.multiplied_by(period.year_fraction * rate))?
                    .combined_with(&d_rate.multiplied_by(df * period.year_fraction))?;
            }
        }
        Ok((value, sensitivity))
    }

    /// Fixed rate that gives the swap zero value.
    pub fn par_rate(&self, provider: &ImmutableRatesProvider) -> CurveResult<f64> {
        let (float_value, _) = self.float_leg(provider, false)?;
        Ok(float_value / self.annuity(provider)?)
    }

    /// Par rate minus the fixed rate.
    pub fn par_spread(&self, provider: &ImmutableRatesProvider) -> CurveResult<f64> {
        Ok(self.par_rate(provider)? - self.fixed_rate)
    }

    /// Sensitivity of the par rate to curve parameters.
    pub fn par_rate_sensitivity(
        &self,
        provider: &ImmutableRatesProvider,
    ) -> CurveResult<CurveParameterSensitivities> {
        let (float_value, d_float) = self.float_leg(provider, true)?;
        let annuity = self.annuity(provider)?;
        let d_annuity = self.annuity_sensitivity(provider)?;

        d_float
            .multiplied_by(1.0 / annuity)
            .combined_with(&d_annuity.multiplied_by(-float_value / (annuity * annuity)))
    }

    /// Floating leg value minus fixed leg value.
    pub fn present_value(&self, provider: &ImmutableRatesProvider) -> CurveResult<f64> {
        let (float_value, _) = self.float_leg(provider, false)?;
        Ok(float_value - self.fixed_rate * self.annuity(provider)?)
    }

    /// Sensitivity of the present value to curve parameters.
    pub fn present_value_sensitivity(
        &self,
        provider: &ImmutableRatesProvider,
    ) -> CurveResult<CurveParameterSensitivities> {
        let (_, d_float) = self.float_leg(provider, true)?;
        d_float.combined_with(&self.annuity_sensitivity(provider)?.multiplied_by(-self.fixed_rate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruments::test_support::{assert_matches_bumping, date, provider};
    use approx::assert_relative_eq;
    use calibre_core::types::{IborIndex, OvernightIndex, Tenor};

    const OIS: [f64; 3] = [0.040, 0.042, 0.043];
    const IBOR: [f64; 2] = [0.045, 0.046];

    fn swap(index: RateIndex, float_months: i32) -> ResolvedSwap {
        let start = date(2026, 1, 6);
        let fixed_periods = (0..2)
            .map(|i| {
                let s = start.add_months(12 * i).unwrap();
                let e = start.add_months(12 * (i + 1)).unwrap();
                ResolvedFixedPeriod {
                    start_date: s,
                    end_date: e,
                    payment_date: e,
                    year_fraction: 1.0,
                }
            })
            .collect();
        let float_periods = (0..24 / float_months)
            .map(|i| {
                let s = start.add_months(float_months * i).unwrap();
                let e = start.add_months(float_months * (i + 1)).unwrap();
                ResolvedFloatPeriod {
                    fixing_date: s,
                    start_date: s,
                    end_date: e,
                    payment_date: e,
                    year_fraction: s.days_between(&e) as f64 / 360.0,
                }
            })
            .collect();
        ResolvedSwap::new(Currency::USD, 0.044, fixed_periods, index, float_periods).unwrap()
    }

    #[test]
    fn test_ibor_swap_sensitivities_match_bumping() {
        let trade = swap(IborIndex::TermSofr(Tenor::M3).into(), 3);
        let provider = provider(&OIS, &IBOR);

        let par = trade.par_rate_sensitivity(&provider).unwrap();
        assert!(par.get(&"USD-OIS".into()).is_some());
        assert_matches_bumping(&OIS, &IBOR, &par, |p| trade.par_rate(p).unwrap());

        let pv = trade.present_value_sensitivity(&provider).unwrap();
        assert_matches_bumping(&OIS, &IBOR, &pv, |p| trade.present_value(p).unwrap());
    }

    #[test]
    fn test_overnight_swap_at_par() {
        let provider = provider(&OIS, &IBOR);
        let mut trade = swap(OvernightIndex::Sofr.into(), 12);
        trade.fixed_rate = trade.par_rate(&provider).unwrap();

        assert_relative_eq!(trade.present_value(&provider).unwrap(), 0.0, epsilon = 1e-15);
        assert!(trade.par_rate_sensitivity(&provider).unwrap().get(&"USD-3M".into()).is_none());
    }

    #[test]
    fn test_rejects_empty_leg() {
        let index = OvernightIndex::Sofr.into();
        assert!(ResolvedSwap::new(Currency::USD, 0.04, vec![], index, vec![]).is_err());
    }
}
