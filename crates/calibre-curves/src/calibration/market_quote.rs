//! Conversion of curve parameter sensitivities to market quote sensitivities.

use crate::error::{CurveError, CurveResult};
use crate::provider::ImmutableRatesProvider;
use crate::sensitivity::CurveParameterSensitivities;

/// Turns `∂V/∂p` into `∂V/∂q` through the Jacobians stamped on calibrated
/// curves.
///
/// The result is keyed by the curve whose quotes drive the value, which for a
/// chain of groups includes curves the original sensitivity never touched.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarketQuoteSensitivityCalculator;

impl MarketQuoteSensitivityCalculator {
    /// The calculator.
    pub const DEFAULT: Self = Self;

    /// Converts a parameter sensitivity into a market quote sensitivity.
    ///
    /// # Errors
    ///
    /// - `CurveNotFound` if a sensitivity refers to a curve the provider
    ///   does not hold
    /// - `Configuration` if that curve carries no Jacobian or the sizes
    ///   disagree
    pub fn sensitivity(
        &self,
        parameter_sensitivities: &CurveParameterSensitivities,
        provider: &ImmutableRatesProvider,
    ) -> CurveResult<CurveParameterSensitivities> {
        let mut result = CurveParameterSensitivities::empty();
        for (name, values) in parameter_sensitivities.iter() {
            let curve = provider.curve(name)?;
            let jacobian = curve.metadata().jacobian().ok_or_else(|| {
                CurveError::configuration(format!("curve {name} has no calibration Jacobian"))
            })?;
            result = result.combined_with(&jacobian.market_quote_sensitivity(values)?)?;
        }
        Ok(result)
    }
}
