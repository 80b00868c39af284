//! Flat curve with a single parameter.

use std::sync::Arc;

use super::{CurveMetadata, NodalCurve, ValueType};
use crate::error::{CurveError, CurveResult};

/// A curve with one continuously compounded zero rate at every time.
///
/// Mostly useful as an externally supplied curve that other groups are
/// calibrated against.
#[derive(Debug, Clone)]
pub struct ConstantNodalCurve {
    metadata: CurveMetadata,
    rate: [f64; 1],
}

impl ConstantNodalCurve {
    /// Creates a flat curve.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::Configuration` if the metadata does not describe
    /// exactly one zero rate parameter.
    pub fn new(metadata: CurveMetadata, rate: f64) -> CurveResult<Self> {
        if metadata.value_type() != ValueType::ZeroRate || metadata.parameter_metadata().len() != 1
        {
            return Err(CurveError::configuration(format!(
                "constant curve {} needs exactly one zero rate parameter",
                metadata.name()
            )));
        }
        Ok(Self {
            metadata,
            rate: [rate],
        })
    }

    /// Returns the zero rate.
    #[must_use]
    pub fn rate(&self) -> f64 {
        self.rate[0]
    }
}

impl NodalCurve for ConstantNodalCurve {
    fn metadata(&self) -> &CurveMetadata {
        &self.metadata
    }

    fn parameters(&self) -> &[f64] {
        &self.rate
    }

    fn discount_factor(&self, t: f64) -> CurveResult<f64> {
        Ok((-self.rate[0] * t).exp())
    }

    fn discount_factor_sensitivity(&self, t: f64) -> CurveResult<Vec<f64>> {
        Ok(vec![-t * self.discount_factor(t)?])
    }

    fn with_parameters(&self, parameters: Vec<f64>) -> CurveResult<Arc<dyn NodalCurve>> {
        match parameters.as_slice() {
            [rate] => Ok(Arc::new(Self::new(self.metadata.clone(), *rate)?)),
            _ => Err(CurveError::configuration(format!(
                "constant curve {} takes one parameter, got {}",
                self.metadata.name(),
                parameters.len()
            ))),
        }
    }

    fn with_metadata(&self, metadata: CurveMetadata) -> CurveResult<Arc<dyn NodalCurve>> {
        Ok(Arc::new(Self::new(metadata, self.rate[0])?))
    }

    fn zero_rate(&self, _t: f64) -> CurveResult<f64> {
        Ok(self.rate[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curves::ParameterMetadata;
    use approx::assert_relative_eq;
    use calibre_core::daycounts::DayCountConvention;
    use calibre_core::types::Date;

    fn metadata(count: usize) -> CurveMetadata {
        let date = Date::from_ymd(2026, 1, 2).unwrap();
        CurveMetadata::new(
            "FLAT".into(),
            ValueType::ZeroRate,
            DayCountConvention::Act365Fixed,
            (0..count)
                .map(|i| ParameterMetadata::new("rate", date, i as f64))
                .collect(),
        )
    }

    #[test]
    fn test_flat_curve() {
        let curve = ConstantNodalCurve::new(metadata(1), 0.05).unwrap();

        assert_relative_eq!(curve.discount_factor(2.0).unwrap(), (-0.1_f64).exp());
        assert_relative_eq!(curve.zero_rate(7.0).unwrap(), 0.05);
        assert_relative_eq!(
            curve.discount_factor_sensitivity(2.0).unwrap()[0],
            -2.0 * (-0.1_f64).exp()
        );

        let bumped = curve.with_parameters(vec![0.06]).unwrap();
        assert_relative_eq!(bumped.parameters()[0], 0.06);
        assert!(curve.with_parameters(vec![0.06, 0.07]).is_err());
    }

    #[test]
    fn test_requires_single_parameter() {
        assert!(ConstantNodalCurve::new(metadata(2), 0.05).is_err());
    }
}
