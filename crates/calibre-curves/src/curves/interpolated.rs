//! Curve interpolated between node values.

use std::sync::Arc;

use calibre_math::interpolation::{Interpolator, InterpolatorKind};

use super::{CurveMetadata, NodalCurve, ValueType};
use crate::error::{CurveError, CurveResult};

/// A nodal curve interpolating its parameters over the node times.
///
/// For [`ValueType::ZeroRate`] the parameters are zero rates and
/// `P(t) = exp(-z(t)·t)`. For [`ValueType::DiscountFactor`] the parameters are
/// discount factors and the interpolation runs over an extra `(0, 1)` anchor
/// that is not a parameter, so the first node time must be positive.
///
/// Outside the node range the end segments are extended.
///
/// # Example
///
/// ```rust
/// use calibre_core::daycounts::DayCountConvention;
/// use calibre_core::types::Date;
/// use calibre_curves::curves::{
///     CurveMetadata, InterpolatedNodalCurve, NodalCurve, ParameterMetadata, ValueType,
/// };
/// use calibre_math::interpolation::InterpolatorKind;
///
/// let date = Date::from_ymd(2026, 1, 2).unwrap();
/// let metadata = CurveMetadata::new(
///     "USD-OIS".into(),
///     ValueType::ZeroRate,
///     DayCountConvention::Act365Fixed,
///     vec![ParameterMetadata::new("1Y", date, 1.0), ParameterMetadata::new("2Y", date, 2.0)],
/// );
/// let curve = InterpolatedNodalCurve::new(metadata, InterpolatorKind::Linear, vec![0.03, 0.04])
///     .unwrap();
///
/// let df = curve.discount_factor(1.5).unwrap();
/// assert!((df - (-0.035_f64 * 1.5).exp()).abs() < 1e-15);
/// ```
#[derive(Debug, Clone)]
pub struct InterpolatedNodalCurve {
    metadata: CurveMetadata,
    interpolator_kind: InterpolatorKind,
    values: Vec<f64>,
    interpolator: Arc<dyn Interpolator>,
}

impl InterpolatedNodalCurve {
    /// Creates a curve from metadata, an interpolator and parameter values.
    ///
    /// # Errors
    ///
    /// - `Configuration` if the value count differs from the node count, or a
    ///   discount factor curve has a node at or before time zero
    /// - `Numerical` if the interpolator rejects the data
    pub fn new(
        metadata: CurveMetadata,
        interpolator_kind: InterpolatorKind,
        values: Vec<f64>,
    ) -> CurveResult<Self> {
        let times = metadata.times();
        if times.len() != values.len() {
            return Err(CurveError::configuration(format!(
                "curve {} has {} nodes but {} parameter values",
                metadata.name(),
                times.len(),
                values.len()
            )));
        }

        let interpolator = match metadata.value_type() {
            ValueType::ZeroRate => interpolator_kind.bind(times, values.clone())?,
            ValueType::DiscountFactor => {
                if times.first().is_some_and(|t| *t <= 0.0) {
                    return Err(CurveError::configuration(format!(
                        "discount factor curve {} has a node at or before the valuation date",
                        metadata.name()
                    )));
                }
                let xs = std::iter::once(0.0).chain(times).collect();
                let ys = std::iter::once(1.0).chain(values.iter().copied()).collect();
                interpolator_kind.bind(xs, ys)?
            }
        };

        Ok(Self {
            metadata,
            interpolator_kind,
            values,
            interpolator: Arc::from(interpolator),
        })
    }

    /// Returns the interpolation method.
    #[must_use]
    pub fn interpolator_kind(&self) -> InterpolatorKind {
        self.interpolator_kind
    }
}

impl NodalCurve for InterpolatedNodalCurve {
    fn metadata(&self) -> &CurveMetadata {
        &self.metadata
    }

    fn parameters(&self) -> &[f64] {
        &self.values
    }

    fn discount_factor(&self, t: f64) -> CurveResult<f64> {
        match self.metadata.value_type() {
            ValueType::ZeroRate => Ok((-self.interpolator.interpolate(t)? * t).exp()),
            ValueType::DiscountFactor if t <= 0.0 => Ok(1.0),
            ValueType::DiscountFactor => Ok(self.interpolator.interpolate(t)?),
        }
    }

    fn discount_factor_sensitivity(&self, t: f64) -> CurveResult<Vec<f64>> {
        match self.metadata.value_type() {
            ValueType::ZeroRate => {
                let df = self.discount_factor(t)?;
                let sensitivity = self.interpolator.parameter_sensitivity(t)?;
                Ok(sensitivity.into_iter().map(|s| -t * df * s).collect())
            }
            ValueType::DiscountFactor if t <= 0.0 => Ok(vec![0.0; self.values.len()]),
            ValueType::DiscountFactor => {
                // Drop the anchor
                let mut sensitivity = self.interpolator.parameter_sensitivity(t)?;
                sensitivity.remove(0);
                Ok(sensitivity)
            }
        }
    }

    fn with_parameters(&self, parameters: Vec<f64>) -> CurveResult<Arc<dyn NodalCurve>> {
        Ok(Arc::new(Self::new(
            self.metadata.clone(),
            self.interpolator_kind,
            parameters,
        )?))
    }

    fn with_metadata(&self, metadata: CurveMetadata) -> CurveResult<Arc<dyn NodalCurve>> {
        Ok(Arc::new(Self::new(
            metadata,
            self.interpolator_kind,
            self.values.clone(),
        )?))
    }

    fn zero_rate(&self, t: f64) -> CurveResult<f64> {
        match self.metadata.value_type() {
            ValueType::ZeroRate => Ok(self.interpolator.interpolate(t)?),
            ValueType::DiscountFactor => {
                let t = t.max(super::MIN_ZERO_RATE_TIME);
                Ok(-self.discount_factor(t)?.ln() / t)
            }
        }
    }
}
