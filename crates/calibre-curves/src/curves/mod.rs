//! Nodal curves.
//!
//! A nodal curve is defined by one parameter per node. The calibrator only
//! ever sees curves through [`NodalCurve`]: discount factors and their
//! sensitivity to the parameters, plus the ability to rebuild the curve with
//! new parameter values.

mod constant;
mod interpolated;
mod value_type;

pub use constant::ConstantNodalCurve;
pub use interpolated::InterpolatedNodalCurve;
pub use value_type::ValueType;

use std::fmt;
use std::sync::Arc;

use calibre_core::daycounts::DayCountConvention;
use calibre_core::types::Date;

use crate::error::CurveResult;
use crate::jacobian::JacobianCalibrationMatrix;
use crate::names::CurveName;

/// Times below this are treated as this when deriving a zero rate.
const MIN_ZERO_RATE_TIME: f64 = 1e-6;

/// Describes one curve parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterMetadata {
    /// Label of the node that produced the parameter.
    pub label: String,
    /// Node date.
    pub date: Date,
    /// Year fraction from the valuation date to the node date.
    pub time: f64,
}

impl ParameterMetadata {
    /// Creates parameter metadata.
    #[must_use]
    pub fn new(label: impl Into<String>, date: Date, time: f64) -> Self {
        Self {
            label: label.into(),
            date,
            time,
        }
    }
}

/// Metadata of a nodal curve.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveMetadata {
    name: CurveName,
    value_type: ValueType,
    day_count: DayCountConvention,
    parameters: Vec<ParameterMetadata>,
    jacobian: Option<JacobianCalibrationMatrix>,
}

impl CurveMetadata {
    /// Creates curve metadata without a Jacobian.
    #[must_use]
    pub fn new(
        name: CurveName,
        value_type: ValueType,
        day_count: DayCountConvention,
        parameters: Vec<ParameterMetadata>,
    ) -> Self {
        Self {
            name,
            value_type,
            day_count,
            parameters,
            jacobian: None,
        }
    }

    /// Returns the curve name.
    #[must_use]
    pub fn name(&self) -> &CurveName {
        &self.name
    }

    /// Returns what the parameters represent.
    #[must_use]
    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// Returns the day count mapping dates to curve times.
    #[must_use]
    pub fn day_count(&self) -> DayCountConvention {
        self.day_count
    }

    /// Returns the per-parameter metadata.
    #[must_use]
    pub fn parameter_metadata(&self) -> &[ParameterMetadata] {
        &self.parameters
    }

    /// Returns the node times.
    #[must_use]
    pub fn times(&self) -> Vec<f64> {
        self.parameters.iter().map(|p| p.time).collect()
    }

    /// Returns the calibration Jacobian, if the curve was calibrated.
    #[must_use]
    pub fn jacobian(&self) -> Option<&JacobianCalibrationMatrix> {
        self.jacobian.as_ref()
    }

    /// Returns a copy carrying the given Jacobian.
    #[must_use]
    pub fn with_jacobian(mut self, jacobian: JacobianCalibrationMatrix) -> Self {
        self.jacobian = Some(jacobian);
        self
    }
}

/// A curve defined by a vector of parameters.
///
/// Times are year fractions from the valuation date under the curve's day
/// count. Implementations are immutable; "modifying" a curve returns a new
/// one.
pub trait NodalCurve: Send + Sync + fmt::Debug {
    /// Returns the curve metadata.
    fn metadata(&self) -> &CurveMetadata;

    /// Returns the parameter values.
    fn parameters(&self) -> &[f64];

    /// Returns the discount factor at time `t`.
    fn discount_factor(&self, t: f64) -> CurveResult<f64>;

    /// Returns `∂P(t)/∂pᵢ` for every parameter `pᵢ`.
    fn discount_factor_sensitivity(&self, t: f64) -> CurveResult<Vec<f64>>;

    /// Returns a curve with the same metadata and new parameter values.
    fn with_parameters(&self, parameters: Vec<f64>) -> CurveResult<Arc<dyn NodalCurve>>;

    /// Returns a curve with the same parameters and new metadata.
    fn with_metadata(&self, metadata: CurveMetadata) -> CurveResult<Arc<dyn NodalCurve>>;

    /// Returns the curve name.
    fn name(&self) -> &CurveName {
        self.metadata().name()
    }

    /// Returns the number of parameters.
    fn parameter_count(&self) -> usize {
        self.parameters().len()
    }

    /// Returns the continuously compounded zero rate at time `t`.
    fn zero_rate(&self, t: f64) -> CurveResult<f64> {
        let t = t.max(MIN_ZERO_RATE_TIME);
        Ok(-self.discount_factor(t)?.ln() / t)
    }

    /// Returns the curve time of a date.
    fn year_fraction(&self, valuation_date: Date, date: Date) -> f64 {
        self.metadata()
            .day_count()
            .year_fraction_f64(valuation_date, date)
    }
}
