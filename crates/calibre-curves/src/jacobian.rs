//! Calibration Jacobians.

use nalgebra::{DMatrix, DVector};

use crate::error::{CurveError, CurveResult};
use crate::names::CurveName;
use crate::parameter::ParameterOrder;
use crate::sensitivity::CurveParameterSensitivities;

/// Sensitivity of one curve's parameters to the market quotes it was
/// calibrated against.
///
/// Row `i` holds the derivative of the curve's `i`-th parameter with respect
/// to every quote in [`order`](Self::order): the quotes of the curve's own
/// group and of every group calibrated before it. Quotes are laid out in the
/// parameter order since each node contributes exactly one quote and one
/// parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct JacobianCalibrationMatrix {
    order: ParameterOrder,
    matrix: DMatrix<f64>,
}

impl JacobianCalibrationMatrix {
    /// Creates a Jacobian matrix.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::Configuration` if the column count differs from
    /// the order's total parameter count.
    pub fn new(order: ParameterOrder, matrix: DMatrix<f64>) -> CurveResult<Self> {
        if matrix.ncols() != order.total_parameter_count() {
            return Err(CurveError::configuration(format!(
                "Jacobian has {} columns but the order {} has {} parameters",
                matrix.ncols(),
                order,
                order.total_parameter_count()
            )));
        }
        Ok(Self { order, matrix })
    }

    /// Returns the quote ordering of the columns.
    #[must_use]
    pub fn order(&self) -> &ParameterOrder {
        &self.order
    }

    /// Returns the matrix.
    #[must_use]
    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    /// Number of curve parameters (rows).
    #[must_use]
    pub fn parameter_count(&self) -> usize {
        self.matrix.nrows()
    }

    /// Returns true if the quotes of the named curve are in the ordering.
    #[must_use]
    pub fn contains_curve(&self, name: &CurveName) -> bool {
        self.order.contains(name)
    }

    /// Splits a full-width row into one piece per curve of the ordering.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::Configuration` if `row` does not have one entry
    /// per column.
    pub fn split(&self, row: &[f64]) -> CurveResult<CurveParameterSensitivities> {
        if row.len() != self.matrix.ncols() {
            return Err(CurveError::configuration(format!(
                "cannot split {} values over {} Jacobian columns",
                row.len(),
                self.matrix.ncols()
            )));
        }
        let mut result = CurveParameterSensitivities::empty();
        for (offset, entry) in self.order.iter_with_offsets() {
            let piece = row[offset..offset + entry.parameter_count()].to_vec();
            result = result.combined_with(&CurveParameterSensitivities::of(
                entry.name().clone(),
                piece,
            ))?;
        }
        Ok(result)
    }

    /// Converts a sensitivity to this curve's parameters into a sensitivity
    /// to the market quotes, split per curve.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::Configuration` if the sensitivity length differs
    /// from the parameter count.
    pub fn market_quote_sensitivity(
        &self,
        parameter_sensitivity: &[f64],
    ) -> CurveResult<CurveParameterSensitivities> {
        if parameter_sensitivity.len() != self.matrix.nrows() {
            return Err(CurveError::configuration(format!(
                "sensitivity has {} values but the Jacobian has {} rows",
                parameter_sensitivity.len(),
                self.matrix.nrows()
            )));
        }
        let row = self.matrix.tr_mul(&DVector::from_column_slice(parameter_sensitivity));
        self.split(row.as_slice())
    }
}
