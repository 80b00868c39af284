//! Log-linear interpolation.

use super::{check_range, find_segment, validate_nodes};
use crate::error::{MathError, MathResult};
use crate::interpolation::Interpolator;

/// Log-linear interpolation between data points.
///
/// Interpolates `ln(y)` linearly and exponentiates the result. On discount
/// factors this gives piecewise constant instantaneous forward rates.
///
/// ```text
/// y(x) = exp((1 − t)·ln(yᵢ) + t·ln(yᵢ₊₁))
/// ```
///
/// # Example
///
/// ```rust
/// use calibre_math::interpolation::{LogLinearInterpolator, Interpolator};
///
/// let times = vec![0.0, 1.0, 2.0];
/// let discount_factors = vec![1.0, 0.97, 0.94];
///
/// let interp = LogLinearInterpolator::new(times, discount_factors).unwrap();
/// let df = interp.interpolate(1.5).unwrap();
/// assert!((df - (0.97f64 * 0.94).sqrt()).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct LogLinearInterpolator {
    xs: Vec<f64>,
    ys: Vec<f64>,
    log_ys: Vec<f64>,
    allow_extrapolation: bool,
}

impl LogLinearInterpolator {
    /// Creates a new log-linear interpolator.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no points, lengths differ, `xs` is not
    /// strictly increasing, or any y value is non-positive.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        validate_nodes(&xs, &ys, 1)?;
        if let Some(y) = ys.iter().find(|y| **y <= 0.0) {
            return Err(MathError::invalid_input(format!(
                "log-linear interpolation requires positive values, got {y}"
            )));
        }

        let log_ys = ys.iter().map(|y| y.ln()).collect();
        Ok(Self {
            xs,
            ys,
            log_ys,
            allow_extrapolation: false,
        })
    }

    /// Enables extrapolation beyond the data range.
    #[must_use]
    pub fn with_extrapolation(mut self) -> Self {
        self.allow_extrapolation = true;
        self
    }

    fn locate(&self, x: f64) -> (usize, f64) {
        let i = find_segment(&self.xs, x);
        let t = (x - self.xs[i]) / (self.xs[i + 1] - self.xs[i]);
        (i, t)
    }
}

impl Interpolator for LogLinearInterpolator {
    fn interpolate(&self, x: f64) -> MathResult<f64> {
        check_range(&self.xs, x, self.allow_extrapolation)?;
        if self.xs.len() == 1 {
            return Ok(self.ys[0]);
        }

        let (i, t) = self.locate(x);
        Ok(((1.0 - t) * self.log_ys[i] + t * self.log_ys[i + 1]).exp())
    }

    fn derivative(&self, x: f64) -> MathResult<f64> {
        if self.xs.len() == 1 {
            check_range(&self.xs, x, self.allow_extrapolation)?;
            return Ok(0.0);
        }

        // d/dx exp(g(x)) = g'(x) exp(g(x))
        let y = self.interpolate(x)?;
        let i = find_segment(&self.xs, x);
        let slope = (self.log_ys[i + 1] - self.log_ys[i]) / (self.xs[i + 1] - self.xs[i]);
        Ok(y * slope)
    }

    fn parameter_sensitivity(&self, x: f64) -> MathResult<Vec<f64>> {
        let y = self.interpolate(x)?;
        let mut sensitivity = vec![0.0; self.ys.len()];
        if self.xs.len() == 1 {
            sensitivity[0] = 1.0;
            return Ok(sensitivity);
        }

        let (i, t) = self.locate(x);
        sensitivity[i] = y * (1.0 - t) / self.ys[i];
        sensitivity[i + 1] = y * t / self.ys[i + 1];
        Ok(sensitivity)
    }

    fn allows_extrapolation(&self) -> bool {
        self.allow_extrapolation
    }

    fn min_x(&self) -> f64 {
        self.xs[0]
    }

    fn max_x(&self) -> f64 {
        self.xs[self.xs.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_constant_forward_between_nodes() {
        let rate: f64 = 0.05;
        let times = vec![0.0, 1.0, 2.0];
        let dfs: Vec<f64> = times.iter().map(|t| (-rate * t).exp()).collect();
        let interp = LogLinearInterpolator::new(times, dfs).unwrap();

        for t in [0.3, 1.2, 1.9] {
            assert_relative_eq!(interp.interpolate(t).unwrap(), (-rate * t).exp(), epsilon = 1e-12);
            let fwd = -interp.derivative(t).unwrap() / interp.interpolate(t).unwrap();
            assert_relative_eq!(fwd, rate, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_rejects_non_positive() {
        assert!(LogLinearInterpolator::new(vec![0.0, 1.0], vec![1.0, 0.0]).is_err());
        assert!(LogLinearInterpolator::new(vec![0.0, 1.0], vec![1.0, -0.5]).is_err());
    }
}
