//! Natural cubic spline interpolation.

use super::{check_range, find_segment, validate_nodes};
use crate::error::MathResult;
use crate::interpolation::Interpolator;
use crate::linear_algebra::solve_tridiagonal;

/// Natural cubic spline interpolation.
///
/// Piecewise cubic polynomials with continuous first and second derivatives;
/// "natural" means the second derivative is zero at both ends.
///
/// The knot second derivatives are linear in the node values, so the spline
/// is linear in its node values too. The sensitivity of the second
/// derivatives to each node value is precomputed at construction.
///
/// # Example
///
/// ```rust
/// use calibre_math::interpolation::{CubicSpline, Interpolator};
///
/// let xs = vec![0.0, 1.0, 2.0, 3.0];
/// let ys = vec![0.0, 1.0, 4.0, 9.0];
///
/// let spline = CubicSpline::new(xs, ys).unwrap();
/// let sensitivity = spline.parameter_sensitivity(1.5).unwrap();
/// assert!((sensitivity.iter().sum::<f64>() - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct CubicSpline {
    xs: Vec<f64>,
    ys: Vec<f64>,
    /// Second derivatives at each knot
    y2s: Vec<f64>,
    /// `y2_sensitivity[i][k]` = ∂y2s[i]/∂ys[k]
    y2_sensitivity: Vec<Vec<f64>>,
    allow_extrapolation: bool,
}

impl CubicSpline {
    /// Creates a natural cubic spline interpolator.
    ///
    /// # Errors
    ///
    /// Returns an error if there are fewer than 3 points, lengths differ, or
    /// `xs` is not strictly increasing.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        validate_nodes(&xs, &ys, 3)?;

        let n = xs.len();
        let y2s = compute_second_derivatives(&xs, &ys)?;
        let mut y2_sensitivity = vec![vec![0.0; n]; n];
        let mut unit = vec![0.0; n];
        for k in 0..n {
            unit[k] = 1.0;
            let column = compute_second_derivatives(&xs, &unit)?;
            for (i, value) in column.into_iter().enumerate() {
                y2_sensitivity[i][k] = value;
            }
            unit[k] = 0.0;
        }

        Ok(Self {
            xs,
            ys,
            y2s,
            y2_sensitivity,
            allow_extrapolation: false,
        })
    }

    /// Enables extrapolation beyond the data range.
    #[must_use]
    pub fn with_extrapolation(mut self) -> Self {
        self.allow_extrapolation = true;
        self
    }

    /// Segment index, width and the two spline weights at `x`.
    fn weights(&self, x: f64) -> (usize, f64, f64, f64) {
        let i = find_segment(&self.xs, x);
        let h = self.xs[i + 1] - self.xs[i];
        let a = (self.xs[i + 1] - x) / h;
        let b = (x - self.xs[i]) / h;
        (i, h, a, b)
    }
}

impl Interpolator for CubicSpline {
    fn interpolate(&self, x: f64) -> MathResult<f64> {
        check_range(&self.xs, x, self.allow_extrapolation)?;
        let (i, h, a, b) = self.weights(x);

        Ok(a * self.ys[i]
            + b * self.ys[i + 1]
            + ((a * a * a - a) * self.y2s[i] + (b * b * b - b) * self.y2s[i + 1]) * (h * h) / 6.0)
    }

    fn derivative(&self, x: f64) -> MathResult<f64> {
        check_range(&self.xs, x, self.allow_extrapolation)?;
        let (i, h, a, b) = self.weights(x);

        Ok((self.ys[i + 1] - self.ys[i]) / h
            + ((3.0 * b * b - 1.0) * self.y2s[i + 1] - (3.0 * a * a - 1.0) * self.y2s[i]) * h
                / 6.0)
    }

    fn parameter_sensitivity(&self, x: f64) -> MathResult<Vec<f64>> {
        check_range(&self.xs, x, self.allow_extrapolation)?;
        let (i, h, a, b) = self.weights(x);
        let ca = (a * a * a - a) * h * h / 6.0;
        let cb = (b * b * b - b) * h * h / 6.0;

        let mut sensitivity: Vec<f64> = (0..self.ys.len())
            .map(|k| ca * self.y2_sensitivity[i][k] + cb * self.y2_sensitivity[i + 1][k])
            .collect();
        sensitivity[i] += a;
        sensitivity[i + 1] += b;
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

/// Computes the knot second derivatives of the natural spline.
///
/// Interior knots satisfy
/// `hᵢ₋₁·M[i-1] + 2(hᵢ₋₁ + hᵢ)·M[i] + hᵢ·M[i+1] = 6(Δᵢ − Δᵢ₋₁)`
/// with `M[0] = M[n-1] = 0`.
fn compute_second_derivatives(xs: &[f64], ys: &[f64]) -> MathResult<Vec<f64>> {
    let n = xs.len();
    let interior = n - 2;
    let h: Vec<f64> = xs.windows(2).map(|w| w[1] - w[0]).collect();
    let slope: Vec<f64> = (0..n - 1).map(|i| (ys[i + 1] - ys[i]) / h[i]).collect();

    let lower: Vec<f64> = (1..interior).map(|k| h[k]).collect();
    let diag: Vec<f64> = (0..interior).map(|k| 2.0 * (h[k] + h[k + 1])).collect();
    let upper: Vec<f64> = (0..interior.saturating_sub(1)).map(|k| h[k + 1]).collect();
    let rhs: Vec<f64> = (0..interior)
        .map(|k| 6.0 * (slope[k + 1] - slope[k]))
        .collect();

    let inner = solve_tridiagonal(&lower, &diag, &upper, &rhs)?;

    let mut y2s = vec![0.0; n];
    y2s[1..n - 1].copy_from_slice(&inner);
    Ok(y2s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cubic_spline_through_points() {
        let xs = vec![0.0, 1.0, 2.0, 3.0];
        let ys = vec![0.0, 1.0, 4.0, 9.0];

        let spline = CubicSpline::new(xs.clone(), ys.clone()).unwrap();
        for (x, y) in xs.iter().zip(ys.iter()) {
            assert_relative_eq!(spline.interpolate(*x).unwrap(), *y, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_natural_end_conditions() {
        let spline = CubicSpline::new(vec![0.0, 1.0, 2.5, 4.0], vec![1.0, 3.0, 2.0, 5.0]).unwrap();
        assert_relative_eq!(spline.y2s[0], 0.0);
        assert_relative_eq!(spline.y2s[3], 0.0);
    }

    #[test]
    fn test_reproduces_straight_line() {
        let xs = vec![0.0, 1.0, 3.0, 4.0];
        let ys: Vec<f64> = xs.iter().map(|x| 2.0 * x + 1.0).collect();
        let spline = CubicSpline::new(xs, ys).unwrap();

        assert_relative_eq!(spline.interpolate(2.2).unwrap(), 5.4, epsilon = 1e-12);
        assert_relative_eq!(spline.derivative(2.2).unwrap(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_derivative_matches_finite_difference() {
        let spline = CubicSpline::new(vec![0.0, 1.0, 2.0, 3.0], vec![0.0, 1.0, 0.0, 1.0]).unwrap();
        let h = 1e-6;
        for x in [0.3, 1.4, 2.7] {
            let fd = (spline.interpolate(x + h).unwrap() - spline.interpolate(x - h).unwrap())
                / (2.0 * h);
            assert_relative_eq!(spline.derivative(x).unwrap(), fd, epsilon = 1e-6);
        }
    }
}
