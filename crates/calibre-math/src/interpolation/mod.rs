//! Interpolation methods for curve construction.
//!
//! Every interpolator reports, besides the interpolated value, its
//! sensitivity to each node value. Curve calibration chains these
//! sensitivities into the Jacobian of instrument prices with respect to curve
//! parameters.
//!
//! # Available Methods
//!
//! - [`LinearInterpolator`]: Piecewise linear
//! - [`LogLinearInterpolator`]: Linear on `ln(y)`, for discount factors
//! - [`CubicSpline`]: Natural cubic spline
//!
//! | Method | Smoothness | Positive Forwards | Typical value type |
//! |--------|------------|-------------------|--------------------|
//! | Linear | C0 | No | Zero rates |
//! | Log-Linear | C0 | Yes (on discount) | Discount factors |
//! | Cubic Spline | C2 | No | Zero rates |

mod cubic_spline;
mod linear;
mod log_linear;

pub use cubic_spline::CubicSpline;
pub use linear::LinearInterpolator;
pub use log_linear::LogLinearInterpolator;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{MathError, MathResult};

/// Trait for interpolation methods.
pub trait Interpolator: Send + Sync + fmt::Debug {
    /// Returns the interpolated value at x.
    fn interpolate(&self, x: f64) -> MathResult<f64>;

    /// Returns the first derivative at x.
    fn derivative(&self, x: f64) -> MathResult<f64>;

    /// Returns `∂y(x)/∂yᵢ` for every node value `yᵢ`.
    fn parameter_sensitivity(&self, x: f64) -> MathResult<Vec<f64>>;

    /// Returns true if extrapolation is allowed.
    fn allows_extrapolation(&self) -> bool {
        false
    }

    /// Returns the minimum x value in the data.
    fn min_x(&self) -> f64;

    /// Returns the maximum x value in the data.
    fn max_x(&self) -> f64;

    /// Checks if x is within the interpolation range.
    fn in_range(&self, x: f64) -> bool {
        x >= self.min_x() && x <= self.max_x()
    }
}

/// Selects an interpolation method by value.
///
/// Curve definitions store the kind and bind it to node data each time a
/// curve is built from a new parameter vector.
///
/// # Example
///
/// ```rust
/// use calibre_math::interpolation::InterpolatorKind;
///
/// let interp = InterpolatorKind::Linear.bind(vec![1.0, 2.0], vec![0.02, 0.03]).unwrap();
/// assert!((interp.interpolate(1.5).unwrap() - 0.025).abs() < 1e-15);
/// // Extrapolation extends the end segments
/// assert!((interp.interpolate(3.0).unwrap() - 0.04).abs() < 1e-15);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum InterpolatorKind {
    /// Piecewise linear.
    #[default]
    Linear,
    /// Linear on the logarithm of the values.
    LogLinear,
    /// Natural cubic spline.
    NaturalCubicSpline,
}

impl InterpolatorKind {
    /// Builds an interpolator over the data with extrapolation enabled.
    pub fn bind(&self, xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Box<dyn Interpolator>> {
        Ok(match self {
            InterpolatorKind::Linear => Box::new(LinearInterpolator::new(xs, ys)?.with_extrapolation()),
            InterpolatorKind::LogLinear => {
                Box::new(LogLinearInterpolator::new(xs, ys)?.with_extrapolation())
            }
            InterpolatorKind::NaturalCubicSpline => {
                Box::new(CubicSpline::new(xs, ys)?.with_extrapolation())
            }
        })
    }

    /// Minimum number of nodes the method accepts.
    #[must_use]
    pub fn min_points(&self) -> usize {
        match self {
            InterpolatorKind::Linear | InterpolatorKind::LogLinear => 1,
            InterpolatorKind::NaturalCubicSpline => 3,
        }
    }
}

impl fmt::Display for InterpolatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InterpolatorKind::Linear => "Linear",
            InterpolatorKind::LogLinear => "LogLinear",
            InterpolatorKind::NaturalCubicSpline => "NaturalCubicSpline",
        };
        write!(f, "{name}")
    }
}

/// Validates node data shared by all interpolators.
fn validate_nodes(xs: &[f64], ys: &[f64], min_points: usize) -> MathResult<()> {
    if xs.len() < min_points {
        return Err(MathError::insufficient_data(min_points, xs.len()));
    }
    if xs.len() != ys.len() {
        return Err(MathError::invalid_input(format!(
            "xs and ys must have same length: {} vs {}",
            xs.len(),
            ys.len()
        )));
    }
    if xs.iter().chain(ys).any(|v| !v.is_finite()) {
        return Err(MathError::invalid_input("node values must be finite"));
    }
    if xs.windows(2).any(|w| w[1] <= w[0]) {
        return Err(MathError::invalid_input("x values must be strictly increasing"));
    }
    Ok(())
}

/// Finds the index i such that xs[i] <= x < xs[i+1], clamped to the end segments.
///
/// Requires at least two points.
fn find_segment(xs: &[f64], x: f64) -> usize {
    match xs.binary_search_by(|probe| probe.partial_cmp(&x).unwrap_or(std::cmp::Ordering::Equal)) {
        Ok(i) => i.min(xs.len() - 2),
        Err(i) => (i.saturating_sub(1)).min(xs.len() - 2),
    }
}

fn check_range(xs: &[f64], x: f64, allow_extrapolation: bool) -> MathResult<()> {
    let (min, max) = (xs[0], xs[xs.len() - 1]);
    if !allow_extrapolation && (x < min || x > max) {
        return Err(MathError::ExtrapolationNotAllowed { x, min, max });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_all_interpolators_through_points() {
        let times = vec![0.5, 1.0, 2.0, 3.0, 5.0];
        let rates = vec![0.02, 0.025, 0.03, 0.035, 0.04];

        for kind in [
            InterpolatorKind::Linear,
            InterpolatorKind::LogLinear,
            InterpolatorKind::NaturalCubicSpline,
        ] {
            let interp = kind.bind(times.clone(), rates.clone()).unwrap();
            for (t, r) in times.iter().zip(rates.iter()) {
                assert_relative_eq!(interp.interpolate(*t).unwrap(), *r, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_parameter_sensitivity_matches_bumping() {
        let times = vec![0.5, 1.0, 2.0, 3.0, 5.0];
        let values = vec![0.99, 0.975, 0.94, 0.90, 0.82];
        let bump = 1e-7;

        for kind in [
            InterpolatorKind::Linear,
            InterpolatorKind::LogLinear,
            InterpolatorKind::NaturalCubicSpline,
        ] {
            let base = kind.bind(times.clone(), values.clone()).unwrap();
            for x in [0.25, 0.75, 1.5, 2.9, 4.0, 6.0] {
                let sensitivity = base.parameter_sensitivity(x).unwrap();
                for i in 0..values.len() {
                    let mut bumped = values.clone();
                    bumped[i] += bump;
                    let up = kind.bind(times.clone(), bumped).unwrap().interpolate(x).unwrap();
                    let fd = (up - base.interpolate(x).unwrap()) / bump;
                    assert_relative_eq!(sensitivity[i], fd, epsilon = 1e-6);
                }
            }
        }
    }

    #[test]
    fn test_single_point_is_constant() {
        for kind in [InterpolatorKind::Linear, InterpolatorKind::LogLinear] {
            let interp = kind.bind(vec![2.0], vec![0.97]).unwrap();
            assert_relative_eq!(interp.interpolate(0.5).unwrap(), 0.97);
            assert_relative_eq!(interp.interpolate(10.0).unwrap(), 0.97);
            assert_eq!(interp.parameter_sensitivity(5.0).unwrap(), vec![1.0]);
            assert_relative_eq!(interp.derivative(1.0).unwrap(), 0.0);
        }
        assert!(InterpolatorKind::NaturalCubicSpline
            .bind(vec![1.0, 2.0], vec![0.1, 0.2])
            .is_err());
    }

    #[test]
    fn test_validation() {
        assert!(InterpolatorKind::Linear.bind(vec![], vec![]).is_err());
        assert!(InterpolatorKind::Linear.bind(vec![1.0, 1.0], vec![0.1, 0.2]).is_err());
        assert!(InterpolatorKind::Linear.bind(vec![1.0, 2.0], vec![0.1]).is_err());
        assert!(InterpolatorKind::Linear.bind(vec![1.0, 2.0], vec![0.1, f64::NAN]).is_err());
    }
}
