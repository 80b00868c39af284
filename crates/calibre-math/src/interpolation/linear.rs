//! Linear interpolation.

use super::{check_range, find_segment, validate_nodes};
use crate::error::MathResult;
use crate::interpolation::Interpolator;

/// Linear interpolation between data points.
///
/// A single point defines a constant function.
///
/// # Example
///
/// ```rust
/// use calibre_math::interpolation::{LinearInterpolator, Interpolator};
///
/// let xs = vec![0.0, 1.0, 2.0, 3.0];
/// let ys = vec![0.0, 1.0, 4.0, 9.0];
///
/// let interp = LinearInterpolator::new(xs, ys).unwrap();
/// assert_eq!(interp.interpolate(1.5).unwrap(), 2.5);
/// assert_eq!(interp.parameter_sensitivity(1.5).unwrap(), vec![0.0, 0.5, 0.5, 0.0]);
/// ```
#[derive(Debug, Clone)]
pub struct LinearInterpolator {
    xs: Vec<f64>,
    ys: Vec<f64>,
    allow_extrapolation: bool,
}

impl LinearInterpolator {
    /// Creates a new linear interpolator.
    ///
    /// # Arguments
    ///
    /// * `xs` - X coordinates (strictly increasing)
    /// * `ys` - Y coordinates
    ///
    /// # Errors
    ///
    /// Returns an error if there are no points, if lengths differ, or if `xs`
    /// is not strictly increasing.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        validate_nodes(&xs, &ys, 1)?;
        Ok(Self {
            xs,
            ys,
            allow_extrapolation: false,
        })
    }

    /// Enables extrapolation beyond the data range.
    #[must_use]
    pub fn with_extrapolation(mut self) -> Self {
        self.allow_extrapolation = true;
        self
    }

    /// Segment index and position `t` of `x` within it (may lie outside [0, 1]
    /// when extrapolating).
    fn locate(&self, x: f64) -> (usize, f64) {
        let i = find_segment(&self.xs, x);
        let t = (x - self.xs[i]) / (self.xs[i + 1] - self.xs[i]);
        (i, t)
    }
}

impl Interpolator for LinearInterpolator {
    fn interpolate(&self, x: f64) -> MathResult<f64> {
        check_range(&self.xs, x, self.allow_extrapolation)?;
        if self.xs.len() == 1 {
            return Ok(self.ys[0]);
        }

        let (i, t) = self.locate(x);
        Ok(self.ys[i] + t * (self.ys[i + 1] - self.ys[i]))
    }

    fn derivative(&self, x: f64) -> MathResult<f64> {
        check_range(&self.xs, x, self.allow_extrapolation)?;
        if self.xs.len() == 1 {
            return Ok(0.0);
        }

        let i = find_segment(&self.xs, x);
        Ok((self.ys[i + 1] - self.ys[i]) / (self.xs[i + 1] - self.xs[i]))
    }

    fn parameter_sensitivity(&self, x: f64) -> MathResult<Vec<f64>> {
        check_range(&self.xs, x, self.allow_extrapolation)?;
        let mut sensitivity = vec![0.0; self.ys.len()];
        if self.xs.len() == 1 {
            sensitivity[0] = 1.0;
            return Ok(sensitivity);
        }

        let (i, t) = self.locate(x);
        sensitivity[i] = 1.0 - t;
        sensitivity[i + 1] = t;
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
