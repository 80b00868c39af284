//! Broyden's quasi-Newton method for vector root finding.

use log::{debug, trace};
use nalgebra::{DMatrix, DVector};

use super::{
    VectorRootResult, DEFAULT_ABSOLUTE_TOLERANCE, DEFAULT_MAX_STEPS, DEFAULT_RELATIVE_TOLERANCE,
};
use crate::error::MathError;
use crate::linear_algebra::solve_linear_system;

/// Smallest step fraction tried by the backtracking line search.
const MIN_STEP_FRACTION: f64 = 1e-10;

/// Broyden vector root finder.
///
/// The Jacobian is evaluated analytically at the starting point and then
/// maintained with rank-one Broyden updates:
///
/// ```text
/// J ← J + ((Δy − J·Δx) ⊗ Δx) / (Δx·Δx)
/// ```
///
/// Each Newton step is damped by a backtracking line search on `|f|²`. When
/// the search cannot find a decrease along the quasi-Newton direction, the
/// Jacobian is re-evaluated analytically and the step retried once before
/// giving up.
///
/// The search has converged when both
///
/// - `|Δx| < abs_tol + rel_tol·|x|`, and
/// - `|f(x)| < abs_tol`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BroydenVectorRootFinder {
    absolute_tolerance: f64,
    relative_tolerance: f64,
    max_steps: u32,
}

impl Default for BroydenVectorRootFinder {
    fn default() -> Self {
        Self {
            absolute_tolerance: DEFAULT_ABSOLUTE_TOLERANCE,
            relative_tolerance: DEFAULT_RELATIVE_TOLERANCE,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }
}

struct Trial {
    x: DVector<f64>,
    y: DVector<f64>,
    residual: f64,
    delta_x: DVector<f64>,
}

enum LineSearch<E> {
    Accepted(Trial),
    /// Carries the last error raised by the function, if any trial point failed.
    Failed(Option<E>),
}

impl BroydenVectorRootFinder {
    /// Creates a root finder.
    ///
    /// # Arguments
    ///
    /// * `absolute_tolerance` - Bound on the residual norm and absolute step size
    /// * `relative_tolerance` - Step size bound relative to `|x|`
    /// * `max_steps` - Maximum number of iterations
    #[must_use]
    pub fn new(absolute_tolerance: f64, relative_tolerance: f64, max_steps: u32) -> Self {
        Self {
            absolute_tolerance,
            relative_tolerance,
            max_steps,
        }
    }

    /// Returns the absolute tolerance.
    #[must_use]
    pub fn absolute_tolerance(&self) -> f64 {
        self.absolute_tolerance
    }

    /// Returns the relative tolerance.
    #[must_use]
    pub fn relative_tolerance(&self) -> f64 {
        self.relative_tolerance
    }

    /// Returns the maximum number of iterations.
    #[must_use]
    pub fn max_steps(&self) -> u32 {
        self.max_steps
    }

    /// Finds `x` such that `function(x) = 0`.
    ///
    /// # Arguments
    ///
    /// * `function` - The vector function, `Rⁿ → Rⁿ`
    /// * `jacobian` - Its analytic Jacobian, `n × n`
    /// * `start` - Starting point
    ///
    /// # Errors
    ///
    /// - Any error returned by `function` at the starting point or by `jacobian`
    /// - `MathError::DimensionMismatch` if the system is not square
    /// - `MathError::ConvergenceFailed` if `max_steps` is exhausted or no
    ///   descent step can be found
    pub fn find_root<F, J, E>(
        &self,
        function: F,
        jacobian: J,
        start: DVector<f64>,
    ) -> Result<VectorRootResult, E>
    where
        F: Fn(&DVector<f64>) -> Result<DVector<f64>, E>,
        J: Fn(&DVector<f64>) -> Result<DMatrix<f64>, E>,
        E: From<MathError>,
    {
        let n = start.len();
        let mut x = start;
        let mut y = function(&x)?;
        if y.len() != n {
            return Err(MathError::DimensionMismatch {
                rows1: y.len(),
                cols1: 1,
                rows2: n,
                cols2: 1,
            }
            .into());
        }
        if y.iter().any(|v| !v.is_finite()) {
            return Err(MathError::invalid_input("function is not finite at the start point").into());
        }

        let mut residual = y.norm();
        if residual < self.absolute_tolerance {
            return Ok(VectorRootResult {
                root: x,
                iterations: 0,
                residual,
                jacobian_evaluations: 0,
            });
        }

        let mut jac = evaluate_jacobian(&jacobian, &x, n)?;
        let mut jacobian_evaluations = 1;

        for step in 1..=self.max_steps {
            let direction = solve_linear_system(&jac, &y)?;
            let trial = match self.line_search(&function, &x, &direction, residual) {
                LineSearch::Accepted(trial) => trial,
                LineSearch::Failed(_) => {
                    debug!("step {step}: no descent along Broyden direction, recomputing Jacobian");
                    jac = evaluate_jacobian(&jacobian, &x, n)?;
                    jacobian_evaluations += 1;
                    let direction = solve_linear_system(&jac, &y)?;
                    match self.line_search(&function, &x, &direction, residual) {
                        LineSearch::Accepted(trial) => trial,
                        LineSearch::Failed(Some(err)) => return Err(err),
                        LineSearch::Failed(None) => {
                            return Err(MathError::convergence_failed(step, residual).into())
                        }
                    }
                }
            };

            let delta_y = &trial.y - &y;
            let step_norm_sq = trial.delta_x.norm_squared();
            if step_norm_sq > 0.0 {
                let correction = (&delta_y - &jac * &trial.delta_x) * trial.delta_x.transpose();
                jac += correction / step_norm_sq;
            }

            x = trial.x;
            y = trial.y;
            residual = trial.residual;
            let step_norm = step_norm_sq.sqrt();
            trace!("step {step}: |dx| = {step_norm:.3e}, |f| = {residual:.3e}");

            if step_norm < self.absolute_tolerance + self.relative_tolerance * x.norm()
                && residual < self.absolute_tolerance
            {
                return Ok(VectorRootResult {
                    root: x,
                    iterations: step,
                    residual,
                    jacobian_evaluations,
                });
            }
        }

        Err(MathError::convergence_failed(self.max_steps, residual).into())
    }

    /// Backtracks along `-direction` until `|f|` decreases.
    ///
    /// Trial points where the function fails or is non-finite count as
    /// rejected steps.
    fn line_search<F, E>(
        &self,
        function: &F,
        x: &DVector<f64>,
        direction: &DVector<f64>,
        residual: f64,
    ) -> LineSearch<E>
    where
        F: Fn(&DVector<f64>) -> Result<DVector<f64>, E>,
    {
        let mut fraction = 1.0;
        let mut last_error = None;

        while fraction >= MIN_STEP_FRACTION {
            let delta_x = direction * -fraction;
            let candidate = x + &delta_x;
            match function(&candidate) {
                Ok(y) if y.iter().all(|v| v.is_finite()) => {
                    let trial_residual = y.norm();
                    if trial_residual < residual || trial_residual < self.absolute_tolerance {
                        return LineSearch::Accepted(Trial {
                            x: candidate,
                            y,
                            residual: trial_residual,
                            delta_x,
                        });
                    }
                }
                Ok(_) => {}
                Err(err) => last_error = Some(err),
            }
            fraction *= 0.5;
        }

        LineSearch::Failed(last_error)
    }
}

fn evaluate_jacobian<J, E>(jacobian: &J, x: &DVector<f64>, n: usize) -> Result<DMatrix<f64>, E>
where
    J: Fn(&DVector<f64>) -> Result<DMatrix<f64>, E>,
    E: From<MathError>,
{
    let jac = jacobian(x)?;
    if jac.nrows() != n || jac.ncols() != n {
        return Err(MathError::DimensionMismatch {
            rows1: jac.nrows(),
            cols1: jac.ncols(),
            rows2: n,
            cols2: n,
        }
        .into());
    }
    Ok(jac)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    type Res<T> = Result<T, MathError>;

    #[test]
    fn test_linear_system_converges_quickly() {
        let a = DMatrix::from_row_slice(2, 2, &[3.0, 1.0, 1.0, 2.0]);
        let b = DVector::from_vec(vec![9.0, 8.0]);
        let f = |x: &DVector<f64>| -> Res<DVector<f64>> { Ok(&a * x - &b) };
        let jac = |_: &DVector<f64>| -> Res<DMatrix<f64>> { Ok(a.clone()) };

        let result = BroydenVectorRootFinder::default()
            .find_root(f, jac, DVector::zeros(2))
            .unwrap();

        assert_relative_eq!(result.root[0], 2.0, epsilon = 1e-10);
        assert_relative_eq!(result.root[1], 3.0, epsilon = 1e-10);
        assert!(result.iterations <= 3);
        assert_eq!(result.jacobian_evaluations, 1);
    }

    #[test]
    fn test_nonlinear_system() {
        // exp(x) - y = 0, x + y - 3 = 0
        let f = |v: &DVector<f64>| -> Res<DVector<f64>> {
            Ok(DVector::from_vec(vec![v[0].exp() - v[1], v[0] + v[1] - 3.0]))
        };
        let jac = |v: &DVector<f64>| -> Res<DMatrix<f64>> {
            Ok(DMatrix::from_row_slice(2, 2, &[v[0].exp(), -1.0, 1.0, 1.0]))
        };

        let result = BroydenVectorRootFinder::new(1e-12, 1e-12, 100)
            .find_root(f, jac, DVector::from_vec(vec![0.5, 2.0]))
            .unwrap();

        let x = result.root[0];
        assert_relative_eq!(x.exp(), 3.0 - x, epsilon = 1e-10);
        assert!(result.residual < 1e-12);
    }

    #[test]
    fn test_start_at_root() {
        let f = |v: &DVector<f64>| -> Res<DVector<f64>> { Ok(v.clone()) };
        let jac = |_: &DVector<f64>| -> Res<DMatrix<f64>> { Ok(DMatrix::identity(1, 1)) };

        let result = BroydenVectorRootFinder::default()
            .find_root(f, jac, DVector::zeros(1))
            .unwrap();
        assert_eq!(result.iterations, 0);
        assert_eq!(result.jacobian_evaluations, 0);
    }

    #[test]
    fn test_max_steps_exhausted() {
        let f = |v: &DVector<f64>| -> Res<DVector<f64>> {
            Ok(DVector::from_vec(vec![v[0].powi(3) - 8.0]))
        };
        let jac = |v: &DVector<f64>| -> Res<DMatrix<f64>> {
            Ok(DMatrix::from_element(1, 1, 3.0 * v[0] * v[0]))
        };

        let err = BroydenVectorRootFinder::new(1e-12, 1e-12, 1)
            .find_root(f, jac, DVector::from_element(1, 10.0))
            .unwrap_err();
        assert!(matches!(err, MathError::ConvergenceFailed { iterations: 1, .. }));
    }

    #[test]
    fn test_function_error_at_start_propagates() {
        let f = |_: &DVector<f64>| -> Res<DVector<f64>> { Err(MathError::invalid_input("boom")) };
        let jac = |_: &DVector<f64>| -> Res<DMatrix<f64>> { Ok(DMatrix::identity(1, 1)) };

        let err = BroydenVectorRootFinder::default()
            .find_root(f, jac, DVector::zeros(1))
            .unwrap_err();
        assert_eq!(err, MathError::invalid_input("boom"));
    }

    #[test]
    fn test_rejects_non_square_jacobian() {
        let f = |v: &DVector<f64>| -> Res<DVector<f64>> { Ok(v.add_scalar(1.0)) };
        let jac = |_: &DVector<f64>| -> Res<DMatrix<f64>> { Ok(DMatrix::zeros(2, 1)) };

        let err = BroydenVectorRootFinder::default()
            .find_root(f, jac, DVector::zeros(2))
            .unwrap_err();
        assert!(matches!(err, MathError::DimensionMismatch { .. }));
    }
}
