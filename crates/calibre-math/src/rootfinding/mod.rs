//! Vector root finding.
//!
//! Solves square systems `f(x) = 0` where `f: Rⁿ → Rⁿ`. The function and its
//! Jacobian are supplied as fallible closures so callers can propagate their
//! own error types through the solver, as long as those types can absorb a
//! [`MathError`](crate::error::MathError).
//!
//! # Example
//!
//! ```rust
//! use calibre_math::error::MathError;
//! use calibre_math::rootfinding::BroydenVectorRootFinder;
//! use nalgebra::{DMatrix, DVector};
//!
//! // x² + y² = 4, x = y
//! let f = |v: &DVector<f64>| -> Result<DVector<f64>, MathError> {
//!     Ok(DVector::from_vec(vec![v[0] * v[0] + v[1] * v[1] - 4.0, v[0] - v[1]]))
//! };
//! let jac = |v: &DVector<f64>| -> Result<DMatrix<f64>, MathError> {
//!     Ok(DMatrix::from_row_slice(2, 2, &[2.0 * v[0], 2.0 * v[1], 1.0, -1.0]))
//! };
//!
//! let result = BroydenVectorRootFinder::default()
//!     .find_root(f, jac, DVector::from_vec(vec![1.0, 1.0]))
//!     .unwrap();
//! assert!((result.root[0] - 2f64.sqrt()).abs() < 1e-8);
//! ```

mod broyden;

pub use broyden::BroydenVectorRootFinder;

use nalgebra::DVector;

/// Default absolute tolerance on step size and residual norm.
pub const DEFAULT_ABSOLUTE_TOLERANCE: f64 = 1e-9;

/// Default relative tolerance on step size.
pub const DEFAULT_RELATIVE_TOLERANCE: f64 = 1e-9;

/// Default maximum number of iterations.
pub const DEFAULT_MAX_STEPS: u32 = 1000;

/// Result of a vector root search.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorRootResult {
    /// The root found.
    pub root: DVector<f64>,
    /// Number of iterations taken.
    pub iterations: u32,
    /// Euclidean norm of `f(root)`.
    pub residual: f64,
    /// Number of times the analytic Jacobian was evaluated.
    pub jacobian_evaluations: u32,
}
