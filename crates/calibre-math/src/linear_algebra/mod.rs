//! Linear algebra utilities.
//!
//! Thin checked wrappers over `nalgebra` dense matrices: inversion that
//! refuses ill-conditioned input, a least-squares solve for Newton steps
//! and block concatenation.

use crate::error::{MathError, MathResult};
use nalgebra::{DMatrix, DVector};

/// Largest condition number accepted by [`invert`].
pub const MAX_CONDITION_NUMBER: f64 = 1e14;

/// Singular values below this fraction of the largest are dropped by
/// [`solve_linear_system`].
const SVD_RELATIVE_EPS: f64 = 1e-15;

/// Returns the 2-norm condition number of a matrix.
///
/// Infinite when the smallest singular value is zero. An empty matrix has
/// condition number 1.
#[must_use]
pub fn condition_number(matrix: &DMatrix<f64>) -> f64 {
    if matrix.is_empty() {
        return 1.0;
    }
    let singular_values = matrix.clone().svd(false, false).singular_values;
    let max = singular_values.max();
    let min = singular_values.min();
    if min <= 0.0 {
        f64::INFINITY
    } else {
        max / min
    }
}

/// Inverts a square matrix.
///
/// # Errors
///
/// - `DimensionMismatch` if the matrix is not square
/// - `SingularMatrix` if it contains non-finite values, is singular, or its
///   condition number exceeds [`MAX_CONDITION_NUMBER`]
///
/// # Example
///
/// ```rust
/// use calibre_math::linear_algebra::invert;
/// use nalgebra::DMatrix;
///
/// let m = DMatrix::from_row_slice(2, 2, &[4.0, 7.0, 2.0, 6.0]);
/// let inv = invert(&m).unwrap();
/// assert!(((&m * &inv) - DMatrix::identity(2, 2)).norm() < 1e-12);
/// ```
pub fn invert(matrix: &DMatrix<f64>) -> MathResult<DMatrix<f64>> {
    if !matrix.is_square() {
        return Err(MathError::DimensionMismatch {
            rows1: matrix.nrows(),
            cols1: matrix.ncols(),
            rows2: matrix.ncols(),
            cols2: matrix.nrows(),
        });
    }
    if matrix.is_empty() {
        return Ok(matrix.clone());
    }
    if matrix.iter().any(|v| !v.is_finite()) {
        return Err(MathError::singular_matrix(f64::NAN));
    }

    let condition = condition_number(matrix);
    if !(condition <= MAX_CONDITION_NUMBER) {
        return Err(MathError::singular_matrix(condition));
    }

    matrix
        .clone()
        .try_inverse()
        .ok_or_else(|| MathError::singular_matrix(condition))
}

/// Solves `A x = b` in the least-squares sense using an SVD.
///
/// Near-zero singular values are discarded, so a rank-deficient `A` yields
/// the minimum-norm solution rather than an error.
pub fn solve_linear_system(a: &DMatrix<f64>, b: &DVector<f64>) -> MathResult<DVector<f64>> {
    if a.nrows() != b.len() {
        return Err(MathError::DimensionMismatch {
            rows1: a.nrows(),
            cols1: a.ncols(),
            rows2: b.len(),
            cols2: 1,
        });
    }

    let svd = a.clone().svd(true, true);
    let eps = svd.singular_values.max() * SVD_RELATIVE_EPS;
    svd.solve(b, eps).map_err(MathError::invalid_input)
}

/// Solves a tridiagonal system with the Thomas algorithm.
///
/// # Arguments
///
/// * `lower` - Sub-diagonal (length n-1), `lower[i-1]` sits in row `i`
/// * `diag` - Main diagonal (length n)
/// * `upper` - Super-diagonal (length n-1)
/// * `rhs` - Right-hand side (length n)
pub fn solve_tridiagonal(
    lower: &[f64],
    diag: &[f64],
    upper: &[f64],
    rhs: &[f64],
) -> MathResult<Vec<f64>> {
    let n = diag.len();
    if n == 0 {
        return Ok(vec![]);
    }
    if lower.len() != n - 1 || upper.len() != n - 1 || rhs.len() != n {
        return Err(MathError::invalid_input(
            "Tridiagonal system has inconsistent dimensions",
        ));
    }

    let mut c_prime = vec![0.0; n];
    let mut d_prime = vec![0.0; n];

    if diag[0].abs() < 1e-15 {
        return Err(MathError::singular_matrix(f64::INFINITY));
    }
    if n > 1 {
        c_prime[0] = upper[0] / diag[0];
    }
    d_prime[0] = rhs[0] / diag[0];

    for i in 1..n {
        let denom = diag[i] - lower[i - 1] * c_prime[i - 1];
        if denom.abs() < 1e-15 {
            return Err(MathError::singular_matrix(f64::INFINITY));
        }
        if i < n - 1 {
            c_prime[i] = upper[i] / denom;
        }
        d_prime[i] = (rhs[i] - lower[i - 1] * d_prime[i - 1]) / denom;
    }

    let mut x = vec![0.0; n];
    x[n - 1] = d_prime[n - 1];
    for i in (0..n - 1).rev() {
        x[i] = d_prime[i] - c_prime[i] * x[i + 1];
    }

    Ok(x)
}

/// Concatenates two matrices with the same row count side by side.
pub fn concat_columns(left: &DMatrix<f64>, right: &DMatrix<f64>) -> MathResult<DMatrix<f64>> {
    if left.nrows() != right.nrows() {
        return Err(MathError::DimensionMismatch {
            rows1: left.nrows(),
            cols1: left.ncols(),
            rows2: right.nrows(),
            cols2: right.ncols(),
        });
    }

    let split = left.ncols();
    Ok(DMatrix::from_fn(
        left.nrows(),
        split + right.ncols(),
        |i, j| {
            if j < split {
                left[(i, j)]
            } else {
                right[(i, j - split)]
            }
        },
    ))
}
