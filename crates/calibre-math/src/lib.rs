//! # Calibre Math
//!
//! Numerical building blocks for the Calibre curve calibration engine.
//!
//! This crate provides:
//!
//! - **Root Finding**: Broyden quasi-Newton solver for square vector systems
//! - **Linear Algebra**: Checked inversion, solves and block assembly over `nalgebra`
//! - **Interpolation**: Linear, log-linear and natural cubic spline
//!   interpolators reporting their sensitivity to the node values

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::float_cmp)]

pub mod error;
pub mod interpolation;
pub mod linear_algebra;
pub mod rootfinding;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult};
    pub use crate::interpolation::{
        CubicSpline, Interpolator, InterpolatorKind, LinearInterpolator, LogLinearInterpolator,
    };
    pub use crate::linear_algebra::{invert, solve_linear_system};
    pub use crate::rootfinding::{BroydenVectorRootFinder, VectorRootResult};
}

pub use error::{MathError, MathResult};
