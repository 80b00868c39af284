//! Error types for curve construction and calibration.
//!
//! Every failure aborts the calibration in progress; no partially calibrated
//! provider is ever returned.

use calibre_core::CoreError;
use calibre_math::MathError;
use thiserror::Error;

/// A specialized Result type for curve operations.
pub type CurveResult<T> = Result<T, CurveError>;

/// Error types for curve operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurveError {
    /// Inconsistent curve group setup: duplicate curves across groups,
    /// size mismatches, non-square groups, invalid settings.
    #[error("Configuration error: {reason}")]
    Configuration {
        /// Description of the problem.
        reason: String,
    },

    /// A quote, fixing or FX rate needed to resolve or price a trade is absent.
    #[error("Market data missing: {reason}")]
    MarketDataMissing {
        /// Description of what is missing.
        reason: String,
    },

    /// A calendar or other static data item is absent.
    #[error("Reference data missing: {reason}")]
    ReferenceDataMissing {
        /// Description of what is missing.
        reason: String,
    },

    /// The root finder exhausted its iteration budget.
    #[error("Calibration did not converge after {iterations} iterations (residual: {residual:.2e})")]
    NonConvergence {
        /// Number of iterations attempted.
        iterations: u32,
        /// Residual norm at the last iterate.
        residual: f64,
    },

    /// A matrix could not be inverted or a computation produced a non-finite value.
    #[error("Numerical error: {reason}")]
    Numerical {
        /// Description of the problem.
        reason: String,
    },

    /// No curve is registered for the requested name, currency or index.
    #[error("Curve not found: {name}")]
    CurveNotFound {
        /// What was looked up.
        name: String,
    },
}

impl CurveError {
    /// Creates a configuration error.
    #[must_use]
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    /// Creates a missing market data error.
    #[must_use]
    pub fn market_data_missing(reason: impl Into<String>) -> Self {
        Self::MarketDataMissing {
            reason: reason.into(),
        }
    }

    /// Creates a numerical error.
    #[must_use]
    pub fn numerical(reason: impl Into<String>) -> Self {
        Self::Numerical {
            reason: reason.into(),
        }
    }

    /// Creates a curve not found error.
    #[must_use]
    pub fn curve_not_found(name: impl Into<String>) -> Self {
        Self::CurveNotFound { name: name.into() }
    }
}

impl From<CoreError> for CurveError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::QuoteNotFound { .. }
            | CoreError::FixingNotFound { .. }
            | CoreError::FxRateNotFound { .. } => Self::market_data_missing(err.to_string()),
            CoreError::ReferenceDataNotFound { .. } => Self::ReferenceDataMissing {
                reason: err.to_string(),
            },
            other => Self::configuration(other.to_string()),
        }
    }
}

impl From<MathError> for CurveError {
    fn from(err: MathError) -> Self {
        match err {
            MathError::ConvergenceFailed {
                iterations,
                residual,
            } => Self::NonConvergence {
                iterations,
                residual,
            },
            other => Self::numerical(other.to_string()),
        }
    }
}
