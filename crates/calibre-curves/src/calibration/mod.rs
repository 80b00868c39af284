//! Curve calibration.
//!
//! - [`CurveCalibrator`]: calibrates a chain of curve groups and stamps each
//!   curve with its Jacobian to the market quotes
//! - [`CalibrationMeasures`]: the residual each trade kind is solved for
//! - [`RatesProviderGenerator`]: candidate providers from parameter vectors
//! - [`MarketQuoteSensitivityCalculator`]: parameter to quote sensitivities
//! - [`CalibratorConfig`]: settings loadable from TOML

mod calibrator;
mod config;
mod generator;
mod market_quote;
mod measures;

pub use calibrator::CurveCalibrator;
pub use config::{CalibratorConfig, MeasuresKind};
pub use generator::{ImmutableRatesProviderGenerator, RatesProviderGenerator};
pub use market_quote::MarketQuoteSensitivityCalculator;
pub use measures::{CalibrationMeasure, CalibrationMeasures, TradeCalibrationMeasure};
