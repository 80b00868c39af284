//! Calibrator settings.

use serde::{Deserialize, Serialize};

use calibre_math::rootfinding::{
    DEFAULT_ABSOLUTE_TOLERANCE, DEFAULT_MAX_STEPS, DEFAULT_RELATIVE_TOLERANCE,
};

use super::measures::CalibrationMeasures;
use crate::error::{CurveError, CurveResult};

/// Residual used for every calibration trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MeasuresKind {
    /// Model par rate minus the traded rate.
    #[default]
    ParSpread,
    /// Present value of the unit notional trade.
    PresentValue,
}

impl MeasuresKind {
    /// Returns the measures this kind selects.
    #[must_use]
    pub fn measures(self) -> CalibrationMeasures {
        match self {
            MeasuresKind::ParSpread => CalibrationMeasures::par_spread(),
            MeasuresKind::PresentValue => CalibrationMeasures::present_value(),
        }
    }
}

/// Settings of a [`CurveCalibrator`](super::CurveCalibrator).
///
/// Every field has a default, so an empty document is a valid configuration.
///
/// ```rust
/// use calibre_curves::calibration::{CalibratorConfig, MeasuresKind};
///
/// let config = CalibratorConfig::from_toml_str(
///     r#"
///     tolerance_abs = 1e-10
///     measures = "present_value"
///     "#,
/// )
/// .unwrap();
/// assert_eq!(config.tolerance_abs, 1e-10);
/// assert_eq!(config.max_steps, 1000);
/// assert_eq!(config.measures, MeasuresKind::PresentValue);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibratorConfig {
    /// Absolute tolerance on residual norm and step size.
    #[serde(default = "default_tolerance_abs")]
    pub tolerance_abs: f64,

    /// Step size tolerance relative to the parameter norm.
    #[serde(default = "default_tolerance_rel")]
    pub tolerance_rel: f64,

    /// Root finder iteration budget per group.
    #[serde(default = "default_max_steps")]
    pub max_steps: u32,

    /// Calibration residual.
    #[serde(default)]
    pub measures: MeasuresKind,
}

fn default_tolerance_abs() -> f64 {
    DEFAULT_ABSOLUTE_TOLERANCE
}

fn default_tolerance_rel() -> f64 {
    DEFAULT_RELATIVE_TOLERANCE
}

fn default_max_steps() -> u32 {
    DEFAULT_MAX_STEPS
}

impl Default for CalibratorConfig {
    fn default() -> Self {
        Self {
            tolerance_abs: default_tolerance_abs(),
            tolerance_rel: default_tolerance_rel(),
            max_steps: default_max_steps(),
            measures: MeasuresKind::default(),
        }
    }
}

impl CalibratorConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::Configuration` if the document does not parse or
    /// fails [`validate`](Self::validate).
    pub fn from_toml_str(source: &str) -> CurveResult<Self> {
        let config: Self = toml::from_str(source).map_err(|e| {
            CurveError::configuration(format!("invalid calibrator configuration: {e}"))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that tolerances are positive and the step budget non-zero.
    pub fn validate(&self) -> CurveResult<()> {
        if !(self.tolerance_abs.is_finite() && self.tolerance_abs > 0.0) {
            return Err(CurveError::configuration(format!(
                "tolerance_abs must be positive, got {}",
                self.tolerance_abs
            )));
        }
        if !(self.tolerance_rel.is_finite() && self.tolerance_rel > 0.0) {
            return Err(CurveError::configuration(format!(
                "tolerance_rel must be positive, got {}",
                self.tolerance_rel
            )));
        }
        if self.max_steps == 0 {
            return Err(CurveError::configuration("max_steps must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = CalibratorConfig::from_toml_str("").unwrap();
        assert_eq!(config, CalibratorConfig::default());
        assert_eq!(config.tolerance_abs, 1e-9);
        assert_eq!(config.measures, MeasuresKind::ParSpread);
    }

    #[test]
    fn test_rejects_invalid_values() {
        let err = CalibratorConfig::from_toml_str("tolerance_rel = -1.0").unwrap_err();
        assert!(matches!(err, CurveError::Configuration { .. }));

        let err = CalibratorConfig::from_toml_str("max_steps = 0").unwrap_err();
        assert!(matches!(err, CurveError::Configuration { .. }));

        let err = CalibratorConfig::from_toml_str("measures = \"yield\"").unwrap_err();
        assert!(err.to_string().contains("invalid calibrator configuration"));
    }

    #[test]
    fn test_measures_kind() {
        assert_eq!(MeasuresKind::PresentValue.measures().name(), "PresentValue");
        assert_eq!(MeasuresKind::ParSpread.measures().name(), "ParSpread");
    }
}
