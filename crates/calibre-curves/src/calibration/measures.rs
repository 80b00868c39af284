//! Calibration measures.
//!
//! A measure maps a trade and a candidate provider to the residual the root
//! finder drives to zero, together with its gradient with respect to curve
//! parameters.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{CurveError, CurveResult};
use crate::instruments::{ResolvedTrade, TradeKind};
use crate::parameter::ParameterOrder;
use crate::provider::ImmutableRatesProvider;
use crate::sensitivity::CurveParameterSensitivities;

/// Residual and gradient of one kind of trade.
pub trait CalibrationMeasure: Send + Sync + fmt::Debug {
    /// Returns the calibration residual.
    fn value(&self, trade: &ResolvedTrade, provider: &ImmutableRatesProvider) -> CurveResult<f64>;

    /// Returns the residual's sensitivity to curve parameters.
    fn sensitivities(
        &self,
        trade: &ResolvedTrade,
        provider: &ImmutableRatesProvider,
    ) -> CurveResult<CurveParameterSensitivities>;
}

type ValueFn = fn(&ResolvedTrade, &ImmutableRatesProvider) -> CurveResult<f64>;
type SensitivityFn =
    fn(&ResolvedTrade, &ImmutableRatesProvider) -> CurveResult<CurveParameterSensitivities>;

/// A measure built from a pair of pricing functions.
#[derive(Clone, Copy)]
pub struct TradeCalibrationMeasure {
    name: &'static str,
    value_fn: ValueFn,
    sensitivity_fn: SensitivityFn,
}

impl TradeCalibrationMeasure {
    /// Creates a measure from pricing functions.
    #[must_use]
    pub const fn of(name: &'static str, value_fn: ValueFn, sensitivity_fn: SensitivityFn) -> Self {
        Self {
            name,
            value_fn,
            sensitivity_fn,
        }
    }

    /// Par spread: model rate minus the traded rate.
    pub const PAR_SPREAD: Self = Self::of(
        "ParSpread",
        ResolvedTrade::par_spread,
        ResolvedTrade::par_spread_sensitivity,
    );

    /// Present value of the unit notional trade.
    pub const PRESENT_VALUE: Self = Self::of(
        "PresentValue",
        ResolvedTrade::present_value,
        ResolvedTrade::present_value_sensitivity,
    );

    /// Returns the measure name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for TradeCalibrationMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl CalibrationMeasure for TradeCalibrationMeasure {
    fn value(&self, trade: &ResolvedTrade, provider: &ImmutableRatesProvider) -> CurveResult<f64> {
        (self.value_fn)(trade, provider)
    }

    fn sensitivities(
        &self,
        trade: &ResolvedTrade,
        provider: &ImmutableRatesProvider,
    ) -> CurveResult<CurveParameterSensitivities> {
        (self.sensitivity_fn)(trade, provider)
    }
}

/// The measure applied to each kind of trade.
///
/// # Example
///
/// ```rust
/// use calibre_curves::calibration::CalibrationMeasures;
/// use calibre_curves::instruments::TradeKind;
///
/// let measures = CalibrationMeasures::par_spread();
/// assert!(measures.measure(TradeKind::Swap).is_ok());
/// assert_eq!(measures.name(), "ParSpread");
/// ```
#[derive(Debug, Clone)]
pub struct CalibrationMeasures {
    name: String,
    measures: BTreeMap<TradeKind, Arc<dyn CalibrationMeasure>>,
}

impl CalibrationMeasures {
    /// Creates a set of measures.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::Configuration` if a trade kind appears twice.
    pub fn of(
        name: impl Into<String>,
        measures: impl IntoIterator<Item = (TradeKind, Arc<dyn CalibrationMeasure>)>,
    ) -> CurveResult<Self> {
        let name = name.into();
        let mut map = BTreeMap::new();
        for (kind, measure) in measures {
            if map.insert(kind, measure).is_some() {
                return Err(CurveError::configuration(format!(
                    "measures {name} define {kind} twice"
                )));
            }
        }
        Ok(Self {
            name,
            measures: map,
        })
    }

    fn uniform(name: &str, measure: TradeCalibrationMeasure) -> Self {
        let measure: Arc<dyn CalibrationMeasure> = Arc::new(measure);
        Self {
            name: name.to_string(),
            measures: [TradeKind::TermDeposit, TradeKind::Fra, TradeKind::Swap]
                .into_iter()
                .map(|kind| (kind, Arc::clone(&measure)))
                .collect(),
        }
    }

    /// Par spread for every trade kind.
    #[must_use]
    pub fn par_spread() -> Self {
        Self::uniform("ParSpread", TradeCalibrationMeasure::PAR_SPREAD)
    }

    /// Present value for every trade kind.
    #[must_use]
    pub fn present_value() -> Self {
        Self::uniform("PresentValue", TradeCalibrationMeasure::PRESENT_VALUE)
    }

    /// Returns the name of the set.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the measure of a trade kind.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::Configuration` if the kind has no measure.
    pub fn measure(&self, kind: TradeKind) -> CurveResult<&dyn CalibrationMeasure> {
        self.measures
            .get(&kind)
            .map(AsRef::as_ref)
            .ok_or_else(|| {
                CurveError::configuration(format!("measures {} have no measure for {kind}", self.name))
            })
    }

    /// Returns the calibration residual of a trade.
    pub fn value(&self, trade: &ResolvedTrade, provider: &ImmutableRatesProvider) -> CurveResult<f64> {
        self.measure(trade.kind())?.value(trade, provider)
    }

    /// Returns `∂value/∂pᵢ` laid out by `order`.
    ///
    /// Curves outside the order contribute nothing.
    pub fn derivative(
        &self,
        trade: &ResolvedTrade,
        provider: &ImmutableRatesProvider,
        order: &ParameterOrder,
    ) -> CurveResult<Vec<f64>> {
        self.measure(trade.kind())?
            .sensitivities(trade, provider)?
            .to_ordered_vec(order)
    }
}

impl Default for CalibrationMeasures {
    fn default() -> Self {
        Self::par_spread()
    }
}
