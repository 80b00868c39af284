//! Sequential multi-group curve calibration.
//!
//! Groups are calibrated in order. Each group's root search sees the curves
//! of every earlier group as fixed. Once a group has converged, the Jacobian
//! of its parameters with respect to the market quotes is assembled from two
//! blocks:
//!
//! ```text
//! direct   = (∂r/∂p_group)⁻¹
//! indirect = −direct · (∂r/∂p_prev) · T
//! ```
//!
//! where `T` stacks the Jacobians of the earlier groups' curves over the
//! earlier parameter order. Each curve's rows of `[indirect | direct]` are
//! stamped on the curve, so any sensitivity to curve parameters can be
//! turned into a sensitivity to every quote of the chain.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use nalgebra::{DMatrix, DVector};

use calibre_core::fx::MarketDataFxRateProvider;
use calibre_core::market_data::{MarketData, TimeSeries};
use calibre_core::reference_data::ReferenceData;
use calibre_core::types::{Date, RateIndex};
use calibre_math::linear_algebra::{concat_columns, invert};
use calibre_math::rootfinding::{
    BroydenVectorRootFinder, DEFAULT_ABSOLUTE_TOLERANCE, DEFAULT_MAX_STEPS,
    DEFAULT_RELATIVE_TOLERANCE,
};

use super::config::CalibratorConfig;
use super::generator::{ImmutableRatesProviderGenerator, RatesProviderGenerator};
use super::measures::CalibrationMeasures;
use crate::definition::CurveGroupDefinition;
use crate::error::{CurveError, CurveResult};
use crate::instruments::ResolvedTrade;
use crate::jacobian::JacobianCalibrationMatrix;
use crate::names::{CurveGroupName, CurveName};
use crate::parameter::ParameterOrder;
use crate::provider::ImmutableRatesProvider;

/// State carried from one group to the next.
struct CalibratedGroup {
    /// Known curves plus the group's curves.
    provider: ImmutableRatesProvider,
    /// Parameter order up to and including the group.
    order: ParameterOrder,
    /// Jacobians of the group's curves over `order`.
    jacobians: BTreeMap<CurveName, JacobianCalibrationMatrix>,
}

/// Calibrates curve groups to market quotes.
///
/// The calibrator holds no mutable state; one instance can serve concurrent
/// calls.
#[derive(Debug, Clone)]
pub struct CurveCalibrator {
    root_finder: BroydenVectorRootFinder,
    measures: CalibrationMeasures,
}

impl Default for CurveCalibrator {
    fn default() -> Self {
        Self::standard()
    }
}

impl CurveCalibrator {
    /// Tolerances of 1e-9, 1000 steps and par spread measures.
    #[must_use]
    pub fn standard() -> Self {
        Self::of(
            DEFAULT_ABSOLUTE_TOLERANCE,
            DEFAULT_RELATIVE_TOLERANCE,
            DEFAULT_MAX_STEPS,
        )
    }

    /// Custom tolerances with par spread measures.
    #[must_use]
    pub fn of(tolerance_abs: f64, tolerance_rel: f64, max_steps: u32) -> Self {
        Self {
            root_finder: BroydenVectorRootFinder::new(tolerance_abs, tolerance_rel, max_steps),
            measures: CalibrationMeasures::par_spread(),
        }
    }

    /// Replaces the calibration measures.
    #[must_use]
    pub fn with_measures(mut self, measures: CalibrationMeasures) -> Self {
        self.measures = measures;
        self
    }

    /// Builds a calibrator from validated settings.
    pub fn from_config(config: &CalibratorConfig) -> CurveResult<Self> {
        config.validate()?;
        Ok(Self::of(config.tolerance_abs, config.tolerance_rel, config.max_steps)
            .with_measures(config.measures.measures()))
    }

    /// Returns the root finder.
    #[must_use]
    pub fn root_finder(&self) -> &BroydenVectorRootFinder {
        &self.root_finder
    }

    /// Returns the measures.
    #[must_use]
    pub fn measures(&self) -> &CalibrationMeasures {
        &self.measures
    }

    /// Calibrates a single group from scratch.
    ///
    /// The known provider starts empty, with the given fixings and FX rates
    /// read from the market data.
    pub fn calibrate_group(
        &self,
        group: &CurveGroupDefinition,
        valuation_date: Date,
        market_data: Arc<dyn MarketData>,
        ref_data: &dyn ReferenceData,
        time_series: BTreeMap<RateIndex, TimeSeries>,
    ) -> CurveResult<ImmutableRatesProvider> {
        let known = ImmutableRatesProvider::builder(valuation_date)
            .all_time_series(time_series)
            .fx_rate_provider(Arc::new(MarketDataFxRateProvider::new(Arc::clone(
                &market_data,
            ))))
            .build();
        self.calibrate(std::slice::from_ref(group), known, market_data.as_ref(), ref_data)
    }

    /// Calibrates groups in sequence on top of a known provider.
    ///
    /// # Errors
    ///
    /// - `Configuration` if a curve is calibrated by two groups or a group
    ///   does not have one trade per parameter
    /// - `MarketDataMissing` / `ReferenceDataMissing` if a node cannot be
    ///   resolved or priced
    /// - `NonConvergence` if the root finder runs out of steps
    /// - `Numerical` if a direct block cannot be inverted
    pub fn calibrate(
        &self,
        groups: &[CurveGroupDefinition],
        known: ImmutableRatesProvider,
        market_data: &dyn MarketData,
        ref_data: &dyn ReferenceData,
    ) -> CurveResult<ImmutableRatesProvider> {
        tracing::info!(
            groups = groups.len(),
            valuation_date = %known.valuation_date(),
            measures = self.measures.name(),
            "calibrating curve groups"
        );
        if let Err(err) = ensure_distinct_curves(groups) {
            tracing::warn!(error = %err, "rejecting curve groups");
            return Err(err);
        }

        let mut provider = known;
        let mut order_prev = ParameterOrder::empty();
        let mut jacobians: BTreeMap<CurveName, JacobianCalibrationMatrix> = BTreeMap::new();

        for group in groups {
            let step = self.calibrate_step(
                group,
                provider,
                &order_prev,
                &jacobians,
                market_data,
                ref_data,
            );
            match step {
                Ok(calibrated) => {
                    provider = calibrated.provider;
                    order_prev = calibrated.order;
                    jacobians.extend(calibrated.jacobians);
                }
                Err(err) => {
                    tracing::warn!(
                        group = %group.name(),
                        error = %err,
                        "curve group calibration failed"
                    );
                    return Err(err);
                }
            }
        }
        Ok(provider)
    }

    /// Calibrates one group over the provider built so far.
    fn calibrate_step(
        &self,
        group: &CurveGroupDefinition,
        provider: ImmutableRatesProvider,
        order_prev: &ParameterOrder,
        prior_jacobians: &BTreeMap<CurveName, JacobianCalibrationMatrix>,
        market_data: &dyn MarketData,
        ref_data: &dyn ReferenceData,
    ) -> CurveResult<CalibratedGroup> {
        let valuation_date = provider.valuation_date();
        let generator = ImmutableRatesProviderGenerator::of(provider, group, ref_data)?;

        let order_group = group.parameter_order();
        if order_group.is_empty() {
            tracing::debug!(group = %group.name(), "no curves to calibrate, applying roles");
            return Ok(CalibratedGroup {
                provider: generator.generate(&[])?,
                order: order_prev.clone(),
                jacobians: BTreeMap::new(),
            });
        }
        let order_all = order_prev.concat(&order_group);

        let trades = group.resolved_trades(valuation_date, market_data, ref_data)?;
        ensure_square(group.name(), trades.len(), order_group.total_parameter_count())?;
        let guesses = group.initial_guesses(valuation_date, market_data)?;

        let result = self.root_finder.find_root(
            |x: &DVector<f64>| {
                let candidate = generator.generate(x.as_slice())?;
                let values = evaluate(&trades, |t| self.measures.value(t, &candidate))?;
                Ok::<_, CurveError>(DVector::from_vec(values))
            },
            |x: &DVector<f64>| {
                let candidate = generator.generate(x.as_slice())?;
                self.derivatives(&trades, &candidate, &order_group)
            },
            DVector::from_vec(guesses),
        )?;

        let calibrated = generator.generate(result.root.as_slice())?;
        let full = self.derivatives(&trades, &calibrated, &order_all)?;

        let prev_count = order_prev.total_parameter_count();
        let group_count = order_group.total_parameter_count();
        let direct = invert(&full.columns(prev_count, group_count).into_owned())?;
        let jacobian = if prev_count == 0 {
            direct
        } else {
            let transition = transition_matrix(order_prev, prior_jacobians)?;
            let indirect = -(&direct * full.columns(0, prev_count)) * transition;
            concat_columns(&indirect, &direct)?
        };

        let mut group_jacobians = BTreeMap::new();
        for (offset, entry) in order_group.iter_with_offsets() {
            let rows = jacobian.rows(offset, entry.parameter_count()).into_owned();
            group_jacobians.insert(
                entry.name().clone(),
                JacobianCalibrationMatrix::new(order_all.clone(), rows)?,
            );
        }

        tracing::debug!(
            group = %group.name(),
            curves = order_group.len(),
            parameters = group_count,
            iterations = result.iterations,
            residual = result.residual,
            "calibrated curve group"
        );

        let provider =
            generator.generate_with_jacobians(result.root.as_slice(), &group_jacobians)?;
        Ok(CalibratedGroup {
            provider,
            order: order_all,
            jacobians: group_jacobians,
        })
    }

    /// Derivative of every trade's measure, one row per trade.
    fn derivatives(
        &self,
        trades: &[ResolvedTrade],
        provider: &ImmutableRatesProvider,
        order: &ParameterOrder,
    ) -> CurveResult<DMatrix<f64>> {
        let rows = evaluate(trades, |t| self.measures.derivative(t, provider, order))?;
        let columns = order.total_parameter_count();
        Ok(DMatrix::from_fn(rows.len(), columns, |i, j| rows[i][j]))
    }
}

/// Evaluates every trade in order, in parallel when enabled.
fn evaluate<T, F>(trades: &[ResolvedTrade], f: F) -> CurveResult<Vec<T>>
where
    T: Send,
    F: Fn(&ResolvedTrade) -> CurveResult<T> + Send + Sync,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        trades.par_iter().map(f).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        trades.iter().map(f).collect()
    }
}

/// Stacks the Jacobians of earlier curves over the earlier parameter order.
fn transition_matrix(
    order_prev: &ParameterOrder,
    jacobians: &BTreeMap<CurveName, JacobianCalibrationMatrix>,
) -> CurveResult<DMatrix<f64>> {
    let size = order_prev.total_parameter_count();
    let mut transition = DMatrix::zeros(size, size);
    for (row_offset, entry) in order_prev.iter_with_offsets() {
        let jacobian = jacobians.get(entry.name()).ok_or_else(|| {
            CurveError::configuration(format!("no Jacobian for earlier curve {}", entry.name()))
        })?;
        let rows = entry.parameter_count();
        for (source_offset, source) in jacobian.order().iter_with_offsets() {
            let column_offset = order_prev.offset_of(source.name()).ok_or_else(|| {
                CurveError::configuration(format!(
                    "curve {} depends on {} outside the calibrated chain",
                    entry.name(),
                    source.name()
                ))
            })?;
            let columns = source.parameter_count();
            transition
                .view_mut((row_offset, column_offset), (rows, columns))
                .copy_from(&jacobian.matrix().view((0, source_offset), (rows, columns)));
        }
    }
    Ok(transition)
}

fn ensure_distinct_curves(groups: &[CurveGroupDefinition]) -> CurveResult<()> {
    let mut seen = BTreeSet::new();
    for group in groups {
        for definition in group.curve_definitions() {
            if !seen.insert(definition.name().clone()) {
                return Err(CurveError::configuration(format!(
                    "curve {} is calibrated by more than one group",
                    definition.name()
                )));
            }
        }
    }
    Ok(())
}

fn ensure_square(group: &CurveGroupName, trades: usize, parameters: usize) -> CurveResult<()> {
    if trades == parameters {
        Ok(())
    } else {
        Err(CurveError::configuration(format!(
            "group {group} has {trades} trades for {parameters} parameters"
        )))
    }
}
