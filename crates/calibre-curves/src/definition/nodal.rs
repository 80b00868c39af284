//! Definition of a curve to calibrate.

use std::sync::Arc;

use calibre_core::daycounts::DayCountConvention;
use calibre_core::market_data::MarketData;
use calibre_core::reference_data::ReferenceData;
use calibre_core::types::Date;
use calibre_math::interpolation::InterpolatorKind;

use super::CurveNode;
use crate::curves::{CurveMetadata, InterpolatedNodalCurve, NodalCurve, ParameterMetadata, ValueType};
use crate::error::{CurveError, CurveResult};
use crate::instruments::ResolvedTrade;
use crate::names::CurveName;
use crate::parameter::CurveParameterSize;

/// An interpolated curve defined by an ordered list of nodes.
///
/// The node order is the parameter order. Node dates must be strictly
/// increasing; this is checked when metadata is resolved, since dates depend
/// on the valuation date and calendars.
#[derive(Debug, Clone)]
pub struct NodalCurveDefinition {
    name: CurveName,
    value_type: ValueType,
    day_count: DayCountConvention,
    interpolator: InterpolatorKind,
    nodes: Vec<Arc<dyn CurveNode>>,
}

impl NodalCurveDefinition {
    /// Creates a curve definition.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::Configuration` if there are no nodes or fewer
    /// than the interpolator needs.
    pub fn new(
        name: CurveName,
        value_type: ValueType,
        day_count: DayCountConvention,
        interpolator: InterpolatorKind,
        nodes: Vec<Arc<dyn CurveNode>>,
    ) -> CurveResult<Self> {
        if nodes.is_empty() {
            return Err(CurveError::configuration(format!("curve {name} has no nodes")));
        }
        if nodes.len() < interpolator.min_points() {
            return Err(CurveError::configuration(format!(
                "curve {name} has {} nodes, {interpolator} interpolation needs {}",
                nodes.len(),
                interpolator.min_points()
            )));
        }
        Ok(Self {
            name,
            value_type,
            day_count,
            interpolator,
            nodes,
        })
    }

    /// Returns the curve name.
    #[must_use]
    pub fn name(&self) -> &CurveName {
        &self.name
    }

    /// Returns what the parameters represent.
    #[must_use]
    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// Returns the day count mapping dates to curve times.
    #[must_use]
    pub fn day_count(&self) -> DayCountConvention {
        self.day_count
    }

    /// Returns the interpolation method.
    #[must_use]
    pub fn interpolator(&self) -> InterpolatorKind {
        self.interpolator
    }

    /// Returns the nodes in parameter order.
    #[must_use]
    pub fn nodes(&self) -> &[Arc<dyn CurveNode>] {
        &self.nodes
    }

    /// Number of curve parameters, one per node.
    #[must_use]
    pub fn parameter_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the curve's entry in a parameter order.
    #[must_use]
    pub fn to_curve_parameter_size(&self) -> CurveParameterSize {
        CurveParameterSize::new(self.name.clone(), self.parameter_count())
    }

    /// Resolves node dates and times.
    ///
    /// # Errors
    ///
    /// - `Configuration` if node dates are not strictly increasing
    /// - Any error raised resolving a node date
    pub fn metadata(
        &self,
        valuation_date: Date,
        ref_data: &dyn ReferenceData,
    ) -> CurveResult<CurveMetadata> {
        let mut parameters: Vec<ParameterMetadata> = Vec::with_capacity(self.nodes.len());
        for node in &self.nodes {
            let date = node.date(valuation_date, ref_data)?;
            if let Some(previous) = parameters.last() {
                if date <= previous.date {
                    return Err(CurveError::configuration(format!(
                        "curve {}: node {} on {date} does not follow node {} on {}",
                        self.name,
                        node.label(),
                        previous.label,
                        previous.date
                    )));
                }
            }
            let time = self.day_count.year_fraction_f64(valuation_date, date);
            parameters.push(ParameterMetadata::new(node.label(), date, time));
        }
        Ok(CurveMetadata::new(
            self.name.clone(),
            self.value_type,
            self.day_count,
            parameters,
        ))
    }

    /// Builds the curve from resolved metadata and parameter values.
    pub fn curve(
        &self,
        metadata: &CurveMetadata,
        parameters: Vec<f64>,
    ) -> CurveResult<Arc<dyn NodalCurve>> {
        Ok(Arc::new(InterpolatedNodalCurve::new(
            metadata.clone(),
            self.interpolator,
            parameters,
        )?))
    }

    /// Resolves every node into its calibration trade, in node order.
    pub fn trades(
        &self,
        valuation_date: Date,
        market_data: &dyn MarketData,
        ref_data: &dyn ReferenceData,
    ) -> CurveResult<Vec<ResolvedTrade>> {
        self.nodes
            .iter()
            .map(|node| node.trade(valuation_date, market_data, ref_data))
            .collect()
    }

    /// Returns every node's initial guess, in node order.
    pub fn initial_guesses(
        &self,
        valuation_date: Date,
        market_data: &dyn MarketData,
    ) -> CurveResult<Vec<f64>> {
        self.nodes
            .iter()
            .map(|node| node.initial_guess(valuation_date, market_data, self.value_type))
            .collect()
    }
}
