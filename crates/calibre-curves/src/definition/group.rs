//! Curve group definitions.

use std::collections::{BTreeMap, BTreeSet};

use calibre_core::market_data::{MarketData, QuoteId};
use calibre_core::reference_data::ReferenceData;
use calibre_core::types::Date;

use super::{CurveGroupDefinitionBuilder, CurveGroupEntry, NodalCurveDefinition};
use crate::error::CurveResult;
use crate::instruments::ResolvedTrade;
use crate::names::{CurveGroupName, CurveName};
use crate::parameter::ParameterOrder;

/// A set of curves calibrated together as one square system.
///
/// Entries record the role of every curve in the group; definitions list the
/// curves that are calibrated, in parameter order. Curves with an entry but
/// no definition are expected to already exist in the known provider.
#[derive(Debug, Clone)]
pub struct CurveGroupDefinition {
    name: CurveGroupName,
    entries: BTreeMap<CurveName, CurveGroupEntry>,
    curve_definitions: Vec<NodalCurveDefinition>,
}

impl CurveGroupDefinition {
    pub(crate) fn new(
        name: CurveGroupName,
        entries: BTreeMap<CurveName, CurveGroupEntry>,
        curve_definitions: Vec<NodalCurveDefinition>,
    ) -> Self {
        Self {
            name,
            entries,
            curve_definitions,
        }
    }

    /// Starts an empty builder.
    #[must_use]
    pub fn builder() -> CurveGroupDefinitionBuilder {
        CurveGroupDefinitionBuilder::new()
    }

    /// Returns the group name.
    #[must_use]
    pub fn name(&self) -> &CurveGroupName {
        &self.name
    }

    /// Returns the entries by curve name.
    #[must_use]
    pub fn entries(&self) -> &BTreeMap<CurveName, CurveGroupEntry> {
        &self.entries
    }

    /// Returns the entry of a curve.
    #[must_use]
    pub fn entry(&self, name: &CurveName) -> Option<&CurveGroupEntry> {
        self.entries.get(name)
    }

    /// Returns the definitions of the calibrated curves, in parameter order.
    #[must_use]
    pub fn curve_definitions(&self) -> &[NodalCurveDefinition] {
        &self.curve_definitions
    }

    /// Returns the definition of a calibrated curve.
    #[must_use]
    pub fn find_curve_definition(&self, name: &CurveName) -> Option<&NodalCurveDefinition> {
        self.curve_definitions.iter().find(|d| d.name() == name)
    }

    /// Total parameter count of the calibrated curves.
    #[must_use]
    pub fn total_parameter_count(&self) -> usize {
        self.curve_definitions
            .iter()
            .map(NodalCurveDefinition::parameter_count)
            .sum()
    }

    /// Parameter order of the calibrated curves, in definition order.
    #[must_use]
    pub fn parameter_order(&self) -> ParameterOrder {
        ParameterOrder::new(
            self.curve_definitions
                .iter()
                .map(NodalCurveDefinition::to_curve_parameter_size)
                .collect(),
        )
    }

    /// Quotes needed to calibrate the group.
    #[must_use]
    pub fn requirements(&self) -> BTreeSet<QuoteId> {
        self.curve_definitions
            .iter()
            .flat_map(|d| d.nodes().iter().flat_map(|n| n.requirements()))
            .collect()
    }

    /// Resolves every node of every calibrated curve, in parameter order.
    pub fn resolved_trades(
        &self,
        valuation_date: Date,
        market_data: &dyn MarketData,
        ref_data: &dyn ReferenceData,
    ) -> CurveResult<Vec<ResolvedTrade>> {
        let mut trades = Vec::with_capacity(self.total_parameter_count());
        for definition in &self.curve_definitions {
            trades.extend(definition.trades(valuation_date, market_data, ref_data)?);
        }
        Ok(trades)
    }

    /// Initial guesses for every parameter, in parameter order.
    pub fn initial_guesses(
        &self,
        valuation_date: Date,
        market_data: &dyn MarketData,
    ) -> CurveResult<Vec<f64>> {
        let mut guesses = Vec::with_capacity(self.total_parameter_count());
        for definition in &self.curve_definitions {
            guesses.extend(definition.initial_guesses(valuation_date, market_data)?);
        }
        Ok(guesses)
    }
}
