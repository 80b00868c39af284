//! Builder for curve group definitions.

use std::collections::BTreeMap;

use calibre_core::types::{Currency, RateIndex};

use super::{CurveGroupDefinition, CurveGroupEntry, NodalCurveDefinition};
use crate::error::{CurveError, CurveResult};
use crate::names::{CurveGroupName, CurveName};

/// Builder for [`CurveGroupDefinition`].
///
/// Every registration merges into the entry already held for the curve, so
/// the order of calls does not affect the roles a curve ends up with.
/// Registering a definition for a curve that already has one replaces it in
/// place, keeping the curve's position in the parameter order.
///
/// # Example
///
/// ```rust
/// use calibre_core::types::{Currency, OvernightIndex, RateIndex};
/// use calibre_curves::definition::CurveGroupDefinition;
///
/// let builder = CurveGroupDefinition::builder()
///     .name("USD".into())
///     .add_discount_curve_name("USD-OIS".into(), [Currency::USD])
///     .add_forward_curve_name("USD-OIS".into(), [RateIndex::from(OvernightIndex::Sofr)]);
///
/// let group = builder.build().unwrap();
/// assert_eq!(group.entries().len(), 1);
/// assert!(group.curve_definitions().is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CurveGroupDefinitionBuilder {
    name: Option<CurveGroupName>,
    entries: BTreeMap<CurveName, CurveGroupEntry>,
    curve_definitions: Vec<NodalCurveDefinition>,
}

impl CurveGroupDefinitionBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the group name.
    #[must_use]
    pub fn name(mut self, name: CurveGroupName) -> Self {
        self.name = Some(name);
        self
    }

    /// Calibrates a curve and uses it to discount the given currencies.
    #[must_use]
    pub fn add_discount_curve(
        self,
        definition: NodalCurveDefinition,
        currencies: impl IntoIterator<Item = Currency>,
    ) -> Self {
        self.add_curve(definition, currencies, std::iter::empty::<RateIndex>())
    }

    /// Uses an externally supplied curve to discount the given currencies.
    #[must_use]
    pub fn add_discount_curve_name(
        self,
        name: CurveName,
        currencies: impl IntoIterator<Item = Currency>,
    ) -> Self {
        self.add_curve_name(name, currencies, std::iter::empty::<RateIndex>())
    }

    /// Calibrates a curve and uses it to project the given indices.
    #[must_use]
    pub fn add_forward_curve(
        self,
        definition: NodalCurveDefinition,
        indices: impl IntoIterator<Item = RateIndex>,
    ) -> Self {
        self.add_curve(definition, std::iter::empty::<Currency>(), indices)
    }

    /// Uses an externally supplied curve to project the given indices.
    #[must_use]
    pub fn add_forward_curve_name(
        self,
        name: CurveName,
        indices: impl IntoIterator<Item = RateIndex>,
    ) -> Self {
        self.add_curve_name(name, std::iter::empty::<Currency>(), indices)
    }

    /// Calibrates a curve used both to discount and to project.
    #[must_use]
    pub fn add_curve(
        mut self,
        definition: NodalCurveDefinition,
        currencies: impl IntoIterator<Item = Currency>,
        indices: impl IntoIterator<Item = RateIndex>,
    ) -> Self {
        let name = definition.name().clone();
        match self
            .curve_definitions
            .iter_mut()
            .find(|existing| existing.name() == &name)
        {
            Some(existing) => *existing = definition,
            None => self.curve_definitions.push(definition),
        }
        self.add_curve_name(name, currencies, indices)
    }

    /// Uses an externally supplied curve both to discount and to project.
    #[must_use]
    pub fn add_curve_name(
        mut self,
        name: CurveName,
        currencies: impl IntoIterator<Item = Currency>,
        indices: impl IntoIterator<Item = RateIndex>,
    ) -> Self {
        let mut incoming = CurveGroupEntry::new(name.clone());
        for currency in currencies {
            incoming = incoming.with_discount_currency(currency);
        }
        for index in indices {
            incoming = incoming.with_index(index);
        }
        self.merge_entry(incoming);
        self
    }

    fn merge_entry(&mut self, incoming: CurveGroupEntry) {
        let name = incoming.curve_name().clone();
        let merged = match self.entries.get(&name) {
            // Same key, so the names agree and merge cannot fail
            Some(existing) => existing.merge(&incoming).unwrap_or(incoming),
            None => incoming,
        };
        self.entries.insert(name, merged);
    }

    /// Builds the group definition. The builder stays usable.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::Configuration` if no name has been set.
    pub fn build(&self) -> CurveResult<CurveGroupDefinition> {
        let name = self
            .name
            .clone()
            .ok_or_else(|| CurveError::configuration("curve group has no name"))?;
        Ok(CurveGroupDefinition::new(
            name,
            self.entries.clone(),
            self.curve_definitions.clone(),
        ))
    }
}
