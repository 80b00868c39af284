//! Roles a curve plays within a group.

use std::collections::BTreeSet;

use calibre_core::types::{Currency, IborIndex, OvernightIndex, RateIndex};

use crate::error::{CurveError, CurveResult};
use crate::names::CurveName;

/// A curve name plus the currencies it discounts and the indices it projects.
///
/// # Example
///
/// ```rust
/// use calibre_core::types::{Currency, OvernightIndex};
/// use calibre_curves::definition::CurveGroupEntry;
///
/// let discount = CurveGroupEntry::new("USD-OIS".into()).with_discount_currency(Currency::USD);
/// let forward = CurveGroupEntry::new("USD-OIS".into()).with_index(OvernightIndex::Sofr.into());
///
/// let merged = discount.merge(&forward).unwrap();
/// assert_eq!(merged, forward.merge(&discount).unwrap());
/// assert!(merged.discount_currencies().contains(&Currency::USD));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurveGroupEntry {
    curve_name: CurveName,
    discount_currencies: BTreeSet<Currency>,
    ibor_indices: BTreeSet<IborIndex>,
    overnight_indices: BTreeSet<OvernightIndex>,
}

impl CurveGroupEntry {
    /// Creates an entry with no roles.
    #[must_use]
    pub fn new(curve_name: CurveName) -> Self {
        Self {
            curve_name,
            discount_currencies: BTreeSet::new(),
            ibor_indices: BTreeSet::new(),
            overnight_indices: BTreeSet::new(),
        }
    }

    /// Adds a discount currency.
    #[must_use]
    pub fn with_discount_currency(mut self, currency: Currency) -> Self {
        self.discount_currencies.insert(currency);
        self
    }

    /// Adds a forward index.
    #[must_use]
    pub fn with_index(mut self, index: RateIndex) -> Self {
        match index {
            RateIndex::Ibor(index) => {
                self.ibor_indices.insert(index);
            }
            RateIndex::Overnight(index) => {
                self.overnight_indices.insert(index);
            }
        }
        self
    }

    /// Returns the curve name.
    #[must_use]
    pub fn curve_name(&self) -> &CurveName {
        &self.curve_name
    }

    /// Returns the currencies discounted by the curve.
    #[must_use]
    pub fn discount_currencies(&self) -> &BTreeSet<Currency> {
        &self.discount_currencies
    }

    /// Returns the term rate indices projected by the curve.
    #[must_use]
    pub fn ibor_indices(&self) -> &BTreeSet<IborIndex> {
        &self.ibor_indices
    }

    /// Returns the overnight indices projected by the curve.
    #[must_use]
    pub fn overnight_indices(&self) -> &BTreeSet<OvernightIndex> {
        &self.overnight_indices
    }

    /// Iterates every index projected by the curve.
    pub fn indices(&self) -> impl Iterator<Item = RateIndex> + '_ {
        self.ibor_indices
            .iter()
            .map(|i| RateIndex::from(*i))
            .chain(self.overnight_indices.iter().map(|i| RateIndex::from(*i)))
    }

    /// Unions the roles of two entries for the same curve.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::Configuration` if the curve names differ.
    pub fn merge(&self, other: &CurveGroupEntry) -> CurveResult<CurveGroupEntry> {
        if self.curve_name != other.curve_name {
            return Err(CurveError::configuration(format!(
                "cannot merge entries for different curves {} and {}",
                self.curve_name, other.curve_name
            )));
        }
        Ok(CurveGroupEntry {
            curve_name: self.curve_name.clone(),
            discount_currencies: &self.discount_currencies | &other.discount_currencies,
            ibor_indices: &self.ibor_indices | &other.ibor_indices,
            overnight_indices: &self.overnight_indices | &other.overnight_indices,
        })
    }
}
