//! Parameter layout across calibrated curves.
//!
//! A [`ParameterOrder`] fixes where each curve's parameters live in the flat
//! parameter vector the root finder works on, and in the columns of every
//! Jacobian. It is built once per group and only ever extended by
//! concatenation, so positions assigned to earlier groups never move.

use std::fmt;

use crate::names::CurveName;

/// Number of parameters of one curve.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CurveParameterSize {
    name: CurveName,
    parameter_count: usize,
}

impl CurveParameterSize {
    /// Creates a parameter size entry.
    #[must_use]
    pub fn new(name: CurveName, parameter_count: usize) -> Self {
        Self {
            name,
            parameter_count,
        }
    }

    /// Returns the curve name.
    #[must_use]
    pub fn name(&self) -> &CurveName {
        &self.name
    }

    /// Returns the number of parameters.
    #[must_use]
    pub fn parameter_count(&self) -> usize {
        self.parameter_count
    }
}

/// Immutable, append-only ordering of curve parameters.
///
/// # Example
///
/// ```rust
/// use calibre_curves::parameter::{CurveParameterSize, ParameterOrder};
///
/// let first = ParameterOrder::new(vec![CurveParameterSize::new("USD-OIS".into(), 4)]);
/// let second = ParameterOrder::new(vec![CurveParameterSize::new("USD-3M".into(), 6)]);
/// let combined = first.concat(&second);
///
/// assert_eq!(combined.total_parameter_count(), 10);
/// assert_eq!(combined.offset_of(&"USD-3M".into()), Some(4));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterOrder {
    entries: Vec<CurveParameterSize>,
}

impl ParameterOrder {
    /// Creates an ordering from entries.
    #[must_use]
    pub fn new(entries: Vec<CurveParameterSize>) -> Self {
        Self { entries }
    }

    /// The empty ordering.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns a new ordering with `other`'s entries appended after this one's.
    #[must_use]
    pub fn concat(&self, other: &ParameterOrder) -> Self {
        let entries: Vec<_> = self.entries.iter().chain(other.entries.iter()).cloned().collect();
        Self::new(entries)
    }

    /// Returns the entries in order.
    #[must_use]
    pub fn entries(&self) -> &[CurveParameterSize] {
        &self.entries
    }

    /// Iterates `(offset, entry)` pairs.
    pub fn iter_with_offsets(&self) -> impl Iterator<Item = (usize, &CurveParameterSize)> {
        self.entries.iter().scan(0usize, |offset, entry| {
            let start = *offset;
            *offset += entry.parameter_count;
            Some((start, entry))
        })
    }

    /// Total number of parameters across all curves.
    #[must_use]
    pub fn total_parameter_count(&self) -> usize {
        self.entries.iter().map(|e| e.parameter_count).sum()
    }

    /// Number of curves.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no curve is ordered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if the ordering contains the curve.
    #[must_use]
    pub fn contains(&self, name: &CurveName) -> bool {
        self.entries.iter().any(|e| &e.name == name)
    }

    /// Returns the offset of the curve's first parameter.
    #[must_use]
    pub fn offset_of(&self, name: &CurveName) -> Option<usize> {
        self.find(name).map(|(offset, _)| offset)
    }

    /// Returns the offset and entry of a curve.
    #[must_use]
    pub fn find(&self, name: &CurveName) -> Option<(usize, &CurveParameterSize)> {
        self.iter_with_offsets().find(|(_, entry)| &entry.name == name)
    }
}

impl fmt::Display for ParameterOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .entries
            .iter()
            .map(|e| format!("{}[{}]", e.name, e.parameter_count))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(entries: &[(&str, usize)]) -> ParameterOrder {
        ParameterOrder::new(
            entries
                .iter()
                .map(|(n, c)| CurveParameterSize::new((*n).into(), *c))
                .collect(),
        )
    }

    #[test]
    fn test_offsets() {
        let order = order(&[("A", 3), ("B", 2), ("C", 4)]);

        assert_eq!(order.total_parameter_count(), 9);
        assert_eq!(order.offset_of(&"A".into()), Some(0));
        assert_eq!(order.offset_of(&"B".into()), Some(3));
        assert_eq!(order.offset_of(&"C".into()), Some(5));
        assert_eq!(order.offset_of(&"D".into()), None);
    }

    #[test]
    fn test_concat_keeps_existing_positions() {
        let first = order(&[("A", 3)]);
        let combined = first.concat(&order(&[("B", 2)]));

        assert_eq!(first.total_parameter_count(), 3);
        assert_eq!(combined.offset_of(&"A".into()), Some(0));
        assert_eq!(combined.offset_of(&"B".into()), Some(3));
        assert_eq!(combined.to_string(), "A[3], B[2]");
    }

    #[test]
    fn test_empty() {
        let empty = ParameterOrder::empty();
        assert!(empty.is_empty());
        assert_eq!(empty.total_parameter_count(), 0);
        assert_eq!(empty.concat(&order(&[("A", 1)])).len(), 1);
    }
}
