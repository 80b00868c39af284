//! Sensitivities to curve parameters.

use std::collections::BTreeMap;

use crate::error::{CurveError, CurveResult};
use crate::names::CurveName;
use crate::parameter::ParameterOrder;

/// Sensitivity of a scalar to the parameters of one or more curves.
///
/// Keyed by curve name in a `BTreeMap`, so iteration order is deterministic.
///
/// # Example
///
/// ```rust
/// use calibre_curves::sensitivity::CurveParameterSensitivities;
///
/// let a = CurveParameterSensitivities::of("USD-OIS".into(), vec![1.0, 2.0]);
/// let b = CurveParameterSensitivities::of("USD-OIS".into(), vec![0.5, 0.5]);
/// let sum = a.combined_with(&b.multiplied_by(2.0)).unwrap();
///
/// assert_eq!(sum.get(&"USD-OIS".into()), Some(&[2.0, 3.0][..]));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurveParameterSensitivities {
    sensitivities: BTreeMap<CurveName, Vec<f64>>,
}

impl CurveParameterSensitivities {
    /// No sensitivity to any curve.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Sensitivity to a single curve.
    #[must_use]
    pub fn of(name: CurveName, values: Vec<f64>) -> Self {
        let mut sensitivities = BTreeMap::new();
        sensitivities.insert(name, values);
        Self { sensitivities }
    }

    /// Returns the sensitivity to a curve, if any.
    #[must_use]
    pub fn get(&self, name: &CurveName) -> Option<&[f64]> {
        self.sensitivities.get(name).map(Vec::as_slice)
    }

    /// Iterates curves and their sensitivities in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&CurveName, &[f64])> {
        self.sensitivities.iter().map(|(n, v)| (n, v.as_slice()))
    }

    /// Returns true if there is no sensitivity to any curve.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sensitivities.is_empty()
    }

    /// Returns the sum of this and `other`.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::Configuration` if both hold a sensitivity to the
    /// same curve with different lengths.
    pub fn combined_with(mut self, other: &CurveParameterSensitivities) -> CurveResult<Self> {
        for (name, values) in &other.sensitivities {
            match self.sensitivities.get_mut(name) {
                Some(existing) => {
                    if existing.len() != values.len() {
                        return Err(CurveError::configuration(format!(
                            "sensitivity length mismatch for curve {name}: {} vs {}",
                            existing.len(),
                            values.len()
                        )));
                    }
                    for (e, v) in existing.iter_mut().zip(values) {
                        *e += v;
                    }
                }
                None => {
                    self.sensitivities.insert(name.clone(), values.clone());
                }
            }
        }
        Ok(self)
    }

    /// Returns the sensitivities scaled by `factor`.
    #[must_use]
    pub fn multiplied_by(mut self, factor: f64) -> Self {
        for values in self.sensitivities.values_mut() {
            for v in values.iter_mut() {
                *v *= factor;
            }
        }
        self
    }

    /// Lays the sensitivities out as a flat vector following `order`.
    ///
    /// Curves absent from the sensitivity contribute zeros; curves absent
    /// from the order are ignored.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::Configuration` if a curve's sensitivity length
    /// differs from its parameter count in the order.
    pub fn to_ordered_vec(&self, order: &ParameterOrder) -> CurveResult<Vec<f64>> {
        let mut result = vec![0.0; order.total_parameter_count()];
        for (offset, entry) in order.iter_with_offsets() {
            if let Some(values) = self.sensitivities.get(entry.name()) {
                if values.len() != entry.parameter_count() {
                    return Err(CurveError::configuration(format!(
                        "curve {} has {} sensitivities but {} ordered parameters",
                        entry.name(),
                        values.len(),
                        entry.parameter_count()
                    )));
                }
                result[offset..offset + values.len()].copy_from_slice(values);
            }
        }
        Ok(result)
    }
}
