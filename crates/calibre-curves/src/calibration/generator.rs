//! Rates provider generation from a flat parameter vector.

use std::collections::BTreeMap;

use calibre_core::reference_data::ReferenceData;
use calibre_core::types::{Currency, RateIndex};

use crate::curves::CurveMetadata;
use crate::definition::{CurveGroupDefinition, NodalCurveDefinition};
use crate::error::{CurveError, CurveResult};
use crate::jacobian::JacobianCalibrationMatrix;
use crate::names::CurveName;
use crate::provider::ImmutableRatesProvider;

/// Builds a candidate provider for each parameter vector the root finder
/// tries.
pub trait RatesProviderGenerator: Send + Sync {
    /// Generates a provider from the group's parameters.
    fn generate(&self, parameters: &[f64]) -> CurveResult<ImmutableRatesProvider>;

    /// Generates a provider whose calibrated curves carry their Jacobians.
    fn generate_with_jacobians(
        &self,
        parameters: &[f64],
        jacobians: &BTreeMap<CurveName, JacobianCalibrationMatrix>,
    ) -> CurveResult<ImmutableRatesProvider>;
}

/// Generator layering one group's curves over a known provider.
///
/// Node dates are resolved once on construction; every call to `generate`
/// only rebinds curve values.
#[derive(Debug, Clone)]
pub struct ImmutableRatesProviderGenerator {
    known: ImmutableRatesProvider,
    curves: Vec<(NodalCurveDefinition, CurveMetadata)>,
    discount_curves: BTreeMap<Currency, CurveName>,
    index_curves: BTreeMap<RateIndex, CurveName>,
    parameter_count: usize,
}

impl ImmutableRatesProviderGenerator {
    /// Creates a generator for a group.
    ///
    /// # Errors
    ///
    /// - `Configuration` if an entry names a curve that is neither defined
    ///   by the group nor known to the provider
    /// - Any error raised resolving node dates
    pub fn of(
        known: ImmutableRatesProvider,
        group: &CurveGroupDefinition,
        ref_data: &dyn ReferenceData,
    ) -> CurveResult<Self> {
        let valuation_date = known.valuation_date();
        let mut curves = Vec::with_capacity(group.curve_definitions().len());
        for definition in group.curve_definitions() {
            let metadata = definition.metadata(valuation_date, ref_data)?;
            curves.push((definition.clone(), metadata));
        }

        let mut discount_curves = BTreeMap::new();
        let mut index_curves = BTreeMap::new();
        for (name, entry) in group.entries() {
            if group.find_curve_definition(name).is_none() && known.find_curve(name).is_none() {
                return Err(CurveError::configuration(format!(
                    "group {} assigns curve {name} which it does not define and is not known",
                    group.name()
                )));
            }
            for currency in entry.discount_currencies() {
                discount_curves.insert(*currency, name.clone());
            }
            for index in entry.indices() {
                index_curves.insert(index, name.clone());
            }
        }

        Ok(Self {
            known,
            curves,
            discount_curves,
            index_curves,
            parameter_count: group.total_parameter_count(),
        })
    }

    /// Returns the number of parameters the generator expects.
    #[must_use]
    pub fn parameter_count(&self) -> usize {
        self.parameter_count
    }

    /// Returns the known provider the group is layered over.
    #[must_use]
    pub fn known(&self) -> &ImmutableRatesProvider {
        &self.known
    }

    /// Returns the calibrated curves with their resolved metadata.
    pub fn curves(&self) -> impl Iterator<Item = (&NodalCurveDefinition, &CurveMetadata)> {
        self.curves.iter().map(|(d, m)| (d, m))
    }

    fn build(
        &self,
        parameters: &[f64],
        jacobians: Option<&BTreeMap<CurveName, JacobianCalibrationMatrix>>,
    ) -> CurveResult<ImmutableRatesProvider> {
        if parameters.len() != self.parameter_count {
            return Err(CurveError::configuration(format!(
                "generator expects {} parameters, got {}",
                self.parameter_count,
                parameters.len()
            )));
        }

        let mut builder = self.known.to_builder();
        let mut offset = 0;
        for (definition, metadata) in &self.curves {
            let count = definition.parameter_count();
            let values = parameters[offset..offset + count].to_vec();
            offset += count;

            let curve = match jacobians.and_then(|j| j.get(definition.name())) {
                Some(jacobian) => {
                    let metadata = metadata.clone().with_jacobian(jacobian.clone());
                    definition.curve(&metadata, values)?
                }
                None => definition.curve(metadata, values)?,
            };
            builder = builder.curve(curve);
        }

        for (currency, name) in &self.discount_curves {
            builder = builder.discount_curve_name(*currency, name.clone());
        }
        for (index, name) in &self.index_curves {
            builder = builder.index_curve_name(*index, name.clone());
        }
        Ok(builder.build())
    }
}

impl RatesProviderGenerator for ImmutableRatesProviderGenerator {
    fn generate(&self, parameters: &[f64]) -> CurveResult<ImmutableRatesProvider> {
        self.build(parameters, None)
    }

    fn generate_with_jacobians(
        &self,
        parameters: &[f64],
        jacobians: &BTreeMap<CurveName, JacobianCalibrationMatrix>,
    ) -> CurveResult<ImmutableRatesProvider> {
        self.build(parameters, Some(jacobians))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::curves::ValueType;
    use crate::definition::CurveNode;
    use crate::nodes::{TermDepositCurveNode, TermDepositTemplate};
    use calibre_core::market_data::QuoteId;
    use calibre_core::daycounts::DayCountConvention;
    use calibre_core::reference_data::ImmutableReferenceData;
    use calibre_core::types::{Date, OvernightIndex, Tenor};
    use calibre_math::interpolation::InterpolatorKind;

    fn valuation_date() -> Date {
        Date::from_ymd(2026, 1, 2).unwrap()
    }

    fn ois_definition() -> NodalCurveDefinition {
        let nodes = [Tenor::M3, Tenor::M6]
            .into_iter()
            .map(|tenor| {
                let template =
                    TermDepositTemplate::new(Currency::USD, tenor, 0, DayCountConvention::Act360);
                let quote_id = QuoteId::new(format!("USD-DEP-{tenor}"));
                Arc::new(TermDepositCurveNode::new(template, quote_id)) as Arc<dyn CurveNode>
            })
            .collect();
        NodalCurveDefinition::new(
            "USD-OIS".into(),
            ValueType::ZeroRate,
            DayCountConvention::Act365Fixed,
            InterpolatorKind::Linear,
            nodes,
        )
        .unwrap()
    }

    fn group() -> CurveGroupDefinition {
        CurveGroupDefinition::builder()
            .name("USD".into())
            .add_curve(
                ois_definition(),
                [Currency::USD],
                [RateIndex::from(OvernightIndex::Sofr)],
            )
            .build()
            .unwrap()
    }

    #[test]
    fn test_generate_assigns_roles() {
        let generator = ImmutableRatesProviderGenerator::of(
            ImmutableRatesProvider::empty(valuation_date()),
            &group(),
            &ImmutableReferenceData::standard(),
        )
        .unwrap();
        assert_eq!(generator.parameter_count(), 2);

        let provider = generator.generate(&[0.03, 0.035]).unwrap();
        let curve = provider.discount_curve(Currency::USD).unwrap();
        assert_eq!(curve.parameters(), &[0.03, 0.035]);
        assert!(provider.index_curve(OvernightIndex::Sofr.into()).is_ok());
        assert!(curve.metadata().jacobian().is_none());
    }

    #[test]
    fn test_generate_rejects_wrong_length() {
        let generator = ImmutableRatesProviderGenerator::of(
            ImmutableRatesProvider::empty(valuation_date()),
            &group(),
            &ImmutableReferenceData::standard(),
        )
        .unwrap();
        let err = generator.generate(&[0.03]).unwrap_err();
        assert!(matches!(err, CurveError::Configuration { .. }));
    }

    #[test]
    fn test_unknown_role_curve() {
        let group = CurveGroupDefinition::builder()
            .name("USD".into())
            .add_discount_curve_name("USD-MISSING".into(), [Currency::USD])
            .build()
            .unwrap();
        let err = ImmutableRatesProviderGenerator::of(
            ImmutableRatesProvider::empty(valuation_date()),
            &group,
            &ImmutableReferenceData::standard(),
        )
        .unwrap_err();
        assert!(matches!(err, CurveError::Configuration { .. }));
    }
}
