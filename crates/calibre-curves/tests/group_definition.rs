//! Curve group definition tests.

use std::collections::BTreeSet;
use std::sync::Arc;

use proptest::prelude::*;

use calibre_core::daycounts::DayCountConvention;
use calibre_core::market_data::QuoteId;
use calibre_core::types::{Currency, IborIndex, OvernightIndex, RateIndex, Tenor};
use calibre_curves::prelude::*;
use calibre_math::interpolation::InterpolatorKind;

const CURRENCIES: [Currency; 4] = [Currency::USD, Currency::EUR, Currency::GBP, Currency::JPY];

fn indices() -> Vec<RateIndex> {
    vec![
        OvernightIndex::Sofr.into(),
        OvernightIndex::Estr.into(),
        term_sofr_3m(),
        IborIndex::Euribor(Tenor::M6).into(),
    ]
}

fn term_sofr_3m() -> RateIndex {
    RateIndex::from(IborIndex::TermSofr(Tenor::M3))
}

fn entry(currency_mask: u8, index_mask: u8) -> CurveGroupEntry {
    let mut entry = CurveGroupEntry::new("CURVE".into());
    for (i, currency) in CURRENCIES.iter().enumerate() {
        if currency_mask & (1 << i) != 0 {
            entry = entry.with_discount_currency(*currency);
        }
    }
    for (i, index) in indices().into_iter().enumerate() {
        if index_mask & (1 << i) != 0 {
            entry = entry.with_index(index);
        }
    }
    entry
}

fn deposit_curve(name: &str, tenors: &[Tenor]) -> NodalCurveDefinition {
    let nodes = tenors
        .iter()
        .map(|tenor| {
            let template =
                TermDepositTemplate::new(Currency::USD, *tenor, 2, DayCountConvention::Act360);
            let quote_id = QuoteId::new(format!("{name}-{tenor}"));
            Arc::new(TermDepositCurveNode::new(template, quote_id)) as Arc<dyn CurveNode>
        })
        .collect();
    NodalCurveDefinition::new(
        name.into(),
        ValueType::ZeroRate,
        DayCountConvention::Act365Fixed,
        InterpolatorKind::Linear,
        nodes,
    )
    .unwrap()
}

proptest! {
    #[test]
    fn test_merge_is_commutative(
        a_currencies in 0u8..16,
        a_indices in 0u8..16,
        b_currencies in 0u8..16,
        b_indices in 0u8..16,
    ) {
        let a = entry(a_currencies, a_indices);
        let b = entry(b_currencies, b_indices);
        prop_assert_eq!(a.merge(&b).unwrap(), b.merge(&a).unwrap());
    }

    #[test]
    fn test_merge_is_associative(
        masks in proptest::array::uniform3((0u8..16, 0u8..16)),
    ) {
        let [a, b, c] = masks.map(|(currencies, indices)| entry(currencies, indices));
        let left = a.merge(&b).unwrap().merge(&c).unwrap();
        let right = a.merge(&b.merge(&c).unwrap()).unwrap();
        prop_assert_eq!(left, right);
    }

    #[test]
    fn test_merge_is_union(
        a_currencies in 0u8..16,
        a_indices in 0u8..16,
        b_currencies in 0u8..16,
        b_indices in 0u8..16,
    ) {
        let merged = entry(a_currencies, a_indices)
            .merge(&entry(b_currencies, b_indices))
            .unwrap();
        prop_assert_eq!(merged, entry(a_currencies | b_currencies, a_indices | b_indices));
    }
}

#[test]
fn test_builder_merges_roles_of_one_curve() {
    let group = CurveGroupDefinition::builder()
        .name("USD".into())
        .add_discount_curve(deposit_curve("USD-OIS", &[Tenor::M3]), [Currency::USD])
        .add_forward_curve_name("USD-OIS".into(), [RateIndex::from(OvernightIndex::Sofr)])
        .build()
        .unwrap();

    assert_eq!(group.entries().len(), 1);
    let entry = group.entry(&"USD-OIS".into()).unwrap();
    assert!(entry.discount_currencies().contains(&Currency::USD));
    assert!(entry.overnight_indices().contains(&OvernightIndex::Sofr));
    assert_eq!(group.curve_definitions().len(), 1);
}

#[test]
fn test_builder_replaces_definition_in_place() {
    let group = CurveGroupDefinition::builder()
        .name("USD".into())
        .add_discount_curve(deposit_curve("USD-OIS", &[Tenor::M3]), [Currency::USD])
        .add_forward_curve(deposit_curve("USD-3M", &[Tenor::M6]), [term_sofr_3m()])
        .add_discount_curve(
            deposit_curve("USD-OIS", &[Tenor::M3, Tenor::M6]),
            [Currency::USD],
        )
        .build()
        .unwrap();

    let names: Vec<_> = group
        .curve_definitions()
        .iter()
        .map(|d| d.name().as_str().to_string())
        .collect();
    assert_eq!(names, vec!["USD-OIS", "USD-3M"]);
    assert_eq!(group.total_parameter_count(), 3);
    assert_eq!(group.parameter_order().offset_of(&"USD-3M".into()), Some(2));
}

#[test]
fn test_builder_usable_after_build() {
    let builder = CurveGroupDefinition::builder()
        .name("USD".into())
        .add_discount_curve(deposit_curve("USD-OIS", &[Tenor::M3]), [Currency::USD]);
    let first = builder.build().unwrap();
    let second = builder
        .add_forward_curve(deposit_curve("USD-3M", &[Tenor::M6]), [term_sofr_3m()])
        .build()
        .unwrap();

    assert_eq!(first.curve_definitions().len(), 1);
    assert_eq!(second.curve_definitions().len(), 2);
}

#[test]
fn test_build_requires_name() {
    let err = CurveGroupDefinition::builder()
        .add_discount_curve(deposit_curve("USD-OIS", &[Tenor::M3]), [Currency::USD])
        .build()
        .unwrap_err();
    assert!(matches!(err, CurveError::Configuration { .. }));
}

#[test]
fn test_requirements() {
    let group = CurveGroupDefinition::builder()
        .name("USD".into())
        .add_discount_curve(
            deposit_curve("USD-OIS", &[Tenor::M3, Tenor::M6]),
            [Currency::USD],
        )
        .add_forward_curve(deposit_curve("USD-3M", &[Tenor::M6]), [term_sofr_3m()])
        .build()
        .unwrap();

    let expected: BTreeSet<QuoteId> = [
        format!("USD-OIS-{}", Tenor::M3),
        format!("USD-OIS-{}", Tenor::M6),
        format!("USD-3M-{}", Tenor::M6),
    ]
    .into_iter()
    .map(QuoteId::new)
    .collect();
    assert_eq!(group.requirements(), expected);
}
