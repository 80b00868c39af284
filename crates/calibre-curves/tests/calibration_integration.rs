//! End-to-end calibration tests.

use std::collections::BTreeMap;
use std::sync::Arc;

use approx::assert_relative_eq;

use calibre_core::daycounts::DayCountConvention;
use calibre_core::market_data::{ImmutableMarketData, MarketData, QuoteId};
use calibre_core::reference_data::ImmutableReferenceData;
use calibre_core::types::{Currency, Date, Frequency, IborIndex, OvernightIndex, RateIndex, Tenor};
use calibre_curves::prelude::*;
use calibre_math::interpolation::InterpolatorKind;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn valuation_date() -> Date {
    Date::from_ymd(2026, 1, 2).unwrap()
}

fn term_sofr_3m() -> RateIndex {
    IborIndex::TermSofr(Tenor::M3).into()
}

fn deposit(tenor: Tenor, quote: &str) -> Arc<dyn CurveNode> {
    let template = TermDepositTemplate::new(Currency::USD, tenor, 0, DayCountConvention::Act360);
    Arc::new(TermDepositCurveNode::new(template, quote.into()))
}

fn fra(months_to_start: i32, quote: &str) -> Arc<dyn CurveNode> {
    let template = FraTemplate::new(IborIndex::TermSofr(Tenor::M3), months_to_start, 0);
    Arc::new(FraCurveNode::new(template, quote.into()))
}

fn ibor_swap(years: i32, quote: &str) -> Arc<dyn CurveNode> {
    let template = FixedFloatSwapTemplate::new(
        term_sofr_3m(),
        Tenor::of_years(years),
        Frequency::Annual,
        DayCountConvention::Thirty360E,
        Frequency::Quarterly,
        0,
    );
    Arc::new(FixedFloatSwapCurveNode::new(template, quote.into()))
}

fn zero_curve(name: &str, nodes: Vec<Arc<dyn CurveNode>>) -> NodalCurveDefinition {
    NodalCurveDefinition::new(
        name.into(),
        ValueType::ZeroRate,
        DayCountConvention::Act365Fixed,
        InterpolatorKind::Linear,
        nodes,
    )
    .unwrap()
}

fn ois_group() -> CurveGroupDefinition {
    let curve = zero_curve(
        "USD-OIS",
        vec![
            deposit(Tenor::M3, "USD-DEP-3M"),
            deposit(Tenor::M6, "USD-DEP-6M"),
            deposit(Tenor::M12, "USD-DEP-1Y"),
        ],
    );
    CurveGroupDefinition::builder()
        .name("USD-OIS".into())
        .add_curve(curve, [Currency::USD], [RateIndex::from(OvernightIndex::Sofr)])
        .build()
        .unwrap()
}

fn ibor_group() -> CurveGroupDefinition {
    let curve = zero_curve(
        "USD-3M",
        vec![
            fra(3, "USD-FRA-3X6"),
            ibor_swap(2, "USD-IRS-2Y"),
            ibor_swap(3, "USD-IRS-3Y"),
        ],
    );
    CurveGroupDefinition::builder()
        .name("USD-3M".into())
        .add_forward_curve(curve, [term_sofr_3m()])
        .build()
        .unwrap()
}

fn market(bumps: &[(&str, f64)]) -> ImmutableMarketData {
    let quotes = [
        ("USD-DEP-3M", 0.030),
        ("USD-DEP-6M", 0.032),
        ("USD-DEP-1Y", 0.034),
        ("USD-FRA-3X6", 0.035),
        ("USD-IRS-2Y", 0.040),
        ("USD-IRS-3Y", 0.045),
    ];
    quotes
        .iter()
        .fold(ImmutableMarketData::builder(valuation_date()), |builder, (id, value)| {
            let bump: f64 = bumps.iter().filter(|(b, _)| b == id).map(|(_, v)| v).sum();
            builder.add_value(QuoteId::new(*id), value + bump)
        })
        .build()
}

fn calibrate_chain(
    calibrator: &CurveCalibrator,
    market: &ImmutableMarketData,
) -> ImmutableRatesProvider {
    calibrator
        .calibrate(
            &[ois_group(), ibor_group()],
            ImmutableRatesProvider::empty(valuation_date()),
            market,
            &ImmutableReferenceData::standard(),
        )
        .unwrap()
}

fn tight_calibrator() -> CurveCalibrator {
    CurveCalibrator::of(1e-12, 1e-12, 200)
}

#[test]
fn test_single_deposit_discount_factor_curve() {
    init_tracing();
    let rate = 0.04;
    let curve = NodalCurveDefinition::new(
        "USD-DSC".into(),
        ValueType::DiscountFactor,
        DayCountConvention::Act365Fixed,
        InterpolatorKind::LogLinear,
        vec![deposit(Tenor::M6, "USD-DEP-6M")],
    )
    .unwrap();
    let group = CurveGroupDefinition::builder()
        .name("USD".into())
        .add_discount_curve(curve, [Currency::USD])
        .build()
        .unwrap();
    let market = Arc::new(
        ImmutableMarketData::builder(valuation_date())
            .add_value("USD-DEP-6M".into(), rate)
            .build(),
    );

    let provider = CurveCalibrator::standard()
        .calibrate_group(
            &group,
            valuation_date(),
            Arc::clone(&market) as Arc<dyn MarketData>,
            &ImmutableReferenceData::standard(),
            BTreeMap::new(),
        )
        .unwrap();

    // 2026-01-02 to 2026-07-02
    let t = 181.0 / 360.0;
    let curve = provider.discount_curve(Currency::USD).unwrap();
    assert_relative_eq!(curve.parameters()[0], 1.0 / (1.0 + rate * t), epsilon = 1e-10);

    let jacobian = curve.metadata().jacobian().unwrap();
    assert_eq!(jacobian.matrix().shape(), (1, 1));
    let expected = -t / ((1.0 + rate * t) * (1.0 + rate * t));
    assert_relative_eq!(jacobian.matrix()[(0, 0)], expected, epsilon = 1e-8);

    // A trade's sensitivity to its own quote is one
    let trades = group
        .resolved_trades(valuation_date(), &*market, &ImmutableReferenceData::standard())
        .unwrap();
    let parameter_sensitivity = trades[0].par_spread_sensitivity(&provider).unwrap();
    let quote_sensitivity = MarketQuoteSensitivityCalculator::DEFAULT
        .sensitivity(&parameter_sensitivity, &provider)
        .unwrap();
    assert_relative_eq!(
        quote_sensitivity.get(&"USD-DSC".into()).unwrap()[0],
        1.0,
        epsilon = 1e-8
    );
}

#[test]
fn test_chain_reprices_all_trades() {
    init_tracing();
    let market = market(&[]);
    let provider = calibrate_chain(&CurveCalibrator::standard(), &market);
    let ref_data = ImmutableReferenceData::standard();
    let measures = CalibrationMeasures::par_spread();

    for group in [ois_group(), ibor_group()] {
        for trade in group.resolved_trades(valuation_date(), &market, &ref_data).unwrap() {
            let residual = measures.value(&trade, &provider).unwrap();
            assert!(residual.abs() < 1e-9, "{:?} residual {residual}", trade.kind());
        }
    }

    let ois = provider.discount_curve(Currency::USD).unwrap();
    assert_eq!(ois.name(), &CurveName::new("USD-OIS"));
    assert!(provider.index_curve(OvernightIndex::Sofr.into()).is_ok());
    assert_eq!(provider.index_curve(term_sofr_3m()).unwrap().name(), &CurveName::new("USD-3M"));
}

#[test]
fn test_chain_jacobian_layout() {
    let provider = calibrate_chain(&CurveCalibrator::standard(), &market(&[]));

    let ois = provider.find_curve(&"USD-OIS".into()).unwrap();
    let ois_jacobian = ois.metadata().jacobian().unwrap();
    assert_eq!(ois_jacobian.matrix().shape(), (3, 3));
    assert_eq!(ois_jacobian.order().len(), 1);

    let ibor = provider.find_curve(&"USD-3M".into()).unwrap();
    let ibor_jacobian = ibor.metadata().jacobian().unwrap();
    assert_eq!(ibor_jacobian.matrix().shape(), (3, 6));
    assert_eq!(ibor_jacobian.order().offset_of(&"USD-OIS".into()), Some(0));
    assert_eq!(ibor_jacobian.order().offset_of(&"USD-3M".into()), Some(3));

    // Each deposit ends on its own node
    for row in 0..3 {
        for column in 0..3 {
            if row != column {
                assert_relative_eq!(ois_jacobian.matrix()[(row, column)], 0.0, epsilon = 1e-12);
            }
        }
    }
}

/// Central difference of a calibrated parameter with respect to a quote.
fn bumped_derivative(quote: &str, curve: &str, parameter: usize) -> f64 {
    let h = 1e-5;
    let calibrator = tight_calibrator();
    let up = calibrate_chain(&calibrator, &market(&[(quote, h)]));
    let down = calibrate_chain(&calibrator, &market(&[(quote, -h)]));
    let name = CurveName::new(curve);
    let p_up = up.find_curve(&name).unwrap().parameters()[parameter];
    let p_down = down.find_curve(&name).unwrap().parameters()[parameter];
    (p_up - p_down) / (2.0 * h)
}

#[test]
fn test_chain_jacobian_matches_recalibration() {
    let provider = calibrate_chain(&tight_calibrator(), &market(&[]));
    let jacobian = |name: &str| {
        let curve = provider.find_curve(&name.into()).unwrap();
        curve.metadata().jacobian().unwrap().clone()
    };
    let ois = jacobian("USD-OIS");
    let ibor = jacobian("USD-3M");

    // Direct blocks
    assert_relative_eq!(
        ois.matrix()[(1, 1)],
        bumped_derivative("USD-DEP-6M", "USD-OIS", 1),
        epsilon = 1e-5
    );
    assert_relative_eq!(
        ibor.matrix()[(2, 5)],
        bumped_derivative("USD-IRS-3Y", "USD-3M", 2),
        epsilon = 1e-5
    );

    // Indirect block: the 3Y forward parameter against the 1Y OIS deposit
    let indirect = ibor.matrix()[(2, 2)];
    assert!(indirect.abs() > 1e-5, "indirect entry {indirect}");
    assert_relative_eq!(
        indirect,
        bumped_derivative("USD-DEP-1Y", "USD-3M", 2),
        epsilon = 1e-5
    );
}

#[test]
fn test_calibration_is_deterministic() {
    let market = market(&[]);
    let first = calibrate_chain(&CurveCalibrator::standard(), &market);
    let second = calibrate_chain(&CurveCalibrator::standard(), &market);

    for name in ["USD-OIS", "USD-3M"] {
        let name = CurveName::new(name);
        let a = first.find_curve(&name).unwrap();
        let b = second.find_curve(&name).unwrap();
        assert_eq!(a.parameters(), b.parameters());
        assert_eq!(
            a.metadata().jacobian().unwrap().matrix(),
            b.metadata().jacobian().unwrap().matrix()
        );
    }
}

#[test]
fn test_present_value_measures_give_same_curves() {
    let market = market(&[]);
    let par = calibrate_chain(&CurveCalibrator::standard(), &market);
    let pv = calibrate_chain(
        &CurveCalibrator::standard().with_measures(CalibrationMeasures::present_value()),
        &market,
    );

    for name in ["USD-OIS", "USD-3M"] {
        let name = CurveName::new(name);
        let a = par.find_curve(&name).unwrap().parameters();
        let b = pv.find_curve(&name).unwrap().parameters();
        for (x, y) in a.iter().zip(b) {
            assert_relative_eq!(*x, *y, epsilon = 1e-7);
        }
    }
}

#[test]
fn test_duplicate_curve_across_groups() {
    let err = CurveCalibrator::standard()
        .calibrate(
            &[ois_group(), ois_group()],
            ImmutableRatesProvider::empty(valuation_date()),
            &market(&[]),
            &ImmutableReferenceData::standard(),
        )
        .unwrap_err();
    assert!(matches!(err, CurveError::Configuration { .. }));
}

#[test]
fn test_missing_quote() {
    let market = ImmutableMarketData::builder(valuation_date())
        .add_value("USD-DEP-3M".into(), 0.03)
        .add_value("USD-DEP-6M".into(), 0.032)
        .build();
    let err = CurveCalibrator::standard()
        .calibrate(
            &[ois_group()],
            ImmutableRatesProvider::empty(valuation_date()),
            &market,
            &ImmutableReferenceData::standard(),
        )
        .unwrap_err();
    assert!(matches!(err, CurveError::MarketDataMissing { .. }));
}

#[test]
fn test_redundant_trade_is_numerical_error() {
    // The 1Y deposit is already matched by the OIS curve and does not
    // depend on the 3M curve, so the 3M block is singular.
    let curve = zero_curve(
        "USD-3M",
        vec![fra(3, "USD-FRA-3X6"), deposit(Tenor::M12, "USD-DEP-1Y")],
    );
    let group = CurveGroupDefinition::builder()
        .name("USD-3M".into())
        .add_forward_curve(curve, [term_sofr_3m()])
        .build()
        .unwrap();

    let err = CurveCalibrator::standard()
        .calibrate(
            &[ois_group(), group],
            ImmutableRatesProvider::empty(valuation_date()),
            &market(&[]),
            &ImmutableReferenceData::standard(),
        )
        .unwrap_err();
    assert!(matches!(err, CurveError::Numerical { .. }), "{err}");
}

#[test]
fn test_non_convergence() {
    let err = CurveCalibrator::of(1e-9, 1e-9, 1)
        .calibrate(
            &[ois_group()],
            ImmutableRatesProvider::empty(valuation_date()),
            &market(&[]),
            &ImmutableReferenceData::standard(),
        )
        .unwrap_err();
    assert!(matches!(err, CurveError::NonConvergence { iterations: 1, .. }), "{err}");
}

#[test]
fn test_unordered_nodes() {
    let curve = zero_curve(
        "USD-OIS",
        vec![deposit(Tenor::M6, "USD-DEP-6M"), deposit(Tenor::M3, "USD-DEP-3M")],
    );
    let group = CurveGroupDefinition::builder()
        .name("USD".into())
        .add_discount_curve(curve, [Currency::USD])
        .build()
        .unwrap();
    let err = CurveCalibrator::standard()
        .calibrate(
            &[group],
            ImmutableRatesProvider::empty(valuation_date()),
            &market(&[]),
            &ImmutableReferenceData::standard(),
        )
        .unwrap_err();
    assert!(matches!(err, CurveError::Configuration { .. }));
}

#[test]
fn test_role_only_group_passes_through() {
    let metadata = CurveMetadata::new(
        "EUR-EXT".into(),
        ValueType::ZeroRate,
        DayCountConvention::Act365Fixed,
        vec![ParameterMetadata::new("1Y", valuation_date(), 1.0)],
    );
    let external: Arc<dyn NodalCurve> = Arc::new(ConstantNodalCurve::new(metadata, 0.02).unwrap());
    let known = ImmutableRatesProvider::builder(valuation_date())
        .curve(external)
        .build();
    let group = CurveGroupDefinition::builder()
        .name("EUR".into())
        .add_discount_curve_name("EUR-EXT".into(), [Currency::EUR])
        .build()
        .unwrap();

    let provider = CurveCalibrator::standard()
        .calibrate(
            &[group, ois_group()],
            known,
            &market(&[]),
            &ImmutableReferenceData::standard(),
        )
        .unwrap();

    let eur = provider.discount_curve(Currency::EUR).unwrap();
    assert_eq!(eur.parameters(), &[0.02]);
    assert!(eur.metadata().jacobian().is_none());
    // The OIS group is the first calibrated group of the chain
    let ois = provider.find_curve(&"USD-OIS".into()).unwrap();
    assert_eq!(ois.metadata().jacobian().unwrap().order().len(), 1);
}

#[test]
fn test_calibrator_from_toml() {
    let config = CalibratorConfig::from_toml_str(
        r#"
        tolerance_abs = 1e-10
        tolerance_rel = 1e-10
        max_steps = 50
        measures = "present_value"
        "#,
    )
    .unwrap();
    let calibrator = CurveCalibrator::from_config(&config).unwrap();
    assert_eq!(calibrator.measures().name(), "PresentValue");

    let provider = calibrate_chain(&calibrator, &market(&[]));
    assert_eq!(provider.curves().len(), 2);
}
