//! # Calibre Curves
//!
//! Multi-curve calibration for the Calibre engine.
//!
//! This crate provides:
//!
//! - **Definitions**: Curve groups, their roles and their nodes
//! - **Nodes**: Term deposits, FRAs and fixed versus floating swaps
//! - **Curves**: Interpolated and constant nodal curves
//! - **Provider**: An immutable view of curves by name, currency and index
//! - **Calibration**: Sequential group calibration with Jacobians to the
//!   market quotes of the whole chain
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use calibre_core::daycounts::DayCountConvention;
//! use calibre_core::market_data::ImmutableMarketData;
//! use calibre_core::reference_data::ImmutableReferenceData;
//! use calibre_core::types::{Currency, Date, Tenor};
//! use calibre_curves::prelude::*;
//! use calibre_math::interpolation::InterpolatorKind;
//!
//! let valuation_date = Date::from_ymd(2026, 1, 2).unwrap();
//! let template = TermDepositTemplate::new(Currency::USD, Tenor::M6, 2, DayCountConvention::Act360);
//! let node: Arc<dyn CurveNode> = Arc::new(TermDepositCurveNode::new(template, "USD-DEP-6M".into()));
//! let curve = NodalCurveDefinition::new(
//!     "USD-DSC".into(),
//!     ValueType::ZeroRate,
//!     DayCountConvention::Act365Fixed,
//!     InterpolatorKind::Linear,
//!     vec![node],
//! )
//! .unwrap();
//! let group = CurveGroupDefinition::builder()
//!     .name("USD".into())
//!     .add_discount_curve(curve, [Currency::USD])
//!     .build()
//!     .unwrap();
//!
//! let market = ImmutableMarketData::builder(valuation_date)
//!     .add_value("USD-DEP-6M".into(), 0.04)
//!     .build();
//! let provider = CurveCalibrator::standard()
//!     .calibrate(
//!         &[group],
//!         ImmutableRatesProvider::empty(valuation_date),
//!         &market,
//!         &ImmutableReferenceData::standard(),
//!     )
//!     .unwrap();
//!
//! let curve = provider.discount_curve(Currency::USD).unwrap();
//! assert!(curve.metadata().jacobian().is_some());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::doc_markdown)]

pub mod calibration;
pub mod curves;
pub mod definition;
pub mod error;
pub mod instruments;
pub mod jacobian;
pub mod names;
pub mod nodes;
pub mod parameter;
pub mod provider;
pub mod sensitivity;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::calibration::{
        CalibrationMeasure, CalibrationMeasures, CalibratorConfig, CurveCalibrator,
        ImmutableRatesProviderGenerator, MarketQuoteSensitivityCalculator, MeasuresKind,
        RatesProviderGenerator,
    };
    pub use crate::curves::{
        ConstantNodalCurve, CurveMetadata, InterpolatedNodalCurve, NodalCurve, ParameterMetadata,
        ValueType,
    };
    pub use crate::definition::{
        CurveGroupDefinition, CurveGroupDefinitionBuilder, CurveGroupEntry, CurveNode,
        NodalCurveDefinition,
    };
    pub use crate::error::{CurveError, CurveResult};
    pub use crate::instruments::{ResolvedTrade, TradeKind};
    pub use crate::jacobian::JacobianCalibrationMatrix;
    pub use crate::names::{CurveGroupName, CurveName};
    pub use crate::nodes::{
        FixedFloatSwapCurveNode, FixedFloatSwapTemplate, FraCurveNode, FraTemplate,
        TermDepositCurveNode, TermDepositTemplate,
    };
    pub use crate::parameter::{CurveParameterSize, ParameterOrder};
    pub use crate::provider::{ImmutableRatesProvider, ImmutableRatesProviderBuilder};
    pub use crate::sensitivity::CurveParameterSensitivities;
}

pub use error::{CurveError, CurveResult};
