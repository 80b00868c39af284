//! # Calibre Core
//!
//! Core types, conventions and data access traits for the Calibre curve
//! calibration engine.
//!
//! This crate provides the building blocks the calibrator consumes:
//!
//! - **Types**: `Date`, `Currency`, `Frequency`, `Tenor` and rate indices
//! - **Day Count Conventions**: year fractions returned as `Decimal`
//! - **Business Day Calendars**: weekend and holiday calendars with adjustment rules
//! - **Market Data**: quotes by identifier and fixing time series by index
//! - **Reference Data**: calendar resolution for trade construction
//! - **FX**: FX rates sourced from market data quotes
//!
//! ## Example
//!
//! ```rust
//! use calibre_core::prelude::*;
//!
//! let date = Date::from_ymd(2025, 3, 14).unwrap();
//! let market = ImmutableMarketData::builder(date)
//!     .add_value(QuoteId::new("USD-DEP-3M"), 0.0425)
//!     .build();
//!
//! assert_eq!(market.value(&QuoteId::new("USD-DEP-3M")).unwrap(), 0.0425);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::trivially_copy_pass_by_ref)]
#![allow(clippy::uninlined_format_args)]

pub mod calendars;
pub mod daycounts;
pub mod error;
pub mod fx;
pub mod market_data;
pub mod reference_data;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::calendars::{BusinessDayConvention, Calendar, HolidayCalendar, WeekendCalendar};
    pub use crate::daycounts::{DayCount, DayCountConvention};
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::fx::{FxRateProvider, MarketDataFxRateProvider};
    pub use crate::market_data::{ImmutableMarketData, MarketData, QuoteId, TimeSeries};
    pub use crate::reference_data::{CalendarId, ImmutableReferenceData, ReferenceData};
    pub use crate::types::{
        Currency, Date, Frequency, IborIndex, OvernightIndex, RateIndex, Tenor,
    };
}

pub use error::{CoreError, CoreResult};
