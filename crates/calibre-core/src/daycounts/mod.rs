//! Day count conventions.
//!
//! Day counts map a pair of dates to a year fraction. They are used for
//! instrument accrual and, on curves, to place node dates on the time axis.
//!
//! # Supported Conventions
//!
//! - [`Act360`]: Actual/360, money market and most overnight indices
//! - [`Act365Fixed`]: Actual/365 Fixed, GBP/JPY markets and curve time axes
//! - [`Thirty360E`]: 30E/360, EUR fixed legs
//!
//! # Usage
//!
//! ```rust
//! use calibre_core::daycounts::{DayCount, Act360};
//! use calibre_core::types::Date;
//! use rust_decimal_macros::dec;
//!
//! let start = Date::from_ymd(2025, 1, 1).unwrap();
//! let end = Date::from_ymd(2025, 4, 1).unwrap();
//! assert_eq!(Act360.year_fraction(start, end), dec!(0.25));
//! ```

mod act360;
mod act365;
mod thirty360;

pub use act360::Act360;
pub use act365::Act365Fixed;
pub use thirty360::Thirty360E;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::Date;

/// Trait for day count conventions.
///
/// Implementations must be thread-safe (`Send + Sync`).
pub trait DayCount: Send + Sync {
    /// Returns the name of the day count convention.
    fn name(&self) -> &'static str;

    /// Calculates the year fraction between two dates.
    ///
    /// Negative if `end` is before `start`.
    fn year_fraction(&self, start: Date, end: Date) -> Decimal;

    /// Calculates the day count between two dates.
    fn day_count(&self, start: Date, end: Date) -> i64;
}

/// Enumeration of the supported day count conventions.
///
/// Used wherever a convention is configured by value (curve definitions,
/// instrument templates).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DayCountConvention {
    /// Actual/360
    Act360,
    /// Actual/365 Fixed
    Act365Fixed,
    /// 30E/360
    Thirty360E,
}

impl DayCountConvention {
    /// Creates a boxed day count implementation.
    #[must_use]
    pub fn to_day_count(&self) -> Box<dyn DayCount> {
        match self {
            DayCountConvention::Act360 => Box::new(Act360),
            DayCountConvention::Act365Fixed => Box::new(Act365Fixed),
            DayCountConvention::Thirty360E => Box::new(Thirty360E),
        }
    }

    /// Returns the name of the convention.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            DayCountConvention::Act360 => "ACT/360",
            DayCountConvention::Act365Fixed => "ACT/365F",
            DayCountConvention::Thirty360E => "30E/360",
        }
    }

    /// Returns the year basis (denominator).
    #[must_use]
    pub const fn basis(&self) -> u32 {
        match self {
            DayCountConvention::Act360 | DayCountConvention::Thirty360E => 360,
            DayCountConvention::Act365Fixed => 365,
        }
    }

    /// Calculates the year fraction between two dates.
    #[must_use]
    pub fn year_fraction(&self, start: Date, end: Date) -> Decimal {
        self.to_day_count().year_fraction(start, end)
    }

    /// Calculates the year fraction as `f64`, for curve and pricing arithmetic.
    #[must_use]
    pub fn year_fraction_f64(&self, start: Date, end: Date) -> f64 {
        self.to_day_count().day_count(start, end) as f64 / f64::from(self.basis())
    }
}

impl std::fmt::Display for DayCountConvention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
