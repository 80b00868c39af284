//! 30E/360 day count convention.

use rust_decimal::Decimal;

use super::DayCount;
use crate::types::Date;

/// 30E/360 (Eurobond basis).
///
/// Day 31 is treated as day 30 on both ends.
///
/// $$\text{Days} = 360 (Y_2 - Y_1) + 30 (M_2 - M_1) + (D_2 - D_1)$$
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Thirty360E;

impl DayCount for Thirty360E {
    fn name(&self) -> &'static str {
        "30E/360"
    }

    fn year_fraction(&self, start: Date, end: Date) -> Decimal {
        Decimal::from(self.day_count(start, end)) / Decimal::from(360)
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        let d1 = i64::from(start.day().min(30));
        let d2 = i64::from(end.day().min(30));
        let months = i64::from(end.month()) - i64::from(start.month());
        let years = i64::from(end.year()) - i64::from(start.year());
        360 * years + 30 * months + (d2 - d1)
    }
}
