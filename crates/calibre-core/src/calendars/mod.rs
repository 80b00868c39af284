//! Business day calendars.
//!
//! Curve nodes use calendars to derive spot dates and to roll schedule dates
//! onto business days. Calendars are looked up from reference data by
//! [`CalendarId`](crate::reference_data::CalendarId).

mod conventions;

pub use conventions::{adjust, BusinessDayConvention};

use std::collections::BTreeSet;

use crate::types::Date;

/// A business day calendar.
pub trait Calendar: Send + Sync + std::fmt::Debug {
    /// Returns the name of the calendar.
    fn name(&self) -> &str;

    /// Returns true if the date is a business day.
    fn is_business_day(&self, date: Date) -> bool;

    /// Returns true if the date is a holiday.
    fn is_holiday(&self, date: Date) -> bool {
        !self.is_business_day(date)
    }

    /// Adjusts a date according to the given business day convention.
    fn adjust(&self, date: Date, convention: BusinessDayConvention) -> Date {
        conventions::adjust(date, convention, self)
    }

    /// Advances a date by a number of business days.
    ///
    /// A zero shift returns the date unchanged, even on a holiday.
    fn add_business_days(&self, date: Date, days: i32) -> Date {
        let mut result = date;
        let mut remaining = days.abs();
        let direction: i64 = if days >= 0 { 1 } else { -1 };

        while remaining > 0 {
            result = result.add_days(direction);
            if self.is_business_day(result) {
                remaining -= 1;
            }
        }

        result
    }
}

/// Calendar where only Saturdays and Sundays are holidays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeekendCalendar;

impl Calendar for WeekendCalendar {
    fn name(&self) -> &str {
        "WEEKEND"
    }

    fn is_business_day(&self, date: Date) -> bool {
        !date.is_weekend()
    }
}

/// Weekend calendar with an explicit list of holidays.
///
/// # Example
///
/// ```rust
/// use calibre_core::calendars::{Calendar, HolidayCalendar};
/// use calibre_core::types::Date;
///
/// let new_year = Date::from_ymd(2025, 1, 1).unwrap();
/// let cal = HolidayCalendar::new("USNY", [new_year]);
/// assert!(!cal.is_business_day(new_year));
/// assert_eq!(cal.add_business_days(new_year, 1), Date::from_ymd(2025, 1, 2).unwrap());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolidayCalendar {
    name: String,
    holidays: BTreeSet<Date>,
}

impl HolidayCalendar {
    /// Creates a calendar from a name and a set of holiday dates.
    #[must_use]
    pub fn new(name: impl Into<String>, holidays: impl IntoIterator<Item = Date>) -> Self {
        Self {
            name: name.into(),
            holidays: holidays.into_iter().collect(),
        }
    }

    /// Returns the explicit holidays (weekends excluded).
    #[must_use]
    pub fn holidays(&self) -> &BTreeSet<Date> {
        &self.holidays
    }
}

impl Calendar for HolidayCalendar {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_business_day(&self, date: Date) -> bool {
        !date.is_weekend() && !self.holidays.contains(&date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekend_calendar() {
        let cal = WeekendCalendar;
        let friday = Date::from_ymd(2025, 3, 14).unwrap();
        let saturday = Date::from_ymd(2025, 3, 15).unwrap();

        assert!(cal.is_business_day(friday));
        assert!(cal.is_holiday(saturday));
        assert_eq!(cal.add_business_days(friday, 1), Date::from_ymd(2025, 3, 17).unwrap());
        assert_eq!(cal.add_business_days(friday, -5), Date::from_ymd(2025, 3, 7).unwrap());
    }

    #[test]
    fn test_holiday_calendar_skips_holidays() {
        let holiday = Date::from_ymd(2025, 12, 25).unwrap();
        let cal = HolidayCalendar::new("TEST", [holiday]);
        let christmas_eve = Date::from_ymd(2025, 12, 24).unwrap();

        assert_eq!(cal.add_business_days(christmas_eve, 1), Date::from_ymd(2025, 12, 26).unwrap());
        assert_eq!(cal.name(), "TEST");
    }
}
