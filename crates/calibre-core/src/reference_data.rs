//! Reference data used while resolving curve nodes into trades.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::calendars::{Calendar, WeekendCalendar};
use crate::error::{CoreError, CoreResult};

/// Identifier of a holiday calendar held in reference data.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalendarId(String);

impl CalendarId {
    /// The weekend-only calendar, always present in standard reference data.
    pub const WEEKEND: &'static str = "WEEKEND";

    /// Creates a calendar identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Identifier of the weekend-only calendar.
    #[must_use]
    pub fn weekend() -> Self {
        Self::new(Self::WEEKEND)
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CalendarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lookup of static reference data.
pub trait ReferenceData: Send + Sync {
    /// Resolves a holiday calendar.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::ReferenceDataNotFound` if no calendar has this id.
    fn calendar(&self, id: &CalendarId) -> CoreResult<Arc<dyn Calendar>>;
}

/// Immutable map-backed reference data.
///
/// # Example
///
/// ```rust
/// use calibre_core::calendars::HolidayCalendar;
/// use calibre_core::reference_data::{CalendarId, ImmutableReferenceData, ReferenceData};
///
/// let ref_data = ImmutableReferenceData::standard()
///     .with_calendar(CalendarId::new("USNY"), HolidayCalendar::new("USNY", []));
/// assert!(ref_data.calendar(&CalendarId::new("USNY")).is_ok());
/// assert!(ref_data.calendar(&CalendarId::new("GBLO")).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ImmutableReferenceData {
    calendars: BTreeMap<CalendarId, Arc<dyn Calendar>>,
}

impl ImmutableReferenceData {
    /// Creates empty reference data.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Reference data holding only the weekend calendar.
    #[must_use]
    pub fn standard() -> Self {
        Self::empty().with_calendar(CalendarId::weekend(), WeekendCalendar)
    }

    /// Adds or replaces a calendar.
    #[must_use]
    pub fn with_calendar(mut self, id: CalendarId, calendar: impl Calendar + 'static) -> Self {
        self.calendars.insert(id, Arc::new(calendar));
        self
    }
}

impl ReferenceData for ImmutableReferenceData {
    fn calendar(&self, id: &CalendarId) -> CoreResult<Arc<dyn Calendar>> {
        self.calendars
            .get(id)
            .cloned()
            .ok_or_else(|| CoreError::reference_data_not_found(format!("calendar {id}")))
    }
}
