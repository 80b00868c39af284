//! Payment frequency of a swap leg.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Payment frequency of a periodic leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Frequency {
    /// Annual payments (1 per year)
    #[default]
    Annual,
    /// Semi-annual payments (2 per year)
    SemiAnnual,
    /// Quarterly payments (4 per year)
    Quarterly,
    /// Monthly payments (12 per year)
    Monthly,
    /// A single period running from start to maturity
    Term,
}

impl Frequency {
    /// Returns the number of months per period, or `None` for [`Frequency::Term`].
    #[must_use]
    pub fn months_per_period(&self) -> Option<i32> {
        match self {
            Frequency::Annual => Some(12),
            Frequency::SemiAnnual => Some(6),
            Frequency::Quarterly => Some(3),
            Frequency::Monthly => Some(1),
            Frequency::Term => None,
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Frequency::Annual => "Annual",
            Frequency::SemiAnnual => "Semi-Annual",
            Frequency::Quarterly => "Quarterly",
            Frequency::Monthly => "Monthly",
            Frequency::Term => "Term",
        };
        write!(f, "{name}")
    }
}
