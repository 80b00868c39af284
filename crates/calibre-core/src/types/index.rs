//! Interest rate indices.
//!
//! Indices are split into two families, matching how curve groups register
//! forward curves: term-rate ([`IborIndex`]) and overnight ([`OvernightIndex`]).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Currency, Tenor};
use crate::daycounts::DayCountConvention;

/// Term-rate (IBOR-style) index with a fixed tenor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IborIndex {
    /// CME Term SOFR (USD)
    TermSofr(Tenor),
    /// EURIBOR (EUR)
    Euribor(Tenor),
    /// Term SONIA (GBP)
    TermSonia(Tenor),
    /// TIBOR (JPY)
    Tibor(Tenor),
}

impl IborIndex {
    /// Returns the currency of the index.
    #[must_use]
    pub fn currency(&self) -> Currency {
        match self {
            IborIndex::TermSofr(_) => Currency::USD,
            IborIndex::Euribor(_) => Currency::EUR,
            IborIndex::TermSonia(_) => Currency::GBP,
            IborIndex::Tibor(_) => Currency::JPY,
        }
    }

    /// Returns the tenor of the underlying deposit.
    #[must_use]
    pub fn tenor(&self) -> Tenor {
        match self {
            IborIndex::TermSofr(t)
            | IborIndex::Euribor(t)
            | IborIndex::TermSonia(t)
            | IborIndex::Tibor(t) => *t,
        }
    }

    /// Returns the accrual day count of the index.
    #[must_use]
    pub fn day_count(&self) -> DayCountConvention {
        match self {
            IborIndex::TermSofr(_) | IborIndex::Euribor(_) => DayCountConvention::Act360,
            IborIndex::TermSonia(_) | IborIndex::Tibor(_) => DayCountConvention::Act365Fixed,
        }
    }
}

impl fmt::Display for IborIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IborIndex::TermSofr(_) => "USD-TERM-SOFR",
            IborIndex::Euribor(_) => "EUR-EURIBOR",
            IborIndex::TermSonia(_) => "GBP-TERM-SONIA",
            IborIndex::Tibor(_) => "JPY-TIBOR",
        };
        write!(f, "{name}-{}", self.tenor())
    }
}

/// Overnight risk-free rate index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OvernightIndex {
    /// Secured Overnight Financing Rate (USD)
    Sofr,
    /// Euro Short-Term Rate (EUR)
    Estr,
    /// Sterling Overnight Index Average (GBP)
    Sonia,
    /// Tokyo Overnight Average Rate (JPY)
    Tona,
    /// Swiss Average Rate Overnight (CHF)
    Saron,
}

impl OvernightIndex {
    /// Returns the currency of the index.
    #[must_use]
    pub fn currency(&self) -> Currency {
        match self {
            OvernightIndex::Sofr => Currency::USD,
            OvernightIndex::Estr => Currency::EUR,
            OvernightIndex::Sonia => Currency::GBP,
            OvernightIndex::Tona => Currency::JPY,
            OvernightIndex::Saron => Currency::CHF,
        }
    }

    /// Returns the accrual day count of the index.
    #[must_use]
    pub fn day_count(&self) -> DayCountConvention {
        match self {
            OvernightIndex::Sofr | OvernightIndex::Estr | OvernightIndex::Saron => {
                DayCountConvention::Act360
            }
            OvernightIndex::Sonia | OvernightIndex::Tona => DayCountConvention::Act365Fixed,
        }
    }
}

impl fmt::Display for OvernightIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OvernightIndex::Sofr => "USD-SOFR",
            OvernightIndex::Estr => "EUR-ESTR",
            OvernightIndex::Sonia => "GBP-SONIA",
            OvernightIndex::Tona => "JPY-TONA",
            OvernightIndex::Saron => "CHF-SARON",
        };
        write!(f, "{name}")
    }
}

/// Any rate index a forward curve can serve.
///
/// # Example
///
/// ```rust
/// use calibre_core::types::{Currency, IborIndex, RateIndex, Tenor};
///
/// let index = RateIndex::from(IborIndex::Euribor(Tenor::M6));
/// assert_eq!(index.currency(), Currency::EUR);
/// assert_eq!(index.to_string(), "EUR-EURIBOR-6M");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RateIndex {
    /// Term-rate index.
    Ibor(IborIndex),
    /// Overnight index.
    Overnight(OvernightIndex),
}

impl RateIndex {
    /// Returns the currency of the index.
    #[must_use]
    pub fn currency(&self) -> Currency {
        match self {
            RateIndex::Ibor(index) => index.currency(),
            RateIndex::Overnight(index) => index.currency(),
        }
    }

    /// Returns the accrual day count of the index.
    #[must_use]
    pub fn day_count(&self) -> DayCountConvention {
        match self {
            RateIndex::Ibor(index) => index.day_count(),
            RateIndex::Overnight(index) => index.day_count(),
        }
    }
}

impl From<IborIndex> for RateIndex {
    fn from(index: IborIndex) -> Self {
        RateIndex::Ibor(index)
    }
}

impl From<OvernightIndex> for RateIndex {
    fn from(index: OvernightIndex) -> Self {
        RateIndex::Overnight(index)
    }
}

impl fmt::Display for RateIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateIndex::Ibor(index) => index.fmt(f),
            RateIndex::Overnight(index) => index.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_properties() {
        let sofr = RateIndex::from(OvernightIndex::Sofr);
        assert_eq!(sofr.currency(), Currency::USD);
        assert_eq!(sofr.day_count(), DayCountConvention::Act360);

        let sonia = IborIndex::TermSonia(Tenor::M3);
        assert_eq!(sonia.day_count(), DayCountConvention::Act365Fixed);
        assert_eq!(sonia.tenor(), Tenor::M3);
    }

    #[test]
    fn test_ordering_is_stable() {
        let mut indices = vec![
            RateIndex::from(OvernightIndex::Estr),
            RateIndex::from(IborIndex::Euribor(Tenor::M6)),
            RateIndex::from(IborIndex::Euribor(Tenor::M3)),
        ];
        indices.sort();
        assert_eq!(indices[0], RateIndex::Ibor(IborIndex::Euribor(Tenor::M3)));
        assert_eq!(indices[2], RateIndex::Overnight(OvernightIndex::Estr));
    }
}
