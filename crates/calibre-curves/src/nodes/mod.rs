//! Standard curve nodes.
//!
//! Each node pairs a trade template with the identifier of the quote that
//! sets its rate. Resolution applies the spot lag and business day
//! adjustment of the template's calendar, so a missing calendar surfaces as
//! `ReferenceDataMissing` and a missing quote as `MarketDataMissing`.

mod fra;
mod swap;
mod term_deposit;

pub use fra::{FraCurveNode, FraTemplate};
pub use swap::{FixedFloatSwapCurveNode, FixedFloatSwapTemplate};
pub use term_deposit::{TermDepositCurveNode, TermDepositTemplate};
