//! Domain types for rates markets.

mod currency;
mod date;
mod frequency;
mod index;
mod tenor;

pub use currency::Currency;
pub use date::Date;
pub use frequency::Frequency;
pub use index::{IborIndex, OvernightIndex, RateIndex};
pub use tenor::Tenor;
