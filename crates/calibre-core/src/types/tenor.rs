//! Month-based tenors (`3M`, `2Y`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// A tenor expressed in whole months.
///
/// # Example
///
/// ```rust
/// use calibre_core::types::Tenor;
///
/// let tenor: Tenor = "18M".parse().unwrap();
/// assert_eq!(tenor.months(), 18);
/// assert_eq!(Tenor::of_years(2).to_string(), "2Y");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Tenor {
    months: i32,
}

impl Tenor {
    /// 1 month.
    pub const M1: Tenor = Tenor::of_months(1);
    /// 3 months.
    pub const M3: Tenor = Tenor::of_months(3);
    /// 6 months.
    pub const M6: Tenor = Tenor::of_months(6);
    /// 12 months.
    pub const M12: Tenor = Tenor::of_months(12);

    /// Creates a tenor from a number of months.
    #[must_use]
    pub const fn of_months(months: i32) -> Self {
        Self { months }
    }

    /// Creates a tenor from a number of years.
    #[must_use]
    pub const fn of_years(years: i32) -> Self {
        Self { months: years * 12 }
    }

    /// Returns the number of months.
    #[must_use]
    pub fn months(&self) -> i32 {
        self.months
    }

    /// Returns the approximate length in years.
    #[must_use]
    pub fn years(&self) -> f64 {
        f64::from(self.months) / 12.0
    }
}

impl fmt::Display for Tenor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.months != 0 && self.months % 12 == 0 {
            write!(f, "{}Y", self.months / 12)
        } else {
            write!(f, "{}M", self.months)
        }
    }
}

impl FromStr for Tenor {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_uppercase();
        let invalid = || CoreError::invalid_input(format!("Invalid tenor: {s}"));
        let (count, unit) = s.split_at(s.len().saturating_sub(1));
        let count: i32 = count.parse().map_err(|_| invalid())?;
        match unit {
            "M" => Ok(Tenor::of_months(count)),
            "Y" => Ok(Tenor::of_years(count)),
            _ => Err(invalid()),
        }
    }
}
