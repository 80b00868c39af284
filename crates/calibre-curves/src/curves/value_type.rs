//! What the parameters of a nodal curve represent.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Describes what a nodal curve's parameter values represent.
///
/// - Zero rates: continuously compounded, `P(t) = exp(-z(t)·t)`
/// - Discount factors: `P(t)` directly, with `P(0) = 1` implied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    /// Continuously compounded zero rate.
    #[default]
    ZeroRate,

    /// Discount factor.
    ///
    /// Values should be positive and decreasing; the curve is anchored at
    /// `P(0) = 1`, which is not a parameter.
    DiscountFactor,
}

impl ValueType {
    /// Converts a continuously compounded rate observed over `time` into a
    /// parameter of this type.
    #[must_use]
    pub fn from_rate(&self, rate: f64, time: f64) -> f64 {
        match self {
            ValueType::ZeroRate => rate,
            ValueType::DiscountFactor => (-rate * time).exp(),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::ZeroRate => write!(f, "Zero Rate"),
            ValueType::DiscountFactor => write!(f, "Discount Factor"),
        }
    }
}
