//! Error types for Calibre core operations.

use thiserror::Error;

/// A specialized Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised by core market types and data lookups.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Invalid date provided.
    #[error("Invalid date: {message}")]
    InvalidDate {
        /// Description of the invalid date.
        message: String,
    },

    /// A quote required by the caller is absent from the market data.
    #[error("Market data missing for quote '{quote_id}'")]
    QuoteNotFound {
        /// Identifier of the missing quote.
        quote_id: String,
    },

    /// A historic fixing required by the caller is absent.
    #[error("Fixing missing for index {index} on {date}")]
    FixingNotFound {
        /// Name of the index.
        index: String,
        /// Fixing date.
        date: String,
    },

    /// A reference data item (typically a holiday calendar) is absent.
    #[error("Reference data missing: {id}")]
    ReferenceDataNotFound {
        /// Identifier of the missing item.
        id: String,
    },

    /// An FX rate cannot be resolved.
    #[error("FX rate not available for {pair}")]
    FxRateNotFound {
        /// Currency pair, e.g. `EUR/USD`.
        pair: String,
    },

    /// Calendar or business day error.
    #[error("Calendar error: {reason}")]
    CalendarError {
        /// Description of the error.
        reason: String,
    },

    /// Invalid input value.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Description of the invalid input.
        reason: String,
    },
}

impl CoreError {
    /// Creates an invalid date error.
    #[must_use]
    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::InvalidDate {
            message: message.into(),
        }
    }

    /// Creates a missing quote error.
    #[must_use]
    pub fn quote_not_found(quote_id: impl Into<String>) -> Self {
        Self::QuoteNotFound {
            quote_id: quote_id.into(),
        }
    }

    /// Creates a missing fixing error.
    #[must_use]
    pub fn fixing_not_found(index: impl Into<String>, date: impl Into<String>) -> Self {
        Self::FixingNotFound {
            index: index.into(),
            date: date.into(),
        }
    }

    /// Creates a missing reference data error.
    #[must_use]
    pub fn reference_data_not_found(id: impl Into<String>) -> Self {
        Self::ReferenceDataNotFound { id: id.into() }
    }

    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Returns true if this error signals absent market data (quote or fixing).
    #[must_use]
    pub fn is_market_data_missing(&self) -> bool {
        matches!(
            self,
            Self::QuoteNotFound { .. } | Self::FixingNotFound { .. } | Self::FxRateNotFound { .. }
        )
    }
}
