//! FX error types.

use rust_decimal::Decimal;
use swapdesk_common::{CurrencyCode, CurrencyPair};
use thiserror::Error;

/// Errors that can occur while loading tables or converting.
#[derive(Debug, Error)]
pub enum FxError {
    /// Rate not present in the table. Never expected once a table is built.
    #[error("Rate not available for {0}")]
    RateNotAvailable(CurrencyCode),

    /// Rate table entry is zero or negative.
    #[error("Rate for {code} must be positive, got {rate}")]
    NonPositiveRate { code: CurrencyCode, rate: Decimal },

    /// Currency metadata not present in the table.
    #[error("Metadata not available for {0}")]
    MissingMetadata(CurrencyCode),

    /// Same currency listed twice in a table.
    #[error("Duplicate table entry for {0}")]
    DuplicateEntry(CurrencyCode),

    /// Table source could not be read or parsed.
    #[error("Invalid table: {0}")]
    InvalidTable(String),

    /// Arithmetic left the representable decimal range.
    #[error("Conversion overflow for {0}")]
    Overflow(CurrencyPair),
}

impl From<serde_json::Error> for FxError {
    fn from(err: serde_json::Error) -> Self {
        FxError::InvalidTable(err.to_string())
    }
}

impl From<std::io::Error> for FxError {
    fn from(err: std::io::Error) -> Self {
        FxError::InvalidTable(err.to_string())
    }
}

/// Result type for FX operations.
pub type FxResult<T> = Result<T, FxError>;
