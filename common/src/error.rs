//! Error types for SwapDesk amount and currency input.

use thiserror::Error;

/// Why a typed amount was rejected.
///
/// Both variants are recoverable by the user: the message is shown next to
/// the field and the session stays editable.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Text is not a parseable decimal number.
    #[error("Please enter a valid number (e.g., 67 or 67.50)")]
    InvalidFormat,

    /// Text parses but is not strictly positive.
    #[error("Amount must be greater than zero")]
    ZeroOrNegative,
}

impl ValidationError {
    /// Get the short error code shown alongside the message.
    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationError::InvalidFormat => "E001",
            ValidationError::ZeroOrNegative => "E002",
        }
    }

    /// Get the user-facing message.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// Currency code not present in the supported catalogue.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown currency code: {0}")]
pub struct CurrencyParseError(pub String);

/// Field selector not recognised (expected `input` or `output`).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown field: {0}")]
pub struct SideParseError(pub String);

/// Result type alias for amount validation.
pub type ValidationResult<T> = std::result::Result<T, ValidationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(ValidationError::InvalidFormat.error_code(), "E001");
        assert_eq!(ValidationError::ZeroOrNegative.error_code(), "E002");
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            ValidationError::ZeroOrNegative.message(),
            "Amount must be greater than zero"
        );
        assert!(ValidationError::InvalidFormat.message().contains("67.50"));
    }
}
