//! Typed amount parsing and validation.
//!
//! Raw field text is accepted permissively while the user is typing
//! (`""`, `"12."`, `".5"` all match the amount grammar) and only becomes an
//! [`Amount`] once it parses to a strictly positive decimal.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ValidationError, ValidationResult};

/// Thousands separator emitted by the formatter.
pub const GROUP_SEPARATOR: char = ',';

/// A validated, strictly positive amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Amount(Decimal);

impl Amount {
    /// Validate raw field text.
    ///
    /// A single leading `-` is read as a sign so that negative input is
    /// reported as [`ValidationError::ZeroOrNegative`] rather than a format
    /// error.
    pub fn parse(raw: &str) -> ValidationResult<Self> {
        let (negative, body) = match raw.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };

        if body.is_empty() || !is_amount_text(body) {
            return Err(ValidationError::InvalidFormat);
        }

        let normalized = normalize(body).ok_or(ValidationError::InvalidFormat)?;
        let value =
            Decimal::from_str(&normalized).map_err(|_| ValidationError::InvalidFormat)?;

        if negative || value <= Decimal::ZERO {
            return Err(ValidationError::ZeroOrNegative);
        }

        Ok(Self(value))
    }

    /// Wrap a decimal that is already known to be positive.
    pub fn new(value: Decimal) -> ValidationResult<Self> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(ValidationError::ZeroOrNegative)
        }
    }

    /// Get the magnitude.
    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Amount {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Validate raw field text. See [`Amount::parse`].
pub fn validate(raw: &str) -> ValidationResult<Amount> {
    Amount::parse(raw)
}

/// Whether `text` matches `digits* ('.' digits*)?`.
///
/// The empty string and a lone `.` match; this is the mid-typing grammar,
/// not a guarantee that the text parses.
pub fn is_amount_text(text: &str) -> bool {
    let mut seen_dot = false;
    for c in text.chars() {
        match c {
            '0'..='9' => {}
            '.' if !seen_dot => seen_dot = true,
            _ => return false,
        }
    }
    true
}

/// Remove thousands separators from formatted display text.
pub fn strip_grouping(display: &str) -> String {
    display.chars().filter(|c| *c != GROUP_SEPARATOR).collect()
}

// "12." -> "12", ".5" -> "0.5", "." -> None
fn normalize(body: &str) -> Option<String> {
    let trimmed = body.strip_suffix('.').unwrap_or(body);
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.starts_with('.') {
        Some(format!("0{trimmed}"))
    } else {
        Some(trimmed.to_string())
    }
}
