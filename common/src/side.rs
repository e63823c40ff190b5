//! Field selector for the two legs of a swap.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SideParseError;

/// Which of the two amount fields the user is editing.
///
/// The authoritative side keeps the raw typed text; the other side is
/// always derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// The sell field.
    #[default]
    Input,
    /// The buy field.
    Output,
}

impl Side {
    /// Get the other side.
    pub fn opposite(&self) -> Self {
        match self {
            Side::Input => Side::Output,
            Side::Output => Side::Input,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Input => "input",
            Side::Output => "output",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = SideParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "input" | "sell" => Ok(Side::Input),
            "output" | "buy" => Ok(Side::Output),
            _ => Err(SideParseError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_side() {
        assert_eq!("input".parse::<Side>().unwrap(), Side::Input);
        assert_eq!("Output".parse::<Side>().unwrap(), Side::Output);
        assert_eq!("buy".parse::<Side>().unwrap(), Side::Output);
        assert!("both".parse::<Side>().is_err());
    }

    #[test]
    fn test_opposite() {
        assert_eq!(Side::Input.opposite(), Side::Output);
        assert_eq!(Side::Output.opposite(), Side::Input);
        assert_eq!(Side::default(), Side::Input);
    }
}
