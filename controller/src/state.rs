//! Reconciliation phase definitions.

use serde::{Deserialize, Serialize};

/// Where the controller is in reconciling the two fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SwapPhase {
    /// No typed value; both fields empty.
    #[default]
    Idle,
    /// A quote is pending behind the presentation delay.
    Computing,
    /// Both fields reflect the latest typed value and currency pair.
    Settled,
    /// The typed value failed validation.
    Invalid,
}

impl SwapPhase {
    /// Check if a quote is in flight.
    pub fn is_computing(&self) -> bool {
        matches!(self, SwapPhase::Computing)
    }

    /// Check if the displayed fields are final for the current input.
    pub fn is_committed(&self) -> bool {
        !self.is_computing()
    }

    /// Check if a fee and rate are on display.
    pub fn has_quote(&self) -> bool {
        matches!(self, SwapPhase::Settled)
    }
}
