//! Conversion result types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use swapdesk_common::{CurrencyPair, Side};

/// Which leg a conversion was solved from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Sell amount known, buy amount derived.
    Forward,
    /// Buy amount known, sell amount derived.
    Reverse,
}

impl Direction {
    /// Direction implied by the field the user is editing.
    pub fn for_side(side: Side) -> Self {
        match side {
            Side::Input => Direction::Forward,
            Side::Output => Direction::Reverse,
        }
    }

    /// Side whose value is derived in this direction.
    pub fn derived_side(&self) -> Side {
        match self {
            Direction::Forward => Side::Output,
            Direction::Reverse => Side::Input,
        }
    }
}

/// Both legs of a quoted swap, with the fee and the rate used.
///
/// `fee` is always charged on the input leg, in the input currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionResult {
    pub pair: CurrencyPair,
    pub direction: Direction,
    /// Amount sold, in `pair.from`.
    pub input_amount: Decimal,
    /// Amount bought, in `pair.to`.
    pub output_amount: Decimal,
    pub fee: Decimal,
    /// Units of `pair.to` per unit of `pair.from`.
    pub rate: Decimal,
}

impl ConversionResult {
    /// The leg that was solved for.
    pub fn amount(&self) -> Decimal {
        match self.direction {
            Direction::Forward => self.output_amount,
            Direction::Reverse => self.input_amount,
        }
    }

    /// Input leg net of the fee.
    pub fn amount_after_fee(&self) -> Decimal {
        self.input_amount - self.fee
    }
}
