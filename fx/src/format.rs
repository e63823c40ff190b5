//! Display formatting for amounts and rates.

use std::sync::Arc;

use rust_decimal::{Decimal, RoundingStrategy};
use swapdesk_common::{CurrencyCode, GROUP_SEPARATOR};

use crate::table::CurrencyMetaTable;

/// Renders amounts using per-currency display metadata.
#[derive(Debug, Clone)]
pub struct AmountFormatter {
    meta: Arc<CurrencyMetaTable>,
}

impl AmountFormatter {
    /// Create a new formatter over the given metadata.
    pub fn new(meta: Arc<CurrencyMetaTable>) -> Self {
        Self { meta }
    }

    /// Get the metadata table this formatter reads from.
    pub fn metadata(&self) -> &CurrencyMetaTable {
        &self.meta
    }

    /// Format an amount for display in `currency`.
    ///
    /// Zero is always `"0.00"`. Whole-unit currencies are shown without a
    /// fractional part; the rest scale precision with magnitude so tiny
    /// amounts do not collapse to zero.
    pub fn format(&self, amount: Decimal, currency: CurrencyCode) -> String {
        if amount.is_zero() {
            return "0.00".to_string();
        }

        if self.meta.decimals(currency) == Some(0) {
            return format_decimal(amount, 0, 0);
        }

        let (min, max) = if amount < Decimal::new(1, 2) {
            (2, 6)
        } else if amount < Decimal::ONE {
            (2, 4)
        } else {
            (2, 2)
        };
        format_decimal(amount, min, max)
    }

    /// Format a board quote (units per base).
    pub fn format_rate(&self, rate: Decimal) -> String {
        format_decimal(rate, 2, 6)
    }
}

/// Round half away from zero to `max_frac` digits, keep at least `min_frac`,
/// and group the integer part by thousands.
pub fn format_decimal(value: Decimal, min_frac: u32, max_frac: u32) -> String {
    let rounded = value.round_dp_with_strategy(max_frac, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let digits = rounded.abs().to_string();

    let (int_part, frac_part) = match digits.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (digits.as_str(), ""),
    };

    let mut frac = frac_part.trim_end_matches('0').to_string();
    while frac.len() < min_frac as usize {
        frac.push('0');
    }

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 2);
    if negative {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if !frac.is_empty() {
        out.push('.');
        out.push_str(&frac);
    }
    out
}

fn group_thousands(int_part: &str) -> String {
    let len = int_part.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(GROUP_SEPARATOR);
        }
        grouped.push(c);
    }
    grouped
}
