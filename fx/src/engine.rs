//! Conversion engine: fee-inclusive quotes in either direction.

use std::sync::Arc;

use rust_decimal::Decimal;
use swapdesk_common::{Amount, CurrencyPair, Side};
use tracing::{debug, instrument};

use crate::conversion::{ConversionResult, Direction};
use crate::error::{FxError, FxResult};
use crate::table::RateTable;

/// Flat fee charged on the input leg (1%).
pub const FEE_RATE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Quotes swaps against an injected rate table.
#[derive(Debug, Clone)]
pub struct ConversionEngine {
    rates: Arc<RateTable>,
}

impl ConversionEngine {
    /// Create a new engine over the given table.
    pub fn new(rates: Arc<RateTable>) -> Self {
        Self { rates }
    }

    /// Get the rate table this engine quotes from.
    pub fn rates(&self) -> &RateTable {
        &self.rates
    }

    /// Cross rate for a pair.
    ///
    /// # Panics
    ///
    /// Panics if the table has no entry for either leg. Tables are validated
    /// against the full currency catalogue when built, so this indicates a
    /// corrupted table rather than bad user input.
    pub fn rate(&self, pair: CurrencyPair) -> Decimal {
        match self.rates.rate(pair) {
            Ok(rate) => rate,
            Err(e) => panic!("rate table invariant violated for {pair}: {e}"),
        }
    }

    /// Buy amount for a typed sell amount.
    ///
    /// `fee = input × FEE_RATE`, `output = (input − fee) × rate`.
    pub fn forward(&self, input: Amount, pair: CurrencyPair) -> FxResult<ConversionResult> {
        let rate = self.rate(pair);
        let input_amount = input.value();

        let fee = input_amount
            .checked_mul(FEE_RATE)
            .ok_or(FxError::Overflow(pair))?;
        let amount_after_fee = input_amount - fee;
        let output_amount = amount_after_fee
            .checked_mul(rate)
            .ok_or(FxError::Overflow(pair))?;

        Ok(ConversionResult {
            pair,
            direction: Direction::Forward,
            input_amount,
            output_amount,
            fee,
            rate,
        })
    }

    /// Sell amount needed to receive a typed buy amount.
    ///
    /// Inverts [`forward`](Self::forward): the fee is still charged on the
    /// input leg, so `input = (output / rate) / (1 − FEE_RATE)`.
    pub fn reverse(&self, output: Amount, pair: CurrencyPair) -> FxResult<ConversionResult> {
        let rate = self.rate(pair);
        let output_amount = output.value();

        let amount_before_fee = output_amount
            .checked_div(rate)
            .ok_or(FxError::Overflow(pair))?;
        let input_amount = amount_before_fee
            .checked_div(Decimal::ONE - FEE_RATE)
            .ok_or(FxError::Overflow(pair))?;
        let fee = input_amount
            .checked_mul(FEE_RATE)
            .ok_or(FxError::Overflow(pair))?;

        Ok(ConversionResult {
            pair,
            direction: Direction::Reverse,
            input_amount,
            output_amount,
            fee,
            rate,
        })
    }

    /// Quote from whichever field is authoritative.
    #[instrument(level = "debug", skip(self), fields(pair = %pair))]
    pub fn quote(
        &self,
        side: Side,
        amount: Amount,
        pair: CurrencyPair,
    ) -> FxResult<ConversionResult> {
        let result = match Direction::for_side(side) {
            Direction::Forward => self.forward(amount, pair)?,
            Direction::Reverse => self.reverse(amount, pair)?,
        };

        debug!(
            input = %result.input_amount,
            output = %result.output_amount,
            fee = %result.fee,
            rate = %result.rate,
            "Quoted swap"
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::RateEntry;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;
    use swapdesk_common::CurrencyCode;

    fn setup_engine() -> ConversionEngine {
        ConversionEngine::new(Arc::new(RateTable::builtin()))
    }

    fn usd_myr() -> CurrencyPair {
        CurrencyPair::new(CurrencyCode::Usd, CurrencyCode::Myr)
    }

    fn amount(text: &str) -> Amount {
        Amount::parse(text).unwrap()
    }

    #[test]
    fn test_forward() {
        let engine = setup_engine();

        let result = engine.forward(amount("100"), usd_myr()).unwrap();

        assert_eq!(result.fee, dec!(1.00));
        assert_eq!(result.amount_after_fee(), dec!(99.00));
        assert_eq!(result.rate, dec!(4.2));
        assert_eq!(result.output_amount, dec!(415.80));
        assert_eq!(result.amount(), dec!(415.80));
    }

    #[test]
    fn test_reverse() {
        let engine = setup_engine();

        let result = engine.reverse(amount("415.80"), usd_myr()).unwrap();

        assert_eq!(result.input_amount, dec!(100));
        assert_eq!(result.fee, dec!(1));
        assert_eq!(result.rate, dec!(4.2));
        assert_eq!(result.amount(), dec!(100));
    }

    #[test]
    fn test_same_currency_only_charges_fee() {
        let engine = setup_engine();
        let pair = CurrencyPair::new(CurrencyCode::Eur, CurrencyCode::Eur);

        let result = engine.forward(amount("250"), pair).unwrap();

        assert_eq!(result.rate, Decimal::ONE);
        assert_eq!(result.output_amount, dec!(247.5));
    }

    #[test]
    fn test_quote_dispatches_on_side() {
        let engine = setup_engine();

        let fwd = engine.quote(Side::Input, amount("100"), usd_myr()).unwrap();
        let rev = engine.quote(Side::Output, amount("415.80"), usd_myr()).unwrap();

        assert_eq!(fwd.direction, Direction::Forward);
        assert_eq!(rev.direction, Direction::Reverse);
        assert_eq!(fwd.input_amount, rev.input_amount);
    }

    #[test]
    fn test_overflow_is_reported() {
        let rates = RateTable::new(
            RateTable::builtin()
                .board()
                .into_iter()
                .map(|e| match e.code {
                    CurrencyCode::Idr => RateEntry::new(e.code, dec!(1000000000000000000)),
                    _ => e,
                }),
        )
        .unwrap();
        let engine = ConversionEngine::new(Arc::new(rates));
        let pair = CurrencyPair::new(CurrencyCode::Usd, CurrencyCode::Idr);

        let result = engine.forward(amount("99999999999999999999"), pair);

        assert!(matches!(result, Err(FxError::Overflow(_))));
    }

    fn any_currency() -> impl Strategy<Value = CurrencyCode> {
        prop::sample::select(CurrencyCode::ALL.to_vec())
    }

    fn any_amount() -> impl Strategy<Value = Amount> {
        (1i64..1_000_000_000_000, 0u32..=6)
            .prop_map(|(n, scale)| Amount::new(Decimal::new(n, scale)).unwrap())
    }

    proptest! {
        #[test]
        fn prop_reverse_inverts_forward(x in any_amount(), from in any_currency(), to in any_currency()) {
            let engine = setup_engine();
            let pair = CurrencyPair::new(from, to);

            let fwd = engine.forward(x, pair).unwrap();
            let out = Amount::new(fwd.output_amount).unwrap();
            let rev = engine.reverse(out, pair).unwrap();

            let tolerance = x.value() * Decimal::new(1, 12) + Decimal::new(1, 12);
            prop_assert!((rev.input_amount - x.value()).abs() <= tolerance);
        }

        #[test]
        fn prop_fee_is_one_percent_of_input_leg(x in any_amount(), from in any_currency(), to in any_currency()) {
            let engine = setup_engine();
            let pair = CurrencyPair::new(from, to);

            let fwd = engine.forward(x, pair).unwrap();
            prop_assert_eq!(fwd.fee, fwd.input_amount * FEE_RATE);

            let rev = engine.reverse(x, pair).unwrap();
            prop_assert_eq!(rev.fee, rev.input_amount * FEE_RATE);
            prop_assert!(rev.fee >= Decimal::ZERO);
        }

        #[test]
        fn prop_identity_pair(x in any_amount(), code in any_currency()) {
            let engine = setup_engine();
            let pair = CurrencyPair::new(code, code);

            let fwd = engine.forward(x, pair).unwrap();
            prop_assert_eq!(fwd.rate, Decimal::ONE);
            prop_assert_eq!(fwd.output_amount, x.value() * dec!(0.99));
        }
    }
}
