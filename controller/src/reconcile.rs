//! Pure reconciliation: session in, display out.
//!
//! Given the same session and tables this always produces the same result,
//! so the controller can recompute freely instead of caching derived values.

use rust_decimal::Decimal;
use swapdesk_common::{validate, Side, ValidationError};
use swapdesk_fx::{AmountFormatter, ConversionEngine, ConversionResult, Tables};
use tracing::debug;

use crate::session::SwapSession;
use crate::state::SwapPhase;

/// What the two fields and the quote details show.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DerivedDisplay {
    pub input_value: String,
    pub output_value: String,
    /// Fee in the input currency.
    pub fee: Option<Decimal>,
    pub rate: Option<Decimal>,
    pub error: Option<ValidationError>,
}

impl DerivedDisplay {
    /// Text of one field.
    pub fn value(&self, side: Side) -> &str {
        match side {
            Side::Input => &self.input_value,
            Side::Output => &self.output_value,
        }
    }

    pub(crate) fn set_value(&mut self, side: Side, text: String) {
        match side {
            Side::Input => self.input_value = text,
            Side::Output => self.output_value = text,
        }
    }

    /// User-facing validation message, if any.
    pub fn error_message(&self) -> Option<String> {
        self.error.map(|e| e.message())
    }
}

/// Result of reconciling one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    /// `Idle`, `Invalid` or `Settled`; never `Computing`.
    pub phase: SwapPhase,
    pub display: DerivedDisplay,
    pub quote: Option<ConversionResult>,
}

/// Derives display state from a session using injected tables.
#[derive(Debug, Clone)]
pub struct Reconciler {
    engine: ConversionEngine,
    formatter: AmountFormatter,
}

impl Reconciler {
    pub fn new(tables: &Tables) -> Self {
        Self::with_parts(tables.engine(), tables.formatter())
    }

    pub fn with_parts(engine: ConversionEngine, formatter: AmountFormatter) -> Self {
        Self { engine, formatter }
    }

    pub fn engine(&self) -> &ConversionEngine {
        &self.engine
    }

    pub fn formatter(&self) -> &AmountFormatter {
        &self.formatter
    }

    /// Reconcile the session's typed value against its currency pair.
    pub fn reconcile(&self, session: &SwapSession) -> Reconciliation {
        let side = session.active_field;
        let typed = &session.typed_value;

        if typed.is_empty() {
            return Reconciliation {
                phase: SwapPhase::Idle,
                display: DerivedDisplay::default(),
                quote: None,
            };
        }

        let quote = validate(typed).and_then(|amount| {
            self.engine
                .quote(side, amount, session.pair())
                .map_err(|e| {
                    debug!(error = %e, "Quote out of range");
                    ValidationError::InvalidFormat
                })
        });

        let mut display = DerivedDisplay::default();
        display.set_value(side, typed.clone());

        match quote {
            Ok(quote) => {
                let derived = quote.direction.derived_side();
                display.set_value(
                    derived,
                    self.formatter
                        .format(quote.amount(), session.currency(derived)),
                );
                display.fee = Some(quote.fee);
                display.rate = Some(quote.rate);

                Reconciliation {
                    phase: SwapPhase::Settled,
                    display,
                    quote: Some(quote),
                }
            }
            Err(e) => {
                display.error = Some(e);
                Reconciliation {
                    phase: SwapPhase::Invalid,
                    display,
                    quote: None,
                }
            }
        }
    }
}
