//! Stateful reconciliation controller.
//!
//! Every trigger bumps a generation counter. Idle and invalid input commit
//! immediately; valid input moves to `Computing` and hands back a
//! [`PendingQuote`] that may only commit while its generation is current,
//! so a superseded quote can never reach the display.

use std::sync::Arc;

use rust_decimal::Decimal;
use swapdesk_common::{strip_grouping, CurrencyCode, Side};
use tracing::{debug, info, instrument};

use crate::persist::SessionSink;
use crate::reconcile::{DerivedDisplay, Reconciler, Reconciliation};
use crate::session::SwapSession;
use crate::state::SwapPhase;

/// Token for a quote held back by the presentation delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingQuote {
    generation: u64,
}

impl PendingQuote {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Outcome of a trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The display already reflects the trigger.
    Committed { phase: SwapPhase, generation: u64 },
    /// A quote must be settled with [`SwapController::settle`].
    Pending(PendingQuote),
}

impl Transition {
    pub fn generation(&self) -> u64 {
        match self {
            Transition::Committed { generation, .. } => *generation,
            Transition::Pending(pending) => pending.generation,
        }
    }
}

/// Everything the presentation layer reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapView {
    pub input_currency: CurrencyCode,
    pub output_currency: CurrencyCode,
    pub active_field: Side,
    pub phase: SwapPhase,
    pub display: DerivedDisplay,
}

impl SwapView {
    pub fn is_computing(&self) -> bool {
        self.phase.is_computing()
    }
}

/// Owns the swap session and the display derived from it.
pub struct SwapController {
    session: SwapSession,
    reconciler: Reconciler,
    sink: Arc<dyn SessionSink>,
    display: DerivedDisplay,
    phase: SwapPhase,
    generation: u64,
    /// Generation of the initial render. Nothing is persisted before
    /// `start`, nor for the initial render itself.
    first_render: Option<u64>,
}

impl SwapController {
    /// Create a controller. Call [`start`](Self::start) to render the
    /// initial session.
    pub fn new(session: SwapSession, reconciler: Reconciler, sink: Arc<dyn SessionSink>) -> Self {
        Self {
            session,
            reconciler,
            sink,
            display: DerivedDisplay::default(),
            phase: SwapPhase::Idle,
            generation: 0,
            first_render: None,
        }
    }

    /// Render the (possibly restored) session for the first time.
    #[instrument(skip(self), fields(session_id = %self.session.id))]
    pub fn start(&mut self) -> Transition {
        info!(
            pair = %self.session.pair(),
            field = %self.session.active_field,
            "Starting swap session"
        );
        let transition = self.trigger();
        self.first_render = Some(transition.generation());
        transition
    }

    /// Change the sell currency.
    #[instrument(skip(self), fields(session_id = %self.session.id))]
    pub fn set_input_currency(&mut self, code: CurrencyCode) -> Transition {
        self.session.input_currency = code;
        self.trigger()
    }

    /// Change the buy currency.
    #[instrument(skip(self), fields(session_id = %self.session.id))]
    pub fn set_output_currency(&mut self, code: CurrencyCode) -> Transition {
        self.session.output_currency = code;
        self.trigger()
    }

    /// User typed into the sell field.
    #[instrument(skip(self), fields(session_id = %self.session.id))]
    pub fn type_input(&mut self, text: &str) -> Transition {
        self.type_into(Side::Input, text)
    }

    /// User typed into the buy field.
    #[instrument(skip(self), fields(session_id = %self.session.id))]
    pub fn type_output(&mut self, text: &str) -> Transition {
        self.type_into(Side::Output, text)
    }

    /// Swap the two currencies, carrying the current buy amount over as the
    /// new sell amount. Without a settled quote there is nothing to carry
    /// and the new sell field starts empty.
    #[instrument(skip(self), fields(session_id = %self.session.id))]
    pub fn flip_direction(&mut self) -> Transition {
        let current = self.reconciler.reconcile(&self.session);
        let seed = if current.phase.has_quote() {
            strip_grouping(&current.display.output_value)
        } else {
            String::new()
        };

        let flipped = self.session.pair().inverse();
        self.session.input_currency = flipped.from;
        self.session.output_currency = flipped.to;
        self.session.active_field = Side::Input;
        self.session.typed_value = seed;

        info!(
            pair = %self.session.pair(),
            seed = %self.session.typed_value,
            "Flipped swap direction"
        );

        self.trigger()
    }

    /// Commit a pending quote if nothing has superseded it.
    ///
    /// Returns `false` when the quote is stale; the display is untouched.
    pub fn settle(&mut self, pending: PendingQuote) -> bool {
        if pending.generation != self.generation {
            debug!(
                stale = pending.generation,
                current = self.generation,
                "Discarding superseded quote"
            );
            return false;
        }

        let reconciliation = self.reconciler.reconcile(&self.session);
        self.commit(reconciliation);
        true
    }

    /// Clear the validation message raised by `generation`, if it is still
    /// the latest trigger.
    pub fn expire_error(&mut self, generation: u64) -> bool {
        if generation != self.generation || self.display.error.is_none() {
            return false;
        }
        self.display.error = None;
        true
    }

    pub fn session(&self) -> &SwapSession {
        &self.session
    }

    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    pub fn phase(&self) -> SwapPhase {
        self.phase
    }

    pub fn is_computing(&self) -> bool {
        self.phase.is_computing()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn display(&self) -> &DerivedDisplay {
        &self.display
    }

    pub fn input_value(&self) -> &str {
        &self.display.input_value
    }

    pub fn output_value(&self) -> &str {
        &self.display.output_value
    }

    pub fn fee(&self) -> Option<Decimal> {
        self.display.fee
    }

    pub fn rate(&self) -> Option<Decimal> {
        self.display.rate
    }

    pub fn error(&self) -> Option<String> {
        self.display.error_message()
    }

    /// Snapshot of everything the presentation layer shows.
    pub fn view(&self) -> SwapView {
        SwapView {
            input_currency: self.session.input_currency,
            output_currency: self.session.output_currency,
            active_field: self.session.active_field,
            phase: self.phase,
            display: self.display.clone(),
        }
    }

    fn type_into(&mut self, side: Side, text: &str) -> Transition {
        self.session.typed_value = text.to_string();
        self.session.active_field = side;
        self.trigger()
    }

    fn trigger(&mut self) -> Transition {
        self.generation += 1;
        let reconciliation = self.reconciler.reconcile(&self.session);

        if reconciliation.phase != SwapPhase::Settled {
            let phase = reconciliation.phase;
            self.commit(reconciliation);
            return Transition::Committed {
                phase,
                generation: self.generation,
            };
        }

        // The edited field echoes the typed text at once; the derived field
        // keeps its last committed value until the quote settles.
        let side = self.session.active_field;
        self.display.set_value(side, self.session.typed_value.clone());
        self.display.error = None;
        self.phase = SwapPhase::Computing;

        Transition::Pending(PendingQuote {
            generation: self.generation,
        })
    }

    fn commit(&mut self, reconciliation: Reconciliation) {
        self.display = reconciliation.display;
        self.phase = reconciliation.phase;

        if self.first_render.is_none() || self.first_render == Some(self.generation) {
            debug!("Skipping persist for initial render");
            return;
        }
        self.sink.persist(&self.session.snapshot());
    }
}
