//! SwapDesk Controller
//!
//! Keeps the sell and buy fields of a currency swap consistent. The user
//! types into one field; the other is derived through the FX engine after a
//! short presentation delay, and stale quotes are discarded by generation.

pub mod cli;
pub mod config;
pub mod controller;
pub mod driver;
pub mod error;
pub mod persist;
pub mod reconcile;
pub mod session;
pub mod state;

pub use config::ControllerConfig;
pub use controller::{PendingQuote, SwapController, SwapView, Transition};
pub use driver::LiveController;
pub use error::{ControllerError, Result};
pub use persist::{FileSink, MemorySink, NoopSink, SessionSink};
pub use reconcile::{DerivedDisplay, Reconciler, Reconciliation};
pub use session::{SessionId, SessionParams, SessionSnapshot, SwapSession};
pub use state::SwapPhase;
