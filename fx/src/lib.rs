//! SwapDesk FX Engine
//!
//! Static rate tables, fee-inclusive conversion in both directions, and
//! display formatting.
//!
//! # Features
//!
//! - Rate and currency metadata tables validated against the full catalogue
//! - Forward (sell → buy) and reverse (buy → sell) quotes with a flat 1% fee
//! - Magnitude-scaled amount formatting with thousands grouping
//!
//! # Example
//!
//! ```rust,ignore
//! use swapdesk_fx::Tables;
//! use swapdesk_common::{Amount, CurrencyCode, CurrencyPair};
//!
//! let tables = Tables::builtin();
//! let pair = CurrencyPair::new(CurrencyCode::Usd, CurrencyCode::Myr);
//!
//! let quote = tables.engine().forward(Amount::parse("100")?, pair)?;
//! assert_eq!(tables.formatter().format(quote.output_amount, pair.to), "415.80");
//! ```

pub mod conversion;
pub mod engine;
pub mod error;
pub mod format;
pub mod provider;
pub mod table;

pub use conversion::{ConversionResult, Direction};
pub use engine::{ConversionEngine, FEE_RATE};
pub use error::{FxError, FxResult};
pub use format::{format_decimal, AmountFormatter};
pub use provider::{BuiltinSource, FileSource, TableSource, Tables};
pub use table::{CurrencyMeta, CurrencyMetaTable, RateEntry, RateTable};
