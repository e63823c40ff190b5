//! SwapDesk Common Types
//!
//! This crate contains shared types used across SwapDesk, including the
//! currency catalogue, field selectors, amount validation and error codes.

pub mod amount;
pub mod error;
pub mod monetary;
pub mod side;
pub mod time;

pub use amount::*;
pub use error::*;
pub use monetary::*;
pub use side::*;
pub use time::*;
