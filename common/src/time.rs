//! Time utilities and constants for SwapDesk sessions.

use chrono::{DateTime, Utc};

/// UX timing constants.
pub mod constants {
    use std::time::Duration;

    /// Visible "calculating" delay before a quote settles (300 milliseconds).
    pub fn compute_delay() -> Duration {
        Duration::from_millis(300)
    }

    /// Lifetime of a validation message (3 seconds).
    pub fn error_ttl() -> Duration {
        Duration::from_secs(3)
    }
}

/// A timestamp with timezone (always UTC for SwapDesk).
pub type Timestamp = DateTime<Utc>;

/// Get the current timestamp.
pub fn now() -> Timestamp {
    Utc::now()
}

/// Convert a millisecond count read from configuration.
pub fn millis(ms: u64) -> std::time::Duration {
    std::time::Duration::from_millis(ms)
}
