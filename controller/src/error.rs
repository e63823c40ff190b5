//! Controller error types.

use thiserror::Error;

/// Errors outside the reconciliation loop itself: configuration and
/// session files.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Session file could not be read or written.
    #[error("Session file error: {0}")]
    Io(#[from] std::io::Error),

    /// Session file is not a valid snapshot.
    #[error("Invalid session snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
}

/// Result type alias for controller operations.
pub type Result<T> = std::result::Result<T, ControllerError>;
