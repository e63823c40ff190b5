//! Controller configuration.

use std::path::PathBuf;
use std::time::Duration;

use swapdesk_common::{constants, millis, CurrencyCode};
use swapdesk_fx::FileSource;

use crate::error::{ControllerError, Result};

/// Main controller configuration.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// How long a valid quote stays in `Computing` before it settles.
    pub compute_delay: Duration,
    /// How long a validation message stays visible.
    pub error_ttl: Duration,
    /// Sell currency when none is restored.
    pub default_from: CurrencyCode,
    /// Buy currency when none is restored.
    pub default_to: CurrencyCode,
    /// JSON rate table replacing the builtin one.
    pub rates_file: Option<PathBuf>,
    /// JSON currency metadata replacing the builtin one.
    pub currencies_file: Option<PathBuf>,
    /// Emit logs as JSON.
    pub log_json: bool,
    /// Log level.
    pub log_level: String,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            compute_delay: constants::compute_delay(),
            error_ttl: constants::error_ttl(),
            default_from: CurrencyCode::Usd,
            default_to: CurrencyCode::Myr,
            rates_file: None,
            currencies_file: None,
            log_json: false,
            log_level: "info".to_string(),
        }
    }
}

impl ControllerConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(ms) = lookup("SWAPDESK_COMPUTE_DELAY_MS") {
            if let Ok(ms) = ms.parse() {
                config.compute_delay = millis(ms);
            }
        }

        if let Some(ms) = lookup("SWAPDESK_ERROR_TTL_MS") {
            if let Ok(ms) = ms.parse() {
                config.error_ttl = millis(ms);
            }
        }

        if let Some(code) = lookup("SWAPDESK_DEFAULT_FROM") {
            if let Ok(code) = code.parse() {
                config.default_from = code;
            }
        }

        if let Some(code) = lookup("SWAPDESK_DEFAULT_TO") {
            if let Ok(code) = code.parse() {
                config.default_to = code;
            }
        }

        if let Some(path) = lookup("SWAPDESK_RATES_FILE") {
            config.rates_file = Some(PathBuf::from(path));
        }

        if let Some(path) = lookup("SWAPDESK_CURRENCIES_FILE") {
            config.currencies_file = Some(PathBuf::from(path));
        }

        if lookup("SWAPDESK_LOG_JSON").is_some() {
            config.log_json = true;
        }

        if let Some(level) = lookup("LOG_LEVEL") {
            config.log_level = level;
        }

        config
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<()> {
        if self.default_from == self.default_to {
            return Err(ControllerError::Config(format!(
                "Default currencies must differ, both are {}",
                self.default_from
            )));
        }

        if self.error_ttl.is_zero() {
            return Err(ControllerError::Config(
                "Error message lifetime cannot be 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Where the static tables are loaded from.
    pub fn table_source(&self) -> FileSource {
        FileSource::new(self.rates_file.clone(), self.currencies_file.clone())
    }
}
