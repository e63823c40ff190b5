//! Table sources: where the static rate and metadata tables come from.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use crate::engine::ConversionEngine;
use crate::error::FxResult;
use crate::format::AmountFormatter;
use crate::table::{CurrencyMetaTable, RateTable};

/// Trait for loaders of the static tables.
pub trait TableSource: Send + Sync {
    /// Get the source name.
    fn name(&self) -> &str;

    /// Load the rate table.
    fn load_rates(&self) -> FxResult<RateTable>;

    /// Load the currency metadata table.
    fn load_metadata(&self) -> FxResult<CurrencyMetaTable>;
}

/// The tables compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinSource;

impl TableSource for BuiltinSource {
    fn name(&self) -> &str {
        "BUILTIN"
    }

    fn load_rates(&self) -> FxResult<RateTable> {
        Ok(RateTable::builtin())
    }

    fn load_metadata(&self) -> FxResult<CurrencyMetaTable> {
        Ok(CurrencyMetaTable::builtin())
    }
}

/// JSON files on disk; a table without a path falls back to the builtin one.
#[derive(Debug, Clone, Default)]
pub struct FileSource {
    rates_path: Option<PathBuf>,
    currencies_path: Option<PathBuf>,
}

impl FileSource {
    pub fn new(rates_path: Option<PathBuf>, currencies_path: Option<PathBuf>) -> Self {
        Self {
            rates_path,
            currencies_path,
        }
    }
}

impl TableSource for FileSource {
    fn name(&self) -> &str {
        "FILE"
    }

    fn load_rates(&self) -> FxResult<RateTable> {
        match &self.rates_path {
            Some(path) => {
                let json = std::fs::read_to_string(path)?;
                RateTable::from_json(&json)
            }
            None => BuiltinSource.load_rates(),
        }
    }

    fn load_metadata(&self) -> FxResult<CurrencyMetaTable> {
        match &self.currencies_path {
            Some(path) => {
                let json = std::fs::read_to_string(path)?;
                CurrencyMetaTable::from_json(&json)
            }
            None => BuiltinSource.load_metadata(),
        }
    }
}

/// Both static tables, loaded once and shared read-only.
#[derive(Debug, Clone)]
pub struct Tables {
    pub rates: Arc<RateTable>,
    pub metadata: Arc<CurrencyMetaTable>,
}

impl Tables {
    /// Load both tables from a source.
    pub fn load(source: &dyn TableSource) -> FxResult<Self> {
        let rates = source.load_rates()?;
        let metadata = source.load_metadata()?;

        info!(source = source.name(), "Loaded rate and currency tables");

        Ok(Self {
            rates: Arc::new(rates),
            metadata: Arc::new(metadata),
        })
    }

    /// The builtin tables.
    pub fn builtin() -> Self {
        Self {
            rates: Arc::new(RateTable::builtin()),
            metadata: Arc::new(CurrencyMetaTable::builtin()),
        }
    }

    /// Engine over these rates.
    pub fn engine(&self) -> ConversionEngine {
        ConversionEngine::new(self.rates.clone())
    }

    /// Formatter over this metadata.
    pub fn formatter(&self) -> AmountFormatter {
        AmountFormatter::new(self.metadata.clone())
    }
}
