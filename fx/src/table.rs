//! Static rate and currency metadata tables.
//!
//! Both tables are built once, validated for completeness against the closed
//! [`CurrencyCode`] catalogue, and then only read. Replacing a table means
//! building a new one.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use swapdesk_common::{CurrencyCode, CurrencyPair};

use crate::error::{FxError, FxResult};

/// Units of `code` per one base unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateEntry {
    pub code: CurrencyCode,
    pub per_base: Decimal,
}

impl RateEntry {
    pub fn new(code: CurrencyCode, per_base: Decimal) -> Self {
        Self { code, per_base }
    }
}

/// Currency quotes against a common base unit.
#[derive(Debug, Clone)]
pub struct RateTable {
    per_base: HashMap<CurrencyCode, Decimal>,
}

impl RateTable {
    /// Build a table, requiring exactly one positive entry per currency.
    pub fn new(entries: impl IntoIterator<Item = RateEntry>) -> FxResult<Self> {
        let mut per_base = HashMap::new();

        for entry in entries {
            if entry.per_base <= Decimal::ZERO {
                return Err(FxError::NonPositiveRate {
                    code: entry.code,
                    rate: entry.per_base,
                });
            }
            if per_base.insert(entry.code, entry.per_base).is_some() {
                return Err(FxError::DuplicateEntry(entry.code));
            }
        }

        if let Some(missing) = CurrencyCode::ALL
            .into_iter()
            .find(|code| !per_base.contains_key(code))
        {
            return Err(FxError::RateNotAvailable(missing));
        }

        Ok(Self { per_base })
    }

    /// The bundled quotes, in units per US dollar.
    pub fn builtin() -> Self {
        let per_base = [
            (CurrencyCode::Usd, Decimal::new(1, 0)),
            (CurrencyCode::Hkd, Decimal::new(78, 1)),
            (CurrencyCode::Aud, Decimal::new(152, 2)),
            (CurrencyCode::Myr, Decimal::new(42, 1)),
            (CurrencyCode::Gbp, Decimal::new(79, 2)),
            (CurrencyCode::Eur, Decimal::new(92, 2)),
            (CurrencyCode::Idr, Decimal::new(15650, 0)),
            (CurrencyCode::Nzd, Decimal::new(164, 2)),
            (CurrencyCode::Cny, Decimal::new(724, 2)),
            (CurrencyCode::Czk, Decimal::new(231, 1)),
            (CurrencyCode::Aed, Decimal::new(36725, 4)),
        ]
        .into_iter()
        .collect();

        Self { per_base }
    }

    /// Parse a JSON object of `{ "USD": "1", "MYR": "4.2", ... }`.
    pub fn from_json(json: &str) -> FxResult<Self> {
        let raw: HashMap<String, Decimal> = serde_json::from_str(json)?;
        let mut entries = Vec::with_capacity(raw.len());
        for (code, per_base) in raw {
            let code = code
                .parse::<CurrencyCode>()
                .map_err(|e| FxError::InvalidTable(e.to_string()))?;
            entries.push(RateEntry::new(code, per_base));
        }
        Self::new(entries)
    }

    /// Get the quote for one currency.
    pub fn per_base(&self, code: CurrencyCode) -> FxResult<Decimal> {
        self.per_base
            .get(&code)
            .copied()
            .ok_or(FxError::RateNotAvailable(code))
    }

    /// Cross rate for a pair: units of `to` received per unit of `from`.
    ///
    /// Identical legs always yield exactly one.
    pub fn rate(&self, pair: CurrencyPair) -> FxResult<Decimal> {
        if pair.is_degenerate() {
            return Ok(Decimal::ONE);
        }
        let from = self.per_base(pair.from)?;
        let to = self.per_base(pair.to)?;
        to.checked_div(from).ok_or(FxError::Overflow(pair))
    }

    /// All entries in catalogue order.
    pub fn board(&self) -> Vec<RateEntry> {
        CurrencyCode::ALL
            .into_iter()
            .filter_map(|code| {
                self.per_base
                    .get(&code)
                    .map(|per_base| RateEntry::new(code, *per_base))
            })
            .collect()
    }
}

/// Display metadata for one currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyMeta {
    pub code: CurrencyCode,
    pub name: String,
    /// Fractional digits shown for this currency; zero means whole units.
    pub decimals: u32,
}

impl CurrencyMeta {
    pub fn new(code: CurrencyCode, decimals: u32) -> Self {
        Self {
            code,
            name: code.name().to_string(),
            decimals,
        }
    }
}

/// Display metadata for every supported currency.
#[derive(Debug, Clone)]
pub struct CurrencyMetaTable {
    meta: HashMap<CurrencyCode, CurrencyMeta>,
}

impl CurrencyMetaTable {
    /// Build a table, requiring exactly one entry per currency.
    pub fn new(entries: impl IntoIterator<Item = CurrencyMeta>) -> FxResult<Self> {
        let mut meta = HashMap::new();

        for entry in entries {
            let code = entry.code;
            if meta.insert(code, entry).is_some() {
                return Err(FxError::DuplicateEntry(code));
            }
        }

        if let Some(missing) = CurrencyCode::ALL
            .into_iter()
            .find(|code| !meta.contains_key(code))
        {
            return Err(FxError::MissingMetadata(missing));
        }

        Ok(Self { meta })
    }

    /// Two display decimals everywhere except the rupiah, which carries six.
    pub fn builtin() -> Self {
        let meta = CurrencyCode::ALL
            .into_iter()
            .map(|code| {
                let decimals = match code {
                    CurrencyCode::Idr => 6,
                    _ => 2,
                };
                (code, CurrencyMeta::new(code, decimals))
            })
            .collect();

        Self { meta }
    }

    /// Parse a JSON array of `{ "code": "USD", "name": "...", "decimals": 2 }`.
    pub fn from_json(json: &str) -> FxResult<Self> {
        let entries: Vec<CurrencyMeta> = serde_json::from_str(json)?;
        Self::new(entries)
    }

    pub fn get(&self, code: CurrencyCode) -> FxResult<&CurrencyMeta> {
        self.meta.get(&code).ok_or(FxError::MissingMetadata(code))
    }

    /// Display decimals, if the currency is known.
    pub fn decimals(&self, code: CurrencyCode) -> Option<u32> {
        self.meta.get(&code).map(|m| m.decimals)
    }

    /// All entries in catalogue order.
    pub fn all(&self) -> Vec<&CurrencyMeta> {
        CurrencyCode::ALL
            .iter()
            .filter_map(|code| self.meta.get(code))
            .collect()
    }
}
