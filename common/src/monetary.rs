//! Currency types for SwapDesk.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CurrencyParseError;

/// Supported currency codes.
///
/// The set is closed: every rate and metadata table must carry exactly one
/// entry per variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CurrencyCode {
    Usd,
    Hkd,
    Aud,
    Myr,
    Gbp,
    Eur,
    Idr,
    Nzd,
    Cny,
    Czk,
    Aed,
}

impl CurrencyCode {
    /// Every supported currency, in catalogue order.
    pub const ALL: [CurrencyCode; 11] = [
        CurrencyCode::Usd,
        CurrencyCode::Hkd,
        CurrencyCode::Aud,
        CurrencyCode::Myr,
        CurrencyCode::Gbp,
        CurrencyCode::Eur,
        CurrencyCode::Idr,
        CurrencyCode::Nzd,
        CurrencyCode::Cny,
        CurrencyCode::Czk,
        CurrencyCode::Aed,
    ];

    /// Get the ISO 4217 code.
    pub fn code(&self) -> &'static str {
        match self {
            CurrencyCode::Usd => "USD",
            CurrencyCode::Hkd => "HKD",
            CurrencyCode::Aud => "AUD",
            CurrencyCode::Myr => "MYR",
            CurrencyCode::Gbp => "GBP",
            CurrencyCode::Eur => "EUR",
            CurrencyCode::Idr => "IDR",
            CurrencyCode::Nzd => "NZD",
            CurrencyCode::Cny => "CNY",
            CurrencyCode::Czk => "CZK",
            CurrencyCode::Aed => "AED",
        }
    }

    /// Get the English display name.
    pub fn name(&self) -> &'static str {
        match self {
            CurrencyCode::Usd => "US Dollar",
            CurrencyCode::Hkd => "Hong Kong Dollar",
            CurrencyCode::Aud => "Australian Dollar",
            CurrencyCode::Myr => "Malaysian Ringgit",
            CurrencyCode::Gbp => "British Pound",
            CurrencyCode::Eur => "Euro",
            CurrencyCode::Idr => "Indonesian Rupiah",
            CurrencyCode::Nzd => "New Zealand Dollar",
            CurrencyCode::Cny => "Chinese Yuan",
            CurrencyCode::Czk => "Czech Koruna",
            CurrencyCode::Aed => "UAE Dirham",
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for CurrencyCode {
    type Err = CurrencyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        CurrencyCode::ALL
            .into_iter()
            .find(|code| code.code() == wanted)
            .ok_or_else(|| CurrencyParseError(s.to_string()))
    }
}

/// A directed currency pair: the sold currency and the bought currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrencyPair {
    /// Currency the user sells (input leg).
    pub from: CurrencyCode,
    /// Currency the user buys (output leg).
    pub to: CurrencyCode,
}

impl CurrencyPair {
    /// Create a new currency pair.
    pub fn new(from: CurrencyCode, to: CurrencyCode) -> Self {
        Self { from, to }
    }

    /// Get the inverse pair.
    pub fn inverse(&self) -> Self {
        Self {
            from: self.to,
            to: self.from,
        }
    }

    /// Whether both legs name the same currency.
    pub fn is_degenerate(&self) -> bool {
        self.from == self.to
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.from, self.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_currency_code() {
        assert_eq!("USD".parse::<CurrencyCode>().unwrap(), CurrencyCode::Usd);
        assert_eq!(" myr ".parse::<CurrencyCode>().unwrap(), CurrencyCode::Myr);
        assert!("XYZ".parse::<CurrencyCode>().is_err());
        assert!("".parse::<CurrencyCode>().is_err());
    }

    #[test]
    fn test_catalogue_round_trips_through_display() {
        for code in CurrencyCode::ALL {
            assert_eq!(code.to_string().parse::<CurrencyCode>().unwrap(), code);
        }
    }

    #[test]
    fn test_serde_uses_iso_code() {
        let json = serde_json::to_string(&CurrencyCode::Idr).unwrap();
        assert_eq!(json, "\"IDR\"");

        let code: CurrencyCode = serde_json::from_str("\"AED\"").unwrap();
        assert_eq!(code, CurrencyCode::Aed);
    }

    #[test]
    fn test_pair_inverse() {
        let pair = CurrencyPair::new(CurrencyCode::Usd, CurrencyCode::Myr);
        assert_eq!(pair.inverse(), CurrencyPair::new(CurrencyCode::Myr, CurrencyCode::Usd));
        assert_eq!(pair.to_string(), "USD/MYR");
        assert!(!pair.is_degenerate());
        assert!(CurrencyPair::new(CurrencyCode::Eur, CurrencyCode::Eur).is_degenerate());
    }
}
