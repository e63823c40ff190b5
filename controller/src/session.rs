//! Swap session state, restore parameters and persisted snapshots.

use std::fmt;

use serde::{Deserialize, Serialize};
use swapdesk_common::{is_amount_text, now, CurrencyCode, CurrencyPair, Side, Timestamp};
use tracing::warn;
use uuid::Uuid;

/// Unique identifier for a swap session.
/// Uses UUID v7 for time-ordered identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Create a new session ID.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The mutable swap session. Owned by exactly one controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapSession {
    pub id: SessionId,
    /// Currency being sold.
    pub input_currency: CurrencyCode,
    /// Currency being bought.
    pub output_currency: CurrencyCode,
    /// Raw text of the authoritative field.
    pub typed_value: String,
    /// Field the user is editing.
    pub active_field: Side,
}

impl SwapSession {
    /// Start an empty session for a currency pair.
    pub fn new(input_currency: CurrencyCode, output_currency: CurrencyCode) -> Self {
        Self {
            id: SessionId::new(),
            input_currency,
            output_currency,
            typed_value: String::new(),
            active_field: Side::Input,
        }
    }

    /// Start a session from optional restore parameters.
    ///
    /// Each parameter is validated on its own; anything missing or invalid
    /// falls back to its default.
    pub fn restore(
        params: &SessionParams,
        default_input: CurrencyCode,
        default_output: CurrencyCode,
    ) -> Self {
        let input_currency = restore_currency(params.from.as_deref(), "from", default_input);
        let output_currency = restore_currency(params.to.as_deref(), "to", default_output);

        let typed_value = match params.amount.as_deref() {
            Some(amount) if is_amount_text(amount) => amount.to_string(),
            Some(amount) => {
                warn!(amount = %amount, "Ignoring malformed restored amount");
                String::new()
            }
            None => String::new(),
        };

        let active_field = match params.field.as_deref() {
            Some(field) => field.parse().unwrap_or_else(|e| {
                warn!(error = %e, "Ignoring restored field");
                Side::Input
            }),
            None => Side::Input,
        };

        Self {
            id: SessionId::new(),
            input_currency,
            output_currency,
            typed_value,
            active_field,
        }
    }

    /// The directed pair being quoted.
    pub fn pair(&self) -> CurrencyPair {
        CurrencyPair::new(self.input_currency, self.output_currency)
    }

    /// Currency of the given field.
    pub fn currency(&self, side: Side) -> CurrencyCode {
        match side {
            Side::Input => self.input_currency,
            Side::Output => self.output_currency,
        }
    }

    /// Record for an external collaborator to mirror.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.id,
            from: self.input_currency,
            to: self.output_currency,
            amount: self.typed_value.clone(),
            field: self.active_field,
            saved_at: now(),
        }
    }
}

fn restore_currency(raw: Option<&str>, name: &str, default: CurrencyCode) -> CurrencyCode {
    match raw {
        Some(raw) => raw.parse().unwrap_or_else(|e| {
            warn!(param = name, error = %e, "Ignoring restored currency");
            default
        }),
        None => default,
    }
}

/// Optional session-restore input. Every field is untrusted text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionParams {
    pub from: Option<String>,
    pub to: Option<String>,
    pub amount: Option<String>,
    pub field: Option<String>,
}

impl SessionParams {
    /// Collect parameters from key/value pairs; unknown keys are ignored and
    /// later keys win.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "from" => &mut params.from,
                "to" => &mut params.to,
                "amount" => &mut params.amount,
                "field" => &mut params.field,
                _ => continue,
            };
            *slot = Some(value.into());
        }
        params
    }

    /// Parse `from=USD&to=MYR&amount=100&field=input`.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self::from_pairs(
            query
                .split('&')
                .filter(|kv| !kv.is_empty())
                .map(|kv| kv.split_once('=').unwrap_or((kv, ""))),
        )
    }

    /// Fill any unset parameter from `other`.
    pub fn or(self, other: SessionParams) -> Self {
        Self {
            from: self.from.or(other.from),
            to: self.to.or(other.to),
            amount: self.amount.or(other.amount),
            field: self.field.or(other.field),
        }
    }
}

impl From<SessionSnapshot> for SessionParams {
    fn from(snapshot: SessionSnapshot) -> Self {
        Self {
            from: Some(snapshot.from.to_string()),
            to: Some(snapshot.to.to_string()),
            amount: Some(snapshot.amount),
            field: Some(snapshot.field.to_string()),
        }
    }
}

/// Session-persist output record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: SessionId,
    pub from: CurrencyCode,
    pub to: CurrencyCode,
    pub amount: String,
    pub field: Side,
    pub saved_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restore_defaults() {
        let session = SwapSession::restore(
            &SessionParams::default(),
            CurrencyCode::Usd,
            CurrencyCode::Myr,
        );

        assert_eq!(session.input_currency, CurrencyCode::Usd);
        assert_eq!(session.output_currency, CurrencyCode::Myr);
        assert_eq!(session.typed_value, "");
        assert_eq!(session.active_field, Side::Input);
    }

    #[test]
    fn test_restore_valid_params() {
        let params = SessionParams::from_query("?from=eur&to=GBP&amount=12.5&field=output");
        let session = SwapSession::restore(&params, CurrencyCode::Usd, CurrencyCode::Myr);

        assert_eq!(session.input_currency, CurrencyCode::Eur);
        assert_eq!(session.output_currency, CurrencyCode::Gbp);
        assert_eq!(session.typed_value, "12.5");
        assert_eq!(session.active_field, Side::Output);
    }

    #[test]
    fn test_restore_invalid_params_fall_back_independently() {
        let params = SessionParams::from_pairs([
            ("from", "XYZ"),
            ("to", "AUD"),
            ("amount", "12abc"),
            ("field", "sideways"),
        ]);
        let session = SwapSession::restore(&params, CurrencyCode::Usd, CurrencyCode::Myr);

        assert_eq!(session.input_currency, CurrencyCode::Usd);
        assert_eq!(session.output_currency, CurrencyCode::Aud);
        assert_eq!(session.typed_value, "");
        assert_eq!(session.active_field, Side::Input);
    }

    #[test]
    fn test_restore_keeps_partial_amount() {
        let params = SessionParams::from_pairs([("amount", "12.")]);
        let session = SwapSession::restore(&params, CurrencyCode::Usd, CurrencyCode::Myr);
        assert_eq!(session.typed_value, "12.");
    }

    #[test]
    fn test_from_query_ignores_unknown_keys() {
        let params = SessionParams::from_query("utm=x&from=USD&&amount");
        assert_eq!(params.from.as_deref(), Some("USD"));
        assert_eq!(params.amount.as_deref(), Some(""));
        assert_eq!(params.to, None);
    }

    #[test]
    fn test_params_or() {
        let cli = SessionParams::from_pairs([("amount", "5")]);
        let file = SessionParams::from_pairs([("amount", "7"), ("from", "EUR")]);

        let merged = cli.or(file);
        assert_eq!(merged.amount.as_deref(), Some("5"));
        assert_eq!(merged.from.as_deref(), Some("EUR"));
    }

    #[test]
    fn test_snapshot_round_trip_through_params() {
        let mut session = SwapSession::new(CurrencyCode::Myr, CurrencyCode::Usd);
        session.typed_value = "415.80".to_string();
        session.active_field = Side::Output;

        let json = serde_json::to_string(&session.snapshot()).unwrap();
        let snapshot: SessionSnapshot = serde_json::from_str(&json).unwrap();
        let restored = SwapSession::restore(
            &SessionParams::from(snapshot),
            CurrencyCode::Usd,
            CurrencyCode::Eur,
        );

        assert_eq!(restored.pair(), session.pair());
        assert_eq!(restored.typed_value, "415.80");
        assert_eq!(restored.active_field, Side::Output);
    }
}
