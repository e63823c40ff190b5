//! Terminal front-end: command parsing and rendering.

use std::fmt::Write as _;

use swapdesk_common::{CurrencyCode, Side};
use swapdesk_fx::{AmountFormatter, CurrencyMetaTable, RateTable};
use thiserror::Error;

use crate::controller::SwapView;
use crate::driver::LiveController;

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Type into the sell field. The text is passed through verbatim.
    Sell(String),
    /// Type into the buy field.
    Buy(String),
    From(CurrencyCode),
    To(CurrencyCode),
    Flip,
    Rates,
    Currencies,
    Show,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command: {0} (try `help`)")]
    Unknown(String),

    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),

    #[error(transparent)]
    Currency(#[from] swapdesk_common::CurrencyParseError),
}

impl Command {
    /// Parse a line. An empty line is `Show`.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim_start();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line.trim_end(), ""),
        };

        match verb.to_ascii_lowercase().as_str() {
            "" | "show" => Ok(Command::Show),
            "sell" => Ok(Command::Sell(rest.to_string())),
            "buy" => Ok(Command::Buy(rest.to_string())),
            "from" => Ok(Command::From(parse_code(rest, "from")?)),
            "to" => Ok(Command::To(parse_code(rest, "to")?)),
            "flip" | "swap" => Ok(Command::Flip),
            "rates" => Ok(Command::Rates),
            "currencies" => Ok(Command::Currencies),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            _ => Err(CommandError::Unknown(verb.to_string())),
        }
    }

    /// Forward a field or currency command to the controller.
    ///
    /// Returns `false` for commands that do not touch the session.
    pub fn dispatch(&self, live: &LiveController) -> bool {
        match self {
            Command::Sell(text) => live.type_input(text),
            Command::Buy(text) => live.type_output(text),
            Command::From(code) => live.set_input_currency(*code),
            Command::To(code) => live.set_output_currency(*code),
            Command::Flip => live.flip_direction(),
            _ => return false,
        }
        true
    }
}

fn parse_code(arg: &str, verb: &'static str) -> Result<CurrencyCode, CommandError> {
    if arg.is_empty() {
        return Err(CommandError::MissingArgument(verb));
    }
    Ok(arg.parse()?)
}

pub const HELP: &str = "\
commands:
  sell <amount>   type into the sell field
  buy <amount>    type into the buy field
  from <CODE>     change the sell currency
  to <CODE>       change the buy currency
  flip            swap the two currencies
  rates           show the rate board
  currencies      list supported currencies
  show            print the current quote
  quit";

/// Render both fields and the quote details.
pub fn render_view(view: &SwapView, formatter: &AmountFormatter) -> String {
    let display = &view.display;
    let mut out = String::new();

    let marker = |side: Side| if view.active_field == side { "*" } else { " " };
    let _ = writeln!(
        out,
        "{} Sell {:>20} {}",
        marker(Side::Input),
        placeholder(&display.input_value),
        view.input_currency
    );
    let _ = writeln!(
        out,
        "{} Buy  {:>20} {}",
        marker(Side::Output),
        placeholder(&display.output_value),
        view.output_currency
    );

    if view.is_computing() {
        let _ = writeln!(out, "  calculating...");
    }
    if let Some(rate) = display.rate {
        let _ = writeln!(
            out,
            "  1 {} = {} {}",
            view.input_currency,
            formatter.format_rate(rate),
            view.output_currency
        );
    }
    if let Some(fee) = display.fee {
        let _ = writeln!(
            out,
            "  Fee (1%): {} {}",
            formatter.format(fee, view.input_currency),
            view.input_currency
        );
    }
    if let Some(error) = display.error {
        let _ = writeln!(out, "  [{}] {}", error.error_code(), error);
    }

    out
}

/// Render the rate board.
pub fn render_rates(rates: &RateTable, formatter: &AmountFormatter) -> String {
    let mut out = String::from("Current exchange rates (1 USD)\n");
    for entry in rates.board() {
        let _ = writeln!(out, "  {}  {:>14}", entry.code, formatter.format_rate(entry.per_base));
    }
    out
}

/// Render the currency catalogue.
pub fn render_currencies(metadata: &CurrencyMetaTable) -> String {
    let mut out = String::new();
    for meta in metadata.all() {
        let _ = writeln!(out, "  {}  {:<20} {} dp", meta.code, meta.name, meta.decimals);
    }
    out
}

fn placeholder(value: &str) -> &str {
    if value.is_empty() {
        "0.00"
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::DerivedDisplay;
    use crate::state::SwapPhase;
    use rust_decimal_macros::dec;
    use swapdesk_common::ValidationError;
    use swapdesk_fx::Tables;

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("sell 100").unwrap(), Command::Sell("100".into()));
        assert_eq!(Command::parse("  BUY  415.80 ").unwrap(), Command::Buy("415.80".into()));
        assert_eq!(Command::parse("sell").unwrap(), Command::Sell(String::new()));
        assert_eq!(Command::parse("from eur").unwrap(), Command::From(CurrencyCode::Eur));
        assert_eq!(Command::parse("to IDR").unwrap(), Command::To(CurrencyCode::Idr));
        assert_eq!(Command::parse("flip").unwrap(), Command::Flip);
        assert_eq!(Command::parse("").unwrap(), Command::Show);
        assert_eq!(Command::parse("quit").unwrap(), Command::Quit);
    }

    #[test]
    fn test_sell_passes_text_through() {
        assert_eq!(Command::parse("sell -3").unwrap(), Command::Sell("-3".into()));
        assert_eq!(Command::parse("sell 1 2").unwrap(), Command::Sell("1 2".into()));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            Command::parse("from").unwrap_err(),
            CommandError::MissingArgument("from")
        );
        assert!(matches!(
            Command::parse("to XYZ").unwrap_err(),
            CommandError::Currency(_)
        ));
        assert_eq!(
            Command::parse("dance").unwrap_err(),
            CommandError::Unknown("dance".into())
        );
    }

    #[test]
    fn test_render_settled_view() {
        let view = SwapView {
            input_currency: CurrencyCode::Usd,
            output_currency: CurrencyCode::Myr,
            active_field: Side::Input,
            phase: SwapPhase::Settled,
            display: DerivedDisplay {
                input_value: "100".into(),
                output_value: "415.80".into(),
                fee: Some(dec!(1.00)),
                rate: Some(dec!(4.2)),
                error: None,
            },
        };

        let out = render_view(&view, &Tables::builtin().formatter());

        assert!(out.contains("* Sell"));
        assert!(out.contains("415.80 MYR"));
        assert!(out.contains("1 USD = 4.20 MYR"));
        assert!(out.contains("Fee (1%): 1.00 USD"));
        assert!(!out.contains("calculating"));
    }

    #[test]
    fn test_render_invalid_view() {
        let view = SwapView {
            input_currency: CurrencyCode::Usd,
            output_currency: CurrencyCode::Myr,
            active_field: Side::Output,
            phase: SwapPhase::Invalid,
            display: DerivedDisplay {
                input_value: String::new(),
                output_value: "-3".into(),
                fee: None,
                rate: None,
                error: Some(ValidationError::ZeroOrNegative),
            },
        };

        let out = render_view(&view, &Tables::builtin().formatter());

        assert!(out.contains("* Buy"));
        assert!(out.contains("[E002] Amount must be greater than zero"));
        assert!(!out.contains("Fee"));
    }

    #[test]
    fn test_render_rates_board() {
        let tables = Tables::builtin();
        let out = render_rates(&tables.rates, &tables.formatter());

        assert!(out.contains("MYR"));
        assert!(out.contains("15,650.00"));
        assert!(out.contains("3.6725"));
        assert_eq!(out.lines().count(), 1 + CurrencyCode::ALL.len());
    }

    #[test]
    fn test_render_currencies() {
        let out = render_currencies(&Tables::builtin().metadata);
        assert!(out.contains("Indonesian Rupiah"));
        assert_eq!(out.lines().count(), CurrencyCode::ALL.len());
    }
}
