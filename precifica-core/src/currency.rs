//! Display formatting for monetary amounts.

use serde::{Deserialize, Serialize};

/// Locale separators and symbol for rendering amounts. Formatting is
/// display-only; the numeric value is never changed or stored rounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyFormat {
    pub symbol: String,
    pub group_sep: char,
    pub decimal_sep: char,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self::brl()
    }
}

impl CurrencyFormat {
    /// Brazilian real: "R$ 1.312,50".
    pub fn brl() -> Self {
        Self {
            symbol: "R$".to_string(),
            group_sep: '.',
            decimal_sep: ',',
        }
    }

    /// US dollar: "$ 1,312.50".
    pub fn usd() -> Self {
        Self {
            symbol: "$".to_string(),
            group_sep: ',',
            decimal_sep: '.',
        }
    }

    /// Render an amount with two decimals and three-digit grouping.
    /// Non-finite input renders as zero.
    pub fn format(&self, amount: f64) -> String {
        let amount = if amount.is_finite() { amount } else { 0.0 };
        let cents = (amount.abs() * 100.0).round() as u128;
        let units = (cents / 100).to_string();
        let frac = cents % 100;

        let mut grouped = String::with_capacity(units.len() + units.len() / 3);
        for (i, digit) in units.chars().enumerate() {
            if i > 0 && (units.len() - i) % 3 == 0 {
                grouped.push(self.group_sep);
            }
            grouped.push(digit);
        }

        let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
        format!(
            "{sign}{} {grouped}{}{frac:02}",
            self.symbol, self.decimal_sep
        )
    }
}
