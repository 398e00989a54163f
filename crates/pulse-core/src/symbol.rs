//! Instrument symbol.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Exchange symbol, base asset followed by quote asset (e.g. "BTCUSDT").
///
/// Always stored uppercase so that stream payloads and snapshot entries
/// address the same key regardless of the casing the exchange used.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    /// Create a symbol, normalizing to uppercase.
    ///
    /// Rejects empty and non-alphanumeric input.
    pub fn new(raw: impl AsRef<str>) -> Result<Self> {
        let normalized = raw.as_ref().trim().to_ascii_uppercase();
        if normalized.is_empty() || !normalized.chars().all(|ch| ch.is_ascii_alphanumeric()) {
            return Err(CoreError::InvalidSymbol(format!(
                "symbol must be non-empty alphanumeric ASCII, got '{}'",
                raw.as_ref()
            )));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercase form used in stream topic names.
    pub fn stream_name(&self) -> String {
        self.0.to_ascii_lowercase()
    }

    /// Whether the symbol is quoted in `quote` (e.g. "BTCUSDT" in "USDT").
    ///
    /// A symbol equal to the quote asset itself is not a pair and does not match.
    pub fn is_quoted_in(&self, quote: &str) -> bool {
        self.0.len() > quote.len() && self.0.ends_with(&quote.to_ascii_uppercase())
    }

    /// Symbol with the quote suffix stripped ("BTCUSDT" -> "BTC").
    pub fn display_name(&self, quote: &str) -> String {
        if self.is_quoted_in(quote) {
            self.0[..self.0.len() - quote.len()].to_string()
        } else {
            self.0.clone()
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Symbol {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Symbol {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Symbol> for String {
    fn from(value: Symbol) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_normalizes_case() {
        let symbol = Symbol::new("btcusdt").unwrap();
        assert_eq!(symbol.as_str(), "BTCUSDT");
        assert_eq!(symbol.stream_name(), "btcusdt");
    }

    #[test]
    fn test_symbol_rejects_invalid() {
        assert!(Symbol::new("").is_err());
        assert!(Symbol::new("BTC/USDT").is_err());
        assert!(Symbol::new("btc usdt").is_err());
    }

    #[test]
    fn test_display_name_strips_quote_suffix() {
        let symbol = Symbol::new("ETHUSDT").unwrap();
        assert_eq!(symbol.display_name("USDT"), "ETH");
        // Only the suffix is stripped, not inner occurrences.
        let odd = Symbol::new("USDTBUSD").unwrap();
        assert_eq!(odd.display_name("USDT"), "USDTBUSD");
    }

    #[test]
    fn test_quote_asset_alone_is_not_a_pair() {
        let symbol = Symbol::new("USDT").unwrap();
        assert!(!symbol.is_quoted_in("USDT"));
    }

    #[test]
    fn test_symbol_serde_roundtrip_validates() {
        let parsed: Symbol = serde_json::from_str("\"solusdt\"").unwrap();
        assert_eq!(parsed.as_str(), "SOLUSDT");
        assert!(serde_json::from_str::<Symbol>("\"bad-symbol\"").is_err());
    }
}
