//! Ticker symbol carried from the query string into the widgets.
//!
//! No validation is applied: whatever the visitor typed is handed to the
//! TradingView widget, which resolves or rejects it client-side. Escaping
//! happens where the text is rendered, not here.

use std::fmt;

pub const DEFAULT_SYMBOL: &str = "NASDAQ:AAPL";

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// Resolve the `symbol` query parameter, falling back to `default` when it
    /// is absent or blank. Surrounding whitespace is trimmed, nothing else.
    pub fn from_query(raw: Option<&str>, default: &str) -> Self {
        match raw.map(str::trim).filter(|s| !s.is_empty()) {
            Some(s) => Self(s.to_string()),
            None => Self(default.trim().to_string()),
        }
    }

    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The part after the exchange prefix, e.g. `AAPL` for `NASDAQ:AAPL`.
    pub fn ticker(&self) -> &str {
        match self.0.rsplit_once(':') {
            Some((_, ticker)) if !ticker.is_empty() => ticker,
            _ => &self.0,
        }
    }
}

impl Default for Symbol {
    fn default() -> Self {
        Self(DEFAULT_SYMBOL.to_string())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Normalize a symbol for storage lookups: trimmed and upper-cased.
pub fn normalize_for_lookup(raw: &str) -> String {
    raw.trim().to_uppercase()
}
