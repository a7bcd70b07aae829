use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::values::ValueParseError;

/// Instrument family of a window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstrumentKind {
    /// Perpetual swap without expiry (e.g., BTC-PERPETUAL)
    Perpetual,
    /// Dated futures contract (e.g., BTC-27DEC24)
    Future,
    /// Option contract
    Option,
}

impl InstrumentKind {
    /// Value used by the instrument listing's `type` column
    pub fn as_str(&self) -> &'static str {
        match self {
            InstrumentKind::Perpetual => "perpetual",
            InstrumentKind::Future => "future",
            InstrumentKind::Option => "option",
        }
    }
}

impl FromStr for InstrumentKind {
    type Err = ValueParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "perpetual" | "perpetuals" => Ok(InstrumentKind::Perpetual),
            "future" | "futures" => Ok(InstrumentKind::Future),
            "option" | "options" => Ok(InstrumentKind::Option),
            _ => Err(ValueParseError::new("instrument type", s)),
        }
    }
}

impl std::fmt::Display for InstrumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One tradable (market, instrument) pair
///
/// `currency` and `kind` are only populated when the universe query did not
/// filter on them, so a caller always sees the columns that vary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstrumentRef {
    pub market: String,
    pub symbol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl InstrumentRef {
    pub fn new(market: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            market: market.into(),
            symbol: symbol.into(),
            currency: None,
            kind: None,
        }
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// The (market, symbol) pair that identifies the instrument
    pub fn pair(&self) -> (&str, &str) {
        (&self.market, &self.symbol)
    }
}

impl std::fmt::Display for InstrumentRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.market, self.symbol)
    }
}
