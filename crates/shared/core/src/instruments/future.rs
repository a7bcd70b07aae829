use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use thiserror::Error;

use crate::values::{Timestamp, day_start};

const SECONDS_PER_DAY: i64 = 86_400;
const DAYS_PER_YEAR: i64 = 365;

/// Day + three-letter month + two-digit year, e.g. `27dec24`
static EXPIRY_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,2})([a-z]{3})(\d{2})").expect("static expiry pattern"));

/// Symbol whose expiry code cannot be decoded
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("no expiry date in instrument code '{symbol}'")]
pub struct ExpiryParseError {
    pub symbol: String,
}

/// Decode the expiry date embedded in a dated contract symbol
///
/// Matching is case-insensitive: `BTC-27DEC24` and `btc-27dec24` both yield
/// 2024-12-27.
pub fn parse_expiry(symbol: &str) -> Result<NaiveDate, ExpiryParseError> {
    let err = || ExpiryParseError {
        symbol: symbol.to_string(),
    };
    let lowered = symbol.to_ascii_lowercase();
    let caps = EXPIRY_CODE.captures(&lowered).ok_or_else(err)?;

    let day: u32 = caps[1].parse().map_err(|_| err())?;
    let month = month_number(&caps[2]).ok_or_else(err)?;
    let year: i32 = caps[3].parse::<i32>().map_err(|_| err())? + 2000;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(err)
}

fn month_number(abbrev: &str) -> Option<u32> {
    const MONTHS: [&str; 12] = [
        "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
    ];
    MONTHS
        .iter()
        .position(|m| *m == abbrev)
        .map(|idx| idx as u32 + 1)
}

/// Scale a basis to a 365-day rate; `None` on expiry day
pub fn annualize_basis(basis: Decimal, days_to_expiry: i64) -> Option<Decimal> {
    if days_to_expiry == 0 {
        return None;
    }
    Some(basis * Decimal::from(DAYS_PER_YEAR) / Decimal::from(days_to_expiry))
}

/// A dated futures contract (e.g., BTC-27DEC24)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FutureContract {
    /// Venue listing the contract
    pub market: String,
    /// Contract symbol
    pub symbol: String,
    /// Expiry date decoded from the symbol
    pub expiry: NaiveDate,
}

impl FutureContract {
    /// Build a contract from its symbol, decoding the expiry
    pub fn from_symbol(
        market: impl Into<String>,
        symbol: impl Into<String>,
    ) -> Result<Self, ExpiryParseError> {
        let symbol = symbol.into();
        let expiry = parse_expiry(&symbol)?;
        Ok(Self {
            market: market.into(),
            symbol,
            expiry,
        })
    }

    /// Whole days from an observation to expiry midnight (UTC)
    ///
    /// Rounds toward negative infinity, so an intraday observation on the
    /// eve of expiry is 0 days out and a post-expiry one is negative.
    pub fn days_to_expiry(&self, observed: Timestamp) -> i64 {
        let remaining = day_start(self.expiry) - observed;
        remaining.num_seconds().div_euclid(SECONDS_PER_DAY)
    }
}

impl std::fmt::Display for FutureContract {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol)
    }
}
