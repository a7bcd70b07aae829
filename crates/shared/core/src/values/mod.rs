mod currency;
mod granularity;

pub use currency::Currency;
pub use granularity::Granularity;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

/// Price value - uses Decimal for precision
pub type Price = Decimal;

/// Quantity value (open interest, volume)
pub type Quantity = Decimal;

/// Timestamp in UTC
pub type Timestamp = DateTime<Utc>;

/// Wire format for window bounds
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Midnight UTC of a calendar day
pub fn day_start(date: NaiveDate) -> Timestamp {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Parse a `YYYY-MM-DD` window bound
pub fn parse_date(s: &str) -> Result<NaiveDate, ValueParseError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|_| ValueParseError::new("date", s))
}

/// Convert epoch milliseconds to a timestamp, `None` when out of range
pub fn from_epoch_millis(ms: i64) -> Option<Timestamp> {
    Utc.timestamp_millis_opt(ms).single()
}

/// Error returned when a textual value does not name a known variant
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {kind}: '{input}'")]
pub struct ValueParseError {
    kind: &'static str,
    input: String,
}

impl ValueParseError {
    pub fn new(kind: &'static str, input: impl Into<String>) -> Self {
        Self {
            kind,
            input: input.into(),
        }
    }
}
