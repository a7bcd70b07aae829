//! Tenor Core Domain
//!
//! Pure domain types for derivatives history windows.
//! This crate contains no async, no I/O, and is 100% unit testable.

pub mod instruments;
pub mod series;
pub mod values;

// Re-export commonly used types at crate root
pub use instruments::{
    ExpiryParseError, FutureContract, InstrumentKind, InstrumentRef, annualize_basis,
    parse_expiry,
};
pub use series::{FuturesAggregateRow, PerpetualRow, SeriesRow, TimeSeriesRow};
pub use values::{
    Currency, DATE_FORMAT, Granularity, Price, Quantity, Timestamp, ValueParseError, day_start,
    from_epoch_millis, parse_date,
};
