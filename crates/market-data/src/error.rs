//! Market data errors

use chrono::NaiveDate;
use tenor_core::{Currency, ExpiryParseError, InstrumentKind};
use tenor_ports::{FetchError, HistoryError, RecordError};
use thiserror::Error;

/// Why a window could not be opened or moved
///
/// A failed operation leaves the window exactly as it was.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WindowError {
    #[error("invalid range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("fetch failed: {0}")]
    Fetch(FetchError),

    #[error("malformed record: {0}")]
    Malformed(RecordError),

    #[error("all {failed} {currency} instruments failed to fetch")]
    AllInstrumentsFailed { currency: Currency, failed: usize },

    #[error("no {currency} {kind} instruments listed")]
    EmptyUniverse {
        currency: Currency,
        kind: InstrumentKind,
    },
}

impl From<HistoryError> for WindowError {
    fn from(err: HistoryError) -> Self {
        match err {
            HistoryError::Fetch(e) => WindowError::Fetch(e),
            HistoryError::Malformed(e) => WindowError::Malformed(e),
        }
    }
}

impl From<RecordError> for WindowError {
    fn from(err: RecordError) -> Self {
        WindowError::Malformed(err)
    }
}

impl From<ExpiryParseError> for WindowError {
    fn from(err: ExpiryParseError) -> Self {
        WindowError::Malformed(err.into())
    }
}

pub type Result<T> = std::result::Result<T, WindowError>;

/// Errors saving or loading a window snapshot
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("snapshot version {found} is not supported (expected {expected})")]
    VersionMismatch { found: u32, expected: u32 },

    #[error("snapshot holds a {found} window, expected {expected}")]
    KindMismatch { found: String, expected: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_error_maps_to_window_error() {
        let fetch = FetchError::Client("boom".to_string());
        assert_eq!(
            WindowError::from(HistoryError::Fetch(fetch.clone())),
            WindowError::Fetch(fetch)
        );

        let malformed = RecordError::MissingField("date");
        assert_eq!(
            WindowError::from(HistoryError::Malformed(malformed.clone())),
            WindowError::Malformed(malformed)
        );
    }

    #[test]
    fn test_expiry_error_is_malformed() {
        let err = WindowError::from(ExpiryParseError {
            symbol: "BTC-PERPETUAL".to_string(),
        });
        assert_eq!(
            err,
            WindowError::Malformed(RecordError::Expiry("BTC-PERPETUAL".to_string()))
        );
    }
}
