use thiserror::Error;

/// A fetch that still failed after its single retry
///
/// Distinct from an empty success: a source that has no data returns `Ok`
/// with no rows.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("request to {url} failed after retry: {reason}")]
    RetryExhausted { url: String, reason: String },

    #[error("page {page} of {url} is missing its page count")]
    MissingPageCount { url: String, page: u32 },

    #[error("client setup failed: {0}")]
    Client(String),
}

/// A record that breaks the upstream data contract
///
/// Never retried: the same payload would fail the same way.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("record is missing required field '{0}'")]
    MissingField(&'static str),

    #[error("malformed timestamp: {0}")]
    Timestamp(String),

    #[error("record shape not recognised: {0}")]
    UnknownShape(String),

    #[error("no expiry date in instrument code '{0}'")]
    Expiry(String),
}

/// Errors surfaced by a `HistorySource`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HistoryError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Malformed(#[from] RecordError),
}

impl HistoryError {
    /// Whether the failure is a transport failure (as opposed to bad data)
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, HistoryError::Fetch(_))
    }
}

impl From<tenor_core::ExpiryParseError> for RecordError {
    fn from(err: tenor_core::ExpiryParseError) -> Self {
        RecordError::Expiry(err.symbol)
    }
}
