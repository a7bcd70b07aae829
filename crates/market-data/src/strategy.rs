use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Serialize, de::DeserializeOwned};
use tenor_core::{Currency, Granularity, InstrumentKind, SeriesRow};

use crate::error::Result;

/// The parameters of one window fetch; both bounds inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowQuery {
    pub currency: Currency,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub granularity: Granularity,
}

impl WindowQuery {
    pub fn new(currency: Currency, start: NaiveDate, end: NaiveDate, granularity: Granularity) -> Self {
        Self {
            currency,
            start,
            end,
            granularity,
        }
    }

    /// Same currency and granularity over different bounds
    pub fn between(&self, start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end, ..*self }
    }
}

/// How a window of one instrument type is fetched and shaped
///
/// A strategy owns the whole path from universe to rows: which instruments
/// to fetch, how failures are tolerated, and how per-instrument series are
/// combined. The range cache only deals with the resulting rows.
#[async_trait]
pub trait SeriesStrategy: Send + Sync {
    type Row: SeriesRow + Serialize + DeserializeOwned + Send + Sync;

    /// Instrument type served by this strategy
    fn kind(&self) -> InstrumentKind;

    /// Fetch every row of `query`, ordered by row key
    async fn fetch(&self, query: &WindowQuery) -> Result<Vec<Self::Row>>;
}
