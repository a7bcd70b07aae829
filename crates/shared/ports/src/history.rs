use async_trait::async_trait;
use chrono::NaiveDate;
use tenor_core::{Granularity, InstrumentKind, InstrumentRef, TimeSeriesRow};

use crate::HistoryError;

/// Parameters of one history fetch: both bounds inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryRequest {
    pub kind: InstrumentKind,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub granularity: Granularity,
}

impl HistoryRequest {
    pub fn new(
        kind: InstrumentKind,
        start: NaiveDate,
        end: NaiveDate,
        granularity: Granularity,
    ) -> Self {
        Self {
            kind,
            start,
            end,
            granularity,
        }
    }
}

/// Port for fetching the normalized history of one instrument
///
/// Rows come back in time order. An instrument with no data in range is
/// `Ok(vec![])`, never an error.
#[async_trait]
pub trait HistorySource: Send + Sync {
    async fn fetch_history(
        &self,
        instrument: &InstrumentRef,
        request: &HistoryRequest,
    ) -> Result<Vec<TimeSeriesRow>, HistoryError>;
}
