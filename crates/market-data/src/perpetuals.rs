//! Perpetuals Multi-Market Merge
//!
//! Fetches every perpetual of a currency, tags rows with their market and
//! symbol, and merges them into one series keyed by `(date, market, symbol)`.
//!
//! A failing instrument is logged and skipped; the merge only fails when
//! every listed instrument failed, or when a record breaks the data contract.
//! An empty listing is reported as `WindowError::EmptyUniverse`.

use async_trait::async_trait;
use log::{info, warn};
use std::collections::HashSet;
use std::sync::Arc;
use tenor_core::{InstrumentKind, InstrumentRef, PerpetualRow, SeriesRow, TimeSeriesRow};
use tenor_ports::{HistoryError, HistoryRequest, HistorySource, UniverseSource};

use crate::error::{Result, WindowError};
use crate::strategy::{SeriesStrategy, WindowQuery};

/// Tag, concatenate, and deduplicate per-instrument series
///
/// The first row seen for a key wins. Output is ordered by date, then
/// market, then symbol.
pub fn merge_perpetuals<I>(series: I) -> Vec<PerpetualRow>
where
    I: IntoIterator<Item = (InstrumentRef, Vec<TimeSeriesRow>)>,
{
    let mut seen = HashSet::new();
    let mut merged: Vec<PerpetualRow> = series
        .into_iter()
        .flat_map(|(instrument, rows)| {
            rows.into_iter()
                .map(move |row| PerpetualRow::tagged(&instrument, row))
        })
        .filter(|row| seen.insert(row.key()))
        .collect();

    merged.sort_by_cached_key(|row| row.key());
    merged
}

/// Fetches every perpetual market of a currency and merges them
pub struct PerpetualsStrategy {
    universe: Arc<dyn UniverseSource>,
    history: Arc<dyn HistorySource>,
}

impl PerpetualsStrategy {
    pub fn new(universe: Arc<dyn UniverseSource>, history: Arc<dyn HistorySource>) -> Self {
        Self { universe, history }
    }

    /// Use one source for both the universe and the histories
    pub fn from_source<T>(source: Arc<T>) -> Self
    where
        T: UniverseSource + HistorySource + 'static,
    {
        Self::new(source.clone(), source)
    }
}

#[async_trait]
impl SeriesStrategy for PerpetualsStrategy {
    type Row = PerpetualRow;

    fn kind(&self) -> InstrumentKind {
        InstrumentKind::Perpetual
    }

    async fn fetch(&self, query: &WindowQuery) -> Result<Vec<PerpetualRow>> {
        let universe = self
            .universe
            .resolve(Some(query.currency), Some(InstrumentKind::Perpetual))
            .await;
        if universe.is_empty() {
            return Err(WindowError::EmptyUniverse {
                currency: query.currency,
                kind: InstrumentKind::Perpetual,
            });
        }

        let request = HistoryRequest::new(
            InstrumentKind::Perpetual,
            query.start,
            query.end,
            query.granularity,
        );

        // Sequential: the source rate-limits per key
        let mut fetched = Vec::with_capacity(universe.len());
        let mut failed = 0usize;
        for instrument in &universe {
            match self.history.fetch_history(instrument, &request).await {
                Ok(rows) => fetched.push((instrument.clone(), rows)),
                Err(HistoryError::Fetch(e)) => {
                    warn!("Skipping {}: {}", instrument, e);
                    failed += 1;
                }
                Err(HistoryError::Malformed(e)) => return Err(WindowError::Malformed(e)),
            }
        }

        if fetched.is_empty() {
            return Err(WindowError::AllInstrumentsFailed {
                currency: query.currency,
                failed,
            });
        }

        let merged = merge_perpetuals(fetched);
        info!(
            "Merged {} of {} {} perpetuals into {} rows",
            universe.len() - failed,
            universe.len(),
            query.currency,
            merged.len()
        );
        Ok(merged)
    }
}
