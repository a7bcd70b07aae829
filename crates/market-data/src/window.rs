//! Range cache
//!
//! A window owns `(currency, start, end, granularity)` and the rows covering
//! exactly `[start, end]`. Every parameter change is an explicit async
//! operation that computes the minimal fetch it needs:
//!
//! | Operation            | Network                         | Cache                         |
//! |----------------------|---------------------------------|-------------------------------|
//! | same value           | none                            | unchanged                     |
//! | shrink start / end   | none                            | rows outside the bound dropped|
//! | grow start           | `[new_start, start]`            | prepended, boundary trimmed   |
//! | grow end             | `[end, new_end]`                | appended, boundary trimmed    |
//! | currency/granularity | full `[start, end]`             | replaced                      |
//!
//! Both ends of a fetch are inclusive, so a grow fetch always returns the
//! row already cached at the old bound. The splice drops every fetched row
//! whose key is already cached, which removes exactly that boundary row.
//!
//! New state is computed before anything is assigned: a failed fetch leaves
//! bounds and rows exactly as they were.
//!
//! An empty instrument listing opens an empty window. Once rows are cached,
//! an empty listing fails the operation instead of committing a gap.

use chrono::NaiveDate;
use log::{debug, info, warn};
use std::collections::HashSet;
use tenor_core::{Currency, Granularity, InstrumentKind, SeriesRow, day_start};

use crate::error::{Result, WindowError};
use crate::strategy::{SeriesStrategy, WindowQuery};

/// Outcome of a window operation, so its cost is visible to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowUpdate {
    /// Parameter already had this value; nothing fetched
    Unchanged,
    /// Bound moved inward; no fetch
    Trimmed { removed: usize },
    /// Bound moved outward; only the missing slice was fetched
    Extended { added: usize },
    /// Whole window fetched again
    Refetched { rows: usize },
}

/// Incrementally maintained window of one instrument type
pub struct RangeCache<S: SeriesStrategy> {
    strategy: S,
    currency: Currency,
    start: NaiveDate,
    end: NaiveDate,
    granularity: Granularity,
    rows: Vec<S::Row>,
}

impl<S: SeriesStrategy> RangeCache<S> {
    /// Open a window with one full fetch over `[start, end]`
    pub async fn open(
        strategy: S,
        currency: Currency,
        start: NaiveDate,
        end: NaiveDate,
        granularity: Granularity,
    ) -> Result<Self> {
        check_range(start, end)?;

        let query = WindowQuery::new(currency, start, end, granularity);
        let fetched = match strategy.fetch(&query).await {
            Err(WindowError::EmptyUniverse { .. }) => {
                warn!(
                    "No {} {} instruments listed, window is empty",
                    currency,
                    strategy.kind()
                );
                Vec::new()
            }
            other => other?,
        };
        let rows = settle(fetched, start, end);
        info!(
            "Opened {} {} window {}..{} @ {} with {} rows",
            currency,
            strategy.kind(),
            start,
            end,
            granularity,
            rows.len()
        );

        Ok(Self {
            strategy,
            currency,
            start,
            end,
            granularity,
            rows,
        })
    }

    /// Rebuild a window from stored parts without fetching
    pub(crate) fn from_parts(strategy: S, query: WindowQuery, rows: Vec<S::Row>) -> Self {
        Self {
            strategy,
            currency: query.currency,
            start: query.start,
            end: query.end,
            granularity: query.granularity,
            rows,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn kind(&self) -> InstrumentKind {
        self.strategy.kind()
    }

    /// Cached rows, ascending by key
    pub fn rows(&self) -> &[S::Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Current window parameters
    pub fn query(&self) -> WindowQuery {
        WindowQuery::new(self.currency, self.start, self.end, self.granularity)
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Switch currency, refetching the whole window
    pub async fn set_currency(&mut self, currency: Currency) -> Result<WindowUpdate> {
        if currency == self.currency {
            return Ok(WindowUpdate::Unchanged);
        }

        let query = WindowQuery {
            currency,
            ..self.query()
        };
        let rows = self.fetch_window(&query).await?;

        info!("Currency {} -> {}: {} rows", self.currency, currency, rows.len());
        self.currency = currency;
        self.rows = rows;
        Ok(WindowUpdate::Refetched {
            rows: self.rows.len(),
        })
    }

    /// Switch granularity, refetching the whole window
    ///
    /// Buckets of different widths never line up, so no cached row is reused.
    pub async fn set_granularity(&mut self, granularity: Granularity) -> Result<WindowUpdate> {
        if granularity == self.granularity {
            return Ok(WindowUpdate::Unchanged);
        }

        let query = WindowQuery {
            granularity,
            ..self.query()
        };
        let rows = self.fetch_window(&query).await?;

        info!(
            "Granularity {} -> {}: {} rows",
            self.granularity,
            granularity,
            rows.len()
        );
        self.granularity = granularity;
        self.rows = rows;
        Ok(WindowUpdate::Refetched {
            rows: self.rows.len(),
        })
    }

    /// Move the left bound
    ///
    /// Moving it right only drops rows. Moving it left fetches
    /// `[start, current start]` and splices in everything not already cached.
    pub async fn set_start(&mut self, start: NaiveDate) -> Result<WindowUpdate> {
        if start == self.start {
            return Ok(WindowUpdate::Unchanged);
        }
        check_range(start, self.end)?;

        if start > self.start {
            let lower = day_start(start);
            let before = self.rows.len();
            self.rows.retain(|row| row.date() >= lower);
            self.start = start;

            let removed = before - self.rows.len();
            info!("Start -> {}: trimmed {} rows", start, removed);
            return Ok(WindowUpdate::Trimmed { removed });
        }

        let delta = self.query().between(start, self.start);
        let fetched = self.fetch_rows(&delta).await?;
        let (rows, added) = self.splice(fetched, start, self.end);

        info!("Start -> {}: added {} rows", start, added);
        self.start = start;
        self.rows = rows;
        Ok(WindowUpdate::Extended { added })
    }

    /// Move the right bound; mirror of [`RangeCache::set_start`]
    pub async fn set_end(&mut self, end: NaiveDate) -> Result<WindowUpdate> {
        if end == self.end {
            return Ok(WindowUpdate::Unchanged);
        }
        check_range(self.start, end)?;

        if end < self.end {
            let upper = day_start(end);
            let before = self.rows.len();
            self.rows.retain(|row| row.date() <= upper);
            self.end = end;

            let removed = before - self.rows.len();
            info!("End -> {}: trimmed {} rows", end, removed);
            return Ok(WindowUpdate::Trimmed { removed });
        }

        let delta = self.query().between(self.end, end);
        let fetched = self.fetch_rows(&delta).await?;
        let (rows, added) = self.splice(fetched, self.start, end);

        info!("End -> {}: added {} rows", end, added);
        self.end = end;
        self.rows = rows;
        Ok(WindowUpdate::Extended { added })
    }

    // ========================================================================
    // Internals
    // ========================================================================

    async fn fetch_window(&self, query: &WindowQuery) -> Result<Vec<S::Row>> {
        let fetched = self.fetch_rows(query).await?;
        Ok(settle(fetched, query.start, query.end))
    }

    /// Strategy fetch; an empty listing only counts as "no rows" while the
    /// window itself is empty
    async fn fetch_rows(&self, query: &WindowQuery) -> Result<Vec<S::Row>> {
        match self.strategy.fetch(query).await {
            Err(WindowError::EmptyUniverse { .. }) if self.rows.is_empty() => {
                debug!("Empty listing for an empty window, nothing to splice");
                Ok(Vec::new())
            }
            other => other,
        }
    }

    /// Merge fetched rows into a copy of the cache, cached rows winning
    fn splice(
        &self,
        fetched: Vec<S::Row>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> (Vec<S::Row>, usize) {
        let fetched_len = fetched.len();
        let rows = settle(self.rows.iter().cloned().chain(fetched), start, end);
        let added = rows.len().saturating_sub(self.rows.len());
        debug!(
            "Spliced {} fetched rows: {} new, {} already cached",
            fetched_len,
            added,
            fetched_len - added.min(fetched_len)
        );
        (rows, added)
    }
}

fn check_range(start: NaiveDate, end: NaiveDate) -> Result<()> {
    if start > end {
        return Err(WindowError::InvalidRange { start, end });
    }
    Ok(())
}

/// Restrict rows to `[start, end]`, keep the first row per key, order by key
fn settle<R: SeriesRow>(
    rows: impl IntoIterator<Item = R>,
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<R> {
    let bounds = day_start(start)..=day_start(end);
    let mut seen = HashSet::new();

    let mut kept: Vec<R> = rows
        .into_iter()
        .filter(|row| bounds.contains(&row.date()))
        .filter(|row| seen.insert(row.key()))
        .collect();
    kept.sort_by_cached_key(|row| row.key());
    kept
}
