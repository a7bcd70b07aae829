//! Row shapes held by a window cache
//!
//! - `TimeSeriesRow`: uniform normalized sample for one instrument
//! - `PerpetualRow`: a sample tagged with its market and symbol
//! - `FuturesAggregateRow`: one per-date aggregate across live dated contracts

mod aggregate;
mod perpetual;
mod row;

pub use aggregate::FuturesAggregateRow;
pub use perpetual::PerpetualRow;
pub use row::TimeSeriesRow;

use crate::values::Timestamp;

/// A row that can live in a window cache
///
/// `Key` is the uniqueness key of the row within its series and also defines
/// the cache order (ascending).
pub trait SeriesRow: Clone {
    type Key: Ord + Clone + std::hash::Hash + std::fmt::Debug;

    /// Bucket-aligned timestamp of the row
    fn date(&self) -> Timestamp;

    /// Uniqueness key, leading with the date
    fn key(&self) -> Self::Key;
}
