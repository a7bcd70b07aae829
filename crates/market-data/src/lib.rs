//! Tenor Market Data
//!
//! Cached windows of derivatives history that stay minimal-cost while the
//! caller moves their bounds around.
//!
//! ## Architecture
//!
//! ```text
//!  caller ──► set_start / set_end / set_currency / set_granularity
//!                     │
//!          ┌──────────▼───────────────────────────────┐
//!          │            RangeCache<S>                 │
//!          │  (currency, start, end, granularity,     │
//!          │   rows ordered by key)                   │
//!          │                                          │
//!          │  shrink ─► trim rows, no fetch           │
//!          │  grow   ─► fetch delta, boundary trim,   │
//!          │            splice, commit atomically     │
//!          └──────────┬───────────────────────────────┘
//!                     │ WindowQuery
//!          ┌──────────▼───────────┐
//!          │   SeriesStrategy     │
//!          │  FuturesStrategy  ───┼──► aggregate across live contracts
//!          │  PerpetualsStrategy ─┼──► merge markets, skip failures
//!          └──────────┬───────────┘
//!                     │ UniverseSource + HistorySource (ports)
//!                     ▼
//!               tenor-gateway
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! let source = Arc::new(HttpHistorySource::from_config(&config, &api_key)?);
//! let strategy = PerpetualsStrategy::from_source(source);
//!
//! let mut window =
//!     PerpetualsWindow::open(strategy, Currency::Btc, start, end, Granularity::Day1).await?;
//! window.set_start(earlier).await?; // fetches only the missing days
//! window.save("btc_perps")?;        // writes btc_perps.json
//! ```

pub mod error;
pub mod futures;
pub mod perpetuals;
pub mod snapshot;
pub mod strategy;
pub mod window;

// Re-export main types
pub use error::{Result, SnapshotError, WindowError};
pub use futures::{ContractSeries, FuturesStrategy, aggregate_futures};
pub use perpetuals::{PerpetualsStrategy, merge_perpetuals};
pub use snapshot::{SNAPSHOT_VERSION, snapshot_path};
pub use strategy::{SeriesStrategy, WindowQuery};
pub use window::{RangeCache, WindowUpdate};

/// Window over the per-date aggregate of every live dated future
pub type FuturesWindow = RangeCache<FuturesStrategy>;

/// Window over every perpetual market of a currency, tagged by market
pub type PerpetualsWindow = RangeCache<PerpetualsStrategy>;
