//! Tenor Gateway
//!
//! Gateway layer between the remote derivatives history API and the window
//! caches. Provides:
//! - `RestClient`: authenticated JSON GETs with a per-request timeout
//! - `PaginatedFetcher`: every page of one instrument, in order, with pacing
//!   and a single retry
//! - `RecordNormalizer`: heterogeneous item shapes to `TimeSeriesRow`
//! - `InstrumentUniverse`: (market, instrument) pairs for a currency/type
//! - `HttpHistorySource`: the `HistorySource` port over the pieces above
//!
//! ## Architecture
//!
//! ```text
//!   Window cache (market-data)
//!         │ HistorySource / UniverseSource
//!    ┌────▼──────────────┐
//!    │ HttpHistorySource │──► InstrumentUniverse
//!    └────┬──────────────┘
//!         │
//!    ┌────▼─────────────┐     ┌──────────────────┐
//!    │ PaginatedFetcher │────►│ RecordNormalizer │
//!    └────┬─────────────┘     └──────────────────┘
//!         │ GET page 1..N (delay, one retry)
//!    ┌────▼──────┐
//!    │RestClient │
//!    └───────────┘
//! ```

pub mod adapters;
pub mod config;
pub mod error;
pub mod infrastructure;

// Re-export commonly used types
pub use adapters::HttpHistorySource;
pub use config::{
    ApiConfig, ConfigError, load_config, load_config_from_str, load_default_config,
};
pub use error::RestError;
pub use infrastructure::{
    FlatParser, InstrumentUniverse, Page, PageMeta, PageRequest, PaginatedFetcher, Pacing,
    PointMapParser, RecordNormalizer, RecordParser, RestClient,
};
