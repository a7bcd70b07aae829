//! Infrastructure Layer - Inbound adapters from the remote API
//!
//! This layer contains the pieces that talk to, or decode, the source:
//! - RestClient: HTTP client for the JSON API
//! - PaginatedFetcher: page-by-page retrieval with pacing and retry
//! - Parsers: item shapes to normalized rows
//! - InstrumentUniverse: instrument listing queries

pub mod paginator;
pub mod parsers;
pub mod rest_client;
pub mod universe;

pub use paginator::{Page, PageMeta, PageRequest, PaginatedFetcher, Pacing};
pub use parsers::{FlatParser, PointMapParser, RecordNormalizer, RecordParser};
pub use rest_client::RestClient;
pub use universe::InstrumentUniverse;
