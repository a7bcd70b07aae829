//! Port adapters
//!
//! Adapters implement the `tenor-ports` traits on top of the infrastructure
//! layer so window caches never see HTTP or JSON details.

pub mod http_history;

pub use http_history::HttpHistorySource;
