//! Tenor Ports
//!
//! Port definitions (traits) for derivatives history windows.
//! These define the boundaries between window logic and the remote API.

mod error;
mod history;
mod universe;

pub use error::{FetchError, HistoryError, RecordError};
pub use history::{HistoryRequest, HistorySource};
pub use universe::{Universe, UniverseSource};
