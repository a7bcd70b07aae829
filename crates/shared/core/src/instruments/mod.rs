//! Instrument references for derivatives history
//!
//! - `InstrumentKind`: perpetual swaps, dated futures, options
//! - `InstrumentRef`: one (market, symbol) pair from the instrument universe
//! - `FutureContract`: a dated contract with the expiry decoded from its symbol

mod future;
mod instrument;

pub use future::{ExpiryParseError, FutureContract, annualize_basis, parse_expiry};
pub use instrument::{InstrumentKind, InstrumentRef};
