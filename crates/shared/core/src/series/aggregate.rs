use serde::{Deserialize, Serialize};

use super::SeriesRow;
use crate::values::{Price, Quantity, Timestamp};

/// Per-date aggregate across every live dated contract
///
/// `price` and `annualized_basis` are means over the contracts that reported
/// a value; `open_interest` and `volume` are sums.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuturesAggregateRow {
    pub date: Timestamp,
    pub price: Option<Price>,
    pub annualized_basis: Option<Price>,
    pub open_interest: Quantity,
    pub volume: Quantity,
}

impl SeriesRow for FuturesAggregateRow {
    type Key = Timestamp;

    fn date(&self) -> Timestamp {
        self.date
    }

    fn key(&self) -> Timestamp {
        self.date
    }
}
