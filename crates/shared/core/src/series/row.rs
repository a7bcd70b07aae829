use serde::{Deserialize, Serialize};

use super::SeriesRow;
use crate::values::{Price, Quantity, Timestamp};

/// Uniform normalized sample for one instrument
///
/// Every numeric column is independently nullable; `None` is the single
/// missing-value marker regardless of how the source expressed it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesRow {
    pub date: Timestamp,
    pub price: Option<Price>,
    pub open_interest: Option<Quantity>,
    pub volume: Option<Quantity>,
    pub basis: Option<Price>,
    pub funding: Option<Price>,
    #[serde(rename = "yield")]
    pub yield_rate: Option<Price>,
    pub long_short_ratio: Option<Price>,
}

impl TimeSeriesRow {
    /// Row with a date and no values
    pub fn empty(date: Timestamp) -> Self {
        Self {
            date,
            price: None,
            open_interest: None,
            volume: None,
            basis: None,
            funding: None,
            yield_rate: None,
            long_short_ratio: None,
        }
    }

    pub fn with_price(mut self, price: Price) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_open_interest(mut self, oi: Quantity) -> Self {
        self.open_interest = Some(oi);
        self
    }

    pub fn with_volume(mut self, volume: Quantity) -> Self {
        self.volume = Some(volume);
        self
    }

    pub fn with_basis(mut self, basis: Price) -> Self {
        self.basis = Some(basis);
        self
    }

    pub fn with_funding(mut self, funding: Price) -> Self {
        self.funding = Some(funding);
        self
    }
}

impl SeriesRow for TimeSeriesRow {
    type Key = Timestamp;

    fn date(&self) -> Timestamp {
        self.date
    }

    fn key(&self) -> Timestamp {
        self.date
    }
}
