use serde::{Deserialize, Serialize};

use super::{SeriesRow, TimeSeriesRow};
use crate::instruments::InstrumentRef;
use crate::values::{Price, Quantity, Timestamp};

/// A perpetual sample tagged with its source market and symbol
///
/// This is the fixed output column set of a multi-market merge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerpetualRow {
    pub date: Timestamp,
    pub market: String,
    pub symbol: String,
    pub price: Option<Price>,
    pub open_interest: Option<Quantity>,
    pub volume: Option<Quantity>,
    pub basis: Option<Price>,
    pub funding: Option<Price>,
    pub long_short_ratio: Option<Price>,
}

impl PerpetualRow {
    /// Tag a normalized row with the instrument it was fetched for
    pub fn tagged(instrument: &InstrumentRef, row: TimeSeriesRow) -> Self {
        Self {
            date: row.date,
            market: instrument.market.clone(),
            symbol: instrument.symbol.clone(),
            price: row.price,
            open_interest: row.open_interest,
            volume: row.volume,
            basis: row.basis,
            funding: row.funding,
            long_short_ratio: row.long_short_ratio,
        }
    }
}

impl SeriesRow for PerpetualRow {
    type Key = (Timestamp, String, String);

    fn date(&self) -> Timestamp {
        self.date
    }

    fn key(&self) -> Self::Key {
        (self.date, self.market.clone(), self.symbol.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    #[test]
    fn test_tagged_projects_columns() {
        let date = Utc.with_ymd_and_hms(2024, 10, 1, 0, 0, 0).unwrap();
        let row = TimeSeriesRow::empty(date)
            .with_price(dec!(63000))
            .with_funding(dec!(0.0001));
        let perp = PerpetualRow::tagged(&InstrumentRef::new("OKX", "BTC-PERP"), row);

        assert_eq!(perp.market, "OKX");
        assert_eq!(perp.symbol, "BTC-PERP");
        assert_eq!(perp.price, Some(dec!(63000)));
        assert_eq!(perp.funding, Some(dec!(0.0001)));
        assert_eq!(perp.key(), (date, "OKX".to_string(), "BTC-PERP".to_string()));
    }

    #[test]
    fn test_key_orders_by_date_then_market() {
        let d1 = Utc.with_ymd_and_hms(2024, 10, 1, 0, 0, 0).unwrap();
        let d2 = Utc.with_ymd_and_hms(2024, 10, 2, 0, 0, 0).unwrap();
        let a = PerpetualRow::tagged(&InstrumentRef::new("OKX", "X"), TimeSeriesRow::empty(d1));
        let b = PerpetualRow::tagged(&InstrumentRef::new("DERIBIT", "Y"), TimeSeriesRow::empty(d2));
        let c = PerpetualRow::tagged(&InstrumentRef::new("DERIBIT", "Y"), TimeSeriesRow::empty(d1));

        let mut keys = vec![a.key(), b.key(), c.key()];
        keys.sort();
        assert_eq!(keys, vec![c.key(), a.key(), b.key()]);
    }
}
