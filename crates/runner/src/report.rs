use rust_decimal::Decimal;
use tenor_core::{DATE_FORMAT, FuturesAggregateRow, PerpetualRow, Timestamp};

/// A row that can be printed on one line
pub trait ReportRow {
    fn header() -> String;
    fn line(&self) -> String;
}

fn cell(value: Option<Decimal>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.normalize().to_string())
}

fn when(date: Timestamp) -> String {
    if date.time() == chrono::NaiveTime::MIN {
        date.format(DATE_FORMAT).to_string()
    } else {
        date.format("%Y-%m-%d %H:%M").to_string()
    }
}

impl ReportRow for PerpetualRow {
    fn header() -> String {
        format!(
            "{:<16} {:<10} {:<16} {:>12} {:>14} {:>14} {:>12}",
            "date", "market", "symbol", "price", "open_interest", "volume", "funding"
        )
    }

    fn line(&self) -> String {
        format!(
            "{:<16} {:<10} {:<16} {:>12} {:>14} {:>14} {:>12}",
            when(self.date),
            self.market,
            self.symbol,
            cell(self.price),
            cell(self.open_interest),
            cell(self.volume),
            cell(self.funding)
        )
    }
}

impl ReportRow for FuturesAggregateRow {
    fn header() -> String {
        format!(
            "{:<16} {:>12} {:>18} {:>14} {:>14}",
            "date", "price", "annualized_basis", "open_interest", "volume"
        )
    }

    fn line(&self) -> String {
        format!(
            "{:<16} {:>12} {:>18} {:>14} {:>14}",
            when(self.date),
            cell(self.price),
            cell(self.annualized_basis.map(|b| b.round_dp(4))),
            self.open_interest.normalize(),
            self.volume.normalize()
        )
    }
}
