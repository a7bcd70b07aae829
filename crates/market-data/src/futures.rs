//! Futures Cross-Instrument Aggregation
//!
//! Reconciles every listed dated contract into one daily series.
//!
//! ## Per contract and date
//!
//! - each contract contributes its first observation of a calendar date, so
//!   intraday granularities still yield one row per date
//! - `days_to_expiry = expiry - date` in whole days, negative once expired
//! - `annualized_basis = basis * 365 / days_to_expiry`
//! - the row observed on the expiry date itself (`days_to_expiry == 0`) is
//!   dropped
//!
//! ## Per date
//!
//! - `price`, `annualized_basis`: mean over contracts that reported a value
//! - `open_interest`, `volume`: sum over contracts
//!
//! Unlike the perpetuals merge this path is strict: a contract whose symbol
//! has no expiry code, or whose history fails to fetch, aborts the fetch.
//! An empty listing is reported as `WindowError::EmptyUniverse`.

use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, info};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::Arc;
use tenor_core::{
    FutureContract, FuturesAggregateRow, InstrumentKind, Price, Quantity, TimeSeriesRow,
    annualize_basis, day_start,
};
use tenor_ports::{HistoryRequest, HistorySource, UniverseSource};

use crate::error::{Result, WindowError};
use crate::strategy::{SeriesStrategy, WindowQuery};

/// Normalized history of one dated contract
#[derive(Debug, Clone)]
pub struct ContractSeries {
    pub contract: FutureContract,
    pub rows: Vec<TimeSeriesRow>,
}

impl ContractSeries {
    pub fn new(contract: FutureContract, rows: Vec<TimeSeriesRow>) -> Self {
        Self { contract, rows }
    }
}

/// Running totals for one date
#[derive(Debug, Default)]
struct DateBucket {
    price_sum: Price,
    price_count: u32,
    basis_sum: Price,
    basis_count: u32,
    open_interest: Quantity,
    volume: Quantity,
}

impl DateBucket {
    fn add(&mut self, row: &TimeSeriesRow, annualized_basis: Option<Price>) {
        if let Some(price) = row.price {
            self.price_sum += price;
            self.price_count += 1;
        }
        if let Some(basis) = annualized_basis {
            self.basis_sum += basis;
            self.basis_count += 1;
        }
        self.open_interest += row.open_interest.unwrap_or_default();
        self.volume += row.volume.unwrap_or_default();
    }

    fn finish(self, date: NaiveDate) -> FuturesAggregateRow {
        FuturesAggregateRow {
            date: day_start(date),
            price: mean(self.price_sum, self.price_count),
            annualized_basis: mean(self.basis_sum, self.basis_count),
            open_interest: self.open_interest,
            volume: self.volume,
        }
    }
}

fn mean(sum: Decimal, count: u32) -> Option<Decimal> {
    (count > 0).then(|| sum / Decimal::from(count))
}

/// First observation of each calendar date
fn daily_rows(rows: &[TimeSeriesRow]) -> BTreeMap<NaiveDate, &TimeSeriesRow> {
    let mut daily: BTreeMap<NaiveDate, &TimeSeriesRow> = BTreeMap::new();
    for row in rows {
        daily
            .entry(row.date.date_naive())
            .and_modify(|kept| {
                if row.date < kept.date {
                    *kept = row;
                }
            })
            .or_insert(row);
    }
    daily
}

/// Aggregate every contract's rows into one row per date, ascending
///
/// Output rows are stamped at midnight UTC of their date.
pub fn aggregate_futures(series: &[ContractSeries]) -> Vec<FuturesAggregateRow> {
    let mut buckets: BTreeMap<NaiveDate, DateBucket> = BTreeMap::new();
    let mut dropped = 0usize;

    for ContractSeries { contract, rows } in series {
        for (date, row) in daily_rows(rows) {
            let days = contract.days_to_expiry(day_start(date));
            if days == 0 {
                dropped += 1;
                continue;
            }
            let annualized = row.basis.and_then(|basis| annualize_basis(basis, days));
            buckets.entry(date).or_default().add(row, annualized);
        }
    }

    if dropped > 0 {
        debug!("Dropped {} rows observed on their contract's expiry date", dropped);
    }

    buckets
        .into_iter()
        .map(|(date, bucket)| bucket.finish(date))
        .collect()
}

/// Fetches every dated future of a currency and aggregates them
pub struct FuturesStrategy {
    universe: Arc<dyn UniverseSource>,
    history: Arc<dyn HistorySource>,
}

impl FuturesStrategy {
    pub fn new(universe: Arc<dyn UniverseSource>, history: Arc<dyn HistorySource>) -> Self {
        Self { universe, history }
    }

    /// Use one source for both the universe and the histories
    pub fn from_source<T>(source: Arc<T>) -> Self
    where
        T: UniverseSource + HistorySource + 'static,
    {
        Self::new(source.clone(), source)
    }
}

#[async_trait]
impl SeriesStrategy for FuturesStrategy {
    type Row = FuturesAggregateRow;

    fn kind(&self) -> InstrumentKind {
        InstrumentKind::Future
    }

    async fn fetch(&self, query: &WindowQuery) -> Result<Vec<FuturesAggregateRow>> {
        let universe = self
            .universe
            .resolve(Some(query.currency), Some(InstrumentKind::Future))
            .await;
        if universe.is_empty() {
            return Err(WindowError::EmptyUniverse {
                currency: query.currency,
                kind: InstrumentKind::Future,
            });
        }

        let request = HistoryRequest::new(
            InstrumentKind::Future,
            query.start,
            query.end,
            query.granularity,
        );

        let mut series = Vec::with_capacity(universe.len());
        for instrument in &universe {
            let contract = FutureContract::from_symbol(&instrument.market, &instrument.symbol)?;
            let rows = self.history.fetch_history(instrument, &request).await?;
            debug!("{}: {} rows, expires {}", instrument, rows.len(), contract.expiry);
            series.push(ContractSeries::new(contract, rows));
        }

        let aggregated = aggregate_futures(&series);
        info!(
            "Aggregated {} {} contracts into {} rows",
            series.len(),
            query.currency,
            aggregated.len()
        );
        Ok(aggregated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;
    use tenor_core::Timestamp;

    fn at(month: u32, day: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2024, month, day, 0, 0, 0).unwrap()
    }

    fn contract(symbol: &str) -> FutureContract {
        FutureContract::from_symbol("DERIBIT", symbol).unwrap()
    }

    fn row(date: Timestamp, price: Decimal, basis: Decimal, oi: Decimal, volume: Decimal) -> TimeSeriesRow {
        TimeSeriesRow::empty(date)
            .with_price(price)
            .with_basis(basis)
            .with_open_interest(oi)
            .with_volume(volume)
    }

    #[test]
    fn test_expiry_day_rows_are_excluded() {
        // 27DEC24 observed on its own expiry date
        let series = vec![ContractSeries::new(
            contract("BTC-27DEC24"),
            vec![
                row(at(12, 26), dec!(100), dec!(1), dec!(1), dec!(1)),
                row(at(12, 27), dec!(100), dec!(1), dec!(1), dec!(1)),
            ],
        )];

        let out = aggregate_futures(&series);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].date, at(12, 26));
    }

    #[test]
    fn test_expired_contract_keeps_negative_basis() {
        // One day past 27DEC24
        let series = vec![ContractSeries::new(
            contract("BTC-27DEC24"),
            vec![row(at(12, 28), dec!(100), dec!(1), dec!(4), dec!(2))],
        )];

        let out = aggregate_futures(&series);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].date, at(12, 28));
        assert_eq!(out[0].annualized_basis, Some(dec!(-365)));
        assert_eq!(out[0].open_interest, dec!(4));
    }

    #[test]
    fn test_intraday_rows_collapse_to_one_per_date() {
        let hour = |day: u32, h: u32| Utc.with_ymd_and_hms(2024, 12, day, h, 0, 0).unwrap();
        let series = vec![
            ContractSeries::new(
                contract("BTC-27DEC24"),
                vec![
                    row(hour(17, 12), dec!(300), dec!(9), dec!(99), dec!(99)),
                    row(hour(17, 0), dec!(100), dec!(2), dec!(10), dec!(5)),
                    row(hour(18, 0), dec!(101), dec!(2), dec!(11), dec!(6)),
                ],
            ),
            ContractSeries::new(
                contract("BTC-28MAR25"),
                vec![row(hour(17, 6), dec!(104), dec!(10), dec!(30), dec!(7))],
            ),
        ];

        let out = aggregate_futures(&series);
        let dates: Vec<Timestamp> = out.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![at(12, 17), at(12, 18)]);

        // 12:00 row ignored; 27DEC24 10 days and 28MAR25 101 days out
        assert_eq!(out[0].price, Some(dec!(102)));
        assert_eq!(out[0].open_interest, dec!(40));
        assert_eq!(out[0].volume, dec!(12));
        let dec_basis = dec!(2) * dec!(365) / dec!(10);
        let mar_basis = dec!(10) * dec!(365) / dec!(101);
        assert_eq!(out[0].annualized_basis, Some((dec_basis + mar_basis) / dec!(2)));
    }

    #[test]
    fn test_annualized_basis_formula_is_exact() {
        let series = vec![ContractSeries::new(
            contract("BTC-27DEC24"),
            vec![
                row(at(12, 17), dec!(100), dec!(2), dec!(1), dec!(1)),
                row(at(12, 24), dec!(100), dec!(0.3), dec!(1), dec!(1)),
            ],
        )];

        let out = aggregate_futures(&series);
        // 10 and 3 days out
        assert_eq!(out[0].annualized_basis, Some(dec!(2) * dec!(365) / dec!(10)));
        assert_eq!(out[1].annualized_basis, Some(dec!(0.3) * dec!(365) / dec!(3)));
    }

    #[test]
    fn test_contracts_combine_per_date() {
        let series = vec![
            ContractSeries::new(
                contract("BTC-27DEC24"),
                vec![row(at(12, 17), dec!(100), dec!(2), dec!(10), dec!(5))],
            ),
            ContractSeries::new(
                contract("BTC-28MAR25"),
                vec![
                    row(at(12, 17), dec!(104), dec!(10), dec!(30), dec!(7)),
                    row(at(12, 18), dec!(105), dec!(10), dec!(31), dec!(8)),
                ],
            ),
        ];

        let out = aggregate_futures(&series);
        assert_eq!(out.len(), 2);

        let first = &out[0];
        assert_eq!(first.date, at(12, 17));
        assert_eq!(first.price, Some(dec!(102)));
        assert_eq!(first.open_interest, dec!(40));
        assert_eq!(first.volume, dec!(12));
        // 27DEC24: 10 days out; 28MAR25: 101 days out
        let dec_basis = dec!(2) * dec!(365) / dec!(10);
        let mar_basis = dec!(10) * dec!(365) / dec!(101);
        assert_eq!(first.annualized_basis, Some((dec_basis + mar_basis) / dec!(2)));

        assert_eq!(out[1].date, at(12, 18));
        assert_eq!(out[1].price, Some(dec!(105)));
    }

    #[test]
    fn test_missing_values_do_not_dilute_means() {
        let series = vec![
            ContractSeries::new(
                contract("BTC-27DEC24"),
                vec![TimeSeriesRow::empty(at(12, 17)).with_price(dec!(100))],
            ),
            ContractSeries::new(
                contract("BTC-28MAR25"),
                vec![TimeSeriesRow::empty(at(12, 17)).with_open_interest(dec!(3))],
            ),
        ];

        let out = aggregate_futures(&series);
        assert_eq!(out[0].price, Some(dec!(100)));
        assert_eq!(out[0].annualized_basis, None);
        assert_eq!(out[0].open_interest, dec!(3));
        assert_eq!(out[0].volume, Decimal::ZERO);
    }

    #[test]
    fn test_contract_series_keeps_expiry() {
        let series = ContractSeries::new(contract("ETH-5JAN24"), Vec::new());
        assert_eq!(series.contract.expiry, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert!(aggregate_futures(&[series]).is_empty());
    }
}
