//! HTTP history source - fetches and normalizes one instrument's series

use async_trait::async_trait;
use log::debug;
use tenor_core::{Currency, InstrumentKind, InstrumentRef, TimeSeriesRow};
use tenor_ports::{
    FetchError, HistoryError, HistoryRequest, HistorySource, Universe, UniverseSource,
};

use crate::config::ApiConfig;
use crate::infrastructure::{
    InstrumentUniverse, PageRequest, PaginatedFetcher, RecordNormalizer, RestClient,
};

/// `HistorySource` + `UniverseSource` over the remote JSON API
pub struct HttpHistorySource {
    fetcher: PaginatedFetcher,
    normalizer: RecordNormalizer,
    universe: InstrumentUniverse,
}

impl HttpHistorySource {
    pub fn new(
        fetcher: PaginatedFetcher,
        normalizer: RecordNormalizer,
        universe: InstrumentUniverse,
    ) -> Self {
        Self {
            fetcher,
            normalizer,
            universe,
        }
    }

    /// Wire a client, fetcher, default normalizer and universe from config
    ///
    /// A client that cannot be built is reported as `FetchError::Client`.
    pub fn from_config(config: &ApiConfig, api_key: impl Into<String>) -> Result<Self, FetchError> {
        let client =
            RestClient::new(config, api_key).map_err(|e| FetchError::Client(e.to_string()))?;
        Ok(Self::new(
            PaginatedFetcher::from_config(client.clone(), config),
            RecordNormalizer::new(),
            InstrumentUniverse::new(client),
        ))
    }

    /// Endpoint for one instrument of the requested kind
    pub fn page_request(instrument: &InstrumentRef, request: &HistoryRequest) -> PageRequest {
        let (prefix, legacy) = match request.kind {
            InstrumentKind::Perpetual => ("/historical/derivs/perpetuals", true),
            InstrumentKind::Future => ("/historical/derivs/futures", false),
            InstrumentKind::Option => ("/historical/options", false),
        };
        PageRequest {
            path: format!("{}/{}/{}", prefix, instrument.market, instrument.symbol),
            start: request.start,
            end: request.end,
            granularity: request.granularity,
            legacy,
        }
    }
}

#[async_trait]
impl HistorySource for HttpHistorySource {
    async fn fetch_history(
        &self,
        instrument: &InstrumentRef,
        request: &HistoryRequest,
    ) -> Result<Vec<TimeSeriesRow>, HistoryError> {
        let page_request = Self::page_request(instrument, request);
        let items = self.fetcher.fetch_all(&page_request).await?;
        let rows = self.normalizer.normalize_all(&items)?;

        debug!("{}: {} row(s) normalized", instrument, rows.len());
        Ok(rows)
    }
}

#[async_trait]
impl UniverseSource for HttpHistorySource {
    async fn resolve(
        &self,
        currency: Option<Currency>,
        kind: Option<InstrumentKind>,
    ) -> Universe {
        self.universe.resolve(currency, kind).await
    }
}
