use async_trait::async_trait;
use log::{error, info, warn};
use serde::Deserialize;
use std::collections::HashSet;
use tenor_core::{Currency, InstrumentKind, InstrumentRef};
use tenor_ports::{Universe, UniverseSource};

use super::rest_client::RestClient;

const INSTRUMENTS_PATH: &str = "/analytics/futures/instruments";

#[derive(Debug, Deserialize)]
struct ListingResponse {
    #[serde(default)]
    data: Vec<ListingEntry>,
}

/// One row of the instrument listing
#[derive(Debug, Clone, Deserialize)]
struct ListingEntry {
    market: String,
    instrument: String,
    #[serde(default)]
    currency: Option<String>,
    #[serde(rename = "type", default)]
    kind: Option<String>,
}

/// Resolves the instrument universe from the listing endpoint
///
/// The full listing is fetched once per query and filtered client-side.
/// Failures are logged and reported as an empty universe.
#[derive(Clone)]
pub struct InstrumentUniverse {
    client: RestClient,
}

impl InstrumentUniverse {
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }

    pub async fn resolve(
        &self,
        currency: Option<Currency>,
        kind: Option<InstrumentKind>,
    ) -> Universe {
        let listing = match self
            .client
            .get_json::<ListingResponse>(INSTRUMENTS_PATH, &[])
            .await
        {
            Ok(listing) => listing,
            Err(e) => {
                error!("An error occurred while fetching instruments: {}", e);
                return Universe::empty();
            }
        };

        if listing.data.is_empty() {
            warn!("No data returned from instrument listing");
            return Universe::empty();
        }

        let universe = Universe::new(select(&listing.data, currency, kind));
        if universe.is_empty() {
            warn!(
                "Instrument listing has no match for currency={:?} type={:?}",
                currency, kind
            );
        } else {
            info!(
                "Resolved {} instrument(s) for currency={:?} type={:?}",
                universe.len(),
                currency,
                kind
            );
        }
        universe
    }
}

#[async_trait]
impl UniverseSource for InstrumentUniverse {
    async fn resolve(
        &self,
        currency: Option<Currency>,
        kind: Option<InstrumentKind>,
    ) -> Universe {
        InstrumentUniverse::resolve(self, currency, kind).await
    }
}

/// Filter, project and deduplicate listing rows
///
/// The currency/type columns are carried only when not filtered on.
fn select(
    entries: &[ListingEntry],
    currency: Option<Currency>,
    kind: Option<InstrumentKind>,
) -> Vec<InstrumentRef> {
    let mut seen = HashSet::new();

    entries
        .iter()
        .filter(|e| currency.is_none_or(|c| e.currency.as_deref() == Some(c.as_str())))
        .filter(|e| kind.is_none_or(|k| e.kind.as_deref() == Some(k.as_str())))
        .map(|e| InstrumentRef {
            market: e.market.clone(),
            symbol: e.instrument.clone(),
            currency: if currency.is_none() {
                e.currency.clone()
            } else {
                None
            },
            kind: if kind.is_none() { e.kind.clone() } else { None },
        })
        .filter(|r| seen.insert(r.clone()))
        .collect()
}
