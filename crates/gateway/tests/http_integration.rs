//! Integration test: HTTP history source <-> in-process mock API
//!
//! Tests the full fetch path:
//! HttpHistorySource -> PaginatedFetcher -> RestClient -> axum mock
//! and back through the RecordNormalizer.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal_macros::dec;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tenor_core::{Currency, Granularity, InstrumentKind, InstrumentRef};
use tenor_gateway::{ApiConfig, HttpHistorySource};
use tenor_ports::{FetchError, HistoryError, HistoryRequest, HistorySource, UniverseSource};

const API_KEY: &str = "test-key";

// ============================================================================
// Mock API
// ============================================================================

#[derive(Clone, Default)]
struct MockApi {
    /// (symbol, page) of every request, in arrival order
    hits: Arc<Mutex<Vec<(String, u32)>>>,
    /// Remaining forced failures per (symbol, page)
    failures: Arc<Mutex<HashMap<(String, u32), u32>>>,
    /// Instrument listing; `None` makes the listing endpoint fail
    listing: Arc<Mutex<Option<Value>>>,
}

impl MockApi {
    fn fail(&self, symbol: &str, page: u32, times: u32) {
        self.failures
            .lock()
            .unwrap()
            .insert((symbol.to_string(), page), times);
    }

    fn hits(&self) -> Vec<(String, u32)> {
        self.hits.lock().unwrap().clone()
    }

    /// Record the hit and decide whether to inject a failure
    fn should_fail(&self, symbol: &str, page: u32) -> bool {
        self.hits.lock().unwrap().push((symbol.to_string(), page));
        let mut failures = self.failures.lock().unwrap();
        match failures.get_mut(&(symbol.to_string(), page)) {
            Some(left) if *left > 0 => {
                *left -= 1;
                true
            }
            _ => false,
        }
    }
}

fn day_millis(q: &HashMap<String, String>) -> Vec<i64> {
    let start = NaiveDate::parse_from_str(&q["start"], "%Y-%m-%d").unwrap();
    let end = NaiveDate::parse_from_str(&q["end"], "%Y-%m-%d").unwrap();
    start
        .iter_days()
        .take_while(|d| *d <= end)
        .map(|d| tenor_core::day_start(d).timestamp_millis())
        .collect()
}

fn page_slice<T: Clone>(all: &[T], q: &HashMap<String, String>) -> (Vec<T>, usize) {
    let limit: usize = q["limit"].parse().unwrap();
    let page: usize = q["page"].parse().unwrap();
    let slice = all
        .iter()
        .skip((page - 1) * limit)
        .take(limit)
        .cloned()
        .collect();
    (slice, limit)
}

async fn perpetuals(
    State(api): State<MockApi>,
    headers: HeaderMap,
    Path((_market, symbol)): Path<(String, String)>,
    Query(q): Query<HashMap<String, String>>,
) -> Response {
    if headers.get("apikey").and_then(|v| v.to_str().ok()) != Some(API_KEY) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if symbol == "SLOW" {
        tokio::time::sleep(Duration::from_secs(2)).await;
    }
    let page: u32 = q["page"].parse().unwrap();
    if api.should_fail(&symbol, page) {
        return (StatusCode::TOO_MANY_REQUESTS, "rate limited").into_response();
    }
    assert_eq!(q.get("legacy").map(String::as_str), Some("true"));

    let days = if symbol == "EMPTY" { vec![] } else { day_millis(&q) };
    let items: Vec<Value> = days
        .iter()
        .enumerate()
        .map(|(i, ms)| {
            json!({
                "date": ms,
                "price": 100 + i as i64,
                "open_interest": 10,
                "volume": 5,
                "basis": null,
                "funding": 0.0001,
                "long_short_ratio": 1.5
            })
        })
        .collect();
    let (page_items, _) = page_slice(&items, &q);
    Json(json!({"items": page_items, "meta": {"total": items.len()}})).into_response()
}

async fn futures(
    State(api): State<MockApi>,
    Path((_market, symbol)): Path<(String, String)>,
    Query(q): Query<HashMap<String, String>>,
) -> Response {
    let page: u32 = q["page"].parse().unwrap();
    if api.should_fail(&symbol, page) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    let items: Vec<Value> = day_millis(&q)
        .iter()
        .map(|ms| json!({"date": ms, "points": {"0": {"p": 64000, "oi": 7, "v": 3, "b": 2.5, "y": 9.1}}}))
        .collect();
    let (page_items, limit) = page_slice(&items, &q);
    let total_pages = items.len().div_ceil(limit);
    Json(json!({"items": page_items, "meta": {"total_pages": total_pages}})).into_response()
}

async fn instruments(State(api): State<MockApi>) -> Response {
    match api.listing.lock().unwrap().clone() {
        Some(listing) => Json(listing).into_response(),
        None => StatusCode::SERVICE_UNAVAILABLE.into_response(),
    }
}

async fn spawn_mock(api: MockApi) -> String {
    let app = Router::new()
        .route(
            "/historical/derivs/perpetuals/{market}/{symbol}",
            get(perpetuals),
        )
        .route("/historical/derivs/futures/{market}/{symbol}", get(futures))
        .route("/analytics/futures/instruments", get(instruments))
        .with_state(api);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn source(api: &MockApi, page_size: u32) -> HttpHistorySource {
    let base = spawn_mock(api.clone()).await;
    let config = ApiConfig::unpaced(base).with_page_size(page_size);
    HttpHistorySource::from_config(&config, API_KEY).unwrap()
}

fn request(kind: InstrumentKind, start: (u32, u32), end: (u32, u32)) -> HistoryRequest {
    HistoryRequest::new(
        kind,
        NaiveDate::from_ymd_opt(2024, start.0, start.1).unwrap(),
        NaiveDate::from_ymd_opt(2024, end.0, end.1).unwrap(),
        Granularity::Day1,
    )
}

// ============================================================================
// Pagination
// ============================================================================

#[tokio::test]
async fn test_pages_concatenate_in_order() {
    let _ = env_logger::try_init();
    let api = MockApi::default();
    let source = source(&api, 2).await;

    let perp = InstrumentRef::new("DERIBIT", "BTC-PERPETUAL");
    let rows = source
        .fetch_history(&perp, &request(InstrumentKind::Perpetual, (10, 1), (10, 5)))
        .await
        .unwrap();

    assert_eq!(rows.len(), 5);
    assert!(rows.windows(2).all(|w| w[0].date < w[1].date));
    assert_eq!(rows[0].date, Utc.with_ymd_and_hms(2024, 10, 1, 0, 0, 0).unwrap());
    assert_eq!(rows[4].price, Some(dec!(104)));
    assert_eq!(rows[0].basis, None);
    assert_eq!(rows[0].funding, Some(dec!(0.0001)));

    let pages: Vec<u32> = api.hits().into_iter().map(|(_, p)| p).collect();
    assert_eq!(pages, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_futures_use_total_pages_and_point_map_shape() {
    let api = MockApi::default();
    let source = source(&api, 3).await;

    let fut = InstrumentRef::new("DERIBIT", "BTC-27DEC24");
    let rows = source
        .fetch_history(&fut, &request(InstrumentKind::Future, (10, 1), (10, 7)))
        .await
        .unwrap();

    assert_eq!(rows.len(), 7);
    assert_eq!(rows[0].basis, Some(dec!(2.5)));
    assert_eq!(rows[0].yield_rate, Some(dec!(9.1)));
    assert_eq!(api.hits().len(), 3);
}

#[tokio::test]
async fn test_empty_range_is_empty_success() {
    let api = MockApi::default();
    let source = source(&api, 2).await;

    let rows = source
        .fetch_history(
            &InstrumentRef::new("OKX", "EMPTY"),
            &request(InstrumentKind::Perpetual, (10, 1), (10, 3)),
        )
        .await
        .unwrap();

    assert!(rows.is_empty());
    assert_eq!(api.hits().len(), 1);
}

// ============================================================================
// Retry policy
// ============================================================================

#[tokio::test]
async fn test_single_failure_is_retried_once() {
    let api = MockApi::default();
    api.fail("BTC-PERP", 2, 1);
    let source = source(&api, 2).await;

    let rows = source
        .fetch_history(
            &InstrumentRef::new("OKX", "BTC-PERP"),
            &request(InstrumentKind::Perpetual, (10, 1), (10, 4)),
        )
        .await
        .unwrap();

    assert_eq!(rows.len(), 4);
    let pages: Vec<u32> = api.hits().into_iter().map(|(_, p)| p).collect();
    assert_eq!(pages, vec![1, 2, 2]);
}

#[tokio::test]
async fn test_second_failure_is_fetch_failure_not_empty() {
    let api = MockApi::default();
    api.fail("BTC-PERP", 2, 2);
    let source = source(&api, 2).await;

    let err = source
        .fetch_history(
            &InstrumentRef::new("OKX", "BTC-PERP"),
            &request(InstrumentKind::Perpetual, (10, 1), (10, 4)),
        )
        .await
        .unwrap_err();

    match err {
        HistoryError::Fetch(FetchError::RetryExhausted { url, reason }) => {
            assert!(url.ends_with("/historical/derivs/perpetuals/OKX/BTC-PERP"));
            assert!(reason.contains("429"));
        }
        other => panic!("expected fetch failure, got {other:?}"),
    }
    // Page 2 tried twice, page 3 never requested
    let pages: Vec<u32> = api.hits().into_iter().map(|(_, p)| p).collect();
    assert_eq!(pages, vec![1, 2, 2]);
}

#[tokio::test]
async fn test_missing_api_key_is_rejected() {
    let api = MockApi::default();
    let base = spawn_mock(api.clone()).await;
    let source = HttpHistorySource::from_config(&ApiConfig::unpaced(base), "wrong").unwrap();

    let err = source
        .fetch_history(
            &InstrumentRef::new("OKX", "BTC-PERP"),
            &request(InstrumentKind::Perpetual, (10, 1), (10, 2)),
        )
        .await
        .unwrap_err();
    assert!(err.is_fetch_failure());
}

#[tokio::test]
async fn test_timeout_counts_as_fetch_failure() {
    let api = MockApi::default();
    let base = spawn_mock(api.clone()).await;
    let config = ApiConfig {
        timeout_ms: 100,
        ..ApiConfig::unpaced(base)
    };
    let source = HttpHistorySource::from_config(&config, API_KEY).unwrap();

    let err = source
        .fetch_history(
            &InstrumentRef::new("OKX", "SLOW"),
            &request(InstrumentKind::Perpetual, (10, 1), (10, 2)),
        )
        .await
        .unwrap_err();

    assert!(err.is_fetch_failure());
}

// ============================================================================
// Instrument universe
// ============================================================================

#[tokio::test]
async fn test_universe_filters_listing() {
    let api = MockApi::default();
    *api.listing.lock().unwrap() = Some(json!({"data": [
        {"market": "OKX", "instrument": "BTC-PERP", "currency": "BTC", "type": "perpetual"},
        {"market": "DERIBIT", "instrument": "BTC-PERPETUAL", "currency": "BTC", "type": "perpetual"},
        {"market": "DERIBIT", "instrument": "BTC-27DEC24", "currency": "BTC", "type": "future"},
        {"market": "DERIBIT", "instrument": "ETH-PERPETUAL", "currency": "ETH", "type": "perpetual"}
    ]}));
    let source = source(&api, 2).await;

    let universe = source
        .resolve(Some(Currency::Btc), Some(InstrumentKind::Perpetual))
        .await;

    assert_eq!(
        universe.instruments(),
        &[
            InstrumentRef::new("OKX", "BTC-PERP"),
            InstrumentRef::new("DERIBIT", "BTC-PERPETUAL"),
        ]
    );
}

#[tokio::test]
async fn test_universe_failure_is_empty() {
    let api = MockApi::default();
    let source = source(&api, 2).await;

    let universe = source.resolve(Some(Currency::Btc), None).await;
    assert!(universe.is_empty());

    *api.listing.lock().unwrap() = Some(json!({"data": []}));
    let universe = source.resolve(Some(Currency::Btc), None).await;
    assert!(universe.is_empty());
}
