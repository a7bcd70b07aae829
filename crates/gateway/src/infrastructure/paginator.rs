use chrono::NaiveDate;
use log::{debug, error, warn};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tenor_core::{DATE_FORMAT, Granularity};
use tenor_ports::FetchError;

use super::rest_client::RestClient;
use crate::config::ApiConfig;

/// Pagination metadata of one response
///
/// Endpoints disagree on which count they report: futures send
/// `total_pages`, perpetuals and options send `total` (optionally with
/// `items_per_page`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PageMeta {
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub total_pages: Option<u64>,
    #[serde(default)]
    pub items_per_page: Option<u64>,
}

impl PageMeta {
    /// Number of pages to request, if the metadata says
    pub fn page_count(&self, page_size: u32) -> Option<u32> {
        if let Some(pages) = self.total_pages {
            return u32::try_from(pages).ok();
        }
        let total = self.total?;
        let per_page = self
            .items_per_page
            .filter(|n| *n > 0)
            .unwrap_or(u64::from(page_size.max(1)));
        u32::try_from(total.div_ceil(per_page)).ok()
    }
}

/// One response page
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub items: Vec<Value>,
    #[serde(default)]
    pub meta: PageMeta,
}

/// What to page through: one instrument endpoint over an inclusive range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub path: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub granularity: Granularity,
    /// Perpetual endpoints need `legacy=true` to return the flat shape
    pub legacy: bool,
}

impl PageRequest {
    fn query(&self, page_size: u32, page: u32) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("start", self.start.format(DATE_FORMAT).to_string()),
            ("end", self.end.format(DATE_FORMAT).to_string()),
            ("granularity", self.granularity.as_str().to_string()),
            ("limit", page_size.to_string()),
            ("page", page.to_string()),
        ];
        if self.legacy {
            query.push(("legacy", "true".to_string()));
        }
        query
    }
}

/// Request pacing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    /// Before every page request
    pub request_delay: Duration,
    /// Before the one retry of a failed request
    pub retry_backoff: Duration,
}

impl From<&ApiConfig> for Pacing {
    fn from(config: &ApiConfig) -> Self {
        Self {
            request_delay: config.request_delay(),
            retry_backoff: config.retry_backoff(),
        }
    }
}

/// Fetches every page of one instrument, strictly in page order
///
/// No caching at this layer. A request that fails is retried exactly once
/// after the backoff; a second failure fails the whole fetch.
#[derive(Clone)]
pub struct PaginatedFetcher {
    client: RestClient,
    page_size: u32,
    pacing: Pacing,
}

impl PaginatedFetcher {
    pub fn new(client: RestClient, page_size: u32, pacing: Pacing) -> Self {
        Self {
            client,
            page_size: page_size.max(1),
            pacing,
        }
    }

    pub fn from_config(client: RestClient, config: &ApiConfig) -> Self {
        Self::new(client, config.page_size, Pacing::from(config))
    }

    /// All raw items of the request, concatenated in arrival order
    pub async fn fetch_all(&self, request: &PageRequest) -> Result<Vec<Value>, FetchError> {
        let first = self.fetch_page(request, 1).await?;
        let mut items = first.items;

        let pages = match first.meta.page_count(self.page_size) {
            Some(pages) => pages,
            // A short first page is complete even without a count
            None if (items.len() as u64) < u64::from(self.page_size) => 1,
            None => {
                return Err(FetchError::MissingPageCount {
                    url: self.client.url(&request.path),
                    page: 1,
                });
            }
        };

        for page in 2..=pages {
            let next = self.fetch_page(request, page).await?;
            items.extend(next.items);
        }

        debug!(
            "Fetched {} items over {} page(s) from {}",
            items.len(),
            pages.max(1),
            request.path
        );
        Ok(items)
    }

    async fn fetch_page(&self, request: &PageRequest, page: u32) -> Result<Page, FetchError> {
        let query = request.query(self.page_size, page);
        tokio::time::sleep(self.pacing.request_delay).await;

        debug!("GET {} page {}", request.path, page);
        let first_err = match self.client.get_json::<Page>(&request.path, &query).await {
            Ok(page) => return Ok(page),
            Err(e) => e,
        };

        warn!(
            "Error ({}, page {}): {}; retrying in {:?}",
            request.path, page, first_err, self.pacing.retry_backoff
        );
        tokio::time::sleep(self.pacing.retry_backoff).await;

        self.client
            .get_json::<Page>(&request.path, &query)
            .await
            .map_err(|e| {
                error!("Error second try ({}, page {}): {}", request.path, page, e);
                FetchError::RetryExhausted {
                    url: self.client.url(&request.path),
                    reason: e.to_string(),
                }
            })
    }
}
