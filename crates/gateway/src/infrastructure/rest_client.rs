use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;

use crate::config::ApiConfig;
use crate::error::RestError;

/// REST API client for the derivatives history API
/// Infrastructure component - handles HTTP communication
#[derive(Clone)]
pub struct RestClient {
    client: Client,
    base_url: String,
}

impl RestClient {
    /// Build a client from config
    ///
    /// The timeout and the `apiKey` header apply to every request. A key that
    /// is not a valid header value is rejected here.
    pub fn new(config: &ApiConfig, api_key: impl Into<String>) -> Result<Self, RestError> {
        let mut key = HeaderValue::from_str(&api_key.into())?;
        key.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert("apiKey", key);

        let client = Client::builder()
            .timeout(config.timeout())
            .default_headers(headers)
            .build()?;
        Ok(RestClient {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Absolute URL for an API path
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET a JSON document
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, RestError> {
        let resp = self
            .client
            .get(self.url(path))
            .query(query)
            .send()
            .await?;

        self.handle_response(resp).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, RestError> {
        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            return Err(RestError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str(&text).map_err(|e| RestError::Parse(e.to_string()))
    }
}
