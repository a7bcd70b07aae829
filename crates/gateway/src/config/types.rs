use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Remote API settings
///
/// Built once by the caller and handed to the gateway components; nothing
/// here is read from process-wide state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API root, without trailing slash
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Items requested per page
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Pause before every page request (source-side rate limit)
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    /// Pause before the single retry of a failed request
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Per-request transport timeout
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

fn default_base_url() -> String {
    "https://api.laevitas.ch".to_string()
}

fn default_page_size() -> u32 {
    144
}

fn default_request_delay_ms() -> u64 {
    2_000
}

fn default_retry_backoff_ms() -> u64 {
    5_000
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_api_key_env() -> String {
    "TENOR_API_KEY".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            page_size: default_page_size(),
            request_delay_ms: default_request_delay_ms(),
            retry_backoff_ms: default_retry_backoff_ms(),
            timeout_ms: default_timeout_ms(),
            api_key_env: default_api_key_env(),
        }
    }
}

impl ApiConfig {
    /// Config pointing at `base_url` with no pacing (local servers, tests)
    pub fn unpaced(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            request_delay_ms: 0,
            retry_backoff_ms: 0,
            ..Default::default()
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
