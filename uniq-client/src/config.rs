//! Client configuration

use std::time::Duration;

/// Default remote API base URL.
pub const DEFAULT_BASE_URL: &str = "https://dummyjson.com";

/// Environment variable overriding the API base URL.
pub const BASE_URL_ENV: &str = "UNIQ_API_BASE";

/// Client configuration for the catalog engine and gateways.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL (e.g. "https://dummyjson.com").
    pub base_url: String,

    /// Request timeout in seconds.
    pub timeout: u64,

    /// Fixed page size for the product listing.
    pub page_size: u32,

    /// Token lifetime requested at login, in minutes.
    pub token_expires_mins: u32,

    /// Quiet interval before a search keystroke reaches the engine.
    pub search_debounce: Duration,

    /// How long a transient notice stays visible before auto-dismissal.
    pub notice_duration: Duration,
}

impl ClientConfig {
    /// Create a new configuration for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: 30,
            page_size: 5,
            token_expires_mins: 60,
            search_debounce: Duration::from_millis(350),
            notice_duration: Duration::from_secs(3),
        }
    }

    /// Create a configuration from the environment, falling back to the
    /// default base URL when `UNIQ_API_BASE` is unset.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the page size.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the requested token lifetime.
    pub fn with_token_expires_mins(mut self, mins: u32) -> Self {
        self.token_expires_mins = mins;
        self
    }

    /// Set the search debounce interval.
    pub fn with_search_debounce(mut self, interval: Duration) -> Self {
        self.search_debounce = interval;
        self
    }

    /// Set the notice auto-dismiss duration.
    pub fn with_notice_duration(mut self, duration: Duration) -> Self {
        self.notice_duration = duration;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
