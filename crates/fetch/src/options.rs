// ABOUTME: Client options and the fluent ClientBuilder for the scraping API client.
// ABOUTME: Reads the API key from the environment and centralizes endpoint, timeout, retry, and fan-out settings.

use std::time::Duration;

use crate::client::ScrapflyClient;
use crate::error::FetchError;
use crate::retry::RetryPolicy;

/// Scraping API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.scrapfly.io/scrape";

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "SCRAPFLY_KEY";

/// Configuration options for [`ScrapflyClient`].
#[derive(Debug, Clone)]
pub struct Options {
    pub api_key: Option<String>,
    pub api_url: String,
    /// Per-request timeout. Anti-bot bypass with rendering can take minutes.
    pub timeout: Duration,
    pub retry: RetryPolicy,
    /// Maximum requests in flight for batch operations.
    pub concurrency: usize,
    pub http_client: Option<reqwest::Client>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(150),
            retry: RetryPolicy::default(),
            concurrency: 5,
            http_client: None,
        }
    }
}

/// Builder for constructing [`ScrapflyClient`] instances.
#[derive(Debug, Clone, Default)]
pub struct ClientBuilder {
    opts: Options,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from defaults with the API key taken from `SCRAPFLY_KEY`, if set.
    pub fn from_env() -> Self {
        let mut builder = Self::new();
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            builder.opts.api_key = Some(key);
        }
        builder
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.opts.api_key = Some(key.into());
        self
    }

    /// Point the client at another endpoint, e.g. a local mock server.
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.opts.api_url = url.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.opts.timeout = timeout;
        self
    }

    pub fn retry(mut self, policy: RetryPolicy) -> Self {
        self.opts.retry = policy;
        self
    }

    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.opts.concurrency = concurrency;
        self
    }

    /// Use a caller-supplied HTTP client instead of building one.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.opts.http_client = Some(client);
        self
    }

    /// Validates the options and builds the client.
    ///
    /// Fails with a `Config` error when the key is missing or blank, or the
    /// endpoint is not an absolute http(s) URL.
    pub fn build(self) -> Result<ScrapflyClient, FetchError> {
        let key = self
            .opts
            .api_key
            .as_deref()
            .map(str::trim)
            .unwrap_or_default();
        if key.is_empty() {
            return Err(FetchError::config(
                "Build",
                Some(anyhow::anyhow!("{} is not set", API_KEY_ENV)),
            ));
        }

        let endpoint = url::Url::parse(&self.opts.api_url).map_err(|e| {
            FetchError::config(
                "Build",
                Some(anyhow::anyhow!("invalid API URL {}: {}", self.opts.api_url, e)),
            )
        })?;
        if endpoint.scheme() != "http" && endpoint.scheme() != "https" {
            return Err(FetchError::config(
                "Build",
                Some(anyhow::anyhow!("API URL scheme must be http or https")),
            ));
        }

        ScrapflyClient::new(self.opts)
    }
}
