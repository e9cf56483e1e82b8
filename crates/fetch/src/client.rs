// ABOUTME: Async client for the Scrapfly scraping API: request building, response decoding, error classification.
// ABOUTME: Each scrape goes through the configured RetryPolicy; binary and gzip payloads are decoded to text.

use std::io::Read;

use base64::prelude::{Engine as _, BASE64_STANDARD};
use flate2::read::GzDecoder;
use serde::Deserialize;
use tracing::debug;

use crate::config::ScrapeConfig;
use crate::error::FetchError;
use crate::options::Options;
use crate::retry::RetryPolicy;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Content of one successfully scraped page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeResponse {
    /// URL the content was finally served from.
    pub url: String,
    /// Status code the target site answered with.
    pub status_code: u16,
    pub content: String,
}

#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    result: ApiResult,
}

#[derive(Debug, Default, Deserialize)]
struct ApiResult {
    content: Option<String>,
    status_code: Option<u16>,
    success: Option<bool>,
    url: Option<String>,
    format: Option<String>,
    error: Option<ApiError>,
}

/// Error object, either at the top level of a failed API call or inside `result`.
#[derive(Debug, Default, Deserialize)]
struct ApiError {
    code: Option<String>,
    message: Option<String>,
    retryable: Option<bool>,
    http_code: Option<u16>,
}

/// Client for the scraping API. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ScrapflyClient {
    http: reqwest::Client,
    api_key: String,
    api_url: String,
    retry: RetryPolicy,
    concurrency: usize,
}

impl ScrapflyClient {
    pub fn builder() -> crate::options::ClientBuilder {
        crate::options::ClientBuilder::new()
    }

    pub(crate) fn new(opts: Options) -> Result<Self, FetchError> {
        let http = match opts.http_client {
            Some(client) => client,
            None => reqwest::Client::builder()
                .timeout(opts.timeout)
                .user_agent(concat!("simweb/", env!("CARGO_PKG_VERSION")))
                .build()
                .map_err(|e| FetchError::config("Build", Some(e.into())))?,
        };

        Ok(Self {
            http,
            api_key: opts.api_key.unwrap_or_default().trim().to_string(),
            api_url: opts.api_url,
            retry: opts.retry,
            concurrency: opts.concurrency.max(1),
        })
    }

    /// Maximum requests in flight for batch operations.
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Scrapes one page, retrying retryable failures per the client's policy.
    pub async fn scrape(&self, cfg: &ScrapeConfig) -> Result<ScrapeResponse, FetchError> {
        self.retry.run(move || self.scrape_once(cfg)).await
    }

    /// Makes exactly one API call.
    pub async fn scrape_once(&self, cfg: &ScrapeConfig) -> Result<ScrapeResponse, FetchError> {
        let target = cfg.url.as_str();
        validate_target(target)?;

        let mut query = vec![("key".to_string(), self.api_key.clone())];
        query.extend(cfg.query_pairs());

        debug!(url = target, render_js = cfg.render_js, "scrape request");
        let response = self
            .http
            .get(&self.api_url)
            .query(&query)
            .send()
            .await
            .map_err(|e| transport_error(target, e))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| transport_error(target, e))?;

        if !(200..300).contains(&status) {
            let api_err: ApiError = serde_json::from_str(&body).unwrap_or_default();
            return Err(api_failure(target, status, api_err));
        }

        let envelope: ApiEnvelope = serde_json::from_str(&body).map_err(|e| {
            FetchError::decode(target, "Scrape", Some(anyhow::anyhow!("API response: {}", e)))
        })?;
        let result = envelope.result;

        let status_code = result.status_code.unwrap_or(200);
        if result.success == Some(false) || status_code >= 400 {
            return Err(target_failure(target, status_code, result.error));
        }

        let content = result.content.ok_or_else(|| {
            FetchError::decode(target, "Scrape", Some(anyhow::anyhow!("response has no content")))
        })?;
        let content = decode_content(target, result.format.as_deref(), content)?;
        debug!(url = target, status_code, bytes = content.len(), "scrape complete");

        Ok(ScrapeResponse {
            url: result.url.unwrap_or_else(|| target.to_string()),
            status_code,
            content,
        })
    }
}

fn validate_target(target: &str) -> Result<(), FetchError> {
    if target.is_empty() {
        return Err(FetchError::invalid_url(target, "Scrape", None));
    }
    let parsed = url::Url::parse(target).map_err(|e| {
        FetchError::invalid_url(target, "Scrape", Some(anyhow::anyhow!("invalid URL: {}", e)))
    })?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(FetchError::invalid_url(
            target,
            "Scrape",
            Some(anyhow::anyhow!("scheme must be http or https")),
        ));
    }
    Ok(())
}

fn transport_error(target: &str, err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::timeout(target, "Scrape", Some(err.into()))
    } else {
        FetchError::network(target, "Scrape", Some(err.into()))
    }
}

/// The API call itself failed (non-2xx from the API endpoint).
fn api_failure(target: &str, http_status: u16, api_err: ApiError) -> FetchError {
    if http_status == 401 {
        return FetchError::config(
            "Scrape",
            Some(anyhow::anyhow!(
                "API key rejected: {}",
                api_err.message.as_deref().unwrap_or("unauthorized")
            )),
        );
    }
    let http_status = api_err.http_code.unwrap_or(http_status);
    classify(target, http_status, api_err)
}

/// The API call worked but the target site did not yield a usable page.
fn target_failure(target: &str, status_code: u16, api_err: Option<ApiError>) -> FetchError {
    let api_err = api_err.unwrap_or_else(|| ApiError {
        message: Some(format!("target answered with status {}", status_code)),
        ..ApiError::default()
    });
    classify(target, status_code, api_err)
}

fn classify(target: &str, http_status: u16, api_err: ApiError) -> FetchError {
    let code = api_err.code.as_deref().unwrap_or("");
    let message = api_err.message.as_deref().unwrap_or("no message");
    let source = if code.is_empty() {
        Some(anyhow::anyhow!("HTTP {}: {}", http_status, message))
    } else {
        Some(anyhow::anyhow!("{} (HTTP {}): {}", code, http_status, message))
    };

    let err = if code.starts_with("ERR::ASP") {
        FetchError::blocked(target, "Scrape", source)
    } else if http_status == 429 || code.contains("THROTTLE") {
        FetchError::throttled(target, "Scrape", source)
    } else if http_status >= 500 {
        FetchError::network(target, "Scrape", source)
    } else {
        FetchError::upstream(target, "Scrape", source)
    };

    match api_err.retryable {
        Some(retryable) => err.with_retryable(retryable),
        None => err,
    }
}

fn decode_content(target: &str, format: Option<&str>, content: String) -> Result<String, FetchError> {
    if format != Some("binary") {
        return Ok(content);
    }

    let decode_err =
        |e: anyhow::Error| FetchError::decode(target, "Scrape", Some(e.context("binary content")));

    let bytes = BASE64_STANDARD
        .decode(content.trim())
        .map_err(|e| decode_err(e.into()))?;
    let bytes = if bytes.starts_with(&GZIP_MAGIC) {
        let mut inflated = Vec::new();
        GzDecoder::new(bytes.as_slice())
            .read_to_end(&mut inflated)
            .map_err(|e| decode_err(e.into()))?;
        inflated
    } else {
        bytes
    };
    String::from_utf8(bytes).map_err(|e| decode_err(e.into()))
}
