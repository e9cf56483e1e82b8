// ABOUTME: Fetch and orchestration layer for the Similarweb scraper.
// ABOUTME: Talks to the Scrapfly API, retries transient failures, and feeds pages to simweb-parse.

pub mod client;
pub mod config;
pub mod error;
pub mod options;
pub mod retry;
pub mod scrape;
pub mod urls;

pub use client::{ScrapeResponse, ScrapflyClient};
pub use config::ScrapeConfig;
pub use error::{ErrorCode, FetchError, ScrapeError};
pub use options::{ClientBuilder, Options, API_KEY_ENV, DEFAULT_API_URL};
pub use retry::RetryPolicy;
pub use scrape::{Outcome, Scraper, MAX_COMPARE_DOMAINS, MAX_SITEMAP_DEPTH, MIN_COMPARE_DOMAINS};
pub use urls::{compare_url, trends_url, website_url, BASE_URL, SITEMAP_INDEX_URL, TRENDING_SITEMAP_URL};
