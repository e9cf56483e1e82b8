// ABOUTME: Record types produced by the page parsers.
// ABOUTME: WebsiteProfile, ComparisonResult, TrendEntry, and SitemapUrl, all serde-serializable.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ParseError;

/// Share of a site's traffic coming from one country.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CountryShare {
    /// ISO 3166 alpha-2 code or display name, as the page reports it.
    pub country: String,
    /// Percentage in `0..=100`.
    pub share: f64,
}

/// Traffic and engagement metrics for a single domain.
///
/// Ranks are positive when present; `None` means unranked. Percentages are
/// in `0..=100`. Missing metrics are `None` rather than zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebsiteProfile {
    pub domain: String,
    pub global_rank: Option<u64>,
    pub country_rank: Option<u64>,
    pub country: Option<String>,
    pub category: Option<String>,
    pub monthly_visits: Option<f64>,
    pub bounce_rate: Option<f64>,
    pub pages_per_visit: Option<f64>,
    /// Average visit duration in seconds.
    pub avg_visit_duration: Option<u32>,
    pub traffic_sources: BTreeMap<String, f64>,
    pub top_countries: Vec<CountryShare>,
    pub top_keywords: Vec<String>,
}

/// Side-by-side metrics for the requested domains, in requested order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub category: Option<String>,
    pub sites: Vec<WebsiteProfile>,
}

impl ComparisonResult {
    /// Domains present in the result, in order.
    pub fn domains(&self) -> Vec<&str> {
        self.sites.iter().map(|s| s.domain.as_str()).collect()
    }
}

/// One row of a trending-websites ranking.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendEntry {
    /// 1-based, dense within one parsed list.
    pub rank: u32,
    pub domain: String,
    pub category: String,
    /// Month-over-month rank change; positive means the site climbed.
    pub month_change: Option<i32>,
}

/// An absolute http(s) URL listed in a sitemap document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SitemapUrl(Url);

impl SitemapUrl {
    /// Parses and validates a sitemap location.
    pub fn parse(loc: &str) -> Result<Self, ParseError> {
        let url = Url::parse(loc.trim()).map_err(|_| ParseError::InvalidUrl(loc.to_string()))?;
        match url.scheme() {
            "http" | "https" if url.host_str().is_some() => Ok(SitemapUrl(url)),
            _ => Err(ParseError::InvalidUrl(loc.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn as_url(&self) -> &Url {
        &self.0
    }
}

impl fmt::Display for SitemapUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sitemap_url_requires_absolute_http() {
        assert!(SitemapUrl::parse("https://www.similarweb.com/website/google.com/").is_ok());
        assert!(SitemapUrl::parse("/website/google.com/").is_err());
        assert!(SitemapUrl::parse("ftp://example.com/file").is_err());
        assert!(SitemapUrl::parse("mailto:someone@example.com").is_err());
    }

    #[test]
    fn sitemap_url_serializes_as_string() {
        let url = SitemapUrl::parse("https://example.com/a").unwrap();
        let json = serde_json::to_string(&url).unwrap();
        assert_eq!(json, "\"https://example.com/a\"");
    }

    #[test]
    fn comparison_domains_in_order() {
        let result = ComparisonResult {
            category: None,
            sites: vec![
                WebsiteProfile {
                    domain: "b.com".into(),
                    ..Default::default()
                },
                WebsiteProfile {
                    domain: "a.com".into(),
                    ..Default::default()
                },
            ],
        };
        assert_eq!(result.domains(), vec!["b.com", "a.com"]);
    }
}
