// ABOUTME: Orchestration of the four scrape categories on top of the API client and page parsers.
// ABOUTME: Batch operations fan out with bounded concurrency and keep one isolated outcome per target.

use std::collections::{HashSet, VecDeque};

use futures::stream::{self, StreamExt};
use simweb_parse::{
    collect_urls, is_valid_domain, normalize_domain, parse_comparison, parse_profile, parse_trends,
    ComparisonResult, ParseError, SitemapKind, SitemapUrl, TrendCategory, TrendEntry,
    WebsiteProfile,
};
use tracing::{debug, info, warn};

use crate::client::ScrapflyClient;
use crate::config::ScrapeConfig;
use crate::error::ScrapeError;
use crate::urls::{compare_url, trends_url, website_url};

/// Fewest distinct domains a comparison page needs.
pub const MIN_COMPARE_DOMAINS: usize = 2;

/// Most domains a single comparison page can hold.
pub const MAX_COMPARE_DOMAINS: usize = 5;

/// How many levels of sitemap index below the root are followed.
pub const MAX_SITEMAP_DEPTH: usize = 3;

/// Result of scraping one target of a batch.
#[derive(Debug)]
pub struct Outcome<T> {
    /// The domain or category as the caller supplied it.
    pub target: String,
    pub result: Result<T, ScrapeError>,
}

impl<T> Outcome<T> {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// High-level scraper for Similarweb pages.
#[derive(Debug, Clone)]
pub struct Scraper {
    client: ScrapflyClient,
    base: ScrapeConfig,
}

impl Scraper {
    pub fn new(client: ScrapflyClient) -> Self {
        Self {
            client,
            base: ScrapeConfig::default(),
        }
    }

    /// Template every request is cloned from (country, session, headers...).
    pub fn with_base_config(mut self, base: ScrapeConfig) -> Self {
        self.base = base;
        self
    }

    pub fn client(&self) -> &ScrapflyClient {
        &self.client
    }

    /// Fetches and parses one website profile.
    pub async fn scrape_website(&self, domain: &str) -> Result<WebsiteProfile, ScrapeError> {
        if !is_valid_domain(domain) {
            return Err(ScrapeError::InvalidTarget(format!("not a domain: {:?}", domain)));
        }
        let url = website_url(domain);
        let response = self.client.scrape(&self.base.with_url(&url)).await?;
        parse_profile(&response.content).map_err(|e| ScrapeError::parse(url, e))
    }

    /// Scrapes each domain's profile; outcomes come back in the order given.
    pub async fn scrape_websites<S: AsRef<str>>(&self, domains: &[S]) -> Vec<Outcome<WebsiteProfile>> {
        let outcomes: Vec<_> = stream::iter(domains)
            .map(|domain| {
                let target: &str = domain.as_ref();
                let target = target.to_string();
                async move {
                    let result = self.scrape_website(&target).await;
                    Outcome { target, result }
                }
            })
            .buffered(self.client.concurrency())
            .collect()
            .await;
        log_batch("websites", &outcomes);
        outcomes
    }

    /// Fetches one comparison page for two to five distinct domains.
    pub async fn scrape_comparison<S: AsRef<str>>(
        &self,
        domains: &[S],
    ) -> Result<ComparisonResult, ScrapeError> {
        if let Some(bad) = domains.iter().map(AsRef::<str>::as_ref).find(|d| !is_valid_domain(d)) {
            return Err(ScrapeError::InvalidTarget(format!("not a domain: {:?}", bad)));
        }
        let distinct: HashSet<String> = domains
            .iter()
            .map(|d| normalize_domain(d.as_ref()))
            .collect();
        if !(MIN_COMPARE_DOMAINS..=MAX_COMPARE_DOMAINS).contains(&distinct.len()) {
            return Err(ScrapeError::InvalidTarget(format!(
                "a comparison takes {} to {} distinct domains, got {}",
                MIN_COMPARE_DOMAINS,
                MAX_COMPARE_DOMAINS,
                distinct.len()
            )));
        }

        let url = compare_url(domains);
        let response = self.client.scrape(&self.base.with_url(&url)).await?;
        let result =
            parse_comparison(&response.content, domains).map_err(|e| ScrapeError::parse(&url, e))?;
        if result.sites.len() < distinct.len() {
            warn!(
                url = %url,
                requested = distinct.len(),
                found = result.sites.len(),
                "comparison page is missing some domains"
            );
        }
        Ok(result)
    }

    /// Fetches one trending-websites ranking. The page needs JavaScript rendering.
    pub async fn scrape_trend(&self, category: &str) -> Result<Vec<TrendEntry>, ScrapeError> {
        let slug = category
            .parse::<TrendCategory>()
            .map_err(|_| ScrapeError::InvalidTarget(format!("unknown trend category: {:?}", category)))?
            .slug();
        let url = trends_url(slug);
        let cfg = self.base.with_url(&url).render_js(true);
        let response = self.client.scrape(&cfg).await?;
        parse_trends(&response.content, slug).map_err(|e| ScrapeError::parse(url, e))
    }

    /// Scrapes each category's ranking; outcomes come back in the order given.
    pub async fn scrape_trends<S: AsRef<str>>(&self, categories: &[S]) -> Vec<Outcome<Vec<TrendEntry>>> {
        let outcomes: Vec<_> = stream::iter(categories)
            .map(|category| {
                let target: &str = category.as_ref();
                let target = target.to_string();
                async move {
                    let result = self.scrape_trend(&target).await;
                    Outcome { target, result }
                }
            })
            .buffered(self.client.concurrency())
            .collect()
            .await;
        log_batch("trends", &outcomes);
        outcomes
    }

    /// Collects page URLs from a sitemap, following index documents breadth first.
    ///
    /// Each sitemap is fetched at most once and indexes are followed at most
    /// [`MAX_SITEMAP_DEPTH`] levels deep. Once `limit` URLs are collected no
    /// further sitemap is fetched. A failing root is an error; failing child
    /// sitemaps are logged and skipped.
    pub async fn scrape_sitemaps(
        &self,
        url: &str,
        limit: Option<usize>,
    ) -> Result<Vec<SitemapUrl>, ScrapeError> {
        let root = SitemapUrl::parse(url)
            .map_err(|_| ScrapeError::InvalidTarget(format!("not a sitemap URL: {:?}", url)))?;

        let mut queue = VecDeque::from([(root.as_str().to_string(), 0usize)]);
        let mut visited = HashSet::new();
        let mut urls: Vec<SitemapUrl> = Vec::new();

        while let Some((sitemap, depth)) = queue.pop_front() {
            let remaining = limit.map(|l| l.saturating_sub(urls.len()));
            if remaining == Some(0) {
                break;
            }
            if !visited.insert(sitemap.clone()) {
                continue;
            }

            match self.read_sitemap(&sitemap, remaining).await {
                Ok((SitemapKind::Leaf, found)) => {
                    debug!(sitemap = %sitemap, urls = found.len(), "sitemap read");
                    urls.extend(found);
                }
                Ok((SitemapKind::Index, children)) if depth < MAX_SITEMAP_DEPTH => {
                    debug!(sitemap = %sitemap, children = children.len(), "sitemap index read");
                    queue.extend(
                        children
                            .into_iter()
                            .map(|child| (child.as_str().to_string(), depth + 1)),
                    );
                }
                Ok((SitemapKind::Index, _)) => {
                    warn!(sitemap = %sitemap, depth, "sitemap index nested too deep, skipping");
                }
                Err(err) if depth == 0 => return Err(err),
                Err(err) => {
                    warn!(sitemap = %sitemap, error = %err, "skipping unreadable sitemap");
                }
            }
        }

        info!(root = %root, urls = urls.len(), "sitemap collection finished");
        Ok(urls)
    }

    /// Fetches one sitemap and returns its kind and up to `limit` valid locations.
    async fn read_sitemap(
        &self,
        url: &str,
        limit: Option<usize>,
    ) -> Result<(SitemapKind, Vec<SitemapUrl>), ScrapeError> {
        let response = self.client.scrape(&self.base.with_url(url)).await?;
        let locations = collect_urls(&response.content, None).map_err(|e| ScrapeError::parse(url, e))?;
        let kind = locations.kind();
        let take = match kind {
            SitemapKind::Leaf => limit.unwrap_or(usize::MAX),
            SitemapKind::Index => usize::MAX,
        };

        let mut found = Vec::new();
        for item in locations {
            if found.len() >= take {
                break;
            }
            match item {
                Ok(loc) => found.push(loc),
                Err(ParseError::InvalidUrl(loc)) => {
                    debug!(sitemap = url, loc = %loc, "skipping invalid sitemap location");
                }
                Err(err) => return Err(ScrapeError::parse(url, err)),
            }
        }
        Ok((kind, found))
    }
}

fn log_batch<T>(what: &str, outcomes: &[Outcome<T>]) {
    let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
    for outcome in outcomes {
        if let Err(ref err) = outcome.result {
            debug!(target_name = %outcome.target, error = %err, "target failed");
        }
    }
    info!(
        batch = what,
        total = outcomes.len(),
        succeeded = outcomes.len() - failed,
        failed,
        "batch finished"
    );
}
