// ABOUTME: Parses a multi-domain comparison page into a ComparisonResult.
// ABOUTME: Matches embedded site blocks to requested domains and keeps the caller's order.

use std::collections::HashMap;

use scraper::Html;
use serde::Deserialize;

use crate::app_data::extract_app_data;
use crate::domain::normalize_domain;
use crate::error::ParseError;
use crate::models::ComparisonResult;
use crate::profile::{build_profile, SiteData};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompareData {
    category: Option<String>,
    compared_sites: Option<Vec<SiteData>>,
}

/// Parses a comparison page for `requested` domains.
///
/// Sites come back in requested order. Requested domains the page does not
/// list are omitted rather than filled with empty records; a domain requested
/// twice appears once, at its first position.
pub fn parse_comparison<S: AsRef<str>>(
    html: &str,
    requested: &[S],
) -> Result<ComparisonResult, ParseError> {
    if html.trim().is_empty() {
        return Err(ParseError::Empty);
    }

    let doc = Html::parse_document(html);
    let data: CompareData = extract_app_data(&doc)?
        .ok_or_else(|| ParseError::missing("__APP_DATA__ script"))?;
    let blocks = data
        .compared_sites
        .ok_or_else(|| ParseError::missing("comparedSites"))?;

    let mut by_domain: HashMap<String, SiteData> = HashMap::new();
    for block in blocks {
        let Some(domain) = block.domain.as_deref().map(normalize_domain) else {
            continue;
        };
        by_domain.entry(domain).or_insert(block);
    }

    let mut sites = Vec::new();
    for wanted in requested {
        let key = normalize_domain(wanted.as_ref());
        // Removing on first match also drops repeated requests.
        if let Some(block) = by_domain.remove(&key) {
            sites.push(build_profile(block)?);
        }
    }

    let category = data
        .category
        .filter(|c| !c.trim().is_empty())
        .or_else(|| sites.iter().find_map(|s| s.category.clone()));

    Ok(ComparisonResult { category, sites })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(sites: &str) -> String {
        format!(
            r#"<html><script>window.__APP_DATA__ = {{"layout":{{"data":{{"category":"Search Engines","comparedSites":[{}]}}}}}};</script></html>"#,
            sites
        )
    }

    #[test]
    fn duplicate_requests_collapse() {
        let html = page(r#"{"domain":"a.com"},{"domain":"b.com"}"#);
        let result = parse_comparison(&html, &["b.com", "a.com", "b.com"]).unwrap();
        assert_eq!(result.domains(), vec!["b.com", "a.com"]);
    }

    #[test]
    fn missing_compared_sites_is_an_error() {
        let html = r#"<script>window.__APP_DATA__ = {"layout":{"data":{"category":"x"}}};</script>"#;
        assert!(matches!(
            parse_comparison(html, &["a.com"]),
            Err(ParseError::MissingData(_))
        ));
    }

    #[test]
    fn page_without_payload_is_an_error() {
        let html = "<html><body><h1>Compare</h1></body></html>";
        assert!(matches!(
            parse_comparison(html, &["a.com"]),
            Err(ParseError::MissingData(_))
        ));
    }
}
