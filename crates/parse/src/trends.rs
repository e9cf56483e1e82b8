// ABOUTME: Parses trending-website rankings from JSON, embedded page data, or the rendered table.
// ABOUTME: Assigns dense 1-based ranks by document order after honoring explicit ranks.

use scraper::Html;
use serde::Deserialize;

use crate::app_data::extract_app_data;
use crate::dom::{select_all, select_text};
use crate::domain::normalize_domain;
use crate::error::ParseError;
use crate::models::TrendEntry;
use crate::numbers::{decode_change, decode_rank, RawValue};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTrend {
    rank: Option<RawValue>,
    domain: Option<String>,
    category: Option<String>,
    rank_change: Option<RawValue>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TrendPayload {
    Wrapped {
        category: Option<String>,
        sites: Vec<RawTrend>,
    },
    List(Vec<RawTrend>),
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrendPageData {
    top_ranking: Option<Vec<RawTrend>>,
}

/// Parses a ranking for `category` from a JSON body or an HTML page.
///
/// Ranks in the output are always `1..=N` in output order. When every row
/// carries an explicit rank the rows are ordered by it first; otherwise
/// document order decides.
pub fn parse_trends(body: &str, category: &str) -> Result<Vec<TrendEntry>, ParseError> {
    let trimmed = body.trim_start();
    if trimmed.is_empty() {
        return Err(ParseError::Empty);
    }

    let (rows, page_category) = if trimmed.starts_with('{') || trimmed.starts_with('[') {
        match serde_json::from_str::<TrendPayload>(trimmed).map_err(ParseError::json)? {
            TrendPayload::Wrapped { category, sites } => (sites, category),
            TrendPayload::List(sites) => (sites, None),
        }
    } else {
        (parse_trends_html(body)?, None)
    };

    let fallback = page_category
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| category.to_string());
    assemble(rows, &fallback)
}

fn parse_trends_html(html: &str) -> Result<Vec<RawTrend>, ParseError> {
    let doc = Html::parse_document(html);
    if let Some(ranking) = extract_app_data::<TrendPageData>(&doc)?.and_then(|d| d.top_ranking) {
        return Ok(ranking);
    }

    let rows = select_all(doc.root_element(), "table.top-table tbody tr");
    if rows.is_empty() {
        return Err(ParseError::missing("__APP_DATA__ topRanking or table.top-table rows"));
    }

    Ok(rows
        .into_iter()
        .map(|row| RawTrend {
            rank: select_text(row, ".tw-table__rank").map(RawValue::Text),
            domain: select_text(row, ".tw-table__domain"),
            category: select_text(row, ".tw-table__category"),
            rank_change: select_text(row, ".tw-table__rank-change").map(RawValue::Text),
        })
        .collect())
}

fn assemble(rows: Vec<RawTrend>, fallback_category: &str) -> Result<Vec<TrendEntry>, ParseError> {
    let mut decoded = Vec::with_capacity(rows.len());
    for row in rows {
        let Some(domain) = row
            .domain
            .as_deref()
            .map(normalize_domain)
            .filter(|d| !d.is_empty())
        else {
            continue;
        };
        let explicit_rank = decode_rank("rank", row.rank.as_ref())?;
        let month_change = decode_change("rankChange", row.rank_change.as_ref())?;
        let category = row
            .category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| fallback_category.to_string());
        decoded.push((explicit_rank, domain, category, month_change));
    }

    if decoded.is_empty() {
        return Err(ParseError::Empty);
    }

    if decoded.iter().all(|(rank, ..)| rank.is_some()) {
        decoded.sort_by_key(|(rank, ..)| *rank);
    }

    Ok(decoded
        .into_iter()
        .enumerate()
        .map(|(idx, (_, domain, category, month_change))| TrendEntry {
            rank: idx as u32 + 1,
            domain,
            category,
            month_change,
        })
        .collect())
}
