// ABOUTME: Integration tests for trending-website ranking parsing.
// ABOUTME: Covers the rendered table, embedded page data, and dense rank assignment.

use pretty_assertions::assert_eq;
use simweb_parse::{parse_trends, ParseError, TrendEntry};
use std::fs;

fn load_fixture(name: &str) -> String {
    let path = format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("failed to read fixture {}: {}", path, e))
}

fn assert_dense_ranks(entries: &[TrendEntry]) {
    for (idx, entry) in entries.iter().enumerate() {
        assert_eq!(entry.rank as usize, idx + 1, "rank gap at {}", entry.domain);
    }
}

#[test]
fn test_trends_from_table() {
    let entries = parse_trends(
        &load_fixture("trends_table.html"),
        "computers-electronics-and-technology",
    )
    .unwrap();

    assert_eq!(entries.len(), 4);
    assert_dense_ranks(&entries);
    assert_eq!(
        entries[1],
        TrendEntry {
            rank: 2,
            domain: "facebook.com".into(),
            category: "Social Networks and Online Communities".into(),
            month_change: Some(1),
        }
    );
    assert_eq!(entries[0].month_change, None);
    assert_eq!(entries[2].category, "computers-electronics-and-technology");
    assert_eq!(entries[2].month_change, Some(-1));
    assert_eq!(entries[3].month_change, Some(12));
}

#[test]
fn test_trends_from_app_data_sorted_by_explicit_rank() {
    let entries = parse_trends(&load_fixture("trends_app_data.html"), "e-commerce-and-shopping").unwrap();

    assert_dense_ranks(&entries);
    let domains: Vec<_> = entries.iter().map(|e| e.domain.as_str()).collect();
    assert_eq!(domains, vec!["ebay.com", "amazon.com", "walmart.com"]);
    assert_eq!(entries[2].category, "e-commerce-and-shopping");
    assert_eq!(entries[2].month_change, Some(-2));
}

#[test]
fn test_trends_page_without_ranking() {
    let html = "<html><body><p>No data</p></body></html>";
    assert!(matches!(parse_trends(html, "games"), Err(ParseError::MissingData(_))));
}

#[test]
fn test_trends_undecodable_change_is_rejected() {
    let body = r#"[{"domain":"a.com","rankChange":"up a lot"}]"#;
    assert!(matches!(parse_trends(body, "games"), Err(ParseError::Field { .. })));
}
