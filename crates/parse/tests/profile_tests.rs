// ABOUTME: Integration tests for profile page parsing.
// ABOUTME: Covers embedded-data pages, DOM fallback pages, and malformed input.

use pretty_assertions::assert_eq;
use simweb_parse::{parse_profile, CountryShare, ParseError};
use std::fs;

fn load_fixture(name: &str) -> String {
    let path = format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("failed to read fixture {}: {}", path, e))
}

#[test]
fn test_profile_from_app_data() {
    let profile = parse_profile(&load_fixture("profile_google.html")).unwrap();

    assert_eq!(profile.domain, "google.com");
    assert_eq!(profile.global_rank, Some(1));
    assert_eq!(profile.country_rank, Some(1));
    assert_eq!(profile.country.as_deref(), Some("US"));
    assert_eq!(
        profile.category.as_deref(),
        Some("Computers Electronics and Technology > Search Engines")
    );
    assert_eq!(profile.monthly_visits, Some(83_900_000_000.0));
    assert_eq!(profile.bounce_rate, Some(28.38));
    assert_eq!(profile.pages_per_visit, Some(8.59));
    assert_eq!(profile.avg_visit_duration, Some(634));

    assert_eq!(profile.traffic_sources.len(), 7);
    assert_eq!(profile.traffic_sources["direct"], 71.12);
    assert_eq!(profile.traffic_sources["search"], 22.51);
    assert_eq!(profile.traffic_sources["display"], 0.11);

    assert_eq!(
        profile.top_countries,
        vec![
            CountryShare { country: "US".into(), share: 26.45 },
            CountryShare { country: "IN".into(), share: 4.63 },
            CountryShare { country: "BR".into(), share: 4.12 },
        ]
    );
    assert_eq!(profile.top_keywords, vec!["google", "gmail", "translate"]);
}

#[test]
fn test_profile_dom_fallback() {
    let profile = parse_profile(&load_fixture("profile_dom_youtube.html")).unwrap();

    assert_eq!(profile.domain, "youtube.com");
    assert_eq!(profile.global_rank, Some(2));
    assert_eq!(profile.country_rank, Some(2));
    assert_eq!(profile.country.as_deref(), Some("United States"));
    assert_eq!(
        profile.category.as_deref(),
        Some("Arts & Entertainment > Streaming")
    );
    assert_eq!(profile.monthly_visits, Some(29_400_000_000.0));
    assert_eq!(profile.bounce_rate, Some(21.47));
    assert_eq!(profile.pages_per_visit, Some(11.86));
    assert_eq!(profile.avg_visit_duration, Some(1204));
    assert!(profile.traffic_sources.is_empty());
    assert_eq!(profile.top_countries.len(), 2);
    assert_eq!(profile.top_countries[1].country, "India");
    assert_eq!(profile.top_countries[1].share, 8.2);
    assert_eq!(profile.top_keywords, vec!["youtube", "you tube"]);
}

#[test]
fn test_profile_metrics_are_non_negative() {
    for fixture in ["profile_google.html", "profile_dom_youtube.html"] {
        let profile = parse_profile(&load_fixture(fixture)).unwrap();
        let numbers = [
            profile.monthly_visits,
            profile.bounce_rate,
            profile.pages_per_visit,
        ];
        for value in numbers.into_iter().flatten() {
            assert!(value >= 0.0, "{} has a negative metric", fixture);
        }
        assert!(profile.traffic_sources.values().all(|v| *v >= 0.0));
        assert!(profile.top_countries.iter().all(|c| c.share >= 0.0));
        assert!(profile.global_rank.map_or(true, |r| r > 0));
    }
}

#[test]
fn test_profile_without_data_is_missing_data() {
    let html = "<html><head><title>Access denied</title></head><body><p>Please verify you are human</p></body></html>";
    assert!(matches!(parse_profile(html), Err(ParseError::MissingData(_))));
}

#[test]
fn test_profile_negative_share_is_rejected() {
    let html = r#"<script>window.__APP_DATA__ = {"layout":{"data":{"domain":"a.com",
        "trafficSources":{"directVisitsShare":-0.2}}}};</script>"#;
    assert!(matches!(parse_profile(html), Err(ParseError::Field { .. })));
}

#[test]
fn test_profile_empty_input() {
    assert!(matches!(parse_profile(""), Err(ParseError::Empty)));
}
