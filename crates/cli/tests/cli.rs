// ABOUTME: Integration tests for the simweb binary against a mocked scraping API.
// ABOUTME: Checks result files, exit status on partial failure, and the missing-key error.

use assert_cmd::assert::OutputAssertExt;
use assert_cmd::cargo::CommandCargoExt;
use httpmock::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn load_fixture(name: &str) -> String {
    let path = format!(
        "{}/../parse/tests/fixtures/{}",
        env!("CARGO_MANIFEST_DIR"),
        name
    );
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("failed to read fixture {}: {}", path, e))
}

fn page(content: &str) -> serde_json::Value {
    serde_json::json!({
        "result": {"content": content, "status_code": 200, "success": true, "format": "text"}
    })
}

fn mock_page(server: &MockServer, target: &str, fixture: &str) {
    let content = load_fixture(fixture);
    server.mock(|when, then| {
        when.method(GET).path("/scrape").query_param("url", target);
        then.status(200).json_body(page(&content));
    });
}

fn simweb_cmd(server: &MockServer, out: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("simweb").unwrap();
    cmd.env("SCRAPFLY_KEY", "test-key")
        .env("RUST_LOG", "warn")
        .arg("--api-url")
        .arg(server.url("/scrape"))
        .arg("--output")
        .arg(out.path());
    cmd
}

fn read_json(out: &TempDir, name: &str) -> serde_json::Value {
    let text = fs::read_to_string(out.path().join(name)).unwrap();
    serde_json::from_str(&text).unwrap()
}

#[test]
fn website_command_writes_profiles() {
    let server = MockServer::start();
    mock_page(
        &server,
        "https://www.similarweb.com/website/google.com/",
        "profile_google.html",
    );
    let out = TempDir::new().unwrap();

    simweb_cmd(&server, &out)
        .arg("website")
        .arg("google.com")
        .assert()
        .success();

    let profiles = read_json(&out, "websites.json");
    assert_eq!(profiles[0]["domain"], "google.com");
    assert_eq!(profiles[0]["global_rank"], 1);
}

#[test]
fn partial_failure_keeps_successes_and_exits_nonzero() {
    let server = MockServer::start();
    mock_page(
        &server,
        "https://www.similarweb.com/website/google.com/",
        "profile_google.html",
    );
    server.mock(|when, then| {
        when.method(GET)
            .path("/scrape")
            .query_param("url", "https://www.similarweb.com/website/youtube.com/");
        then.status(200).json_body(serde_json::json!({
            "result": {"content": "", "status_code": 404, "success": false}
        }));
    });
    let out = TempDir::new().unwrap();

    simweb_cmd(&server, &out)
        .arg("website")
        .arg("google.com")
        .arg("youtube.com")
        .assert()
        .failure()
        .stderr(predicate::str::contains("youtube.com"));

    let profiles = read_json(&out, "websites.json");
    assert_eq!(profiles.as_array().unwrap().len(), 1);
}

#[test]
fn sitemap_command_honors_limit() {
    let server = MockServer::start();
    mock_page(
        &server,
        "https://www.similarweb.com/sitemaps/website/part-00000.xml",
        "sitemap_leaf.xml",
    );
    let out = TempDir::new().unwrap();

    simweb_cmd(&server, &out)
        .arg("sitemap")
        .arg("https://www.similarweb.com/sitemaps/website/part-00000.xml")
        .arg("--limit")
        .arg("2")
        .assert()
        .success();

    let urls = read_json(&out, "sitemaps.json");
    assert_eq!(
        urls,
        serde_json::json!([
            "https://www.similarweb.com/website/google.com/",
            "https://www.similarweb.com/website/youtube.com/"
        ])
    );
}

#[test]
fn unknown_trend_category_writes_nothing() {
    let server = MockServer::start();
    let out = TempDir::new().unwrap();

    simweb_cmd(&server, &out)
        .arg("trends")
        .arg("not-a-category")
        .assert()
        .failure();

    assert!(!out.path().join("trends.json").exists());
}

#[test]
fn trends_are_grouped_by_category() {
    let server = MockServer::start();
    mock_page(
        &server,
        "https://www.similarweb.com/top-websites/computers-electronics-and-technology/",
        "trends_app_data.html",
    );
    mock_page(
        &server,
        "https://www.similarweb.com/top-websites/games/",
        "trends_table.html",
    );
    let out = TempDir::new().unwrap();

    simweb_cmd(&server, &out)
        .arg("trends")
        .arg("computers-electronics-and-technology")
        .arg("Games")
        .assert()
        .success();

    let trends = read_json(&out, "trends.json");
    let groups = trends.as_object().unwrap();
    assert_eq!(groups.len(), 2);
    for (category, entries) in groups {
        let ranks: Vec<u64> = entries
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["rank"].as_u64().unwrap())
            .collect();
        let expected: Vec<u64> = (1..=ranks.len() as u64).collect();
        assert_eq!(ranks, expected, "ranks for {}", category);
    }
    assert_eq!(trends["games"][0]["domain"], "google.com");
    assert_eq!(trends["games"].as_array().unwrap().len(), 4);
}

#[test]
fn failed_rerun_removes_stale_results() {
    let server = MockServer::start();
    let out = TempDir::new().unwrap();
    fs::write(out.path().join("trends.json"), "[]\n").unwrap();

    simweb_cmd(&server, &out)
        .arg("trends")
        .arg("not-a-category")
        .assert()
        .failure();

    assert!(!out.path().join("trends.json").exists());
}

#[test]
fn default_run_scrapes_every_category() {
    let server = MockServer::start();
    mock_page(
        &server,
        "https://www.similarweb.com/website/google.com/",
        "profile_google.html",
    );
    mock_page(
        &server,
        "https://www.similarweb.com/website/youtube.com/",
        "profile_dom_youtube.html",
    );
    mock_page(
        &server,
        "https://www.similarweb.com/website/google.com/vs/bing.com/",
        "compare_google_bing.html",
    );
    mock_page(
        &server,
        "https://www.similarweb.com/top-websites/computers-electronics-and-technology/",
        "trends_app_data.html",
    );
    mock_page(
        &server,
        "https://www.similarweb.com/sitemaps/top-websites-trending/part-00000.gz",
        "sitemap_leaf.xml",
    );
    let out = TempDir::new().unwrap();

    simweb_cmd(&server, &out).assert().success();

    assert_eq!(read_json(&out, "websites.json").as_array().unwrap().len(), 2);
    assert_eq!(read_json(&out, "compare.json")["sites"][1]["domain"], "bing.com");
    assert_eq!(
        read_json(&out, "trends.json")["computers-electronics-and-technology"][0]["domain"],
        "ebay.com"
    );
    assert_eq!(read_json(&out, "sitemaps.json").as_array().unwrap().len(), 6);
}

#[test]
fn missing_api_key_fails() {
    let out = TempDir::new().unwrap();
    Command::cargo_bin("simweb")
        .unwrap()
        .env_remove("SCRAPFLY_KEY")
        .arg("--output")
        .arg(out.path())
        .arg("website")
        .arg("google.com")
        .assert()
        .failure()
        .stderr(predicate::str::contains("SCRAPFLY_KEY"));
}
