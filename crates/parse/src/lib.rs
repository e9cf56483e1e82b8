// ABOUTME: Page parsing library for Similarweb traffic-insight pages.
// ABOUTME: Turns profile, comparison, trend, and sitemap documents into typed records.

//! Pure, synchronous parsers. Nothing in this crate performs I/O; every
//! function maps the text of one fetched document to records or a
//! [`ParseError`].
//!
//! ```
//! use simweb_parse::parse_trends;
//!
//! let body = r#"[{"domain":"google.com"},{"domain":"youtube.com","rankChange":1}]"#;
//! let entries = parse_trends(body, "computers-electronics-and-technology").unwrap();
//! assert_eq!(entries[1].rank, 2);
//! ```

pub mod app_data;
pub mod category;
pub mod comparison;
mod dom;
pub mod domain;
pub mod error;
pub mod models;
pub mod numbers;
pub mod profile;
pub mod sitemap;
pub mod trends;

pub use category::TrendCategory;
pub use comparison::parse_comparison;
pub use domain::{is_valid_domain, normalize_domain};
pub use error::ParseError;
pub use models::{ComparisonResult, CountryShare, SitemapUrl, TrendEntry, WebsiteProfile};
pub use profile::parse_profile;
pub use sitemap::{collect_urls, sitemap_kind, SitemapKind, SitemapUrls};
pub use trends::parse_trends;
