// ABOUTME: Builders for Similarweb page URLs: website profiles, comparisons, trend rankings, sitemaps.
// ABOUTME: Domains are normalized before they are placed in a path.

use simweb_parse::normalize_domain;

pub const BASE_URL: &str = "https://www.similarweb.com";

/// Sitemap of the currently trending website pages.
pub const TRENDING_SITEMAP_URL: &str =
    "https://www.similarweb.com/sitemaps/top-websites-trending/part-00000.gz";

/// Root sitemap index of the site.
pub const SITEMAP_INDEX_URL: &str = "https://www.similarweb.com/sitemaps/sitemap_index.xml.gz";

/// `https://www.similarweb.com/website/{domain}/`
pub fn website_url(domain: &str) -> String {
    format!("{}/website/{}/", BASE_URL, normalize_domain(domain))
}

/// `https://www.similarweb.com/website/{a}/vs/{b}/...`, repeated domains listed once.
pub fn compare_url<S: AsRef<str>>(domains: &[S]) -> String {
    let mut unique: Vec<String> = Vec::with_capacity(domains.len());
    for domain in domains {
        let domain = normalize_domain(domain.as_ref());
        if !unique.contains(&domain) {
            unique.push(domain);
        }
    }
    let path = unique.join("/vs/");
    format!("{}/website/{}/", BASE_URL, path)
}

/// `https://www.similarweb.com/top-websites/{slug}/`
pub fn trends_url(slug: &str) -> String {
    format!("{}/top-websites/{}/", BASE_URL, slug.trim().trim_matches('/'))
}
