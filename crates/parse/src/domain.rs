// ABOUTME: Domain name normalization shared by parsers and URL builders.
// ABOUTME: Reduces user input and page values to a bare lowercase host without "www.".

use url::Url;

/// Normalizes a domain or URL to a bare host.
///
/// `"https://www.Google.com/search"` and `"google.com"` both become `"google.com"`.
pub fn normalize_domain(input: &str) -> String {
    let trimmed = input.trim();
    let host = if trimmed.contains("://") {
        Url::parse(trimmed)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_else(|| trimmed.to_string())
    } else {
        trimmed
            .split(['/', '?', '#'])
            .next()
            .unwrap_or_default()
            .to_string()
    };

    let host = host.to_lowercase();
    let host = host.trim_end_matches('.');
    host.strip_prefix("www.").unwrap_or(host).to_string()
}

/// Returns true if the input looks like a domain name we can build a page URL for.
pub fn is_valid_domain(input: &str) -> bool {
    let domain = normalize_domain(input);
    !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && domain
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
}
