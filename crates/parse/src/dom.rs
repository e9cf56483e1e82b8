// ABOUTME: Small CSS-selector helpers over scraper elements.
// ABOUTME: Extracts whitespace-normalized text from the first or all matches of a selector.

use scraper::{ElementRef, Selector};

/// Collapses runs of whitespace into single spaces.
pub(crate) fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalized text of an element.
pub(crate) fn element_text(el: ElementRef<'_>) -> String {
    normalize_whitespace(&el.text().collect::<String>())
}

/// Elements under `scope` matching `css`. An invalid selector matches nothing.
pub(crate) fn select_all<'a>(scope: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => scope.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

/// Text of the first non-empty match of `css` under `scope`.
pub(crate) fn select_text(scope: ElementRef<'_>, css: &str) -> Option<String> {
    select_all(scope, css)
        .into_iter()
        .map(element_text)
        .find(|t| !t.is_empty())
}

/// Texts of all non-empty matches of `css` under `scope`, in document order.
pub(crate) fn select_texts(scope: ElementRef<'_>, css: &str) -> Vec<String> {
    select_all(scope, css)
        .into_iter()
        .map(element_text)
        .filter(|t| !t.is_empty())
        .collect()
}
