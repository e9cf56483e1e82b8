// ABOUTME: Locates and decodes the state object pages embed as window.__APP_DATA__.
// ABOUTME: Returns the typed layout.data payload, or None when the page carries no such script.

use scraper::Html;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::dom::select_all;
use crate::error::ParseError;

/// Script marker preceding the embedded state object.
pub const APP_DATA_MARKER: &str = "window.__APP_DATA__";

#[derive(Deserialize)]
struct AppData<D> {
    layout: Layout<D>,
}

#[derive(Deserialize)]
struct Layout<D> {
    data: D,
}

/// Decodes the `layout.data` payload of the embedded state object.
///
/// Returns `Ok(None)` if no script carries the marker, and an error if the
/// marker is present but its JSON does not decode into `D`.
pub fn extract_app_data<D: DeserializeOwned>(doc: &Html) -> Result<Option<D>, ParseError> {
    for script in select_all(doc.root_element(), "script") {
        let text: String = script.text().collect();
        if text.contains(APP_DATA_MARKER) {
            return decode_app_data(&text).map(Some);
        }
    }
    Ok(None)
}

/// Decodes the state object from raw script text containing the marker.
pub fn decode_app_data<D: DeserializeOwned>(script: &str) -> Result<D, ParseError> {
    let pos = script
        .find(APP_DATA_MARKER)
        .ok_or_else(|| ParseError::missing(APP_DATA_MARKER))?;
    let rest = &script[pos + APP_DATA_MARKER.len()..];
    let start = rest
        .find('{')
        .ok_or_else(|| ParseError::missing("__APP_DATA__ object"))?;

    // Reads exactly one JSON value; the trailing `;` and any further script are ignored.
    let mut values = serde_json::Deserializer::from_str(&rest[start..]).into_iter::<AppData<D>>();
    match values.next() {
        Some(Ok(app)) => Ok(app.layout.data),
        Some(Err(err)) => Err(ParseError::json(err)),
        None => Err(ParseError::missing("__APP_DATA__ object")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn decodes_payload_and_ignores_trailing_script() {
        let html = r#"<html><head><script>
            window.__APP_DATA__ = {"layout":{"data":{"domain":"a.com"}}}; window.other = {};
        </script></head><body></body></html>"#;
        let doc = Html::parse_document(html);
        let data: Value = extract_app_data(&doc).unwrap().unwrap();
        assert_eq!(data["domain"], "a.com");
    }

    #[test]
    fn absent_marker_is_none() {
        let doc = Html::parse_document("<html><script>var x = 1;</script></html>");
        let data: Option<Value> = extract_app_data(&doc).unwrap();
        assert!(data.is_none());
    }

    #[test]
    fn truncated_json_is_an_error() {
        let doc = Html::parse_document(
            r#"<html><script>window.__APP_DATA__ = {"layout":{"data":{"domain":</script></html>"#,
        );
        let result: Result<Option<Value>, _> = extract_app_data(&doc);
        assert!(matches!(result, Err(ParseError::Json(_))));
    }
}
