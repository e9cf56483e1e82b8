// ABOUTME: Streaming sitemap reader built on quick-xml.
// ABOUTME: Sniffs index vs leaf documents and lazily yields <loc> URLs in document order.

use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::error::ParseError;
use crate::models::SitemapUrl;

/// Which kind of sitemap document a root element declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SitemapKind {
    /// `<sitemapindex>`: locations point at further sitemaps.
    Index,
    /// `<urlset>`: locations point at pages.
    Leaf,
}

/// Determines the document kind from its root element.
pub fn sitemap_kind(xml: &str) -> Result<SitemapKind, ParseError> {
    if xml.trim().is_empty() {
        return Err(ParseError::Empty);
    }

    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                return match e.local_name().as_ref() {
                    b"sitemapindex" => Ok(SitemapKind::Index),
                    b"urlset" => Ok(SitemapKind::Leaf),
                    other => Err(ParseError::Xml(format!(
                        "unexpected root element <{}>",
                        String::from_utf8_lossy(other)
                    ))),
                };
            }
            Ok(Event::Eof) => return Err(ParseError::Xml("no root element".to_string())),
            Err(e) => return Err(ParseError::xml(e)),
            _ => {}
        }
    }
}

/// Returns a lazy sequence of the document's `<loc>` URLs.
///
/// The root element is validated up front; malformed content further on is
/// reported as an `Err` item, after which the sequence ends. With a `limit`,
/// the reader stops after that many items and the remainder of the document
/// is never read.
pub fn collect_urls(xml: &str, limit: Option<usize>) -> Result<SitemapUrls<'_>, ParseError> {
    let kind = sitemap_kind(xml)?;
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    Ok(SitemapUrls {
        reader,
        kind,
        remaining: limit,
        open: Vec::new(),
        in_loc: false,
        loc: String::new(),
        done: false,
    })
}

/// Iterator returned by [`collect_urls`].
pub struct SitemapUrls<'a> {
    reader: Reader<&'a [u8]>,
    kind: SitemapKind,
    remaining: Option<usize>,
    /// Local names of the currently open elements.
    open: Vec<Vec<u8>>,
    in_loc: bool,
    loc: String,
    done: bool,
}

impl SitemapUrls<'_> {
    pub fn kind(&self) -> SitemapKind {
        self.kind
    }

    fn finish_loc(&mut self) -> Result<SitemapUrl, ParseError> {
        self.in_loc = false;
        if let Some(remaining) = self.remaining.as_mut() {
            *remaining -= 1;
        }
        SitemapUrl::parse(&std::mem::take(&mut self.loc))
    }
}

impl Iterator for SitemapUrls<'_> {
    type Item = Result<SitemapUrl, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.remaining == Some(0) {
            return None;
        }

        loop {
            match self.reader.read_event() {
                Ok(Event::Start(e)) => {
                    let name = e.local_name().as_ref().to_vec();
                    // Extension tags such as <image:loc> sit one level deeper.
                    let entry_parent = matches!(
                        self.open.last().map(Vec::as_slice),
                        Some(b"url") | Some(b"sitemap")
                    );
                    if name == b"loc" && entry_parent {
                        self.in_loc = true;
                        self.loc.clear();
                    }
                    self.open.push(name);
                }
                Ok(Event::Text(e)) if self.in_loc => match e.decode() {
                    Ok(text) => self.loc.push_str(&text),
                    Err(err) => {
                        self.done = true;
                        return Some(Err(ParseError::xml(err)));
                    }
                },
                Ok(Event::CData(e)) if self.in_loc => {
                    self.loc.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
                Ok(Event::GeneralRef(e)) if self.in_loc => {
                    let name = String::from_utf8_lossy(&e).into_owned();
                    match resolve_entity(&name) {
                        Some(resolved) => self.loc.push_str(&resolved),
                        None => {
                            self.done = true;
                            return Some(Err(ParseError::Xml(format!("unknown entity &{};", name))));
                        }
                    }
                }
                Ok(Event::End(e)) => {
                    self.open.pop();
                    if self.in_loc && e.local_name().as_ref() == b"loc" {
                        return Some(self.finish_loc());
                    }
                }
                Ok(Event::Eof) => {
                    self.done = true;
                    if self.in_loc {
                        return Some(Err(ParseError::Xml("unterminated <loc>".to_string())));
                    }
                    return None;
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(ParseError::xml(e)));
                }
                _ => {}
            }
        }
    }
}

/// Resolves the predefined XML entities and numeric character references.
fn resolve_entity(name: &str) -> Option<String> {
    let resolved = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        _ => {
            let code = if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                name.strip_prefix('#')?.parse::<u32>().ok()?
            };
            char::from_u32(code)?
        }
    };
    Some(resolved.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sniffs_root_kind() {
        assert_eq!(
            sitemap_kind(r#"<?xml version="1.0"?><sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9"></sitemapindex>"#).unwrap(),
            SitemapKind::Index
        );
        assert_eq!(sitemap_kind("<urlset/>").unwrap(), SitemapKind::Leaf);
        assert!(matches!(sitemap_kind("<html></html>"), Err(ParseError::Xml(_))));
        assert!(matches!(sitemap_kind("   "), Err(ParseError::Empty)));
    }

    #[test]
    fn decodes_entities_inside_loc() {
        let xml = "<urlset><url><loc>https://example.com/?a=1&amp;b=2</loc></url></urlset>";
        let urls: Vec<_> = collect_urls(xml, None).unwrap().collect();
        assert_eq!(urls.len(), 1);
        assert_eq!(urls[0].as_ref().unwrap().as_str(), "https://example.com/?a=1&b=2");
    }

    #[test]
    fn relative_loc_is_reported() {
        let xml = "<urlset><url><loc>/relative/path</loc></url></urlset>";
        let mut urls = collect_urls(xml, None).unwrap();
        assert!(matches!(urls.next(), Some(Err(ParseError::InvalidUrl(_)))));
        assert!(urls.next().is_none());
    }

    #[test]
    fn extension_locations_are_not_pages() {
        let xml = r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9"
                xmlns:image="http://www.google.com/schemas/sitemap-image/1.1">
            <url>
                <loc>https://a.com/page</loc>
                <image:image><image:loc>https://a.com/logo.png</image:loc></image:image>
            </url>
        </urlset>"#;
        let urls: Vec<String> = collect_urls(xml, None)
            .unwrap()
            .map(|u| u.unwrap().to_string())
            .collect();
        assert_eq!(urls, vec!["https://a.com/page"]);
    }

    #[test]
    fn resolves_numeric_references() {
        assert_eq!(resolve_entity("#38").as_deref(), Some("&"));
        assert_eq!(resolve_entity("#x26").as_deref(), Some("&"));
        assert_eq!(resolve_entity("nbsp"), None);
    }
}
