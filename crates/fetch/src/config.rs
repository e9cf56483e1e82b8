// ABOUTME: Per-request scrape configuration mapped onto the scraping API's query parameters.
// ABOUTME: ScrapeConfig is cloned from a base template and pointed at each target URL.

use std::collections::BTreeMap;

/// Options for one request through the scraping API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeConfig {
    pub url: String,
    /// Anti-bot bypass.
    pub asp: bool,
    /// Proxy country code.
    pub country: String,
    pub render_js: bool,
    pub cache: bool,
    pub debug: bool,
    /// Sticky session name, reusing the same proxy and cookies.
    pub session: Option<String>,
    pub headers: BTreeMap<String, String>,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            asp: true,
            country: "US".to_string(),
            render_js: false,
            cache: false,
            debug: false,
            session: None,
            headers: BTreeMap::new(),
        }
    }
}

impl ScrapeConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Copy of this configuration aimed at another URL.
    pub fn with_url(&self, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..self.clone()
        }
    }

    pub fn asp(mut self, asp: bool) -> Self {
        self.asp = asp;
        self
    }

    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.country = country.into();
        self
    }

    pub fn render_js(mut self, render_js: bool) -> Self {
        self.render_js = render_js;
        self
    }

    pub fn cache(mut self, cache: bool) -> Self {
        self.cache = cache;
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn session(mut self, session: impl Into<String>) -> Self {
        self.session = Some(session.into());
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Query parameters for this request, excluding the API key.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("url".to_string(), self.url.clone()),
            ("asp".to_string(), self.asp.to_string()),
            ("country".to_string(), self.country.clone()),
            ("render_js".to_string(), self.render_js.to_string()),
        ];
        if self.cache {
            pairs.push(("cache".to_string(), "true".to_string()));
        }
        if self.debug {
            pairs.push(("debug".to_string(), "true".to_string()));
        }
        if let Some(ref session) = self.session {
            pairs.push(("session".to_string(), session.clone()));
        }
        for (name, value) in &self.headers {
            pairs.push((format!("headers[{}]", name.to_lowercase()), value.clone()));
        }
        pairs
    }
}
