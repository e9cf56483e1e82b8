// ABOUTME: Error types for the fetch client and scrape orchestration.
// ABOUTME: FetchError carries an ErrorCode with retry classification; ScrapeError wraps fetch and parse failures.

use std::fmt;

use simweb_parse::ParseError;

/// Categories of fetch failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Config,
    InvalidUrl,
    Network,
    Timeout,
    Blocked,
    Throttled,
    Upstream,
    Decode,
}

impl ErrorCode {
    /// Whether failures of this kind are worth another attempt by default.
    pub fn retryable_by_default(self) -> bool {
        matches!(
            self,
            ErrorCode::Network | ErrorCode::Timeout | ErrorCode::Blocked | ErrorCode::Throttled
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::Config => "configuration error",
            ErrorCode::InvalidUrl => "invalid URL",
            ErrorCode::Network => "network error",
            ErrorCode::Timeout => "timeout",
            ErrorCode::Blocked => "blocked by anti-bot protection",
            ErrorCode::Throttled => "throttled",
            ErrorCode::Upstream => "upstream error",
            ErrorCode::Decode => "decode error",
        };
        write!(f, "{}", s)
    }
}

/// A failed request to the scraping API.
#[derive(Debug, thiserror::Error)]
pub struct FetchError {
    pub code: ErrorCode,
    pub url: String,
    pub op: String,
    pub retryable: bool,
    #[source]
    pub source: Option<anyhow::Error>,
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.url.is_empty() {
            write!(f, "fetch: {}: {}", self.op, self.code)?;
        } else {
            write!(f, "fetch: {} {}: {}", self.op, self.url, self.code)?;
        }
        if let Some(ref src) = self.source {
            write!(f, ": {}", src)?;
        }
        Ok(())
    }
}

impl FetchError {
    fn new(
        code: ErrorCode,
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code,
            url: url.into(),
            op: op.into(),
            retryable: code.retryable_by_default(),
            source,
        }
    }

    /// Create a Config error (missing credential, unusable endpoint).
    pub fn config(op: impl Into<String>, source: Option<anyhow::Error>) -> Self {
        Self::new(ErrorCode::Config, String::new(), op, source)
    }

    /// Create an InvalidUrl error.
    pub fn invalid_url(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::InvalidUrl, url, op, source)
    }

    /// Create a Network error.
    pub fn network(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Network, url, op, source)
    }

    /// Create a Timeout error.
    pub fn timeout(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Timeout, url, op, source)
    }

    /// Create a Blocked error.
    pub fn blocked(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Blocked, url, op, source)
    }

    /// Create a Throttled error.
    pub fn throttled(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Throttled, url, op, source)
    }

    /// Create an Upstream error (the target site answered with a failure).
    pub fn upstream(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Upstream, url, op, source)
    }

    /// Create a Decode error.
    pub fn decode(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Decode, url, op, source)
    }

    /// Override the default retry classification.
    pub fn with_retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }

    pub fn is_retryable(&self) -> bool {
        self.retryable
    }

    pub fn is_timeout(&self) -> bool {
        self.code == ErrorCode::Timeout
    }

    pub fn is_blocked(&self) -> bool {
        self.code == ErrorCode::Blocked
    }

    pub fn is_config(&self) -> bool {
        self.code == ErrorCode::Config
    }
}

/// Failure of one scrape target.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("failed to parse {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: ParseError,
    },

    #[error("invalid target: {0}")]
    InvalidTarget(String),
}

impl ScrapeError {
    pub(crate) fn parse(url: impl Into<String>, source: ParseError) -> Self {
        ScrapeError::Parse {
            url: url.into(),
            source,
        }
    }
}
