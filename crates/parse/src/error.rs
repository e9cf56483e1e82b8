// ABOUTME: Error types for page and sitemap parsing operations.
// ABOUTME: Provides ParseError with MissingData, Json, Field, Xml, InvalidUrl, and Empty variants.

use std::fmt;
use thiserror::Error;

/// Errors that can occur while turning a fetched page into records.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The embedded data block or a required DOM node is absent.
    #[error("expected data not found: {0}")]
    MissingData(String),

    /// Embedded or API JSON does not match the page schema.
    #[error("failed to decode JSON: {0}")]
    Json(String),

    /// A field was present but could not be decoded.
    #[error("invalid value for {field}: {value:?}")]
    Field { field: String, value: String },

    /// The sitemap document is not well-formed.
    #[error("malformed sitemap: {0}")]
    Xml(String),

    /// A sitemap location is not an absolute http(s) URL.
    #[error("invalid sitemap URL: {0}")]
    InvalidUrl(String),

    /// The input contains nothing to parse.
    #[error("document is empty: no records found")]
    Empty,
}

impl ParseError {
    /// Creates a MissingData error naming what was expected.
    pub fn missing(what: impl Into<String>) -> Self {
        ParseError::MissingData(what.into())
    }

    /// Creates a Json error from an underlying serde_json error.
    pub fn json(err: impl fmt::Display) -> Self {
        ParseError::Json(err.to_string())
    }

    /// Creates a Field error for a value that failed decoding.
    pub fn field(field: impl Into<String>, value: impl Into<String>) -> Self {
        ParseError::Field {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Creates an Xml error from an underlying quick-xml error.
    pub fn xml(err: impl fmt::Display) -> Self {
        ParseError::Xml(err.to_string())
    }
}
