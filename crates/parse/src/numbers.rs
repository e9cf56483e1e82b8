// ABOUTME: Numeric decoding for metrics shown as numbers or display strings.
// ABOUTME: Handles thousand separators, K/M/B suffixes, percentages, ranks, durations, and signed changes.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::error::ParseError;

static COUNT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?i)([0-9][0-9,]*(?:\.[0-9]+)?)\s*([kmb])?$").expect("count pattern is valid")
});

/// A metric as it appears in page data: either a JSON number or display text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
}

impl RawValue {
    fn display(&self) -> String {
        match self {
            RawValue::Number(n) => n.to_string(),
            RawValue::Text(s) => s.clone(),
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

/// Rounds to two decimal places.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Parses a count such as `"1,234,567"`, `"83.9B"`, `"12.5M"` or `"800K"`.
pub fn parse_count(s: &str) -> Option<f64> {
    let caps = COUNT_RE.captures(s.trim())?;
    let base: f64 = caps[1].replace(',', "").parse().ok()?;
    let suffix = caps.get(2).map(|m| m.as_str().to_ascii_lowercase());
    let multiplier = match suffix.as_deref() {
        Some("k") => 1e3,
        Some("m") => 1e6,
        Some("b") => 1e9,
        _ => 1.0,
    };
    Some(round2(base * multiplier))
}

/// Parses a displayed percentage such as `"45.2%"` or `"45.2"`.
///
/// Text is always read as a percentage; only JSON numbers are fractions.
pub fn parse_percent(s: &str) -> Option<f64> {
    let s = s.trim();
    let pct = s.strip_suffix('%').unwrap_or(s);
    pct.trim().replace(',', "").parse::<f64>().ok().map(round2)
}

/// Parses a rank such as `"#1,234"` or `"17"`. Returns None for non-numeric text.
pub fn parse_rank(s: &str) -> Option<u64> {
    let digits = s.trim().trim_start_matches('#').replace(',', "");
    digits.trim().parse::<u64>().ok()
}

/// Parses `HH:MM:SS`, `MM:SS` or plain seconds into seconds.
pub fn parse_duration_seconds(s: &str) -> Option<u32> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(secs) = s.parse::<u64>() {
        return u32::try_from(secs).ok();
    }

    let parts: Vec<&str> = s.split(':').collect();
    let total = match parts.len() {
        2 => {
            let mins: u64 = parts[0].parse().ok()?;
            let secs: u64 = parts[1].parse().ok()?;
            mins * 60 + secs
        }
        3 => {
            let hours: u64 = parts[0].parse().ok()?;
            let mins: u64 = parts[1].parse().ok()?;
            let secs: u64 = parts[2].parse().ok()?;
            hours * 3600 + mins * 60 + secs
        }
        _ => return None,
    };
    u32::try_from(total).ok()
}

/// Parses a signed change such as `"+3"`, `"-2"` or `"0"`.
pub fn parse_change(s: &str) -> Option<i32> {
    let s = s.trim().replace(',', "");
    let s = s.strip_prefix('+').unwrap_or(&s);
    s.parse::<i32>().ok()
}

/// Markers pages use for "no value".
fn is_blank(s: &str) -> bool {
    matches!(
        s.trim().to_lowercase().as_str(),
        "" | "-" | "—" | "–" | "n/a" | "na" | "null"
    )
}

// ----------------------------------------------------------------------------
// Field decoders: None when absent, Err when present but undecodable.
// ----------------------------------------------------------------------------

pub(crate) fn decode_count(field: &str, raw: Option<&RawValue>) -> Result<Option<f64>, ParseError> {
    let value = match raw {
        None => return Ok(None),
        Some(RawValue::Number(n)) => *n,
        Some(RawValue::Text(s)) if is_blank(s) => return Ok(None),
        Some(RawValue::Text(s)) => parse_count(s).ok_or_else(|| ParseError::field(field, s))?,
    };
    non_negative(field, value).map(Some)
}

pub(crate) fn decode_percent(
    field: &str,
    raw: Option<&RawValue>,
) -> Result<Option<f64>, ParseError> {
    let value = match raw {
        None => return Ok(None),
        Some(RawValue::Number(n)) => round2(n * 100.0),
        Some(RawValue::Text(s)) if is_blank(s) => return Ok(None),
        Some(RawValue::Text(s)) => parse_percent(s).ok_or_else(|| ParseError::field(field, s))?,
    };
    non_negative(field, value).map(Some)
}

pub(crate) fn decode_rank(field: &str, raw: Option<&RawValue>) -> Result<Option<u64>, ParseError> {
    let rank = match raw {
        None => return Ok(None),
        Some(RawValue::Number(n)) if n.fract() == 0.0 && *n >= 0.0 => *n as u64,
        Some(RawValue::Text(s)) if is_blank(s) => return Ok(None),
        Some(RawValue::Text(s)) => parse_rank(s).ok_or_else(|| ParseError::field(field, s))?,
        Some(other) => return Err(ParseError::field(field, other.display())),
    };
    Ok((rank > 0).then_some(rank))
}

pub(crate) fn decode_duration(
    field: &str,
    raw: Option<&RawValue>,
) -> Result<Option<u32>, ParseError> {
    match raw {
        None => Ok(None),
        Some(RawValue::Number(n)) if *n >= 0.0 && *n <= u32::MAX as f64 => Ok(Some(n.round() as u32)),
        Some(RawValue::Text(s)) if is_blank(s) => Ok(None),
        Some(RawValue::Text(s)) => parse_duration_seconds(s)
            .map(Some)
            .ok_or_else(|| ParseError::field(field, s)),
        Some(other) => Err(ParseError::field(field, other.display())),
    }
}

pub(crate) fn decode_change(field: &str, raw: Option<&RawValue>) -> Result<Option<i32>, ParseError> {
    match raw {
        None => Ok(None),
        Some(RawValue::Number(n)) if n.fract() == 0.0 && n.abs() <= i32::MAX as f64 => {
            Ok(Some(*n as i32))
        }
        Some(RawValue::Text(s)) if is_blank(s) => Ok(None),
        Some(RawValue::Text(s)) => parse_change(s)
            .map(Some)
            .ok_or_else(|| ParseError::field(field, s)),
        Some(other) => Err(ParseError::field(field, other.display())),
    }
}

pub(crate) fn decode_plain(field: &str, raw: Option<&RawValue>) -> Result<Option<f64>, ParseError> {
    let value = match raw {
        None => return Ok(None),
        Some(RawValue::Number(n)) => *n,
        Some(RawValue::Text(s)) if is_blank(s) => return Ok(None),
        Some(RawValue::Text(s)) => s
            .trim()
            .replace(',', "")
            .parse::<f64>()
            .map_err(|_| ParseError::field(field, s))?,
    };
    non_negative(field, round2(value)).map(Some)
}

fn non_negative(field: &str, value: f64) -> Result<f64, ParseError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ParseError::field(field, value.to_string()))
    }
}
