//! Elevation values pulled out of annotation text.
//!
//! Labels in survey drawings look like `FG=23.5`, `23,5\PFG` or
//! `TOP 104.20 m`. The number that matters is the last one in the string,
//! so the parser walks the text backwards from its end.

use std::fmt;

use serde::{Serialize, Serializer};

/// Sentinel stored in place of an elevation that could not be read.
pub const INVALID_ELEVATION: f64 = -100.0;

/// A parsed elevation, or the invalid sentinel (-100).
///
/// The sentinel is kept as a plain value so "processed" vs "failed"
/// bucketing is a single comparison downstream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Elevation(f64);

impl Elevation {
    pub const INVALID: Elevation = Elevation(INVALID_ELEVATION);

    #[inline]
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    /// Raw value, the sentinel included.
    #[inline]
    pub fn raw(self) -> f64 {
        self.0
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.0 != INVALID_ELEVATION
    }

    /// `Some(value)` unless this is the sentinel.
    #[inline]
    pub fn value(self) -> Option<f64> {
        self.is_valid().then_some(self.0)
    }
}

impl fmt::Display for Elevation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid() {
            return write!(f, "invalid");
        }
        match f.precision() {
            Some(p) => write!(f, "{:.*}", p, self.0),
            None => write!(f, "{}", self.0),
        }
    }
}

impl Serialize for Elevation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value().serialize(serializer)
    }
}

/// Extract the trailing number of an annotation as an elevation.
///
/// Walks from the end of the string: trailing non-digits are skipped, then
/// digits are collected together with at most one `.` or `,` (normalized to
/// `.`). The separator kept is the rightmost one; a second separator or any
/// other character ends the token. Signs are not part of the token.
///
/// Returns [`Elevation::INVALID`] when the text holds no digit.
pub fn parse_elevation(text: &str) -> Elevation {
    // ## Rust Lesson #24: Iterator adapters
    //
    // `.rev()` walks chars from the end, `.skip_while()` drops the trailing
    // markup, and the loop below consumes only as much as it needs.
    let chars = text.chars().rev().skip_while(|c| !c.is_ascii_digit());

    let mut token: Vec<char> = Vec::new();
    let mut seen_separator = false;

    for c in chars {
        match c {
            d if d.is_ascii_digit() => token.push(d),
            '.' | ',' if !seen_separator => {
                seen_separator = true;
                token.push('.');
            }
            _ => break,
        }
    }

    if !token.iter().any(char::is_ascii_digit) {
        return Elevation::INVALID;
    }

    let number: String = token.into_iter().rev().collect();
    match number.parse::<f64>() {
        Ok(value) => Elevation(value),
        Err(_) => Elevation::INVALID,
    }
}

/// Format a value in fixed-point notation with `precision` decimals.
///
/// Never switches to scientific notation; negative zero prints as zero.
pub fn format_fixed(value: f64, precision: usize) -> String {
    let text = format!("{:.*}", precision, value);
    match text.strip_prefix('-') {
        Some(rest) if rest.chars().all(|c| c == '0' || c == '.') => rest.to_string(),
        _ => text,
    }
}
