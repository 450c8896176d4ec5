//! Monetary rate value object
//!
//! Rates arrive from the negotiation agent either as JSON numbers or as
//! loosely formatted strings (`"$1,250.00"`). Strings are accepted only if
//! they match the grammar
//!
//! ```text
//! ws* '$'? ws* ( d{1,3} (',' d{3})+ | d+ ) ( '.' d{1,2} )? ws*
//! ```
//!
//! Anything else, including trailing junk such as `1200field2field2`, is
//! rejected rather than patched up.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// A non-negative, finite amount in US dollars
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "NumericInput", into = "f64")]
pub struct Rate(f64);

impl Rate {
    /// Create a rate from a number
    ///
    /// # Errors
    /// Returns `InvalidRate` for negative, NaN or infinite values.
    pub fn new(value: f64) -> Result<Self, DomainError> {
        if !value.is_finite() || value < 0.0 {
            return Err(DomainError::InvalidRate(value.to_string()));
        }
        Ok(Self(value))
    }

    /// Parse a rate from its textual form
    ///
    /// # Errors
    /// Returns `InvalidRate` if the text does not match the rate grammar.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        parse_amount(s)
            .ok_or_else(|| DomainError::InvalidRate(s.to_string()))
            .and_then(Self::new)
    }

    /// Amount in dollars
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

impl From<Rate> for f64 {
    fn from(rate: Rate) -> Self {
        rate.0
    }
}

impl TryFrom<NumericInput> for Rate {
    type Error = DomainError;

    fn try_from(input: NumericInput) -> Result<Self, Self::Error> {
        match input {
            NumericInput::Number(n) => Self::new(n),
            NumericInput::Text(s) => Self::parse(&s),
        }
    }
}

/// Length of a negotiation call in seconds
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "NumericInput", into = "f64")]
pub struct CallDuration(f64);

impl CallDuration {
    /// Create a duration from seconds
    ///
    /// # Errors
    /// Returns `InvalidDuration` for negative, NaN or infinite values.
    pub fn from_secs(secs: f64) -> Result<Self, DomainError> {
        if !secs.is_finite() || secs < 0.0 {
            return Err(DomainError::InvalidDuration(secs.to_string()));
        }
        Ok(Self(secs))
    }

    /// Parse a plain numeric string such as `"312"` or `" 45.5 "`
    ///
    /// # Errors
    /// Returns `InvalidDuration` if the text is not a non-negative number.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        let trimmed = s.trim();
        let is_plain_number = !trimmed.is_empty()
            && trimmed.chars().all(|c| c.is_ascii_digit() || c == '.')
            && trimmed.chars().filter(|&c| c == '.').count() <= 1
            && trimmed.chars().any(|c| c.is_ascii_digit());
        if !is_plain_number {
            return Err(DomainError::InvalidDuration(s.to_string()));
        }
        trimmed
            .parse::<f64>()
            .map_err(|_| DomainError::InvalidDuration(s.to_string()))
            .and_then(Self::from_secs)
    }

    /// Duration in seconds
    #[must_use]
    pub const fn as_secs(&self) -> f64 {
        self.0
    }
}

impl From<CallDuration> for f64 {
    fn from(d: CallDuration) -> Self {
        d.0
    }
}

impl TryFrom<NumericInput> for CallDuration {
    type Error = DomainError;

    fn try_from(input: NumericInput) -> Result<Self, Self::Error> {
        match input {
            NumericInput::Number(n) => Self::from_secs(n),
            NumericInput::Text(s) => Self::parse(&s),
        }
    }
}

/// Wire shape for numeric fields that may be sent as numbers or strings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumericInput {
    Number(f64),
    Text(String),
}

/// Parse the amount grammar, returning `None` on any deviation
fn parse_amount(s: &str) -> Option<f64> {
    let mut rest = s.trim();
    if let Some(stripped) = rest.strip_prefix('$') {
        rest = stripped.trim_start();
    }

    let (int_part, frac_part) = match rest.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (rest, None),
    };

    let digits = parse_integer_part(int_part)?;

    let mut normalized = digits;
    if let Some(frac) = frac_part {
        if frac.is_empty() || frac.len() > 2 || !frac.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        normalized.push('.');
        normalized.push_str(frac);
    }

    normalized.parse::<f64>().ok()
}

/// Integer part: either plain digits or comma-grouped thousands
fn parse_integer_part(s: &str) -> Option<String> {
    if s.is_empty() {
        return None;
    }
    if s.bytes().all(|b| b.is_ascii_digit()) {
        return Some(s.to_string());
    }

    let mut groups = s.split(',');
    let head = groups.next()?;
    if head.is_empty() || head.len() > 3 || !head.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let mut digits = head.to_string();
    let mut grouped = false;
    for group in groups {
        if group.len() != 3 || !group.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.push_str(group);
        grouped = true;
    }

    grouped.then_some(digits)
}
