//! Motor-carrier (MC) number of a trucking company

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Motor-carrier identifier of the counterparty in a negotiation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct McNumber(String);

impl McNumber {
    /// Parse an MC number
    ///
    /// Accepts an optional `MC` prefix (`MC-123456`, `mc 123456`) and keeps
    /// the remaining token as-is.
    ///
    /// # Errors
    /// Returns `MissingField` if blank and `InvalidMcNumber` if the token
    /// contains anything other than ASCII alphanumerics.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(DomainError::missing_field("mc_num"));
        }

        let token = strip_mc_prefix(trimmed);
        if token.is_empty() || !token.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(DomainError::InvalidMcNumber(trimmed.to_string()));
        }

        Ok(Self(token.to_string()))
    }

    /// Borrow the number as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn strip_mc_prefix(s: &str) -> &str {
    let bytes = s.as_bytes();
    if bytes.len() > 2 && bytes[..2].eq_ignore_ascii_case(b"mc") {
        let rest = &s[2..];
        let rest = rest.trim_start_matches(['-', '#', ' ']);
        if !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()) {
            return rest;
        }
    }
    s
}

impl fmt::Display for McNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for McNumber {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<McNumber> for String {
    fn from(mc: McNumber) -> Self {
        mc.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_digits_accepted() {
        assert_eq!(McNumber::parse("1023").unwrap().as_str(), "1023");
    }

    #[test]
    fn mc_prefix_is_stripped() {
        assert_eq!(McNumber::parse("MC-123456").unwrap().as_str(), "123456");
        assert_eq!(McNumber::parse("mc 77").unwrap().as_str(), "77");
        assert_eq!(McNumber::parse("MC#42").unwrap().as_str(), "42");
    }

    #[test]
    fn alphanumeric_token_kept_verbatim() {
        assert_eq!(McNumber::parse("MCX9").unwrap().as_str(), "MCX9");
    }

    #[test]
    fn blank_is_missing_field() {
        assert!(matches!(
            McNumber::parse(""),
            Err(DomainError::MissingField(_))
        ));
    }

    #[test]
    fn punctuation_rejected() {
        assert!(matches!(
            McNumber::parse("10;23"),
            Err(DomainError::InvalidMcNumber(_))
        ));
    }
}
