//! Load identifier
//!
//! Load ids are opaque strings assigned by the load board (e.g. `LOAD001`),
//! stable for the lifetime of the load.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Maximum accepted length for a load id
pub const MAX_LOAD_ID_LEN: usize = 128;

/// Primary key of a load record
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LoadId(String);

impl LoadId {
    /// Parse a load id, trimming surrounding whitespace
    ///
    /// # Errors
    /// Returns `MissingField` if the id is blank and `InvalidLoadId` if it is
    /// too long or contains control characters.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(DomainError::missing_field("load_id"));
        }
        if trimmed.len() > MAX_LOAD_ID_LEN {
            return Err(DomainError::InvalidLoadId(format!(
                "must be at most {MAX_LOAD_ID_LEN} characters"
            )));
        }
        if trimmed.chars().any(char::is_control) {
            return Err(DomainError::InvalidLoadId(
                "must not contain control characters".to_string(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Borrow the id as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LoadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for LoadId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<LoadId> for String {
    fn from(id: LoadId) -> Self {
        id.0
    }
}

impl AsRef<str> for LoadId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_whitespace() {
        let id = LoadId::parse("  LOAD001 ").unwrap();
        assert_eq!(id.as_str(), "LOAD001");
    }

    #[test]
    fn blank_id_is_missing_field() {
        assert!(matches!(
            LoadId::parse("   "),
            Err(DomainError::MissingField(_))
        ));
    }

    #[test]
    fn overly_long_id_rejected() {
        let long = "L".repeat(MAX_LOAD_ID_LEN + 1);
        assert!(matches!(
            LoadId::parse(&long),
            Err(DomainError::InvalidLoadId(_))
        ));
    }

    #[test]
    fn control_characters_rejected() {
        assert!(LoadId::parse("LOAD\n001").is_err());
    }

    #[test]
    fn serde_is_transparent_string() {
        let id = LoadId::parse("LOAD042").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""LOAD042""#);
        let back: LoadId = serde_json::from_str(r#""LOAD042""#).unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<LoadId>(r#""""#).is_err());
    }
}
