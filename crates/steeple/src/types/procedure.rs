//! Stored-procedure name type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

use super::table::validate_identifier;

/// A validated stored-procedure name (e.g., `api_Widget_GetStats`).
///
/// Procedure names follow the same identifier rules as table names:
/// an ASCII letter followed by ASCII letters, digits, and underscores.
///
/// # Example
///
/// ```
/// use steeple::Procedure;
///
/// let proc = Procedure::new("api_Widget_GetStats").unwrap();
/// assert_eq!(proc.as_str(), "api_Widget_GetStats");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Procedure(String);

impl Procedure {
    /// Create a new procedure name, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty, too long, or contains
    /// characters outside `[A-Za-z0-9_]`.
    pub fn new(s: impl Into<String>) -> Result<Self, Error> {
        let s = s.into();
        validate_identifier(&s).map_err(|reason| InvalidInputError::Procedure {
            value: s.clone(),
            reason,
        })?;
        Ok(Self(s))
    }

    /// Returns the procedure name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Procedure {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for Procedure {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for Procedure {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Procedure {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Procedure::new(s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_names() {
        assert!(Procedure::new("api_Widget_GetStats").is_ok());
        assert!(Procedure::new("api_Common_GetLookup").is_ok());
    }

    #[test]
    fn rejects_path_traversal() {
        assert!(Procedure::new("../tables/Contacts").is_err());
    }

    #[test]
    fn rejects_empty() {
        assert!(Procedure::new("").is_err());
    }
}
