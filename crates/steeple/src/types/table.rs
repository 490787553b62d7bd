//! Table name type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

/// Maximum length of a table name, matching the platform's identifier limit.
const MAX_LEN: usize = 128;

/// A validated platform table name (e.g., `Contacts`, `Event_Participants`).
///
/// Table names must start with an ASCII letter and contain only ASCII
/// letters, digits, and underscores. Validation happens at construction,
/// so a `Table` can always be interpolated into an endpoint path safely.
///
/// # Example
///
/// ```
/// use steeple::Table;
///
/// let table = Table::new("Event_Participants").unwrap();
/// assert_eq!(table.as_str(), "Event_Participants");
/// assert!(Table::new("no spaces allowed").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Table(String);

impl Table {
    /// Create a new table name, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty, too long, or contains
    /// characters outside `[A-Za-z0-9_]`.
    pub fn new(s: impl Into<String>) -> Result<Self, Error> {
        let s = s.into();
        validate_identifier(&s).map_err(|reason| InvalidInputError::Table {
            value: s.clone(),
            reason,
        })?;
        Ok(Self(s))
    }

    /// Returns the table name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Shared identifier rules for table and procedure names.
pub(crate) fn validate_identifier(s: &str) -> Result<(), String> {
    if s.is_empty() {
        return Err("must not be empty".to_string());
    }
    if s.len() > MAX_LEN {
        return Err(format!("must be at most {} characters", MAX_LEN));
    }
    if !s.chars().next().is_some_and(|c| c.is_ascii_alphabetic()) {
        return Err("must start with an ASCII letter".to_string());
    }
    if let Some(bad) = s.chars().find(|c| !c.is_ascii_alphanumeric() && *c != '_') {
        return Err(format!("contains invalid character '{}'", bad));
    }
    Ok(())
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Table {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for Table {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for Table {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Table {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Table::new(s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_names() {
        assert!(Table::new("Contacts").is_ok());
        assert!(Table::new("Event_Participants").is_ok());
        assert!(Table::new("dp_Users").is_ok());
    }

    #[test]
    fn rejects_empty() {
        assert!(Table::new("").is_err());
    }

    #[test]
    fn rejects_leading_digit() {
        assert!(Table::new("1Contacts").is_err());
    }

    #[test]
    fn rejects_invalid_characters() {
        assert!(Table::new("Contacts; DROP TABLE").is_err());
        assert!(Table::new("Contacts/Households").is_err());
    }

    #[test]
    fn rejects_overlong() {
        let name = "A".repeat(200);
        assert!(Table::new(name).is_err());
    }
}
