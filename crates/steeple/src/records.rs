//! Open table record type.
//!
//! Platform tables are dynamically keyed: every row is a mapping from
//! column name to scalar/JSON value, and the set of columns depends on the
//! table and on the `$select` expression of the query that produced it.
//!
//! Typed access is the primary path: every service operation is generic
//! over a caller-supplied record type. [`Record`] is the catch-all escape
//! hatch for columns unknown at compile time.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::{Error, InvalidInputError};

/// A dynamically-keyed table record.
///
/// Guaranteed to be a JSON object (column name → value). Records are
/// identified by a platform-assigned integer primary key once persisted;
/// before creation, the key column is simply absent.
///
/// # Example
///
/// ```
/// use steeple::Record;
///
/// let record = Record::new()
///     .set("Widget_Name", "x")
///     .set("Widget_Count", 3);
///
/// assert_eq!(record.get("Widget_Name").unwrap(), "x");
/// assert_eq!(record.key("Widget_ID"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a record from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a JSON object.
    pub fn from_value(value: Value) -> Result<Self, Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(InvalidInputError::Record {
                reason: format!("record must be a JSON object, got {}", kind(&other)),
            }
            .into()),
        }
    }

    /// Set a column value, returning the record for chaining.
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(column.into(), value.into());
        self
    }

    /// Get a column value.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    /// Read the platform-assigned primary key from the given column.
    ///
    /// Returns `None` if the column is absent or not an integer (the
    /// record has not been persisted, or the caller named the wrong
    /// column).
    pub fn key(&self, pk_column: &str) -> Option<i64> {
        self.0.get(pk_column).and_then(Value::as_i64)
    }

    /// Borrow the underlying column map.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consume and return the record as a JSON value.
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Record::from_value(value).map_err(serde::de::Error::custom)
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
