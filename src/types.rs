use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::NaiveDateTime;
use clap::ValueEnum;
use serde::{Serialize, Serializer};
use serde_json::Value as JsonValue;

use crate::error::SqlDbiError;

/// Text layout used when a timestamp leaves the crate, either as a bound
/// parameter or in JSON output.
pub(crate) const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Values that can be stored in a database row or used as query parameters.
///
/// The same enum is used for bind parameters and for result fields, so a
/// value read from one query can be fed straight into the next:
/// ```rust
/// use sql_dbi::prelude::*;
///
/// let params = vec![
///     RowValues::Int(1),
///     RowValues::Text("alice".into()),
///     RowValues::Bool(true),
/// ];
/// # let _ = params;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum RowValues {
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit), also used for declared DECIMAL columns
    Float(f64),
    /// Text/string value
    Text(String),
    /// Boolean value
    Bool(bool),
    /// Timestamp value
    Timestamp(NaiveDateTime),
    /// NULL value
    Null,
    /// JSON value
    JSON(JsonValue),
    /// Binary data
    Blob(Vec<u8>),
}

impl RowValues {
    /// Check if this value is NULL
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_int(&self) -> Option<&i64> {
        if let RowValues::Int(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let RowValues::Text(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<&bool> {
        if let RowValues::Bool(value) = self {
            return Some(value);
        } else if let Some(i) = self.as_int() {
            if *i == 1 {
                return Some(&true);
            } else if *i == 0 {
                return Some(&false);
            }
        }
        None
    }

    #[must_use]
    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        if let RowValues::Timestamp(value) = self {
            return Some(*value);
        } else if let Some(s) = self.as_text() {
            return parse_timestamp(s);
        }
        None
    }

    /// Numeric view of the value; integers are widened.
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            RowValues::Float(value) => Some(*value),
            #[allow(clippy::cast_precision_loss)]
            RowValues::Int(value) => Some(*value as f64),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_blob(&self) -> Option<&[u8]> {
        if let RowValues::Blob(bytes) = self {
            Some(bytes)
        } else {
            None
        }
    }

    /// Render as a `serde_json::Value`, the shape used by row materialization.
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        match self {
            RowValues::Int(i) => JsonValue::from(*i),
            RowValues::Float(f) => JsonValue::from(*f),
            RowValues::Text(s) => JsonValue::String(s.clone()),
            RowValues::Bool(b) => JsonValue::Bool(*b),
            RowValues::Timestamp(dt) => JsonValue::String(dt.format(TIMESTAMP_FORMAT).to_string()),
            RowValues::Null => JsonValue::Null,
            RowValues::JSON(v) => v.clone(),
            RowValues::Blob(bytes) => JsonValue::from(bytes.clone()),
        }
    }
}

/// Parse the timestamp layouts SQLite's date functions produce.
pub(crate) fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    const LAYOUTS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ];
    let s = s.trim();
    for layout in LAYOUTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, layout) {
            return Some(dt);
        }
    }
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

impl Serialize for RowValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RowValues::Int(i) => serializer.serialize_i64(*i),
            RowValues::Float(f) => serializer.serialize_f64(*f),
            RowValues::Text(s) => serializer.serialize_str(s),
            RowValues::Bool(b) => serializer.serialize_bool(*b),
            RowValues::Timestamp(dt) => {
                serializer.collect_str(&dt.format(TIMESTAMP_FORMAT))
            }
            RowValues::Null => serializer.serialize_none(),
            RowValues::JSON(v) => v.serialize(serializer),
            RowValues::Blob(bytes) => serializer.collect_seq(bytes),
        }
    }
}

impl From<i64> for RowValues {
    fn from(value: i64) -> Self {
        RowValues::Int(value)
    }
}

impl From<i32> for RowValues {
    fn from(value: i32) -> Self {
        RowValues::Int(i64::from(value))
    }
}

impl From<f64> for RowValues {
    fn from(value: f64) -> Self {
        RowValues::Float(value)
    }
}

impl From<bool> for RowValues {
    fn from(value: bool) -> Self {
        RowValues::Bool(value)
    }
}

impl From<&str> for RowValues {
    fn from(value: &str) -> Self {
        RowValues::Text(value.to_string())
    }
}

impl From<String> for RowValues {
    fn from(value: String) -> Self {
        RowValues::Text(value)
    }
}

impl From<NaiveDateTime> for RowValues {
    fn from(value: NaiveDateTime) -> Self {
        RowValues::Timestamp(value)
    }
}

impl From<Vec<u8>> for RowValues {
    fn from(value: Vec<u8>) -> Self {
        RowValues::Blob(value)
    }
}

impl From<JsonValue> for RowValues {
    fn from(value: JsonValue) -> Self {
        RowValues::JSON(value)
    }
}

impl<T: Into<RowValues>> From<Option<T>> for RowValues {
    fn from(value: Option<T>) -> Self {
        value.map_or(RowValues::Null, Into::into)
    }
}

/// The database backends a connection can be opened against.
///
/// Parsed from the driver identifier given to [`crate::open`]; matching is
/// case-insensitive and accepts the libdbi driver names as aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum DatabaseType {
    /// `SQLite` database
    #[value(alias = "sqlite3")]
    Sqlite,
}

impl DatabaseType {
    /// Resolve a driver identifier such as `"sqlite3"`.
    ///
    /// # Errors
    ///
    /// Returns `SqlDbiError::ConnectionError` if no backend is registered under `driver_id`.
    pub fn from_driver_id(driver_id: &str) -> Result<Self, SqlDbiError> {
        <Self as ValueEnum>::from_str(driver_id.trim(), true).map_err(|_| {
            SqlDbiError::ConnectionError(format!("unknown database driver '{driver_id}'"))
        })
    }
}

impl FromStr for DatabaseType {
    type Err = SqlDbiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_driver_id(s)
    }
}

/// Parameters for one statement: positional (`?`), named (`:name`), or none.
///
/// The two binding styles never mix within a call.
/// ```rust
/// use sql_dbi::prelude::*;
///
/// let by_position = BindParams::positional([5]);
/// let by_name = BindParams::named([("whizz", 2.0)]);
/// # let _ = (by_position, by_name);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum BindParams {
    #[default]
    None,
    Positional(Vec<RowValues>),
    /// Keys may be written with or without the leading `:`, `@` or `$`.
    Named(BTreeMap<String, RowValues>),
}

impl BindParams {
    pub fn positional<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<RowValues>,
    {
        BindParams::Positional(values.into_iter().map(Into::into).collect())
    }

    pub fn named<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<RowValues>,
    {
        BindParams::Named(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            BindParams::None => 0,
            BindParams::Positional(values) => values.len(),
            BindParams::Named(map) => map.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<()> for BindParams {
    fn from((): ()) -> Self {
        BindParams::None
    }
}

impl From<Vec<RowValues>> for BindParams {
    fn from(values: Vec<RowValues>) -> Self {
        BindParams::Positional(values)
    }
}

impl From<&[RowValues]> for BindParams {
    fn from(values: &[RowValues]) -> Self {
        BindParams::Positional(values.to_vec())
    }
}

impl From<BTreeMap<String, RowValues>> for BindParams {
    fn from(map: BTreeMap<String, RowValues>) -> Self {
        BindParams::Named(map)
    }
}

/// Shape of each row produced by [`crate::ResultSet::to_array`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RowShape {
    /// Ordered sequence of values per row.
    #[default]
    Arrays,
    /// Field name to value mapping per row.
    Objects,
}

impl From<bool> for RowShape {
    fn from(as_objects: bool) -> Self {
        if as_objects {
            RowShape::Objects
        } else {
            RowShape::Arrays
        }
    }
}
