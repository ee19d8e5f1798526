use serde::Serialize;
use serde_json::Value as JsonValue;

use super::row::CustomDbRow;
use crate::error::SqlDbiError;
use crate::types::{RowShape, RowValues};

/// Rows produced by [`crate::ResultSet::to_array`].
///
/// Serializes as a JSON array of arrays or a JSON array of objects; object
/// keys keep field order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MaterializedRows {
    Arrays(Vec<Vec<RowValues>>),
    Objects(Vec<CustomDbRow>),
}

impl MaterializedRows {
    #[must_use]
    pub fn shape(&self) -> RowShape {
        match self {
            MaterializedRows::Arrays(_) => RowShape::Arrays,
            MaterializedRows::Objects(_) => RowShape::Objects,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            MaterializedRows::Arrays(rows) => rows.len(),
            MaterializedRows::Objects(rows) => rows.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn into_arrays(self) -> Option<Vec<Vec<RowValues>>> {
        match self {
            MaterializedRows::Arrays(rows) => Some(rows),
            MaterializedRows::Objects(_) => None,
        }
    }

    #[must_use]
    pub fn into_objects(self) -> Option<Vec<CustomDbRow>> {
        match self {
            MaterializedRows::Objects(rows) => Some(rows),
            MaterializedRows::Arrays(_) => None,
        }
    }

    /// # Errors
    ///
    /// Returns `SqlDbiError::SerializationError` if a value cannot be represented as JSON.
    pub fn to_json(&self) -> Result<JsonValue, SqlDbiError> {
        Ok(serde_json::to_value(self)?)
    }

    /// One JSON document per row, the way the demo prints them.
    ///
    /// # Errors
    ///
    /// Returns `SqlDbiError::SerializationError` if a value cannot be represented as JSON.
    pub fn to_json_lines(&self) -> Result<Vec<String>, SqlDbiError> {
        let lines = match self {
            MaterializedRows::Arrays(rows) => rows
                .iter()
                .map(serde_json::to_string)
                .collect::<Result<Vec<_>, _>>()?,
            MaterializedRows::Objects(rows) => rows
                .iter()
                .map(serde_json::to_string)
                .collect::<Result<Vec<_>, _>>()?,
        };
        Ok(lines)
    }
}
