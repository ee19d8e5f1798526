use std::collections::BTreeSet;

use rusqlite::Statement;
use rusqlite::types::Value;

use crate::error::SqlDbiError;
use crate::types::{BindParams, RowValues, TIMESTAMP_FORMAT};

/// Convert a single `RowValue` to a rusqlite `Value`.
#[must_use]
pub fn row_value_to_sqlite_value(value: &RowValues) -> Value {
    match value {
        RowValues::Int(i) => Value::Integer(*i),
        RowValues::Float(f) => Value::Real(*f),
        RowValues::Text(s) => Value::Text(s.clone()),
        RowValues::Bool(b) => Value::Integer(i64::from(*b)),
        RowValues::Timestamp(dt) => Value::Text(dt.format(TIMESTAMP_FORMAT).to_string()),
        RowValues::Null => Value::Null,
        RowValues::JSON(jval) => Value::Text(jval.to_string()),
        RowValues::Blob(bytes) => Value::Blob(bytes.clone()),
    }
}

/// How a prepared statement refers to one of its parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Placeholder {
    /// `?` or `?NNN`
    Positional,
    /// `:name`, `@name` or `$name`, kept with its sigil
    Named(String),
}

fn placeholders(stmt: &Statement<'_>) -> Vec<Placeholder> {
    (1..=stmt.parameter_count())
        .map(|idx| match stmt.parameter_name(idx) {
            Some(name) if !name.starts_with('?') => Placeholder::Named(name.to_string()),
            _ => Placeholder::Positional,
        })
        .collect()
}

/// Check `params` against the statement's placeholders and bind them.
///
/// Rejects a binding style that does not match the statement text, a
/// positional list of the wrong length, named placeholders without a value,
/// and named values that match no placeholder.
pub(crate) fn bind_params(stmt: &mut Statement<'_>, params: &BindParams) -> Result<(), SqlDbiError> {
    let slots = placeholders(stmt);

    match params {
        BindParams::None => {
            if !slots.is_empty() {
                return Err(SqlDbiError::BindError(format!(
                    "statement has {} placeholder(s) but no parameters were supplied",
                    slots.len()
                )));
            }
        }
        BindParams::Positional(values) => {
            if let Some(Placeholder::Named(name)) =
                slots.iter().find(|slot| matches!(slot, Placeholder::Named(_)))
            {
                return Err(SqlDbiError::BindError(format!(
                    "named placeholder {name} cannot be bound from a positional list"
                )));
            }
            if values.len() != slots.len() {
                return Err(SqlDbiError::BindError(format!(
                    "statement expects {} positional parameter(s), {} supplied",
                    slots.len(),
                    values.len()
                )));
            }
            for (idx, value) in values.iter().enumerate() {
                raw_bind(stmt, idx + 1, value)?;
            }
        }
        BindParams::Named(map) => {
            let mut used: BTreeSet<&str> = BTreeSet::new();
            for (idx, slot) in slots.iter().enumerate() {
                let Placeholder::Named(name) = slot else {
                    return Err(SqlDbiError::BindError(
                        "positional placeholder cannot be bound from named parameters".into(),
                    ));
                };
                let bare = &name[1..];
                let (key, value) = map
                    .get_key_value(bare)
                    .or_else(|| map.get_key_value(name.as_str()))
                    .ok_or_else(|| {
                        SqlDbiError::BindError(format!("no value supplied for placeholder {name}"))
                    })?;
                used.insert(key.as_str());
                raw_bind(stmt, idx + 1, value)?;
            }
            if let Some(extra) = map.keys().find(|k| !used.contains(k.as_str())) {
                return Err(SqlDbiError::BindError(format!(
                    "parameter '{extra}' matches no placeholder in the statement"
                )));
            }
        }
    }
    Ok(())
}

fn raw_bind(stmt: &mut Statement<'_>, idx: usize, value: &RowValues) -> Result<(), SqlDbiError> {
    stmt.raw_bind_parameter(idx, row_value_to_sqlite_value(value))
        .map_err(|e| SqlDbiError::BindError(format!("cannot bind parameter {idx}: {e}")))
}
