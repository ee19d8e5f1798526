use chrono::DateTime;
use rusqlite::Statement;
use rusqlite::types::Value;

use crate::connection::Liveness;
use crate::error::SqlDbiError;
use crate::results::ResultSet;
use crate::types::{RowValues, parse_timestamp};

/// What a column's declared type asks for on top of the `SQLite` storage class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ColumnKind {
    Boolean,
    Timestamp,
    Decimal,
    /// No declared type, or one that maps straight onto a storage class.
    Native,
}

impl ColumnKind {
    pub(crate) fn from_decl_type(decl_type: Option<&str>) -> Self {
        let Some(decl) = decl_type else {
            return ColumnKind::Native;
        };
        let decl = decl.to_ascii_uppercase();
        if decl.contains("BOOL") {
            ColumnKind::Boolean
        } else if decl.contains("DATE") || decl.contains("TIME") {
            ColumnKind::Timestamp
        } else if decl
            .split(|c: char| !c.is_ascii_alphanumeric())
            .any(|word| ["DEC", "NUM", "REAL", "FLOA", "DOUB"].iter().any(|&t| word.starts_with(t)))
        {
            ColumnKind::Decimal
        } else {
            ColumnKind::Native
        }
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "t" | "yes" | "y" => Some(true),
        "0" | "false" | "f" | "no" | "n" => Some(false),
        _ => None,
    }
}

/// Turn a stored value into a `RowValues`, guided by the column's declared type.
/// Values that do not fit the declared type keep their storage class.
pub(crate) fn coerce_value(kind: ColumnKind, value: Value) -> RowValues {
    match (kind, value) {
        (_, Value::Null) => RowValues::Null,
        (ColumnKind::Boolean, Value::Integer(i)) => RowValues::Bool(i != 0),
        (ColumnKind::Boolean, Value::Real(f)) => RowValues::Bool(f != 0.0),
        (ColumnKind::Boolean, Value::Text(s)) => match parse_bool(&s) {
            Some(b) => RowValues::Bool(b),
            None => RowValues::Text(s),
        },
        (ColumnKind::Timestamp, Value::Text(s)) => match parse_timestamp(&s) {
            Some(dt) => RowValues::Timestamp(dt),
            None => RowValues::Text(s),
        },
        (ColumnKind::Timestamp, Value::Integer(secs)) => DateTime::from_timestamp(secs, 0)
            .map_or(RowValues::Int(secs), |dt| RowValues::Timestamp(dt.naive_utc())),
        #[allow(clippy::cast_precision_loss)]
        (ColumnKind::Decimal, Value::Integer(i)) => RowValues::Float(i as f64),
        (_, Value::Integer(i)) => RowValues::Int(i),
        (_, Value::Real(f)) => RowValues::Float(f),
        (_, Value::Text(s)) => RowValues::Text(s),
        (_, Value::Blob(b)) => RowValues::Blob(b),
    }
}

/// Run a prepared, already-bound statement and materialize every row.
///
/// # Errors
/// Returns `SqlDbiError::StatementError` if stepping the statement fails.
pub(crate) fn build_result_set(
    stmt: &mut Statement<'_>,
    liveness: Liveness,
) -> Result<ResultSet, SqlDbiError> {
    let columns = stmt.columns();
    let column_names: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();
    let kinds: Vec<ColumnKind> = columns
        .iter()
        .map(|c| ColumnKind::from_decl_type(c.decl_type()))
        .collect();
    drop(columns);

    let mut result_set = ResultSet::new(column_names, 10, liveness);
    let mut rows = stmt.raw_query();
    while let Some(row) = rows.next().map_err(statement_error)? {
        let mut row_values = Vec::with_capacity(kinds.len());
        for (idx, kind) in kinds.iter().enumerate() {
            let value: Value = row.get(idx).map_err(statement_error)?;
            row_values.push(coerce_value(*kind, value));
        }
        result_set.add_row_values(row_values);
    }

    Ok(result_set)
}

pub(crate) fn statement_error(e: rusqlite::Error) -> SqlDbiError {
    SqlDbiError::StatementError(e.to_string())
}
