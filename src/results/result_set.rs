use std::collections::HashMap;
use std::sync::Arc;

use super::materialized::MaterializedRows;
use super::row::{CustomDbRow, build_index_cache};
use crate::connection::Liveness;
use crate::error::SqlDbiError;
use crate::types::{RowShape, RowValues};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    BeforeFirst,
    On(usize),
    Exhausted,
}

/// A result set from a database query
///
/// Rows are fetched when the query runs, so row and field counts are known
/// up front. Access is through a forward-only cursor ([`ResultSet::next`] +
/// [`ResultSet::get`]) or in bulk through [`ResultSet::to_array`]. Every call
/// fails with `ConnectionError` once the owning connection has been closed.
#[derive(Debug)]
pub struct ResultSet {
    results: Vec<CustomDbRow>,
    column_names: Arc<Vec<String>>,
    column_index_cache: Arc<HashMap<String, usize>>,
    cursor: Cursor,
    liveness: Liveness,
}

impl ResultSet {
    pub(crate) fn new(column_names: Vec<String>, capacity: usize, liveness: Liveness) -> Self {
        let column_index_cache = Arc::new(build_index_cache(&column_names));
        Self {
            results: Vec::with_capacity(capacity),
            column_names: Arc::new(column_names),
            column_index_cache,
            cursor: Cursor::BeforeFirst,
            liveness,
        }
    }

    /// Append a row; values must follow the result set's field order.
    pub(crate) fn add_row_values(&mut self, row_values: Vec<RowValues>) {
        debug_assert_eq!(row_values.len(), self.column_names.len());
        self.results.push(CustomDbRow::with_cache(
            Arc::clone(&self.column_names),
            row_values,
            Arc::clone(&self.column_index_cache),
        ));
    }

    /// Number of rows the query produced, regardless of cursor position.
    ///
    /// # Errors
    ///
    /// Returns `SqlDbiError::ConnectionError` if the owning connection is closed.
    pub fn num_rows(&self) -> Result<usize, SqlDbiError> {
        self.liveness.ensure_open()?;
        Ok(self.results.len())
    }

    /// Number of fields per row.
    ///
    /// # Errors
    ///
    /// Returns `SqlDbiError::ConnectionError` if the owning connection is closed.
    pub fn num_fields(&self) -> Result<usize, SqlDbiError> {
        self.liveness.ensure_open()?;
        Ok(self.column_names.len())
    }

    /// Field names in ordinal order.
    ///
    /// # Errors
    ///
    /// Returns `SqlDbiError::ConnectionError` if the owning connection is closed.
    pub fn column_names(&self) -> Result<&[String], SqlDbiError> {
        self.liveness.ensure_open()?;
        Ok(&self.column_names)
    }

    /// Name of the field at `index`, if there is one.
    ///
    /// # Errors
    ///
    /// Returns `SqlDbiError::ConnectionError` if the owning connection is closed.
    pub fn field_name(&self, index: usize) -> Result<Option<&str>, SqlDbiError> {
        self.liveness.ensure_open()?;
        Ok(self.column_names.get(index).map(String::as_str))
    }

    /// Advance to the next row. Returns `false` once no row is left, and on
    /// every call after that.
    ///
    /// # Errors
    ///
    /// Returns `SqlDbiError::ConnectionError` if the owning connection is closed.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<bool, SqlDbiError> {
        self.liveness.ensure_open()?;
        let next = match self.cursor {
            Cursor::BeforeFirst => 0,
            Cursor::On(idx) => idx + 1,
            Cursor::Exhausted => return Ok(false),
        };
        if next < self.results.len() {
            self.cursor = Cursor::On(next);
            Ok(true)
        } else {
            self.cursor = Cursor::Exhausted;
            Ok(false)
        }
    }

    /// The row the cursor is on.
    ///
    /// # Errors
    ///
    /// Returns `SqlDbiError::CursorError` before the first successful `next`
    /// or after `next` returned `false`, and `SqlDbiError::ConnectionError`
    /// if the owning connection is closed.
    pub fn current_row(&self) -> Result<&CustomDbRow, SqlDbiError> {
        self.liveness.ensure_open()?;
        match self.cursor {
            Cursor::On(idx) => Ok(&self.results[idx]),
            Cursor::BeforeFirst => Err(SqlDbiError::CursorError(
                "no current row; call next() first".into(),
            )),
            Cursor::Exhausted => Err(SqlDbiError::CursorError(
                "no current row; result set is exhausted".into(),
            )),
        }
    }

    /// Value at zero-based `field_index` on the current row.
    ///
    /// # Errors
    ///
    /// Returns `SqlDbiError::CursorError` when there is no current row or the
    /// index is out of range.
    pub fn get(&self, field_index: usize) -> Result<&RowValues, SqlDbiError> {
        let row = self.current_row()?;
        row.get_by_index(field_index).ok_or_else(|| {
            SqlDbiError::CursorError(format!(
                "field index {field_index} out of range ({} fields)",
                row.len()
            ))
        })
    }

    /// Value of the field called `name` on the current row.
    ///
    /// # Errors
    ///
    /// Returns `SqlDbiError::CursorError` when there is no current row or no
    /// field has that name.
    pub fn get_by_name(&self, name: &str) -> Result<&RowValues, SqlDbiError> {
        let row = self.current_row()?;
        row.get(name)
            .ok_or_else(|| SqlDbiError::CursorError(format!("no field named '{name}'")))
    }

    /// Materialize the rows from the cursor position through the end in the
    /// requested shape and leave the cursor exhausted. The row the cursor is
    /// on is included; an exhausted result set yields an empty sequence.
    ///
    /// # Errors
    ///
    /// Returns `SqlDbiError::ConnectionError` if the owning connection is closed.
    pub fn to_array(&mut self, shape: impl Into<RowShape>) -> Result<MaterializedRows, SqlDbiError> {
        let remaining = self.take_remaining()?;
        Ok(match shape.into() {
            RowShape::Arrays => {
                MaterializedRows::Arrays(remaining.iter().map(CustomDbRow::to_values).collect())
            }
            RowShape::Objects => MaterializedRows::Objects(remaining.to_vec()),
        })
    }

    /// Rows from the cursor position on, as ordered value sequences.
    ///
    /// # Errors
    ///
    /// Returns `SqlDbiError::ConnectionError` if the owning connection is closed.
    pub fn to_arrays(&mut self) -> Result<Vec<Vec<RowValues>>, SqlDbiError> {
        Ok(self
            .take_remaining()?
            .iter()
            .map(CustomDbRow::to_values)
            .collect())
    }

    /// Rows from the cursor position on, as name-addressable rows.
    ///
    /// # Errors
    ///
    /// Returns `SqlDbiError::ConnectionError` if the owning connection is closed.
    pub fn to_objects(&mut self) -> Result<Vec<CustomDbRow>, SqlDbiError> {
        Ok(self.take_remaining()?.to_vec())
    }

    fn take_remaining(&mut self) -> Result<&[CustomDbRow], SqlDbiError> {
        self.liveness.ensure_open()?;
        let start = match self.cursor {
            Cursor::BeforeFirst => 0,
            Cursor::On(idx) => idx,
            Cursor::Exhausted => self.results.len(),
        };
        self.cursor = Cursor::Exhausted;
        Ok(&self.results[start..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_rows(liveness: Liveness) -> ResultSet {
        let mut rs = ResultSet::new(vec!["foo".into(), "bar".into()], 3, liveness);
        rs.add_row_values(vec!["hello".into(), 42.into()]);
        rs.add_row_values(vec!["world".into(), (-7).into()]);
        rs.add_row_values(vec!["quickjs".into(), 1337.into()]);
        rs
    }

    #[test]
    fn cursor_walks_forward_and_stays_exhausted() {
        let mut rs = three_rows(Liveness::new());
        assert!(matches!(rs.get(0), Err(SqlDbiError::CursorError(_))));
        let mut seen = Vec::new();
        while rs.next().unwrap() {
            seen.push(rs.get(1).unwrap().clone());
        }
        assert_eq!(seen, vec![RowValues::Int(42), RowValues::Int(-7), RowValues::Int(1337)]);
        assert!(!rs.next().unwrap());
        assert!(!rs.next().unwrap());
        assert!(matches!(rs.get(0), Err(SqlDbiError::CursorError(_))));
        assert_eq!(rs.num_rows().unwrap(), 3);
    }

    #[test]
    fn to_array_starts_at_the_current_row() {
        let mut rs = three_rows(Liveness::new());
        assert!(rs.next().unwrap());
        assert!(rs.next().unwrap());
        let rest = rs.to_arrays().unwrap();
        assert_eq!(rest.len(), 2);
        assert_eq!(rest[0][0], RowValues::Text("world".into()));
        assert_eq!(rest[1][0], RowValues::Text("quickjs".into()));
        assert!(rs.to_array(RowShape::Objects).unwrap().is_empty());
        assert!(!rs.next().unwrap());
    }

    #[test]
    fn closed_liveness_invalidates_everything() {
        let liveness = Liveness::new();
        let mut rs = three_rows(liveness.clone());
        liveness.close();
        assert!(matches!(rs.num_rows(), Err(SqlDbiError::ConnectionError(_))));
        assert!(matches!(rs.next(), Err(SqlDbiError::ConnectionError(_))));
        assert!(matches!(rs.to_arrays(), Err(SqlDbiError::ConnectionError(_))));
    }
}
