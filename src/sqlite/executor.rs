use rusqlite::{Batch, Connection as SqliteConnectionType};

use super::params::bind_params;
use super::query::{build_result_set, statement_error};
use crate::connection::Liveness;
use crate::error::SqlDbiError;
use crate::results::ResultSet;
use crate::types::BindParams;

/// Execute one or more statements that produce no rows; a batch of several
/// wraps in a transaction when not already inside one, so a failing statement
/// undoes the ones before it.
///
/// # Errors
/// Returns `SqlDbiError::StatementError` if any statement fails.
pub(crate) fn execute_batch(conn: &SqliteConnectionType, query: &str) -> Result<(), SqlDbiError> {
    if conn.is_autocommit() && has_several_statements(conn, query) {
        let tx = conn.unchecked_transaction().map_err(statement_error)?;
        tx.execute_batch(query).map_err(statement_error)?;
        tx.commit().map_err(statement_error)
    } else {
        conn.execute_batch(query).map_err(statement_error)
    }
}

// A lone statement is atomic already, and may itself be BEGIN or COMMIT.
fn has_several_statements(conn: &SqliteConnectionType, query: &str) -> bool {
    let mut batch = Batch::new(conn, query);
    match batch.next() {
        Ok(Some(_)) => !matches!(batch.next(), Ok(None)),
        _ => false,
    }
}

/// Execute a single parameterized statement and return rows affected.
///
/// # Errors
/// Returns `SqlDbiError::BindError` if the parameters do not fit the
/// placeholders, and `SqlDbiError::StatementError` if preparing or executing
/// fails or the statement returns rows.
pub(crate) fn execute_dml(
    conn: &SqliteConnectionType,
    query: &str,
    params: &BindParams,
) -> Result<usize, SqlDbiError> {
    let mut stmt = conn.prepare(query).map_err(statement_error)?;
    bind_params(&mut stmt, params)?;
    stmt.raw_execute().map_err(|e| match e {
        rusqlite::Error::ExecuteReturnedResults => SqlDbiError::StatementError(
            "statement returns rows; use query() to read them".into(),
        ),
        other => statement_error(other),
    })
}

/// Execute a SELECT and materialize it into a `ResultSet`.
///
/// # Errors
/// Returns `SqlDbiError::StatementError` on malformed SQL or execution
/// failure, and `SqlDbiError::BindError` if the parameters do not fit.
pub(crate) fn execute_select(
    conn: &SqliteConnectionType,
    query: &str,
    params: &BindParams,
    liveness: Liveness,
) -> Result<ResultSet, SqlDbiError> {
    let mut stmt = conn.prepare(query).map_err(statement_error)?;
    bind_params(&mut stmt, params)?;
    build_result_set(&mut stmt, liveness)
}
