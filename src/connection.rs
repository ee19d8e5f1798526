use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rusqlite::Connection as SqliteConnectionType;

use crate::error::SqlDbiError;
use crate::options::ConnectOptions;
use crate::results::ResultSet;
use crate::sqlite;
use crate::types::{BindParams, DatabaseType};

/// Open/closed flag shared between a connection and the result sets it
/// produced. Closing the connection invalidates every outstanding result set.
#[derive(Debug, Clone)]
pub(crate) struct Liveness(Arc<AtomicBool>);

impl Liveness {
    pub(crate) fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub(crate) fn is_open(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub(crate) fn close(&self) {
        self.0.store(false, Ordering::Release);
    }

    pub(crate) fn ensure_open(&self) -> Result<(), SqlDbiError> {
        if self.is_open() {
            Ok(())
        } else {
            Err(SqlDbiError::closed_handle())
        }
    }
}

/// Live backend session, one variant per supported database.
enum BackendConnection {
    Sqlite(SqliteConnectionType),
}

impl fmt::Debug for BackendConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendConnection::Sqlite(conn) => f
                .debug_tuple("Sqlite")
                .field(&conn.path().unwrap_or(":memory:"))
                .finish(),
        }
    }
}

/// One open database session.
///
/// Created by [`open`] or [`Connection::open`], released by
/// [`Connection::close`] (or on drop). Every call after `close` fails with
/// `SqlDbiError::ConnectionError`, and so does every call on a result set
/// this connection produced.
///
/// ```rust
/// use sql_dbi::prelude::*;
///
/// # fn main() -> Result<(), SqlDbiError> {
/// let mut db = sql_dbi::open("sqlite3", ConnectOptions::new().with("dbname", ":memory:"))?;
/// db.exec("CREATE TABLE t (n INTEGER); INSERT INTO t VALUES (1), (2);")?;
/// let mut res = db.query("SELECT n FROM t WHERE n > ?", BindParams::positional([1]))?;
/// assert_eq!(res.num_rows()?, 1);
/// assert!(res.next()?);
/// assert_eq!(res.get(0)?, &RowValues::Int(2));
/// db.close()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Connection {
    db_type: DatabaseType,
    options: ConnectOptions,
    backend: Option<BackendConnection>,
    liveness: Liveness,
}

/// Open a connection by driver identifier, e.g. `"sqlite3"`.
///
/// # Errors
///
/// Returns `SqlDbiError::ConnectionError` if the driver is unknown or the
/// backend cannot be initialized with `options`.
pub fn open(driver_id: &str, options: ConnectOptions) -> Result<Connection, SqlDbiError> {
    Connection::open(DatabaseType::from_driver_id(driver_id)?, options)
}

impl Connection {
    /// Open a connection to the given backend.
    ///
    /// # Errors
    ///
    /// Returns `SqlDbiError::ConnectionError` if the options are invalid or
    /// the backend cannot be initialized.
    pub fn open(db_type: DatabaseType, options: ConnectOptions) -> Result<Self, SqlDbiError> {
        let backend = match db_type {
            DatabaseType::Sqlite => {
                let sqlite_opts = sqlite::SqliteOptions::from_connect_options(&options)?;
                let conn = sqlite::config::open_sqlite(&sqlite_opts)?;
                tracing::info!(db = %sqlite_opts.db_path, "opened sqlite connection");
                BackendConnection::Sqlite(conn)
            }
        };

        Ok(Self {
            db_type,
            options,
            backend: Some(backend),
            liveness: Liveness::new(),
        })
    }

    #[must_use]
    pub fn database_type(&self) -> DatabaseType {
        self.db_type
    }

    #[must_use]
    pub fn options(&self) -> &ConnectOptions {
        &self.options
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.backend.is_some()
    }

    fn backend(&self) -> Result<&BackendConnection, SqlDbiError> {
        self.backend.as_ref().ok_or_else(SqlDbiError::closed_handle)
    }

    /// Run statements that produce no rows. Several `;`-separated statements
    /// may be given at once.
    ///
    /// # Errors
    ///
    /// Returns `SqlDbiError::StatementError` on malformed SQL or a rejected
    /// statement, `SqlDbiError::ConnectionError` if the connection is closed.
    pub fn exec(&self, query: &str) -> Result<(), SqlDbiError> {
        tracing::debug!(sql = query, "exec");
        match self.backend()? {
            BackendConnection::Sqlite(conn) => sqlite::executor::execute_batch(conn, query),
        }
    }

    /// Run one parameterized statement that produces no rows and return the
    /// number of rows it changed.
    ///
    /// # Errors
    ///
    /// Returns `SqlDbiError::BindError` if `params` do not fit the statement's
    /// placeholders, `SqlDbiError::StatementError` if the statement fails or
    /// returns rows, `SqlDbiError::ConnectionError` if the connection is closed.
    pub fn exec_with(
        &self,
        query: &str,
        params: impl Into<BindParams>,
    ) -> Result<usize, SqlDbiError> {
        let params = params.into();
        tracing::debug!(sql = query, params = params.len(), "exec_with");
        match self.backend()? {
            BackendConnection::Sqlite(conn) => sqlite::executor::execute_dml(conn, query, &params),
        }
    }

    /// Run a statement that produces rows. The result set starts before the
    /// first row.
    ///
    /// # Errors
    ///
    /// Returns `SqlDbiError::StatementError` on malformed SQL,
    /// `SqlDbiError::BindError` if `params` do not fit the placeholders,
    /// `SqlDbiError::ConnectionError` if the connection is closed.
    pub fn query(
        &self,
        query: &str,
        params: impl Into<BindParams>,
    ) -> Result<ResultSet, SqlDbiError> {
        let params = params.into();
        tracing::debug!(sql = query, params = params.len(), "query");
        let result = match self.backend()? {
            BackendConnection::Sqlite(conn) => {
                sqlite::executor::execute_select(conn, query, &params, self.liveness.clone())
            }
        }?;
        tracing::debug!(rows = result.num_rows()?, "query returned");
        Ok(result)
    }

    /// Release the session and invalidate its result sets.
    ///
    /// # Errors
    ///
    /// Returns `SqlDbiError::ConnectionError` if the connection was already
    /// closed or the backend refuses to close; the handle is unusable either way.
    pub fn close(&mut self) -> Result<(), SqlDbiError> {
        let backend = self.backend.take().ok_or_else(SqlDbiError::closed_handle)?;
        self.liveness.close();
        match backend {
            BackendConnection::Sqlite(conn) => conn.close().map_err(|(_, e)| {
                SqlDbiError::ConnectionError(format!("error closing sqlite connection: {e}"))
            })?,
        }
        tracing::info!(db_type = ?self.db_type, "closed connection");
        Ok(())
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.liveness.close();
    }
}
