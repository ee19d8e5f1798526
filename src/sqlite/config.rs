use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::Connection as SqliteConnectionType;

use crate::connection::Connection;
use crate::error::SqlDbiError;
use crate::options::ConnectOptions;
use crate::types::DatabaseType;

pub const DBNAME: &str = "dbname";
pub const DBDIR: &str = "sqlite3_dbdir";
pub const TIMEOUT_MS: &str = "sqlite3_timeout";

const MEMORY: &str = ":memory:";

/// Settings understood by the `SQLite` backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqliteOptions {
    pub db_path: String,
    pub busy_timeout: Option<Duration>,
}

impl SqliteOptions {
    /// Interpret a generic option mapping.
    ///
    /// `sqlite3_dbdir` is joined in front of `dbname` unless the name is
    /// `:memory:`, an absolute path, or a `file:` URI.
    ///
    /// # Errors
    ///
    /// Returns `SqlDbiError::ConnectionError` if `dbname` is missing, the
    /// directory does not exist, or `sqlite3_timeout` is not a whole number
    /// of milliseconds.
    pub fn from_connect_options(opts: &ConnectOptions) -> Result<Self, SqlDbiError> {
        let dbname = opts
            .get(DBNAME)
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| {
                SqlDbiError::ConnectionError(format!("missing required option '{DBNAME}'"))
            })?;

        let db_path = match opts.get(DBDIR) {
            Some(dir) if !is_standalone_name(dbname) => {
                let dir = Path::new(dir);
                if !dir.is_dir() {
                    return Err(SqlDbiError::ConnectionError(format!(
                        "database directory '{}' does not exist",
                        dir.display()
                    )));
                }
                dir.join(dbname).to_string_lossy().into_owned()
            }
            _ => dbname.to_string(),
        };

        let busy_timeout = opts
            .get(TIMEOUT_MS)
            .map(|ms| {
                ms.trim().parse::<u64>().map(Duration::from_millis).map_err(|_| {
                    SqlDbiError::ConnectionError(format!(
                        "option '{TIMEOUT_MS}' must be milliseconds, got '{ms}'"
                    ))
                })
            })
            .transpose()?;

        for (key, _) in opts.iter() {
            if ![DBNAME, DBDIR, TIMEOUT_MS].contains(&key) {
                tracing::debug!(option = key, "ignoring option unknown to the sqlite driver");
            }
        }

        Ok(Self {
            db_path,
            busy_timeout,
        })
    }

    #[must_use]
    pub fn is_memory(&self) -> bool {
        self.db_path == MEMORY
    }
}

fn is_standalone_name(dbname: &str) -> bool {
    dbname == MEMORY || dbname.starts_with("file:") || Path::new(dbname).is_absolute()
}

/// Fluent builder for `SQLite` connection options.
#[derive(Debug, Clone)]
pub struct SqliteOptionsBuilder {
    opts: ConnectOptions,
}

impl SqliteOptionsBuilder {
    #[must_use]
    pub fn new(dbname: impl Into<String>) -> Self {
        Self {
            opts: ConnectOptions::new().with(DBNAME, dbname.into()),
        }
    }

    /// An in-memory database, private to the connection.
    #[must_use]
    pub fn memory() -> Self {
        Self::new(MEMORY)
    }

    #[must_use]
    pub fn dbdir(mut self, dir: impl AsRef<Path>) -> Self {
        self.opts.set(DBDIR, dir.as_ref().display());
        self
    }

    #[must_use]
    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.opts.set(TIMEOUT_MS, timeout.as_millis());
        self
    }

    #[must_use]
    pub fn finish(self) -> ConnectOptions {
        self.opts
    }

    /// Open a connection with these options.
    ///
    /// # Errors
    ///
    /// Returns `SqlDbiError::ConnectionError` if the database cannot be opened.
    pub fn open(self) -> Result<Connection, SqlDbiError> {
        Connection::open(DatabaseType::Sqlite, self.finish())
    }
}

impl Connection {
    #[must_use]
    pub fn sqlite_builder(dbname: impl Into<String>) -> SqliteOptionsBuilder {
        SqliteOptionsBuilder::new(dbname)
    }
}

/// Open the database file and make sure it is usable.
///
/// `SQLite` defers some failures (unreadable or non-database files) until the
/// first statement, so a schema read runs before the handle is returned.
pub(crate) fn open_sqlite(opts: &SqliteOptions) -> Result<SqliteConnectionType, SqlDbiError> {
    let path = PathBuf::from(&opts.db_path);
    let conn = SqliteConnectionType::open(&path).map_err(|e| {
        SqlDbiError::ConnectionError(format!("cannot open sqlite database '{}': {e}", opts.db_path))
    })?;

    if let Some(timeout) = opts.busy_timeout {
        conn.busy_timeout(timeout).map_err(|e| {
            SqlDbiError::ConnectionError(format!("cannot set busy timeout: {e}"))
        })?;
    }

    conn.query_row("PRAGMA schema_version", [], |row| row.get::<_, i64>(0))
        .map_err(|e| {
            SqlDbiError::ConnectionError(format!(
                "sqlite database '{}' is not usable: {e}",
                opts.db_path
            ))
        })?;

    Ok(conn)
}
