//! Small synchronous database access facade.
//!
//! Open a database by driver identifier, run statements with positional,
//! named, or no parameters, and read results through a forward-only cursor
//! or as materialized rows (value sequences or field-name mappings).
//!
//! ```rust
//! use sql_dbi::prelude::*;
//!
//! # fn main() -> Result<(), SqlDbiError> {
//! let mut db = sql_dbi::open("sqlite3", ConnectOptions::from([("dbname", ":memory:")]))?;
//! db.exec("CREATE TABLE test (foo TEXT, bar INTEGER); INSERT INTO test VALUES ('a', 1);")?;
//! let rows = db.query("SELECT COUNT(*) AS n FROM test", ())?.to_objects()?;
//! assert_eq!(rows[0].get("n"), Some(&RowValues::Int(1)));
//! db.close()?;
//! # Ok(())
//! # }
//! ```

pub mod connection;
pub mod error;
pub mod options;
pub mod prelude;
pub mod results;
pub mod sqlite;
pub mod types;

pub use connection::{Connection, open};
pub use error::{ErrorKind, SqlDbiError};
pub use options::ConnectOptions;
pub use results::{CustomDbRow, MaterializedRows, ResultSet};
pub use types::{BindParams, DatabaseType, RowShape, RowValues};
