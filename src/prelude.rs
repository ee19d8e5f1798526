//! Convenient imports for common functionality.

pub use crate::connection::{Connection, open};
pub use crate::error::{ErrorKind, SqlDbiError};
pub use crate::options::ConnectOptions;
pub use crate::results::{CustomDbRow, MaterializedRows, ResultSet};
pub use crate::sqlite::SqliteOptionsBuilder;
pub use crate::types::{BindParams, DatabaseType, RowShape, RowValues};
