// SQLite backend, split into:
// - config: option parsing, builder, opening the database file
// - params: value conversion and placeholder-checked binding
// - query: declared-type coercion and result building
// - executor: exec / exec_with / query against a rusqlite connection

pub mod config;
pub(crate) mod executor;
pub mod params;
pub(crate) mod query;

pub use config::{SqliteOptions, SqliteOptionsBuilder};
pub use params::row_value_to_sqlite_value;
