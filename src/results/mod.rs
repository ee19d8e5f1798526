// Result model shared by every backend:
// - row: one row, addressable by ordinal or field name
// - result_set: metadata, forward-only cursor, bulk materialization
// - materialized: the two bulk shapes and their JSON rendering

pub mod materialized;
pub mod result_set;
pub mod row;

pub use materialized::MaterializedRows;
pub use result_set::ResultSet;
pub use row::CustomDbRow;
