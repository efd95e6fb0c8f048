pub mod connection;
pub mod schema;
pub mod writer;

pub use connection::{DbEngine, DbPool, DbTransaction, SqlArg};
pub use writer::insert_record;
