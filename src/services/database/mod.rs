// Database service module
// SQLite connection and schema management

mod connection;
pub mod schema;

pub use connection::Database;
