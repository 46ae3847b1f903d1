pub mod db;
mod driver;
pub mod models;
mod mysql;
pub mod schema;
mod sqlite;

pub use db::{DataAccess, DatabaseError, Fetched, Row, SqlValue};
pub use mysql::MySqlDatabase;
pub use sqlite::SqliteDatabase;
