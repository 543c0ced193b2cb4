//! SQLite-backed storage implementation.

mod comments;
mod ids;
mod links;
pub mod migrations;
mod query;
pub mod schema;
mod store;
mod tasks;
mod timestamps;

pub use migrations::{Migration, MigrationRecord, MigrationReport};
pub use store::{ConnectionOptions, DEFAULT_BUSY_TIMEOUT_MS, SqliteStore};
