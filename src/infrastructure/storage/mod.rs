//! Storage infrastructure - SQLite connection and schema

pub mod migrations;
mod sqlite;

pub use migrations::{run_schema_migrations, Migration, Migrator, SqliteMigrator};
pub use sqlite::{connect, connect_in_memory, is_unique_violation};
