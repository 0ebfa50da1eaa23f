//! Storage infrastructure - connection pool, migrations and in-memory tables

mod memory;
pub mod migrations;
mod postgres;

pub use memory::{MemoryDatabase, MemoryTables};
pub use migrations::{schema_migrations, Migration, Migrator, PostgresMigrator};
pub use postgres::{create_pool, map_write_error, read_error, violated_constraint};
