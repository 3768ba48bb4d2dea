//! Storage infrastructure - leadership store backends

mod factory;
mod in_memory;
pub mod migrations;
mod postgres;

pub use factory::{StorageConfig, StorageFactory, StorageType};
pub use in_memory::InMemoryLeadershipStore;
pub use migrations::{revert_latest_migration, run_storage_migrations, Migration, PostgresMigrator};
pub use postgres::{PostgresConfig, PostgresLeadershipStore};
