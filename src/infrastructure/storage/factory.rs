//! Storage factory for runtime backend selection

use std::sync::Arc;

use tracing::info;

use crate::domain::storage::LeadershipStore;
use crate::domain::DomainError;

use super::in_memory::InMemoryLeadershipStore;
use super::migrations::run_storage_migrations;
use super::postgres::{PostgresConfig, PostgresLeadershipStore};

/// Supported storage types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageType {
    /// In-memory storage (for testing/development)
    InMemory,
    /// PostgreSQL storage
    Postgres,
}

impl StorageType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Some(Self::InMemory),
            "postgres" | "postgresql" | "pg" => Some(Self::Postgres),
            _ => None,
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone)]
pub enum StorageConfig {
    /// In-memory storage configuration
    InMemory,
    /// PostgreSQL storage configuration
    Postgres {
        config: PostgresConfig,
        run_migrations: bool,
    },
}

impl StorageConfig {
    /// Creates an in-memory storage configuration
    pub fn in_memory() -> Self {
        Self::InMemory
    }

    /// Creates a PostgreSQL configuration from a URL
    pub fn postgres_url(url: impl Into<String>) -> Self {
        Self::Postgres {
            config: PostgresConfig::new(url),
            run_migrations: false,
        }
    }

    /// Returns the storage type
    pub fn storage_type(&self) -> StorageType {
        match self {
            Self::InMemory => StorageType::InMemory,
            Self::Postgres { .. } => StorageType::Postgres,
        }
    }
}

/// Factory for creating the leadership store
#[derive(Debug)]
pub struct StorageFactory;

impl StorageFactory {
    /// Creates a store instance based on the configuration
    pub async fn create(config: &StorageConfig) -> Result<Arc<dyn LeadershipStore>, DomainError> {
        match config {
            StorageConfig::InMemory => Ok(Arc::new(InMemoryLeadershipStore::new())),
            StorageConfig::Postgres {
                config,
                run_migrations,
            } => {
                info!("Connecting to PostgreSQL...");
                let store = PostgresLeadershipStore::connect(config).await?;
                info!("PostgreSQL connection established");

                if *run_migrations {
                    let applied = run_storage_migrations(store.pool()).await?;
                    info!(applied, "Storage migrations complete");
                }

                Ok(Arc::new(store))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_type_from_str() {
        assert_eq!(StorageType::from_str("memory"), Some(StorageType::InMemory));
        assert_eq!(StorageType::from_str("In-Memory"), Some(StorageType::InMemory));
        assert_eq!(StorageType::from_str("postgres"), Some(StorageType::Postgres));
        assert_eq!(StorageType::from_str("pg"), Some(StorageType::Postgres));
        assert_eq!(StorageType::from_str("redis"), None);
    }

    #[test]
    fn test_storage_config_type() {
        assert_eq!(StorageConfig::in_memory().storage_type(), StorageType::InMemory);
        assert_eq!(
            StorageConfig::postgres_url("postgres://localhost/db").storage_type(),
            StorageType::Postgres
        );
    }

    #[tokio::test]
    async fn test_create_in_memory_store() {
        let store = StorageFactory::create(&StorageConfig::in_memory()).await.unwrap();
        assert_eq!(store.backend_name(), "memory");
    }
}
