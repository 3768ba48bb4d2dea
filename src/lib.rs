//! Team Leadership Service
//!
//! Manages who leads each team:
//! - Assigning a leader to a team without one
//! - Handing leadership to another team member
//! - Removing the current leader
//! - Reading the current leader and the full leadership history
//!
//! Storage is either in-memory or PostgreSQL, selected by configuration.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use api::state::AppState;
use infrastructure::storage::StorageFactory;
use tracing::info;

/// Create the application state with default configuration
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let storage_config = config.storage.to_storage_config()?;
    info!(backend = ?storage_config.storage_type(), "Initializing storage");

    let store = StorageFactory::create(&storage_config).await?;

    Ok(AppState::new(store))
}
