//! Migrate command - applies or reverts the PostgreSQL schema

use clap::Args;
use tracing::info;

use crate::infrastructure::storage::{
    revert_latest_migration, run_storage_migrations, PostgresLeadershipStore, StorageConfig,
};

/// Migration arguments
#[derive(Args, Debug)]
pub struct MigrateArgs {
    /// Revert the most recently applied migration instead of applying
    #[arg(long)]
    pub revert: bool,
}

/// Run the migrate command against the configured database
pub async fn run(args: MigrateArgs) -> anyhow::Result<()> {
    let config = super::bootstrap()?;

    let StorageConfig::Postgres { config: pg, .. } = config.storage.to_storage_config()? else {
        anyhow::bail!("Migrations require storage.backend = \"postgres\"");
    };

    let store = PostgresLeadershipStore::connect(&pg).await?;

    if args.revert {
        match revert_latest_migration(store.pool()).await? {
            Some(version) => info!(version, "Reverted migration"),
            None => info!("No migrations to revert"),
        }
    } else {
        let applied = run_storage_migrations(store.pool()).await?;
        info!(applied, "Migrations complete");
    }

    Ok(())
}
