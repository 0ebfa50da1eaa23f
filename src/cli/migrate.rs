//! Migrate command - applies or reverts the PostgreSQL schema

use anyhow::Context;
use tracing::info;

use crate::config::AppConfig;
use crate::infrastructure::logging::init_logging;
use crate::infrastructure::storage::{create_pool, Migrator, PostgresMigrator};

pub async fn run(revert: bool) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("failed to load configuration")?;
    init_logging(&config.logging)?;

    let pool = create_pool(&config.database).await?;
    let migrator = PostgresMigrator::new(pool);

    if revert {
        migrator.revert().await?;
        info!("Reverted last migration");
    } else {
        migrator.run().await?;
        info!("Migrations applied");
    }

    match migrator.version().await? {
        Some(version) => info!(version, "Schema version"),
        None => info!("No migrations applied"),
    }

    Ok(())
}
