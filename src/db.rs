use anyhow::{Context, Result};
use sqlx::MySqlPool;
use sqlx::mysql::MySqlPoolOptions;
use tracing::info;

use crate::model::pay_group::{PayGroup, RateTable};
use crate::store::PayrollStore;

pub async fn init_db(database_url: &str, max_connections: u32) -> Result<MySqlPool> {
    MySqlPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .context("Failed to connect to database")
}

pub async fn run_migrations(pool: &MySqlPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("Failed to migrate database")
}

/// Seeds the default pay groups and loads every rate into memory.
pub async fn load_rate_table(store: &dyn PayrollStore) -> Result<RateTable> {
    store
        .seed_pay_groups(&PayGroup::defaults())
        .await
        .context("Unable to pre-populate pay groups")?;

    let rates: RateTable = store
        .load_pay_groups()
        .await
        .context("Unable to load pay group rates")?
        .into_iter()
        .collect();

    info!(pay_groups = rates.len(), "Rate table loaded");
    Ok(rates)
}
