use anyhow::Context;

use crate::config::AppConfig;
use crate::database::{schema, DatabaseManager};

/// Connect once, apply the accounts schema, close
pub async fn handle(config: AppConfig) -> anyhow::Result<()> {
    let database = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to database")?;

    let result = schema::init_schema(database.pool()).await;
    database.close().await;

    result.context("failed to initialize database schema")
}
