use anyhow::Context;
use std::sync::Arc;

use crate::app::{app, AppState};
use crate::config::AppConfig;
use crate::database::{DatabaseManager, PgAccountStore};

pub async fn handle(config: AppConfig) -> anyhow::Result<()> {
    let database = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to database")?;

    let store = PgAccountStore::new(database.pool().clone());
    let state = AppState::new(Arc::new(store));
    let router = app(state, &config.security);

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Accounts API listening on http://{}", bind_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    database.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
