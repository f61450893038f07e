#![allow(dead_code)]

use std::sync::Arc;

use accounts_api::app::{app, AppState};
use accounts_api::config::SecurityConfig;
use accounts_api::database::{AccountStore, MemoryAccountStore};
use anyhow::{Context, Result};
use serde_json::{json, Value};

pub struct TestServer {
    pub base_url: String,
    pub store: Arc<MemoryAccountStore>,
}

/// Start the router on a free port, backed by a fresh in-memory store.
/// Each test gets its own server so state never leaks between tests.
pub async fn spawn_server() -> Result<TestServer> {
    let store = Arc::new(MemoryAccountStore::new());
    let base_url = spawn_with_store(store.clone()).await?;
    Ok(TestServer { base_url, store })
}

/// Start the router over any store implementation
pub async fn spawn_with_store(store: Arc<dyn AccountStore>) -> Result<String> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .context("failed to bind test listener")?;

    let router = app(AppState::new(store), &SecurityConfig { enable_cors: true });
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    Ok(format!("http://127.0.0.1:{}", port))
}

pub fn account_body(email: &str, first_name: &str, last_name: &str) -> Value {
    json!({
        "email": email,
        "firstName": first_name,
        "lastName": last_name,
    })
}

/// POST an account and return its id, failing the test unless it was created
pub async fn create_account(
    client: &reqwest::Client,
    server: &TestServer,
    email: &str,
) -> Result<String> {
    let res = client
        .post(format!("{}/api/accounts", server.base_url))
        .json(&account_body(email, "Jo", "Do"))
        .send()
        .await?;
    anyhow::ensure!(
        res.status() == reqwest::StatusCode::CREATED,
        "create returned {}",
        res.status()
    );

    let body = res.json::<Value>().await?;
    body["data"]["id"]
        .as_str()
        .map(String::from)
        .context("created account has no id")
}
