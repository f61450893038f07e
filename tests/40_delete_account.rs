mod common;

use accounts_api::database::AccountStore;
use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

#[tokio::test]
async fn delete_unknown_id_is_not_found() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = reqwest::Client::new()
        .delete(format!("{}/api/accounts/{}", server.base_url, Uuid::new_v4()))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body = res.json::<Value>().await?;
    assert_eq!(body, json!({"status": "error", "message": "Account not found"}));
    Ok(())
}

#[tokio::test]
async fn delete_twice_is_204_then_404() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = reqwest::Client::new();
    let id = common::create_account(&client, &server, "jo@example.com").await?;
    let url = format!("{}/api/accounts/{}", server.base_url, id);

    let first = client.delete(&url).send().await?;
    assert_eq!(first.status(), StatusCode::NO_CONTENT);
    assert!(first.bytes().await?.is_empty());

    assert!(server.store.find_by_id(id.parse()?).await?.is_none());

    let second = client.delete(&url).send().await?;
    assert_eq!(second.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn deleted_email_can_be_reused() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = reqwest::Client::new();
    let id = common::create_account(&client, &server, "jo@example.com").await?;

    let res = client
        .delete(format!("{}/api/accounts/{}", server.base_url, id))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let new_id = common::create_account(&client, &server, "jo@example.com").await?;
    assert_ne!(new_id, id);
    Ok(())
}
