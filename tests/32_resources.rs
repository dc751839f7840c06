mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn category_and_statement_lifecycle() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        return Ok(());
    };
    let client = reqwest::Client::new();

    let res = client
        .post(server.url("/v1/categories"))
        .json(&json!({ "name": common::unique("Category") }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let category = res.json::<Value>().await?;
    let category_uuid = category["uuid"].as_str().unwrap_or_default().to_string();
    assert_eq!(category_uuid.len(), 8, "bad category: {}", category);

    let res = client
        .post(server.url("/v1/statements"))
        .json(&json!({ "body": common::unique("Statement"), "category": category_uuid }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let statement = res.json::<Value>().await?;
    assert_eq!(statement["category"]["uuid"], category_uuid.as_str());
    let statement_uri = server.url(&format!("/v1/statements/{}", statement["uuid"].as_str().unwrap_or_default()));

    let res = client.get(server.url("/v1/statements?orderBy=createdAt:desc")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let list = res.json::<Value>().await?;
    assert!(list["meta"]["records"].as_i64().unwrap_or(0) >= 1, "bad listing: {}", list);
    assert!(list["collection"].is_array());

    let res = client.delete(&statement_uri).send().await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client.get(&statement_uri).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client.put(&statement_uri).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = client.put(&statement_uri).send().await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = client.get(server.url("/v1/statements?scope=randomPick")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let pick = res.json::<Value>().await?;
    assert_eq!(pick["collection"].as_array().map(Vec::len), Some(1));
    Ok(())
}

#[tokio::test]
async fn statements_need_a_known_category() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        return Ok(());
    };
    let client = reqwest::Client::new();

    let res = client
        .post(server.url("/v1/statements"))
        .json(&json!({ "body": common::unique("Orphan") }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .post(server.url("/v1/statements"))
        .json(&json!({ "body": common::unique("Orphan"), "category": "--none--" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}
