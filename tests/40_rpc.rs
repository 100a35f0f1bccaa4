mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

async fn call(token: &str, function: &str, args: Value) -> Result<(StatusCode, Value)> {
    let server = common::ensure_server().await?;
    let res = reqwest::Client::new()
        .post(server.url(&format!("/api/rpc/{}", function)))
        .bearer_auth(token)
        .json(&args)
        .send()
        .await?;
    let status = res.status();
    Ok((status, res.json().await?))
}

#[tokio::test]
async fn functions_dispatch_by_name() -> Result<()> {
    let token = common::token_for(&common::unique_user("rpc"));

    let (status, body) = call(
        &token,
        "tasks.create",
        json!({"title": "Via rpc", "status": "To Do", "priority": "Medium"}),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_str().unwrap_or_default().to_string();

    let (_, body) = call(&token, "tasks.update", json!({"id": id, "status": "Done"})).await?;
    assert_eq!(body["success"], true);

    let (_, body) = call(&token, "tasks.get", json!({"id": id})).await?;
    assert_eq!(body["data"]["status"], "Done");
    assert_eq!(body["data"]["title"], "Via rpc");

    let (_, body) = call(&token, "tasks.list", json!({})).await?;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));

    let (status, _) = call(&token, "tasks.remove", json!({"id": id})).await?;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call(&token, "tasks.get", json!({"id": id})).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn ownership_holds_over_rpc() -> Result<()> {
    let owner = common::token_for(&common::unique_user("owner"));
    let intruder = common::token_for(&common::unique_user("intruder"));

    let (_, body) = call(&owner, "tasks.create", json!({"title": "Secret", "status": "To Do", "priority": "High"})).await?;
    let id = body["data"]["id"].clone();

    let (status, body) = call(&intruder, "tasks.get", json!({"id": id})).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Unauthorized");
    Ok(())
}

#[tokio::test]
async fn unknown_functions_and_bad_args_are_errors() -> Result<()> {
    let token = common::token_for(&common::unique_user("rpc"));

    let (status, body) = call(&token, "tasks.archive", json!({})).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let (status, body) = call(&token, "tasks.get", json!({})).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    Ok(())
}
