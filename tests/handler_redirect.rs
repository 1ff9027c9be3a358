mod common;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_redirect_to_long_url() {
    let server = common::test_server();

    let created = server
        .post("/api/shorten")
        .json(&json!({ "long_url": "https://example.com/target" }))
        .await
        .json::<serde_json::Value>();
    let short_id = created["short_id"].as_str().unwrap();

    let response = server.get(&format!("/{short_id}")).await;

    response.assert_status(StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response.header("location").to_str().unwrap(),
        "https://example.com/target"
    );
}

#[tokio::test]
async fn test_redirect_unknown_short_id() {
    let server = common::test_server();

    let response = server.get("/Unknownid").await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn test_redirect_malformed_short_id() {
    let server = common::test_server();

    let response = server.get("/bad-id-42").await;

    response.assert_status_not_found();
}
