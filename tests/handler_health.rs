mod common;

use serde_json::json;

#[tokio::test]
async fn test_health_check_healthy() {
    let server = common::test_server();

    let response = server.get("/health").await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["storage"]["status"], "ok");
    assert_eq!(json["checks"]["snippet_cache"]["capacity"], 64);
    assert_eq!(json["checks"]["long_url_cache"]["capacity"], 64);
    assert_eq!(json["checks"]["short_id_cache"]["capacity"], 64);
    assert_eq!(json["checks"]["snippet_cache"]["hit_rate"], 0.0);
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_health_reports_cache_activity() {
    let server = common::test_server();

    let created = server
        .post("/api/snippets")
        .json(&json!({ "content": "hello" }))
        .await
        .json::<serde_json::Value>();
    let id = created["id"].as_str().unwrap();
    server.get(&format!("/s/{id}")).await.assert_status_ok();

    let json = server.get("/health").await.json::<serde_json::Value>();

    assert_eq!(json["checks"]["snippet_cache"]["entries"], 1);
    assert_eq!(json["checks"]["snippet_cache"]["hits"], 1);
    assert_eq!(
        json["checks"]["storage"]["message"],
        "1 snippets, 0 short URLs"
    );
}

#[tokio::test]
async fn test_health_reports_both_url_caches() {
    let server = common::test_server();

    let created = server
        .post("/api/shorten")
        .json(&json!({ "long_url": "https://example.com/health" }))
        .await
        .json::<serde_json::Value>();
    let short_id = created["short_id"].as_str().unwrap();

    // Served from the short_id cache filled on creation.
    server
        .post("/api/shorten")
        .json(&json!({ "long_url": "https://example.com/health" }))
        .await
        .assert_status_ok();
    // Served from the long_url cache.
    server.get(&format!("/{short_id}")).await;
    server.get(&format!("/{short_id}")).await;

    let json = server.get("/health").await.json::<serde_json::Value>();
    let long_urls = &json["checks"]["long_url_cache"];
    let short_ids = &json["checks"]["short_id_cache"];

    assert_eq!(long_urls["entries"], 1);
    assert_eq!(long_urls["hits"], 2);
    assert_eq!(long_urls["hit_rate"], 1.0);
    assert_eq!(short_ids["entries"], 1);
    assert_eq!(short_ids["hits"], 1);
    assert_eq!(short_ids["misses"], 1);
    assert_eq!(short_ids["hit_rate"], 0.5);
}
