mod common;

use linkvault::domain::entities::NewShortUrl;
use linkvault::domain::repositories::UrlRepository;
use linkvault::infrastructure::persistence::PgUrlRepository;
use sqlx::PgPool;
use std::sync::Arc;

fn new_url(short_id: &str, long_url: &str) -> NewShortUrl {
    NewShortUrl {
        short_id: short_id.to_string(),
        long_url: long_url.to_string(),
    }
}

#[sqlx::test]
async fn test_insert_and_find_both_ways(pool: PgPool) {
    let repo = PgUrlRepository::new(Arc::new(pool));

    let outcome = repo
        .insert_if_absent(new_url("abcdefgh", "https://example.com/"))
        .await
        .unwrap();
    assert!(!outcome.is_duplicate());

    let by_id = repo.find_by_short_id("abcdefgh").await.unwrap().unwrap();
    assert_eq!(by_id.long_url, "https://example.com/");

    let by_value = repo
        .find_by_long_url("https://example.com/")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_value.short_id, "abcdefgh");
}

#[sqlx::test]
async fn test_duplicate_short_id(pool: PgPool) {
    let repo = PgUrlRepository::new(Arc::new(pool));

    repo.insert_if_absent(new_url("abcdefgh", "https://example.com/"))
        .await
        .unwrap();
    let outcome = repo
        .insert_if_absent(new_url("abcdefgh", "https://other.com/"))
        .await
        .unwrap();

    assert!(outcome.is_duplicate());
}

#[sqlx::test]
async fn test_duplicate_long_url(pool: PgPool) {
    let repo = PgUrlRepository::new(Arc::new(pool));

    repo.insert_if_absent(new_url("abcdefgh", "https://example.com/"))
        .await
        .unwrap();
    let outcome = repo
        .insert_if_absent(new_url("zyxwvuts", "https://example.com/"))
        .await
        .unwrap();

    assert!(outcome.is_duplicate());
    assert_eq!(repo.count().await.unwrap(), 1);
}

#[sqlx::test]
async fn test_shorten_and_redirect_through_http(pool: PgPool) {
    let server =
        axum_test::TestServer::new(common::test_router(common::create_pg_state(pool))).unwrap();

    let created = server
        .post("/api/shorten")
        .json(&serde_json::json!({ "long_url": "https://example.com/pg" }))
        .await
        .json::<serde_json::Value>();
    let short_id = created["short_id"].as_str().unwrap();

    let response = server.get(&format!("/{short_id}")).await;

    response.assert_status(axum::http::StatusCode::TEMPORARY_REDIRECT);
}
