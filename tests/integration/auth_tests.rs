//! Token checks on album creation.

use axum::http::{Method, StatusCode};

use super::test_utils::{router_with, send, MockStore, NEW_ALBUM, TEST_SECRET};

async fn assert_rejected(authorization: Option<&str>, body: &str) {
    let store = MockStore::new();
    let router = router_with(store.clone());

    let (status, json) = send(&router, Method::POST, "/albums", authorization, Some(body)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json, serde_json::json!({ "message": "wrong token" }));
    assert_eq!(store.insert_count(), 0);
    assert_eq!(store.len().await, 0);
}

#[tokio::test]
async fn test_wrong_token_rejected() {
    assert_rejected(Some("Bearer not-the-secret"), NEW_ALBUM).await;
}

#[tokio::test]
async fn test_missing_token_rejected() {
    assert_rejected(None, NEW_ALBUM).await;
}

#[tokio::test]
async fn test_empty_token_rejected() {
    assert_rejected(Some(""), NEW_ALBUM).await;
    assert_rejected(Some("Bearer "), NEW_ALBUM).await;
}

#[tokio::test]
async fn test_token_is_case_sensitive() {
    assert_rejected(Some("Bearer OWAIS"), NEW_ALBUM).await;
}

#[tokio::test]
async fn test_wrong_token_wins_over_bad_body() {
    assert_rejected(Some("Bearer nope"), "{not json").await;
    assert_rejected(None, r#"{"title":""}"#).await;
}

#[tokio::test]
async fn test_bearer_token_accepted() {
    let store = MockStore::new();
    let router = router_with(store.clone());

    let bearer = format!("Bearer {}", TEST_SECRET);
    let (status, json) = send(&router, Method::POST, "/albums", Some(&bearer), Some(NEW_ALBUM)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["_id"].is_string());
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_raw_token_accepted() {
    let store = MockStore::new();
    let router = router_with(store.clone());

    let (status, _) = send(
        &router,
        Method::POST,
        "/albums",
        Some(TEST_SECRET),
        Some(NEW_ALBUM),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_reads_and_updates_need_no_token() {
    let store = MockStore::new();
    let router = router_with(store.clone());

    let bearer = format!("Bearer {}", TEST_SECRET);
    let (_, created) = send(&router, Method::POST, "/albums", Some(&bearer), Some(NEW_ALBUM)).await;
    let uri = format!("/albums/{}", created["_id"].as_str().unwrap());

    let (status, _) = send(&router, Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&router, Method::PATCH, &uri, None, Some(r#"{"price":1}"#)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&router, Method::DELETE, &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_lowercase_scheme_accepted() {
    let store = MockStore::new();
    let router = router_with(store.clone());

    let bearer = format!("bearer {}", TEST_SECRET);
    let (status, _) = send(&router, Method::POST, "/albums", Some(&bearer), Some(NEW_ALBUM)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(store.len().await, 1);
}
