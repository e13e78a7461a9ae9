//! HTTP API tests covering the album lifecycle.

use axum::http::{Method, StatusCode};

use albums_api::store::MemoryStore;

use super::test_utils::{create_album, router_with, send, MockStore, NEW_ALBUM};

#[tokio::test]
async fn test_full_lifecycle() {
    let router = router_with(MemoryStore::new());

    let id = create_album(&router, NEW_ALBUM).await;
    assert_eq!(id.len(), 24);

    let (status, album) = send(&router, Method::GET, &format!("/albums/{}", id), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(album["_id"], id.as_str());
    assert_eq!(album["title"], "New album");
    assert_eq!(album["artist"], "Me Owais");
    assert_eq!(album["price"], 10.0);

    let (status, body) = send(
        &router,
        Method::PATCH,
        &format!("/albums/{}", id),
        None,
        Some(r#"{"title":"New album","price":10}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "successfully updated the album");

    let (status, body) =
        send(&router, Method::DELETE, &format!("/albums/{}", id), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "successfully deleted the album");

    let (status, body) = send(&router, Method::GET, &format!("/albums/{}", id), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, serde_json::json!({ "error": "album not found" }));
}

#[tokio::test]
async fn test_create_returns_timestamps() {
    let router = router_with(MemoryStore::new());

    let id = create_album(&router, NEW_ALBUM).await;
    let (_, album) = send(&router, Method::GET, &format!("/albums/{}", id), None, None).await;

    assert!(album["created_at"].is_string());
    assert_eq!(album["created_at"], album["updated_at"]);
}

#[tokio::test]
async fn test_get_malformed_id_is_not_found() {
    let router = router_with(MemoryStore::new());

    let (status, body) = send(&router, Method::GET, "/albums/1", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "album not found");
}

#[tokio::test]
async fn test_unknown_id_is_not_found_everywhere() {
    let router = router_with(MemoryStore::new());
    let uri = "/albums/5f1b2c3d4e5f60718293a4b5";

    let (status, _) = send(&router, Method::GET, uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&router, Method::PATCH, uri, None, Some(r#"{"price":1}"#)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&router, Method::DELETE, uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "album not found");
}

#[tokio::test]
async fn test_list_empty() {
    let router = router_with(MemoryStore::new());

    let (status, body) = send(&router, Method::GET, "/albums", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!([]));
}

#[tokio::test]
async fn test_list_populated() {
    let router = router_with(MemoryStore::new());

    let first = create_album(&router, NEW_ALBUM).await;
    let second = create_album(
        &router,
        r#"{"title":"Blue Train","artist":"John Coltrane","price":56.99}"#,
    )
    .await;

    let (status, body) = send(&router, Method::GET, "/albums", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let albums = body.as_array().unwrap();
    assert_eq!(albums.len(), 2);
    let ids: Vec<&str> = albums.iter().map(|a| a["_id"].as_str().unwrap()).collect();
    assert!(ids.contains(&first.as_str()));
    assert!(ids.contains(&second.as_str()));
}

#[tokio::test]
async fn test_versioned_prefix() {
    let router = router_with(MemoryStore::new());

    let id = create_album(&router, NEW_ALBUM).await;

    let (status, album) = send(
        &router,
        Method::GET,
        &format!("/api/v1/albums/{}", id),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(album["_id"], id.as_str());

    let (status, body) = send(&router, Method::GET, "/api/v1/albums", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_partial_patch_keeps_other_fields() {
    let router = router_with(MemoryStore::new());
    let id = create_album(&router, NEW_ALBUM).await;
    let uri = format!("/albums/{}", id);

    let (status, _) = send(&router, Method::PATCH, &uri, None, Some(r#"{"price":12.5}"#)).await;
    assert_eq!(status, StatusCode::OK);

    let (_, album) = send(&router, Method::GET, &uri, None, None).await;
    assert_eq!(album["title"], "New album");
    assert_eq!(album["artist"], "Me Owais");
    assert_eq!(album["price"], 12.5);
}

#[tokio::test]
async fn test_patch_cannot_change_id() {
    let router = router_with(MemoryStore::new());
    let id = create_album(&router, NEW_ALBUM).await;
    let uri = format!("/albums/{}", id);

    let (status, _) = send(
        &router,
        Method::PATCH,
        &uri,
        None,
        Some(r#"{"_id":"000000000000000000000000","artist":"Someone Else"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, album) = send(&router, Method::GET, &uri, None, None).await;
    assert_eq!(album["_id"], id.as_str());
    assert_eq!(album["artist"], "Someone Else");
}

#[tokio::test]
async fn test_patch_blanking_required_field_is_rejected() {
    let router = router_with(MemoryStore::new());
    let id = create_album(&router, NEW_ALBUM).await;
    let uri = format!("/albums/{}", id);

    let (status, body) = send(&router, Method::PATCH, &uri, None, Some(r#"{"title":""}"#)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("'Album.Title'"));

    let (_, album) = send(&router, Method::GET, &uri, None, None).await;
    assert_eq!(album["title"], "New album");
}

#[tokio::test]
async fn test_patch_malformed_body() {
    let router = router_with(MemoryStore::new());
    let id = create_album(&router, NEW_ALBUM).await;

    let (status, body) = send(
        &router,
        Method::PATCH,
        &format!("/albums/{}", id),
        None,
        Some("{not json"),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body, serde_json::json!({ "message": "invalid data" }));
}

#[tokio::test]
async fn test_create_missing_fields_lists_violations() {
    let store = MockStore::new();
    let router = router_with(store.clone());

    let (status, body) = send(
        &router,
        Method::POST,
        "/albums",
        Some("Bearer owais"),
        Some(r#"{"title":"Only a title"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let message = body["error"].as_str().unwrap();
    assert!(message.contains(
        "Key: 'Album.Artist' Error:Field validation for 'Artist' failed on the 'required' tag"
    ));
    assert!(message.contains("'Album.Price'"));
    assert!(!message.contains("'Album.Title'"));
    assert_eq!(store.insert_count(), 0);
}

#[tokio::test]
async fn test_create_zero_price_is_allowed() {
    let router = router_with(MemoryStore::new());

    let id = create_album(&router, r#"{"title":"Free","artist":"Busker","price":0}"#).await;
    let (_, album) = send(&router, Method::GET, &format!("/albums/{}", id), None, None).await;
    assert_eq!(album["price"], 0.0);
}

#[tokio::test]
async fn test_create_malformed_body() {
    let router = router_with(MemoryStore::new());

    let (status, body) = send(
        &router,
        Method::POST,
        "/albums",
        Some("Bearer owais"),
        Some(r#"["not","an","object"]"#),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "invalid data");
}

#[tokio::test]
async fn test_health_check() {
    let router = router_with(MemoryStore::new());

    let (status, body) = send(&router, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_openapi_document() {
    let router = router_with(MemoryStore::new());

    let (status, doc) = send(&router, Method::GET, "/openapi.json", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["openapi"].as_str().unwrap().starts_with("3."));

    let paths = &doc["paths"];
    assert!(paths["/albums"]["get"].is_object());
    assert!(paths["/albums"]["post"]["security"].is_array());
    assert!(paths["/albums/{id}"]["patch"].is_object());
    assert!(paths["/albums/{id}"]["delete"].is_object());
    assert!(doc["components"]["schemas"]["Album"].is_object());
}
