//! Store failures as seen through the HTTP API.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::http::{Method, StatusCode};

use albums_api::album::{Album, AlbumId};
use albums_api::error::StoreError;
use albums_api::store::{AlbumStore, DeleteResult, MemoryStore, UpdateResult};

use super::test_utils::{
    create_album, router_with, router_with_request_timeout, router_with_timeout, send, MockStore,
    NEW_ALBUM,
};

#[tokio::test]
async fn test_list_store_failure() {
    let store = MockStore::new();
    store.set_fail_reads(true);
    let router = router_with(store);

    let (status, body) = send(&router, Method::GET, "/albums", None, None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, serde_json::json!({ "error": "store unavailable" }));
}

#[tokio::test]
async fn test_get_store_failure() {
    let store = MockStore::new();
    let router = router_with(store.clone());
    let id = create_album(&router, NEW_ALBUM).await;

    store.set_fail_reads(true);
    let (status, body) = send(&router, Method::GET, &format!("/albums/{}", id), None, None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "store unavailable");

    // Server keeps serving once the store recovers
    store.set_fail_reads(false);
    let (status, _) = send(&router, Method::GET, &format!("/albums/{}", id), None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_create_insert_failure() {
    let store = MockStore::new();
    store.set_fail_writes(true);
    let router = router_with(store.clone());

    let (status, body) = send(
        &router,
        Method::POST,
        "/albums",
        Some("Bearer owais"),
        Some(NEW_ALBUM),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, serde_json::json!({ "error": "album was not created" }));
    assert_eq!(store.len().await, 0);
}

#[tokio::test]
async fn test_create_timeout() {
    let store = MockStore::new();
    store.set_stall_inserts(true);
    let router = router_with_timeout(store.clone(), Duration::from_millis(50));

    let (status, body) = send(
        &router,
        Method::POST,
        "/albums",
        Some("Bearer owais"),
        Some(NEW_ALBUM),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "album was not created");
    assert_eq!(store.insert_count(), 1);
    assert_eq!(store.len().await, 0);
}

#[tokio::test]
async fn test_stalled_store_reads_time_out() {
    let store = MockStore::new();
    let router = router_with_request_timeout(store.clone(), Duration::from_millis(50));
    let id = create_album(&router, NEW_ALBUM).await;
    let uri = format!("/albums/{}", id);

    store.set_stall_reads(true);

    let list = send(&router, Method::GET, "/albums", None, None);
    let (status, body) = tokio::time::timeout(Duration::from_secs(5), list)
        .await
        .expect("list should finish once the deadline passes");
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, serde_json::json!({ "error": "store unavailable" }));

    let (status, body) = send(&router, Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "store unavailable");

    let (status, _) = send(&router, Method::PATCH, &uri, None, Some(r#"{"price":1}"#)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    // Nothing was written while reads were stalled
    store.set_stall_reads(false);
    let (status, album) = send(&router, Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(album["price"], 10.0);
}

#[tokio::test]
async fn test_delete_store_failure() {
    let store = MockStore::new();
    let router = router_with(store.clone());
    let id = create_album(&router, NEW_ALBUM).await;

    store.set_fail_writes(true);
    let (status, body) =
        send(&router, Method::DELETE, &format!("/albums/{}", id), None, None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "store unavailable");
    assert_eq!(store.len().await, 1);
}

/// Removes the album after it has been looked up, before the write lands.
struct RacingDeleteStore {
    inner: MemoryStore,
}

#[async_trait]
impl AlbumStore for RacingDeleteStore {
    async fn find_all(&self) -> Result<Vec<Album>, StoreError> {
        self.inner.find_all().await
    }

    async fn find_by_id(&self, id: &AlbumId) -> Result<Option<Album>, StoreError> {
        self.inner.find_by_id(id).await
    }

    async fn insert(&self, album: &Album) -> Result<(), StoreError> {
        self.inner.insert(album).await
    }

    async fn update_by_id(&self, album: &Album) -> Result<UpdateResult, StoreError> {
        self.inner.delete_by_id(&album.id).await?;
        self.inner.update_by_id(album).await
    }

    async fn delete_by_id(&self, id: &AlbumId) -> Result<DeleteResult, StoreError> {
        self.inner.delete_by_id(id).await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[tokio::test]
async fn test_update_racing_delete_is_not_found() {
    let store = Arc::new(RacingDeleteStore {
        inner: MemoryStore::new(),
    });
    let router = router_with(store.clone());
    let id = create_album(&router, NEW_ALBUM).await;

    let (status, body) = send(
        &router,
        Method::PATCH,
        &format!("/albums/{}", id),
        None,
        Some(r#"{"price":20}"#),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "album not found");
    assert!(store.inner.is_empty().await);
}
