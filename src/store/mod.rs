//! Album store backends.
//!
//! The [`AlbumStore`] trait is the only thing the album service knows about
//! persistence. It models a document collection keyed by [`AlbumId`]:
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │              AlbumService               │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │            AlbumStore trait             │
//! └────────────────────┬────────────────────┘
//!                      │
//!          ┌───────────┴───────────┐
//!          ▼                       ▼
//! ┌─────────────────┐    ┌─────────────────────┐
//! │  S3AlbumStore   │    │    MemoryStore      │
//! │ (one JSON doc   │    │ (dev and tests)     │
//! │  per album)     │    │                     │
//! └─────────────────┘    └─────────────────────┘
//! ```
//!
//! The store does not validate records; that is the service's job.

mod memory;
mod s3;

use std::sync::Arc;

use async_trait::async_trait;

use crate::album::{Album, AlbumId};
use crate::error::StoreError;

pub use memory::MemoryStore;
pub use s3::{create_s3_client, S3AlbumStore, DEFAULT_PREFIX};

/// Result of an update-by-id call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateResult {
    /// Number of documents whose id matched (0 or 1)
    pub matched: u64,
}

/// Result of a delete-by-id call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteResult {
    /// Number of documents removed (0 or 1)
    pub deleted: u64,
}

/// A persistent collection of albums keyed by id.
#[async_trait]
pub trait AlbumStore: Send + Sync {
    /// All stored albums in the backend's natural order.
    async fn find_all(&self) -> Result<Vec<Album>, StoreError>;

    /// The album with the given id, if any.
    async fn find_by_id(&self, id: &AlbumId) -> Result<Option<Album>, StoreError>;

    /// Persist a new album. Fails with [`StoreError::Duplicate`] if the id exists.
    async fn insert(&self, album: &Album) -> Result<(), StoreError>;

    /// Replace the album stored under `album.id`, if it still exists.
    async fn update_by_id(&self, album: &Album) -> Result<UpdateResult, StoreError>;

    /// Remove the album with the given id, if it exists.
    async fn delete_by_id(&self, id: &AlbumId) -> Result<DeleteResult, StoreError>;

    /// Check that the backend is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}

#[async_trait]
impl<T: AlbumStore + ?Sized> AlbumStore for Arc<T> {
    async fn find_all(&self) -> Result<Vec<Album>, StoreError> {
        (**self).find_all().await
    }

    async fn find_by_id(&self, id: &AlbumId) -> Result<Option<Album>, StoreError> {
        (**self).find_by_id(id).await
    }

    async fn insert(&self, album: &Album) -> Result<(), StoreError> {
        (**self).insert(album).await
    }

    async fn update_by_id(&self, album: &Album) -> Result<UpdateResult, StoreError> {
        (**self).update_by_id(album).await
    }

    async fn delete_by_id(&self, id: &AlbumId) -> Result<DeleteResult, StoreError> {
        (**self).delete_by_id(id).await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        (**self).ping().await
    }
}
