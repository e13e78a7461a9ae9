//! In-process album store.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{AlbumStore, DeleteResult, UpdateResult};
use crate::album::{Album, AlbumId};
use crate::error::StoreError;

/// Album store held in memory.
///
/// Iteration order is id order: ids lead with their creation second, so
/// albums from different seconds come out oldest first. Contents are lost
/// on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    albums: RwLock<BTreeMap<AlbumId, Album>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored albums.
    pub async fn len(&self) -> usize {
        self.albums.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.albums.read().await.is_empty()
    }
}

#[async_trait]
impl AlbumStore for MemoryStore {
    async fn find_all(&self) -> Result<Vec<Album>, StoreError> {
        Ok(self.albums.read().await.values().cloned().collect())
    }

    async fn find_by_id(&self, id: &AlbumId) -> Result<Option<Album>, StoreError> {
        Ok(self.albums.read().await.get(id).cloned())
    }

    async fn insert(&self, album: &Album) -> Result<(), StoreError> {
        let mut albums = self.albums.write().await;
        if albums.contains_key(&album.id) {
            return Err(StoreError::Duplicate(album.id.to_string()));
        }
        albums.insert(album.id, album.clone());
        Ok(())
    }

    async fn update_by_id(&self, album: &Album) -> Result<UpdateResult, StoreError> {
        let mut albums = self.albums.write().await;
        match albums.get_mut(&album.id) {
            Some(stored) => {
                *stored = album.clone();
                Ok(UpdateResult { matched: 1 })
            }
            None => Ok(UpdateResult { matched: 0 }),
        }
    }

    async fn delete_by_id(&self, id: &AlbumId) -> Result<DeleteResult, StoreError> {
        let removed = self.albums.write().await.remove(id);
        Ok(DeleteResult {
            deleted: u64::from(removed.is_some()),
        })
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
