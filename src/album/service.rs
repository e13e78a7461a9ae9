//! Album resource service.
//!
//! Orchestrates authorization, parsing, validation, id and timestamp
//! assignment, and store calls for every album operation.
//!
//! ```text
//! create(body, credential)
//!   1. authorize credential      (before the body is touched)
//!   2. parse body                → InvalidPayload
//!   3. validate                  → InvalidPayload
//!   4. assign id, stamp times
//!   5. insert                    → NotCreated (store fault or timeout)
//!
//! update(id, body)
//!   1. find by id                → NotFound
//!   2. merge patch onto record
//!   3. validate merged record    → InvalidPayload
//!   4. refresh updated_at
//!   5. update by id              → NotFound if nothing matched
//! ```
//!
//! Every other operation runs under the request timeout, so a stalled store
//! surfaces as a store failure instead of a hung request.
//!
//! Concurrent updates to the same id are last-write-wins; no locking is done
//! here.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::auth::TokenAuth;
use crate::error::{AlbumError, StoreError};
use crate::store::AlbumStore;

use super::{now, Album, AlbumFields, AlbumId, Validator};

/// Time budget for a create, measured from the start of the operation.
pub const DEFAULT_CREATE_TIMEOUT: Duration = Duration::from_secs(10);

/// Time budget for list, get, update and delete.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Service implementing the album resource operations.
///
/// # Type Parameters
///
/// * `S` - The store backend (e.g., [`S3AlbumStore`](crate::store::S3AlbumStore))
///
/// # Example
///
/// ```ignore
/// use albums_api::album::{AlbumService, Validator};
/// use albums_api::auth::TokenAuth;
/// use albums_api::store::MemoryStore;
///
/// let service = AlbumService::new(MemoryStore::new(), Validator::new(), TokenAuth::new("secret"));
/// let album = service
///     .create(br#"{"title":"Blue Train","artist":"John Coltrane","price":56.99}"#, Some("secret"))
///     .await?;
/// ```
pub struct AlbumService<S: AlbumStore> {
    store: S,
    validator: Validator,
    auth: TokenAuth,
    create_timeout: Duration,
    request_timeout: Duration,
}

impl<S: AlbumStore> AlbumService<S> {
    /// Create a service with the default timeouts.
    pub fn new(store: S, validator: Validator, auth: TokenAuth) -> Self {
        Self {
            store,
            validator,
            auth,
            create_timeout: DEFAULT_CREATE_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Override the create timeout.
    pub fn with_create_timeout(mut self, timeout: Duration) -> Self {
        self.create_timeout = timeout;
        self
    }

    /// Get a reference to the store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Override the timeout for list, get, update and delete.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn create_timeout(&self) -> Duration {
        self.create_timeout
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Run `op` under the request timeout.
    async fn within_deadline<T>(
        &self,
        operation: &'static str,
        op: impl Future<Output = Result<T, AlbumError>>,
    ) -> Result<T, AlbumError> {
        match tokio::time::timeout(self.request_timeout, op).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    operation,
                    timeout_secs = self.request_timeout.as_secs_f64(),
                    "Album store call timed out"
                );
                Err(AlbumError::Store(StoreError::Timeout(self.request_timeout)))
            }
        }
    }

    /// All stored albums in store order.
    pub async fn list(&self) -> Result<Vec<Album>, AlbumError> {
        let albums = self
            .within_deadline("list", async {
                self.store.find_all().await.map_err(AlbumError::from)
            })
            .await?;
        debug!(count = albums.len(), "Listed albums");
        Ok(albums)
    }

    /// The album with the given id.
    ///
    /// A malformed id is indistinguishable from a missing one.
    pub async fn get(&self, id: &str) -> Result<Album, AlbumError> {
        let id = parse_id(id)?;
        self.within_deadline("get", async {
            self.store
                .find_by_id(&id)
                .await
                .map_err(AlbumError::from)?
                .ok_or(AlbumError::NotFound)
        })
        .await
    }

    /// Create an album from a JSON body.
    ///
    /// The credential is checked before the body is parsed. Parsing,
    /// validation and the store insert all run inside the create timeout;
    /// if it elapses the insert is dropped and the call fails.
    pub async fn create(&self, body: &[u8], credential: Option<&str>) -> Result<Album, AlbumError> {
        if !credential.is_some_and(|c| self.auth.is_authorized(c)) {
            warn!("Rejected album create: wrong token");
            return Err(AlbumError::Unauthorized);
        }

        match tokio::time::timeout(self.create_timeout, self.create_authorized(body)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    timeout_secs = self.create_timeout.as_secs_f64(),
                    "Album create timed out"
                );
                Err(AlbumError::NotCreated(StoreError::Timeout(
                    self.create_timeout,
                )))
            }
        }
    }

    async fn create_authorized(&self, body: &[u8]) -> Result<Album, AlbumError> {
        let fields = AlbumFields::from_json(body)?;
        let checked = self.validator.validate(fields)?;

        let album = Album::new(AlbumId::generate(), checked, now());

        self.store
            .insert(&album)
            .await
            .map_err(AlbumError::NotCreated)?;

        info!(id = %album.id, title = %album.title, "Created album");
        Ok(album)
    }

    /// Apply a partial update.
    ///
    /// Fields present in the patch overwrite the stored ones; the merged
    /// record is validated as a whole. `updated_at` is refreshed.
    pub async fn update(&self, id: &str, body: &[u8]) -> Result<Album, AlbumError> {
        let id = parse_id(id)?;
        self.within_deadline("update", self.update_existing(id, body))
            .await
    }

    async fn update_existing(&self, id: AlbumId, body: &[u8]) -> Result<Album, AlbumError> {
        let mut album = self
            .store
            .find_by_id(&id)
            .await?
            .ok_or(AlbumError::NotFound)?;

        let patch = AlbumFields::from_json(body)?;
        let checked = self.validator.validate(album.fields().merge(patch))?;
        album.apply(checked, now());

        let result = self.store.update_by_id(&album).await?;
        if result.matched == 0 {
            // Deleted between lookup and write
            debug!(id = %id, "Album vanished during update");
            return Err(AlbumError::NotFound);
        }

        info!(id = %id, "Updated album");
        Ok(album)
    }

    /// Delete an album. A second delete of the same id is `NotFound`.
    pub async fn delete(&self, id: &str) -> Result<(), AlbumError> {
        let id = parse_id(id)?;
        let result = self
            .within_deadline("delete", async {
                self.store.delete_by_id(&id).await.map_err(AlbumError::from)
            })
            .await?;
        if result.deleted == 0 {
            return Err(AlbumError::NotFound);
        }

        info!(id = %id, "Deleted album");
        Ok(())
    }
}

fn parse_id(id: &str) -> Result<AlbumId, AlbumError> {
    AlbumId::parse(id).map_err(|e| {
        debug!(error = %e, "Unparseable album id");
        AlbumError::NotFound
    })
}
