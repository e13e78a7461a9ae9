//! S3-backed album store.
//!
//! Each album is one JSON document at `{prefix}{id}.json` in a bucket; the
//! prefix plays the role of a collection name. Works with AWS S3 and
//! S3-compatible services (MinIO, etc.).

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use aws_config::timeout::TimeoutConfig;
use aws_sdk_s3::error::{DisplayErrorContext, SdkError};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use bytes::Bytes;
use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, warn};

use super::{AlbumStore, DeleteResult, UpdateResult};
use crate::album::{Album, AlbumId};
use crate::error::StoreError;

/// Default key prefix for album documents.
pub const DEFAULT_PREFIX: &str = "albums/";

const DOCUMENT_SUFFIX: &str = ".json";

/// Documents fetched at once when listing the collection.
const FETCH_CONCURRENCY: usize = 16;

/// Convert an SDK error into a store error, keeping the full error chain.
fn sdk_error<E, R>(err: SdkError<E, R>) -> StoreError
where
    E: std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let message = DisplayErrorContext(&err).to_string();
    match err {
        SdkError::DispatchFailure(_) | SdkError::TimeoutError(_) => {
            StoreError::Connection(message)
        }
        _ => StoreError::S3(message),
    }
}

/// S3 implementation of [`AlbumStore`].
#[derive(Clone)]
pub struct S3AlbumStore {
    client: Client,
    bucket: String,
    prefix: String,
}

impl S3AlbumStore {
    /// Create a store over `bucket`, keeping documents under `prefix`.
    pub fn new(client: Client, bucket: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            prefix: prefix.into(),
        }
    }

    /// Get the bucket name.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Get the key prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Object key of the document for `id`.
    pub fn key_for(&self, id: &AlbumId) -> String {
        format!("{}{}{}", self.prefix, id, DOCUMENT_SUFFIX)
    }

    /// Recover the album id from an object key, if the key is an album document.
    pub fn id_from_key(&self, key: &str) -> Option<AlbumId> {
        key.strip_prefix(self.prefix.as_str())?
            .strip_suffix(DOCUMENT_SUFFIX)
            .and_then(|stem| AlbumId::parse(stem).ok())
    }

    /// List the ids of all stored albums in key order.
    pub async fn list_ids(&self) -> Result<Vec<AlbumId>, StoreError> {
        let mut ids = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let result = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .prefix(&self.prefix)
                .set_continuation_token(continuation_token.take())
                .send()
                .await
                .map_err(sdk_error)?;

            for obj in result.contents() {
                if let Some(id) = obj.key().and_then(|k| self.id_from_key(k)) {
                    ids.push(id);
                } else {
                    debug!(key = ?obj.key(), "Skipping non-album object");
                }
            }

            if result.is_truncated() == Some(true) {
                continuation_token = result.next_continuation_token().map(|s| s.to_string());
                if continuation_token.is_none() {
                    break;
                }
            } else {
                break;
            }
        }

        Ok(ids)
    }

    /// Whether a document exists for `id`.
    async fn exists(&self, id: &AlbumId) -> Result<bool, StoreError> {
        let key = self.key_for(id);
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(&key)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(e) => {
                let is_not_found = e
                    .as_service_error()
                    .map(|se| se.is_not_found())
                    .unwrap_or(false);
                let status_is_404 = e
                    .raw_response()
                    .map(|r| r.status().as_u16() == 404)
                    .unwrap_or(false);

                if is_not_found || status_is_404 {
                    Ok(false)
                } else {
                    Err(sdk_error(e))
                }
            }
        }
    }

    async fn put(&self, album: &Album, if_absent: bool) -> Result<(), StoreError> {
        let body = serde_json::to_vec(album).map_err(|e| StoreError::Serialization(e.to_string()))?;

        let mut request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(self.key_for(&album.id))
            .content_type("application/json")
            .body(ByteStream::from(Bytes::from(body)));
        if if_absent {
            request = request.if_none_match("*");
        }

        request.send().await.map_err(|e| {
            // 412 Precondition Failed / 409 conflict: the key already exists
            let status = e.raw_response().map(|r| r.status().as_u16());
            if if_absent && matches!(status, Some(412) | Some(409)) {
                StoreError::Duplicate(album.id.to_string())
            } else {
                sdk_error(e)
            }
        })?;

        Ok(())
    }
}

#[async_trait]
impl AlbumStore for S3AlbumStore {
    async fn find_all(&self) -> Result<Vec<Album>, StoreError> {
        let ids = self.list_ids().await?;
        fetch_in_order(ids, move |id| async move { self.find_by_id(&id).await }).await
    }

    async fn find_by_id(&self, id: &AlbumId) -> Result<Option<Album>, StoreError> {
        let key = self.key_for(id);
        let resp = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&key)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                let is_no_such_key = e
                    .as_service_error()
                    .map(|se| se.is_no_such_key())
                    .unwrap_or(false);
                let status_is_404 = e
                    .raw_response()
                    .map(|r| r.status().as_u16() == 404)
                    .unwrap_or(false);

                if is_no_such_key || status_is_404 {
                    return Ok(None);
                }
                return Err(sdk_error(e));
            }
        };

        let data = resp
            .body
            .collect()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?
            .into_bytes();

        let album: Album = serde_json::from_slice(&data).map_err(|e| {
            warn!(key = %key, error = %e, "Stored album document is corrupt");
            StoreError::Serialization(format!("s3://{}/{}: {}", self.bucket, key, e))
        })?;

        Ok(Some(album))
    }

    async fn insert(&self, album: &Album) -> Result<(), StoreError> {
        self.put(album, true).await
    }

    async fn update_by_id(&self, album: &Album) -> Result<UpdateResult, StoreError> {
        if !self.exists(&album.id).await? {
            return Ok(UpdateResult { matched: 0 });
        }
        self.put(album, false).await?;
        Ok(UpdateResult { matched: 1 })
    }

    async fn delete_by_id(&self, id: &AlbumId) -> Result<DeleteResult, StoreError> {
        if !self.exists(id).await? {
            return Ok(DeleteResult { deleted: 0 });
        }
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(self.key_for(id))
            .send()
            .await
            .map_err(sdk_error)?;
        Ok(DeleteResult { deleted: 1 })
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .map_err(sdk_error)?;
        Ok(())
    }
}

/// Fetch the documents for `ids` a few at a time, keeping `ids` order.
///
/// Ids whose document is gone by the time it is fetched are skipped.
async fn fetch_in_order<F, Fut>(ids: Vec<AlbumId>, fetch: F) -> Result<Vec<Album>, StoreError>
where
    F: FnMut(AlbumId) -> Fut,
    Fut: Future<Output = Result<Option<Album>, StoreError>>,
{
    let albums: Vec<Option<Album>> = stream::iter(ids)
        .map(fetch)
        .buffered(FETCH_CONCURRENCY)
        .try_collect()
        .await?;
    Ok(albums.into_iter().flatten().collect())
}

/// Create an S3 client with optional custom endpoint and region.
///
/// Every SDK call, retries included, is bounded by `operation_timeout`.
///
/// Use a custom endpoint for S3-compatible services like MinIO:
/// ```ignore
/// let client = create_s3_client(Some("http://localhost:9000"), "us-east-1", Duration::from_secs(10)).await;
/// ```
pub async fn create_s3_client(
    endpoint_url: Option<&str>,
    region: &str,
    operation_timeout: Duration,
) -> Client {
    let region = aws_config::Region::new(region.to_string());
    let timeouts = TimeoutConfig::builder()
        .operation_timeout(operation_timeout)
        .build();
    let mut config_loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(region)
        .timeout_config(timeouts);

    if let Some(endpoint) = endpoint_url {
        config_loader = config_loader.endpoint_url(endpoint);
    }

    let sdk_config = config_loader.load().await;

    // S3-compatible services usually need path-style addressing
    let s3_config = if endpoint_url.is_some() {
        aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(true)
            .build()
    } else {
        aws_sdk_s3::config::Builder::from(&sdk_config).build()
    };

    Client::from_conf(s3_config)
}
