//! HTTP request handlers for the album API.
//!
//! # Endpoints
//!
//! - `GET /albums` - List albums
//! - `GET /albums/{id}` - Get one album
//! - `POST /albums` - Create an album (bearer token required)
//! - `PATCH /albums/{id}` - Partially update an album
//! - `DELETE /albums/{id}` - Delete an album
//! - `GET /health` - Health check endpoint
//!
//! Each handler carries a `utoipa::path` description that feeds
//! [`ApiDoc`](super::openapi::ApiDoc).

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{debug, error, warn};
use utoipa::ToSchema;

use crate::album::{Album, AlbumFields, AlbumService};
use crate::error::{AlbumError, PayloadError};
use crate::store::AlbumStore;

use super::auth::BearerToken;

// =============================================================================
// Application State
// =============================================================================

/// Shared application state containing the album service.
pub struct AppState<S: AlbumStore> {
    pub albums: Arc<AlbumService<S>>,
}

impl<S: AlbumStore> AppState<S> {
    pub fn new(albums: AlbumService<S>) -> Self {
        Self {
            albums: Arc::new(albums),
        }
    }
}

impl<S: AlbumStore> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            albums: Arc::clone(&self.albums),
        }
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// `{"error": "..."}` body.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// `{"message": "..."}` body, used for confirmations and some rejections.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}

// =============================================================================
// Error Mapping
// =============================================================================

/// Convert AlbumError to HTTP response.
///
/// | Error                    | Status | Body                              |
/// |--------------------------|--------|-----------------------------------|
/// | NotFound                 | 404    | `{"error":"album not found"}`     |
/// | Unauthorized             | 422    | `{"message":"wrong token"}`       |
/// | Malformed payload        | 422    | `{"message":"invalid data"}`      |
/// | Failed validation        | 422    | `{"error":"<violations>"}`        |
/// | Store failure on create  | 500    | `{"error":"album was not created"}` |
/// | Other store failure      | 500    | `{"error":"store unavailable"}`   |
impl IntoResponse for AlbumError {
    fn into_response(self) -> Response {
        match &self {
            AlbumError::NotFound => {
                debug!(status = 404, "Album not found");
                (
                    StatusCode::NOT_FOUND,
                    Json(ErrorResponse::new("album not found")),
                )
                    .into_response()
            }
            AlbumError::Unauthorized => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(MessageResponse::new("wrong token")),
            )
                .into_response(),
            AlbumError::InvalidPayload(PayloadError::Malformed(reason)) => {
                debug!(status = 422, reason = %reason, "Malformed album payload");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(MessageResponse::new("invalid data")),
                )
                    .into_response()
            }
            AlbumError::InvalidPayload(PayloadError::Invalid(violations)) => {
                warn!(status = 422, "Client error: {}", violations);
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(ErrorResponse::new(violations.to_string())),
                )
                    .into_response()
            }
            AlbumError::NotCreated(err) => {
                error!(status = 500, "Server error: album was not created: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new("album was not created")),
                )
                    .into_response()
            }
            AlbumError::Store(err) => {
                error!(status = 500, "Server error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new("store unavailable")),
                )
                    .into_response()
            }
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle album list requests.
///
/// `GET /albums` → `200 OK` with a JSON array (possibly empty).
#[utoipa::path(
    get,
    path = "/albums",
    tag = "albums",
    responses(
        (status = 200, description = "All stored albums", body = Vec<Album>),
        (status = 500, description = "Store unavailable", body = ErrorResponse)
    )
)]
pub async fn list_albums_handler<S: AlbumStore>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<Album>>, AlbumError> {
    Ok(Json(state.albums.list().await?))
}

/// Handle single album requests.
///
/// `GET /albums/{id}` → `200 OK` with the album, or `404`.
#[utoipa::path(
    get,
    path = "/albums/{id}",
    tag = "albums",
    params(("id" = String, Path, description = "Album id, 24 hex characters")),
    responses(
        (status = 200, description = "The album", body = Album),
        (status = 404, description = "No album with this id", body = ErrorResponse),
        (status = 500, description = "Store unavailable", body = ErrorResponse)
    )
)]
pub async fn get_album_handler<S: AlbumStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<Json<Album>, AlbumError> {
    Ok(Json(state.albums.get(&id).await?))
}

/// Handle album creation.
///
/// `POST /albums` with `Authorization: Bearer <secret>` and a JSON body:
///
/// ```json
/// { "title": "Blue Train", "artist": "John Coltrane", "price": 56.99 }
/// ```
///
/// Returns `200 OK` with the stored album including its assigned `_id`.
/// The body is read raw so the token is checked before any parsing.
#[utoipa::path(
    post,
    path = "/albums",
    tag = "albums",
    request_body = AlbumFields,
    security(("bearer_token" = [])),
    responses(
        (status = 200, description = "The stored album", body = Album),
        (status = 422, description = "Wrong token, malformed body or failed validation", body = MessageResponse),
        (status = 500, description = "Album was not created", body = ErrorResponse)
    )
)]
pub async fn create_album_handler<S: AlbumStore>(
    State(state): State<AppState<S>>,
    token: BearerToken,
    body: Bytes,
) -> Result<Json<Album>, AlbumError> {
    let album = state.albums.create(&body, token.as_deref()).await?;
    Ok(Json(album))
}

/// Handle partial updates.
///
/// `PATCH /albums/{id}` → `200 OK` with
/// `{"message":"successfully updated the album"}`.
#[utoipa::path(
    patch,
    path = "/albums/{id}",
    tag = "albums",
    params(("id" = String, Path, description = "Album id, 24 hex characters")),
    request_body = AlbumFields,
    responses(
        (status = 200, description = "Album updated", body = MessageResponse),
        (status = 404, description = "No album with this id", body = ErrorResponse),
        (status = 422, description = "Malformed body or failed validation", body = ErrorResponse),
        (status = 500, description = "Store unavailable", body = ErrorResponse)
    )
)]
pub async fn update_album_handler<S: AlbumStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<MessageResponse>, AlbumError> {
    state.albums.update(&id, &body).await?;
    Ok(Json(MessageResponse::new("successfully updated the album")))
}

/// Handle deletes.
///
/// `DELETE /albums/{id}` → `200 OK` with
/// `{"message":"successfully deleted the album"}`.
#[utoipa::path(
    delete,
    path = "/albums/{id}",
    tag = "albums",
    params(("id" = String, Path, description = "Album id, 24 hex characters")),
    responses(
        (status = 200, description = "Album deleted", body = MessageResponse),
        (status = 404, description = "No album with this id", body = ErrorResponse),
        (status = 500, description = "Store unavailable", body = ErrorResponse)
    )
)]
pub async fn delete_album_handler<S: AlbumStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AlbumError> {
    state.albums.delete(&id).await?;
    Ok(Json(MessageResponse::new("successfully deleted the album")))
}

/// Handle health check requests.
///
/// `GET /health` → `{"status":"healthy","version":"0.1.0"}`
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
