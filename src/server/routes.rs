//! Router configuration for the album API.
//!
//! # Route Structure
//!
//! ```text
//! /health                       - Health check
//! /openapi.json                 - OpenAPI document
//! /albums                       - GET list, POST create (bearer token)
//! /albums/{id}                  - GET, PATCH, DELETE
//! /api/v1/albums[/{id}]         - Same album routes under the versioned prefix
//! ```
//!
//! # Example
//!
//! ```ignore
//! use albums_api::album::{AlbumService, Validator};
//! use albums_api::auth::TokenAuth;
//! use albums_api::server::{create_router, RouterConfig};
//! use albums_api::store::MemoryStore;
//!
//! let service = AlbumService::new(MemoryStore::new(), Validator::new(), TokenAuth::new("secret"));
//! let router = create_router(service, RouterConfig::default());
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, router).await?;
//! ```

use std::time::Duration;

use axum::{routing::get, Router};
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::Method;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{
    create_album_handler, delete_album_handler, get_album_handler, health_handler,
    list_albums_handler, update_album_handler, AppState,
};
use super::openapi::openapi_handler;
use crate::album::AlbumService;
use crate::store::AlbumStore;

/// Versioned prefix the album routes are also served under.
pub const API_V1_PREFIX: &str = "/api/v1";

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Allowed CORS origins (None = allow any origin)
    pub cors_origins: Option<Vec<String>>,

    /// Whether to enable request tracing
    pub enable_tracing: bool,
}

impl Default for RouterConfig {
    /// Any CORS origin, tracing enabled.
    fn default() -> Self {
        Self {
            cors_origins: None,
            enable_tracing: true,
        }
    }
}

impl RouterConfig {
    /// Set specific allowed CORS origins.
    ///
    /// Pass an empty vec to disallow all cross-origin requests.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    /// Allow any CORS origin.
    pub fn with_cors_any_origin(mut self) -> Self {
        self.cors_origins = None;
        self
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the main application router.
pub fn create_router<S>(service: AlbumService<S>, config: RouterConfig) -> Router
where
    S: AlbumStore + 'static,
{
    let app_state = AppState::new(service);
    let cors = build_cors_layer(&config);

    let albums = album_routes(app_state);

    let router = Router::new()
        .route("/health", get(health_handler))
        .route("/openapi.json", get(openapi_handler))
        .merge(albums.clone())
        .nest(API_V1_PREFIX, albums)
        .layer(cors);

    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// The album resource routes, with state applied.
fn album_routes<S>(app_state: AppState<S>) -> Router
where
    S: AlbumStore + 'static,
{
    Router::new()
        .route(
            "/albums",
            get(list_albums_handler::<S>).post(create_album_handler::<S>),
        )
        .route(
            "/albums/{id}",
            get(get_album_handler::<S>)
                .patch(update_album_handler::<S>)
                .delete(delete_album_handler::<S>),
        )
        .with_state(app_state)
}

/// Build the CORS layer based on configuration.
fn build_cors_layer(config: &RouterConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .max_age(Duration::from_secs(86400)); // 24 hours

    match &config.cors_origins {
        None => cors.allow_origin(Any),
        Some(origins) if origins.is_empty() => cors,
        Some(origins) => {
            let parsed_origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            cors.allow_origin(parsed_origins)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
