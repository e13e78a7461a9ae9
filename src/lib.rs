//! # Albums API
//!
//! A small REST service for album records (title, artist, price) kept in a
//! persistent JSON document collection.
//!
//! ## Features
//!
//! - **Resource operations**: list, fetch by id, create, partial update, delete
//! - **Merge-then-validate updates**: patches only need the fields they change
//! - **Shared-secret writes**: album creation requires a bearer token
//! - **Bounded creates**: a create that the store does not acknowledge in time fails cleanly
//! - **Bounded store calls**: list, get, update and delete give up on a stalled store
//! - **Self-describing**: an OpenAPI document is served at `/openapi.json`
//! - **Pluggable storage**: S3 (or MinIO) documents, or an in-memory map for development
//!
//! ## Architecture
//!
//! - [`album`] - Data model, validator and the album resource service
//! - [`store`] - Store trait with S3 and in-memory backends
//! - [`auth`] - Shared-secret token check for writes
//! - [`server`] - Axum-based HTTP server and routes
//! - [`config`] - CLI and configuration types
//! - [`error`] - Error taxonomy
//!
//! ## Example
//!
//! ```rust,no_run
//! use albums_api::{create_router, AlbumService, MemoryStore, RouterConfig, TokenAuth, Validator};
//!
//! #[tokio::main]
//! async fn main() {
//!     let service = AlbumService::new(MemoryStore::new(), Validator::new(), TokenAuth::new("secret"));
//!     let router = create_router(service, RouterConfig::default());
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await.unwrap();
//!     axum::serve(listener, router).await.unwrap();
//! }
//! ```

pub mod album;
pub mod auth;
pub mod config;
pub mod error;
pub mod server;
pub mod store;

// Re-export commonly used types
pub use album::{
    Album, AlbumFields, AlbumId, AlbumService, CheckedAlbum, Field, ValidationErrors, Validator,
    Violation, DEFAULT_CREATE_TIMEOUT, DEFAULT_REQUEST_TIMEOUT,
};
pub use config::{CheckConfig, Cli, Command, S3Config, ServeConfig, StoreBackend};
pub use error::{AlbumError, PayloadError, StoreError};
pub use auth::TokenAuth;
pub use server::{
    create_router, ApiDoc, AppState, BearerToken, ErrorResponse, HealthResponse,
    MessageResponse, RouterConfig,
};
pub use store::{
    create_s3_client, AlbumStore, DeleteResult, MemoryStore, S3AlbumStore, UpdateResult,
};
