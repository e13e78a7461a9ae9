//! HTTP server layer for the album API.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         HTTP Layer                              │
//! │              GET|POST /albums   GET|PATCH|DELETE /albums/{id}   │
//! │                                                                 │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────────┐  │
//! │  │  handlers   │  │    auth     │  │        routes           │  │
//! │  │ (requests)  │  │ (bearer)    │  │  (router config)        │  │
//! │  └─────────────┘  └─────────────┘  └─────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod handlers;
pub mod openapi;
pub mod routes;

pub use auth::BearerToken;
pub use handlers::{
    create_album_handler, delete_album_handler, get_album_handler, health_handler,
    list_albums_handler, update_album_handler, AppState, ErrorResponse, HealthResponse,
    MessageResponse,
};
pub use openapi::{openapi_handler, ApiDoc};
pub use routes::{create_router, RouterConfig, API_V1_PREFIX};
