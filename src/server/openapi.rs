//! OpenAPI description of the album API, served at `/openapi.json`.
//!
//! Paths are listed without the `/api/v1` prefix; the same routes are
//! mounted under it.

use axum::Json;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use super::handlers::{ErrorResponse, HealthResponse, MessageResponse};
use crate::album::{Album, AlbumFields};

/// Name of the security scheme that guards album creation.
pub const BEARER_SCHEME_NAME: &str = "bearer_token";

#[derive(OpenApi)]
#[openapi(
    info(title = "Albums API", description = "Album records: title, artist and price."),
    paths(
        crate::server::handlers::list_albums_handler,
        crate::server::handlers::get_album_handler,
        crate::server::handlers::create_album_handler,
        crate::server::handlers::update_album_handler,
        crate::server::handlers::delete_album_handler,
        crate::server::handlers::health_handler,
    ),
    components(schemas(Album, AlbumFields, ErrorResponse, MessageResponse, HealthResponse)),
    modifiers(&BearerSecurity),
    tags(
        (name = "albums", description = "Album resource operations"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;

struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            BEARER_SCHEME_NAME,
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
        );
    }
}

/// Handle OpenAPI document requests.
///
/// `GET /openapi.json` → the generated document.
pub async fn openapi_handler() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
