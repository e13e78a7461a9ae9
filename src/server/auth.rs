//! Bearer token extraction for album writes.
//!
//! The extractor only reads the `Authorization` header; whether the token
//! is accepted is decided by [`TokenAuth`] inside the album service.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::auth::TokenAuth;

/// Axum extractor for the presented credential.
///
/// Never rejects: a missing or non-UTF-8 header yields `BearerToken(None)`,
/// leaving the authorization decision to the album service.
#[derive(Debug, Clone, Default)]
pub struct BearerToken(pub Option<String>);

impl BearerToken {
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(TokenAuth::credential_from_header)
            .filter(|t| !t.is_empty())
            .map(str::to_string);

        Ok(BearerToken(token))
    }
}

// =============================================================================
// Tests
// =============================================================================
