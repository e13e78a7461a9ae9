//! Album records and the resource service that manages them.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │              HTTP Handlers              │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │              AlbumService               │
//! │  ┌──────────────┐  ┌─────────────────┐  │
//! │  │  TokenAuth   │  │    Validator    │  │
//! │  │  (writes)    │  │ (merged record) │  │
//! │  └──────────────┘  └─────────────────┘  │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │            AlbumStore trait             │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`Album`]: the stored record
//! - [`AlbumId`]: 12 byte identifier rendered as hex
//! - [`AlbumFields`]: the user-writable part of a record, every field optional
//! - [`Validator`]: required-field checks shared by create and update
//! - [`AlbumService`]: the operations exposed over HTTP

mod id;
mod service;
mod validation;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::PayloadError;

pub use id::{AlbumId, InvalidAlbumId, ALBUM_ID_LEN};
pub use service::{AlbumService, DEFAULT_CREATE_TIMEOUT, DEFAULT_REQUEST_TIMEOUT};
pub use validation::{CheckedAlbum, Field, ValidationErrors, Validator, Violation};

/// Current time truncated to whole seconds.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}

// =============================================================================
// Album
// =============================================================================

/// A stored album record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Album {
    /// Assigned at creation, never changes
    #[serde(rename = "_id", alias = "id")]
    #[schema(value_type = String, example = "5f1b2c3d4e5f60718293a4b5")]
    pub id: AlbumId,

    pub title: String,

    pub artist: String,

    pub price: f64,

    /// Set once at creation
    pub created_at: DateTime<Utc>,

    /// Refreshed on every successful update
    pub updated_at: DateTime<Utc>,
}

impl Album {
    /// Build a new record from checked fields, stamping both timestamps with `at`.
    pub fn new(id: AlbumId, fields: CheckedAlbum, at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: fields.title,
            artist: fields.artist,
            price: fields.price,
            created_at: at,
            updated_at: at,
        }
    }

    /// The writable fields of this record, all present.
    pub fn fields(&self) -> AlbumFields {
        AlbumFields {
            title: Some(self.title.clone()),
            artist: Some(self.artist.clone()),
            price: Some(self.price),
        }
    }

    /// Replace the writable fields and refresh `updated_at`.
    ///
    /// `id` and `created_at` are left untouched. `updated_at` never moves
    /// backwards, even if the clock does.
    pub fn apply(&mut self, fields: CheckedAlbum, at: DateTime<Utc>) {
        self.title = fields.title;
        self.artist = fields.artist;
        self.price = fields.price;
        self.updated_at = at.max(self.updated_at);
    }
}

// =============================================================================
// Submitted Fields
// =============================================================================

/// The caller-writable fields of an album.
///
/// Used both for create payloads and update patches. `null` and a missing
/// key both mean "absent". Any `_id`, `created_at` or `updated_at` keys in a
/// payload are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AlbumFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

impl AlbumFields {
    /// Parse a JSON request body.
    ///
    /// The body must be a JSON object whose known fields have the right
    /// types; anything else is malformed.
    pub fn from_json(body: &[u8]) -> Result<Self, PayloadError> {
        let value: serde_json::Value =
            serde_json::from_slice(body).map_err(|e| PayloadError::Malformed(e.to_string()))?;
        if !value.is_object() {
            return Err(PayloadError::Malformed("expected a JSON object".to_string()));
        }
        serde_json::from_value(value).map_err(|e| PayloadError::Malformed(e.to_string()))
    }

    /// Overlay `patch` onto these fields: present patch fields win.
    pub fn merge(self, patch: AlbumFields) -> AlbumFields {
        AlbumFields {
            title: patch.title.or(self.title),
            artist: patch.artist.or(self.artist),
            price: patch.price.or(self.price),
        }
    }
}
