use std::time::Duration;

use thiserror::Error;

use crate::album::ValidationErrors;

/// Errors raised by an album store backend
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Error from S3 or S3-compatible storage
    #[error("S3 error: {0}")]
    S3(String),

    /// Network or connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// A stored document could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// An insert targeted an id that is already taken
    #[error("Duplicate id: {0}")]
    Duplicate(String),

    /// The store did not acknowledge within the operation budget
    #[error("Store did not respond within {}s", .0.as_secs())]
    Timeout(Duration),
}

/// Reasons a submitted album representation is rejected
#[derive(Debug, Clone, Error)]
pub enum PayloadError {
    /// Body is not a JSON object with correctly typed fields
    #[error("Malformed payload: {0}")]
    Malformed(String),

    /// Body parsed but one or more required fields are missing or empty
    #[error("{0}")]
    Invalid(#[from] ValidationErrors),
}

/// Outcome of a failed album operation.
///
/// Every variant is recoverable: the HTTP layer turns each one into a
/// status code and a small JSON body.
#[derive(Debug, Clone, Error)]
pub enum AlbumError {
    /// Missing or wrong credential on a write
    #[error("Unauthorized")]
    Unauthorized,

    /// Malformed body or failed field validation
    #[error("Invalid payload: {0}")]
    InvalidPayload(#[from] PayloadError),

    /// No album exists at the given id, or the id is not well formed
    #[error("Album not found")]
    NotFound,

    /// The store failed while persisting a new album
    #[error("Album was not created: {0}")]
    NotCreated(StoreError),

    /// The store failed on a read, update or delete
    #[error("Store failure: {0}")]
    Store(#[from] StoreError),
}

impl AlbumError {
    /// Whether this error originates in the store rather than the request.
    pub fn is_store_failure(&self) -> bool {
        matches!(self, AlbumError::NotCreated(_) | AlbumError::Store(_))
    }
}

impl From<ValidationErrors> for AlbumError {
    fn from(err: ValidationErrors) -> Self {
        AlbumError::InvalidPayload(PayloadError::Invalid(err))
    }
}
