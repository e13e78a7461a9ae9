//! Required-field validation for album records.
//!
//! Create payloads are validated as submitted. Update patches are merged onto
//! the stored record first and the merged result is validated, so a patch may
//! omit any field the stored record already satisfies.

use std::fmt;

use super::AlbumFields;

/// A writable album field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Artist,
    Price,
}

impl Field {
    /// JSON key of the field.
    pub fn key(&self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Artist => "artist",
            Field::Price => "price",
        }
    }

    fn display_name(&self) -> &'static str {
        match self {
            Field::Title => "Title",
            Field::Artist => "Artist",
            Field::Price => "Price",
        }
    }
}

/// A single failed check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub field: Field,
    /// Name of the rule that failed
    pub rule: &'static str,
}

impl Violation {
    fn required(field: Field) -> Self {
        Self {
            field,
            rule: "required",
        }
    }
}

/// Non-empty, ordered list of violations (title, artist, price).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    entity: &'static str,
    violations: Vec<Violation>,
}

impl ValidationErrors {
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Fields that failed, in check order.
    pub fn fields(&self) -> Vec<Field> {
        self.violations.iter().map(|v| v.field).collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(
                f,
                "Key: '{entity}.{name}' Error:Field validation for '{name}' failed on the '{rule}' tag",
                entity = self.entity,
                name = v.field.display_name(),
                rule = v.rule,
            )?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Album fields that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckedAlbum {
    pub title: String,
    pub artist: String,
    pub price: f64,
}

/// Checks submitted album fields.
///
/// - `title` and `artist` must be present and non-empty
/// - `price` must be present; any number, zero included, is accepted
#[derive(Debug, Clone)]
pub struct Validator {
    entity: &'static str,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    pub fn new() -> Self {
        Self { entity: "Album" }
    }

    /// Validate a candidate record, returning the checked fields.
    pub fn validate(&self, candidate: AlbumFields) -> Result<CheckedAlbum, ValidationErrors> {
        let mut violations = Vec::new();

        let title = candidate.title.filter(|t| !t.is_empty());
        if title.is_none() {
            violations.push(Violation::required(Field::Title));
        }
        let artist = candidate.artist.filter(|a| !a.is_empty());
        if artist.is_none() {
            violations.push(Violation::required(Field::Artist));
        }
        if candidate.price.is_none() {
            violations.push(Violation::required(Field::Price));
        }

        match (title, artist, candidate.price) {
            (Some(title), Some(artist), Some(price)) => Ok(CheckedAlbum {
                title,
                artist,
                price,
            }),
            _ => Err(ValidationErrors {
                entity: self.entity,
                violations,
            }),
        }
    }
}
