//! Album identifiers.
//!
//! Ids are 12 bytes rendered as 24 lowercase hex characters:
//!
//! ```text
//! ┌──────────────────┬──────────────────────┬──────────────────┐
//! │ unix seconds (4) │ process-random (5)   │ counter (3)      │
//! └──────────────────┴──────────────────────┴──────────────────┘
//! ```
//!
//! The random part is drawn once per process and the counter starts at a
//! random value, so ids generated by concurrent requests never collide.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::OnceLock;

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Length of an encoded id in bytes.
pub const ALBUM_ID_LEN: usize = 12;

/// Counter values wrap at 24 bits.
const COUNTER_MASK: u32 = 0x00FF_FFFF;

/// The given text is not a well-formed album id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid album id: {0:?}")]
pub struct InvalidAlbumId(pub String);

/// Unique identifier of a stored album.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AlbumId([u8; ALBUM_ID_LEN]);

fn process_unique() -> &'static [u8; 5] {
    static PROCESS_UNIQUE: OnceLock<[u8; 5]> = OnceLock::new();
    PROCESS_UNIQUE.get_or_init(|| rand::thread_rng().gen())
}

fn counter() -> &'static AtomicU32 {
    static COUNTER: OnceLock<AtomicU32> = OnceLock::new();
    COUNTER.get_or_init(|| AtomicU32::new(rand::thread_rng().gen_range(0..=COUNTER_MASK)))
}

impl AlbumId {
    /// Generate a fresh id stamped with the current time.
    pub fn generate() -> Self {
        let seconds = Utc::now().timestamp().clamp(0, u32::MAX as i64) as u32;
        let count = counter().fetch_add(1, Ordering::Relaxed) & COUNTER_MASK;

        let mut bytes = [0u8; ALBUM_ID_LEN];
        bytes[0..4].copy_from_slice(&seconds.to_be_bytes());
        bytes[4..9].copy_from_slice(process_unique());
        bytes[9..12].copy_from_slice(&count.to_be_bytes()[1..]);
        Self(bytes)
    }

    /// Build an id from its raw bytes.
    pub fn from_bytes(bytes: [u8; ALBUM_ID_LEN]) -> Self {
        Self(bytes)
    }

    /// Parse a 24 character hex string (case-insensitive).
    pub fn parse(s: &str) -> Result<Self, InvalidAlbumId> {
        if s.len() != ALBUM_ID_LEN * 2 {
            return Err(InvalidAlbumId(s.to_string()));
        }
        let mut bytes = [0u8; ALBUM_ID_LEN];
        hex::decode_to_slice(s, &mut bytes).map_err(|_| InvalidAlbumId(s.to_string()))?;
        Ok(Self(bytes))
    }

    /// Raw bytes of the id.
    pub fn as_bytes(&self) -> &[u8; ALBUM_ID_LEN] {
        &self.0
    }

    /// Unix seconds embedded at generation time.
    pub fn timestamp(&self) -> u32 {
        u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]])
    }

    /// Lowercase hex rendering.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for AlbumId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for AlbumId {
    type Err = InvalidAlbumId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for AlbumId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for AlbumId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
