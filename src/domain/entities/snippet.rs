//! Snippet entity: a write-once text record, optionally encrypted.

use chrono::{DateTime, Utc};

/// Length of the per-record key derivation salt in bytes.
pub const SALT_LEN: usize = 16;

/// Random per-record salt used to derive the encryption key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Salt([u8; SALT_LEN]);

impl Salt {
    pub fn new(bytes: [u8; SALT_LEN]) -> Self {
        Self(bytes)
    }

    /// Builds a salt from raw storage bytes.
    ///
    /// Returns `None` unless the slice is exactly [`SALT_LEN`] bytes long.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        <[u8; SALT_LEN]>::try_from(bytes).ok().map(Self)
    }

    pub fn as_bytes(&self) -> &[u8; SALT_LEN] {
        &self.0
    }
}

/// A stored snippet.
///
/// The encrypted flag is derived from the presence of a salt, so a record can
/// never claim to be encrypted without the salt needed to decrypt it.
#[derive(Debug, Clone)]
pub struct Snippet {
    pub id: String,
    /// Plain text, or the encoded ciphertext when [`Snippet::is_encrypted`].
    pub content: String,
    pub salt: Option<Salt>,
    pub created_at: DateTime<Utc>,
}

impl Snippet {
    pub fn new(id: String, content: String, salt: Option<Salt>, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            content,
            salt,
            created_at,
        }
    }

    pub fn is_encrypted(&self) -> bool {
        self.salt.is_some()
    }
}

/// Candidate record for a single insertion attempt.
///
/// A fresh value is built for every attempt so retries never share state.
#[derive(Debug, Clone)]
pub struct NewSnippet {
    pub id: String,
    pub content: String,
    pub salt: Option<Salt>,
}

impl NewSnippet {
    pub fn is_encrypted(&self) -> bool {
        self.salt.is_some()
    }
}
