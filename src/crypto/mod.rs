//! Passphrase-based protection of snippet content.
//!
//! - [`kdf`] - PBKDF2 key derivation with per-record salts
//! - [`cipher`] - AES-256-GCM authenticated encryption
//!
//! [`ContentCrypto`] ties the two together for the snippet service. The
//! passphrase is only ever held in memory for the duration of one call and is
//! never persisted or logged.

pub mod cipher;
pub mod kdf;

use serde_json::json;
use zeroize::Zeroizing;

pub use cipher::CipherError;
pub use kdf::{DEFAULT_KDF_ITERATIONS, DerivedKey, KeyDerivation};

use crate::domain::entities::Salt;
use crate::error::AppError;

/// Ciphertext plus the salt needed to re-derive its key.
#[derive(Debug, Clone)]
pub struct SealedContent {
    pub ciphertext: String,
    pub salt: Salt,
}

/// Encrypts and decrypts snippet content off the async executor.
///
/// Key derivation is deliberately slow, so both directions run on the
/// blocking thread pool. Once started, a derivation runs to completion even if
/// the caller goes away; no partial state is exposed either way.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentCrypto {
    kdf: KeyDerivation,
}

impl ContentCrypto {
    pub fn new(kdf: KeyDerivation) -> Self {
        Self { kdf }
    }

    /// Encrypts `plaintext` under a key derived from `passphrase` and a fresh salt.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if randomness is unavailable or the
    /// blocking task panics.
    pub async fn seal(
        &self,
        plaintext: String,
        passphrase: String,
    ) -> Result<SealedContent, AppError> {
        let kdf = self.kdf;
        let plaintext = Zeroizing::new(plaintext);
        let passphrase = Zeroizing::new(passphrase);

        tokio::task::spawn_blocking(move || {
            let salt = KeyDerivation::random_salt()?;
            let key = kdf.derive(&passphrase, &salt);
            let ciphertext = cipher::encrypt(plaintext.as_bytes(), &key)?;

            Ok::<_, AppError>(SealedContent { ciphertext, salt })
        })
        .await?
    }

    /// Re-derives the key from `passphrase` and `salt` and decrypts `ciphertext`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::DecryptionFailed`] for a wrong passphrase or a
    /// corrupted ciphertext.
    pub async fn open(
        &self,
        ciphertext: String,
        passphrase: String,
        salt: Salt,
    ) -> Result<String, AppError> {
        let kdf = self.kdf;
        let passphrase = Zeroizing::new(passphrase);

        tokio::task::spawn_blocking(move || {
            let key = kdf.derive(&passphrase, &salt);
            let plaintext = cipher::decrypt(&ciphertext, &key)?;

            String::from_utf8(plaintext).map_err(|_| {
                AppError::decryption_failed("Decrypted content is not valid text", json!({}))
            })
        })
        .await?
    }
}
