//! Authenticated encryption of snippet content.
//!
//! AES-256-GCM with a random 96-bit nonce per message. The stored text form is
//! `base64url(nonce || ciphertext || tag)` without padding.

use aes_gcm::{
    Aes256Gcm,
    aead::{Aead, KeyInit, generic_array::GenericArray},
};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::json;

use super::kdf::DerivedKey;
use crate::error::AppError;

pub const NONCE_LEN: usize = 12;
pub const TAG_LEN: usize = 16;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CipherError {
    /// Not valid base64, or too short to hold a nonce and a tag.
    #[error("Malformed ciphertext")]
    Malformed,

    /// The tag did not verify: wrong key or tampered ciphertext.
    #[error("Ciphertext authentication failed")]
    Authentication,

    #[error("Encryption failed")]
    Encryption,

    #[error("Randomness source failure")]
    Randomness,
}

impl From<CipherError> for AppError {
    fn from(e: CipherError) -> Self {
        match e {
            CipherError::Malformed | CipherError::Authentication => {
                AppError::decryption_failed("Invalid encryption key", json!({}))
            }
            CipherError::Encryption | CipherError::Randomness => {
                AppError::internal(e.to_string(), json!({}))
            }
        }
    }
}

/// Encrypts `plaintext` and returns the encoded `nonce || ciphertext || tag`.
///
/// # Errors
///
/// Returns [`CipherError::Randomness`] if a nonce cannot be generated.
pub fn encrypt(plaintext: &[u8], key: &DerivedKey) -> Result<String, CipherError> {
    let cipher =
        Aes256Gcm::new_from_slice(key.as_bytes()).map_err(|_| CipherError::Encryption)?;

    let mut nonce = [0u8; NONCE_LEN];
    getrandom::fill(&mut nonce).map_err(|_| CipherError::Randomness)?;

    let sealed = cipher
        .encrypt(GenericArray::from_slice(&nonce), plaintext)
        .map_err(|_| CipherError::Encryption)?;

    let mut payload = Vec::with_capacity(NONCE_LEN + sealed.len());
    payload.extend_from_slice(&nonce);
    payload.extend_from_slice(&sealed);

    Ok(URL_SAFE_NO_PAD.encode(payload))
}

/// Decodes and decrypts a value produced by [`encrypt`].
///
/// Never returns unauthenticated bytes.
///
/// # Errors
///
/// - [`CipherError::Malformed`] if the text cannot be decoded
/// - [`CipherError::Authentication`] on wrong key or tampering
pub fn decrypt(encoded: &str, key: &DerivedKey) -> Result<Vec<u8>, CipherError> {
    let payload = URL_SAFE_NO_PAD
        .decode(encoded)
        .map_err(|_| CipherError::Malformed)?;

    if payload.len() < NONCE_LEN + TAG_LEN {
        return Err(CipherError::Malformed);
    }

    let (nonce, sealed) = payload.split_at(NONCE_LEN);

    let cipher =
        Aes256Gcm::new_from_slice(key.as_bytes()).map_err(|_| CipherError::Authentication)?;

    cipher
        .decrypt(GenericArray::from_slice(nonce), sealed)
        .map_err(|_| CipherError::Authentication)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::kdf::KeyDerivation;
    use crate::domain::entities::{SALT_LEN, Salt};
    use std::num::NonZeroU32;

    fn key(passphrase: &str) -> DerivedKey {
        KeyDerivation::new(NonZeroU32::new(1_000).unwrap())
            .derive(passphrase, &Salt::new([5u8; SALT_LEN]))
    }

    #[test]
    fn test_decrypt_recovers_plaintext() {
        let k = key("correct-horse");
        let encoded = encrypt(b"secret note", &k).unwrap();

        assert_eq!(decrypt(&encoded, &k).unwrap(), b"secret note");
    }

    #[test]
    fn test_output_is_url_safe_text() {
        let encoded = encrypt(b"secret note", &key("pw")).unwrap();

        assert!(
            encoded
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
        assert_ne!(encoded, "secret note");
    }

    #[test]
    fn test_fresh_nonce_per_encryption() {
        let k = key("pw");
        let a = encrypt(b"same", &k).unwrap();
        let b = encrypt(b"same", &k).unwrap();

        assert_ne!(a, b);
    }

    #[test]
    fn test_wrong_key_fails_authentication() {
        let encoded = encrypt(b"secret note", &key("correct-horse")).unwrap();

        assert_eq!(
            decrypt(&encoded, &key("wrong-pass")).unwrap_err(),
            CipherError::Authentication
        );
    }

    #[test]
    fn test_tampered_ciphertext_fails_authentication() {
        let k = key("pw");
        let encoded = encrypt(b"secret note", &k).unwrap();

        let mut raw = URL_SAFE_NO_PAD.decode(&encoded).unwrap();
        let last = raw.len() - 1;
        raw[last] ^= 0x01;
        let tampered = URL_SAFE_NO_PAD.encode(raw);

        assert_eq!(
            decrypt(&tampered, &k).unwrap_err(),
            CipherError::Authentication
        );
    }

    #[test]
    fn test_malformed_input() {
        let k = key("pw");

        assert_eq!(decrypt("***", &k).unwrap_err(), CipherError::Malformed);
        assert_eq!(
            decrypt(&URL_SAFE_NO_PAD.encode([0u8; 10]), &k).unwrap_err(),
            CipherError::Malformed
        );
    }

    #[test]
    fn test_empty_plaintext_round_trips() {
        let k = key("pw");
        let encoded = encrypt(b"", &k).unwrap();

        assert!(decrypt(&encoded, &k).unwrap().is_empty());
    }

    #[test]
    fn test_cipher_errors_map_to_app_errors() {
        assert!(matches!(
            AppError::from(CipherError::Authentication),
            AppError::DecryptionFailed { .. }
        ));
        assert!(matches!(
            AppError::from(CipherError::Malformed),
            AppError::DecryptionFailed { .. }
        ));
        assert!(matches!(
            AppError::from(CipherError::Randomness),
            AppError::Internal { .. }
        ));
    }
}
