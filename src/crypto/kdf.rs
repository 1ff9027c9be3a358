//! Passphrase key derivation.
//!
//! PBKDF2-HMAC-SHA256 with a per-record salt. The iteration count makes each
//! guess expensive for an offline attacker; the salt makes equal passphrases
//! on different records yield unrelated keys.

use std::num::NonZeroU32;

use pbkdf2::pbkdf2_hmac;
use serde_json::json;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::domain::entities::{SALT_LEN, Salt};
use crate::error::AppError;

/// Derived key length in bytes (AES-256).
pub const KEY_LEN: usize = 32;

/// Default PBKDF2 iteration count.
pub const DEFAULT_KDF_ITERATIONS: u32 = 480_000;

/// Symmetric key derived from a passphrase. Wiped from memory on drop.
pub struct DerivedKey(Zeroizing<[u8; KEY_LEN]>);

impl DerivedKey {
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DerivedKey(..)")
    }
}

/// PBKDF2 parameters shared by every derivation in the process.
#[derive(Debug, Clone, Copy)]
pub struct KeyDerivation {
    iterations: NonZeroU32,
}

impl KeyDerivation {
    pub fn new(iterations: NonZeroU32) -> Self {
        Self { iterations }
    }

    pub fn iterations(&self) -> u32 {
        self.iterations.get()
    }

    /// Derives the key for `passphrase` under `salt`.
    ///
    /// Deterministic: the same inputs always give the same key, which is what
    /// lets decryption reproduce the encryption key from the stored salt.
    ///
    /// Slow by construction. Call it from a blocking context.
    pub fn derive(&self, passphrase: &str, salt: &Salt) -> DerivedKey {
        let mut key = Zeroizing::new([0u8; KEY_LEN]);
        pbkdf2_hmac::<Sha256>(
            passphrase.as_bytes(),
            salt.as_bytes(),
            self.iterations.get(),
            key.as_mut_slice(),
        );
        DerivedKey(key)
    }

    /// Generates a fresh random salt from the OS randomness source.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the randomness source fails.
    pub fn random_salt() -> Result<Salt, AppError> {
        let mut bytes = [0u8; SALT_LEN];
        getrandom::fill(&mut bytes).map_err(|e| {
            AppError::internal(
                "Randomness source failure",
                json!({ "reason": e.to_string() }),
            )
        })?;
        Ok(Salt::new(bytes))
    }
}

impl Default for KeyDerivation {
    fn default() -> Self {
        Self::new(NonZeroU32::new(DEFAULT_KDF_ITERATIONS).unwrap_or(NonZeroU32::MIN))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_kdf() -> KeyDerivation {
        KeyDerivation::new(NonZeroU32::new(1_000).unwrap())
    }

    #[test]
    fn test_default_iterations() {
        assert_eq!(KeyDerivation::default().iterations(), DEFAULT_KDF_ITERATIONS);
    }

    #[test]
    fn test_derive_is_deterministic() {
        let kdf = fast_kdf();
        let salt = Salt::new([3u8; SALT_LEN]);

        let a = kdf.derive("correct-horse", &salt);
        let b = kdf.derive("correct-horse", &salt);

        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn test_salt_changes_key() {
        let kdf = fast_kdf();

        let a = kdf.derive("correct-horse", &Salt::new([1u8; SALT_LEN]));
        let b = kdf.derive("correct-horse", &Salt::new([2u8; SALT_LEN]));

        assert_ne!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn test_passphrase_changes_key() {
        let kdf = fast_kdf();
        let salt = Salt::new([9u8; SALT_LEN]);

        let a = kdf.derive("correct-horse", &salt);
        let b = kdf.derive("wrong-pass", &salt);

        assert_ne!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn test_iterations_change_key() {
        let salt = Salt::new([4u8; SALT_LEN]);

        let a = fast_kdf().derive("pw", &salt);
        let b = KeyDerivation::new(NonZeroU32::new(1_001).unwrap()).derive("pw", &salt);

        assert_ne!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn test_random_salts_differ() {
        let a = KeyDerivation::random_salt().unwrap();
        let b = KeyDerivation::random_salt().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_debug_hides_key_material() {
        let key = fast_kdf().derive("pw", &Salt::new([0u8; SALT_LEN]));
        assert_eq!(format!("{key:?}"), "DerivedKey(..)");
    }
}
