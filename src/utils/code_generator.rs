//! Short identifier generation and validation.
//!
//! Identifiers double as unguessable tokens for unlisted snippets, so they are
//! drawn from the operating system CSPRNG and never from a seeded generator.

use crate::error::AppError;
use serde_json::json;

/// The 52 ASCII letters identifiers are drawn from.
pub const ALPHABET: &[u8; 52] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Shortest identifier any generator in this crate produces.
pub const MIN_ID_LEN: usize = 8;

/// Longest identifier storage accepts.
pub const MAX_ID_LEN: usize = 25;

/// Bytes at or above this value are rejected so `byte % 52` stays uniform.
const ACCEPT_BELOW: u8 = (u8::MAX as usize + 1 - (u8::MAX as usize + 1) % ALPHABET.len()) as u8;

/// Generates a random identifier of exactly `length` letters.
///
/// Uses rejection sampling over `getrandom` output so every letter is equally
/// likely.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if the system randomness source fails. This
/// is not retried.
///
/// # Examples
///
/// ```ignore
/// let id = generate_id(10)?;
/// assert_eq!(id.len(), 10);
/// assert!(id.chars().all(|c| c.is_ascii_alphabetic()));
/// ```
pub fn generate_id(length: usize) -> Result<String, AppError> {
    let mut id = String::with_capacity(length);
    let mut buffer = [0u8; 32];

    while id.len() < length {
        getrandom::fill(&mut buffer).map_err(|e| {
            AppError::internal(
                "Randomness source failure",
                json!({ "reason": e.to_string() }),
            )
        })?;

        for &byte in buffer.iter().filter(|&&b| b < ACCEPT_BELOW) {
            if id.len() == length {
                break;
            }
            id.push(char::from(ALPHABET[usize::from(byte) % ALPHABET.len()]));
        }
    }

    Ok(id)
}

/// Returns true if `id` could have been produced by [`generate_id`].
///
/// Used to reject junk ids before they reach the cache or storage.
pub fn is_valid_id(id: &str) -> bool {
    (MIN_ID_LEN..=MAX_ID_LEN).contains(&id.len()) && id.bytes().all(|b| b.is_ascii_alphabetic())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_accept_threshold_is_multiple_of_alphabet() {
        assert_eq!(ACCEPT_BELOW, 208);
        assert_eq!(usize::from(ACCEPT_BELOW) % ALPHABET.len(), 0);
    }

    #[test]
    fn test_generate_id_has_requested_length() {
        for length in [MIN_ID_LEN, 10, 12, MAX_ID_LEN] {
            assert_eq!(generate_id(length).unwrap().len(), length);
        }
    }

    #[test]
    fn test_generate_id_zero_length() {
        assert_eq!(generate_id(0).unwrap(), "");
    }

    #[test]
    fn test_generate_id_letters_only() {
        for _ in 0..200 {
            let id = generate_id(12).unwrap();
            assert!(id.chars().all(|c| c.is_ascii_alphabetic()), "{id}");
        }
    }

    #[test]
    fn test_generate_id_produces_unique_ids() {
        let ids: HashSet<String> = (0..1000).map(|_| generate_id(10).unwrap()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_generate_id_uses_both_cases() {
        let joined: String = (0..50).map(|_| generate_id(20).unwrap()).collect();
        assert!(joined.chars().any(|c| c.is_ascii_uppercase()));
        assert!(joined.chars().any(|c| c.is_ascii_lowercase()));
    }

    #[test]
    fn test_is_valid_id() {
        assert!(is_valid_id("abcdEFGH"));
        assert!(is_valid_id(&"a".repeat(MAX_ID_LEN)));
        assert!(!is_valid_id("abcdEFG"));
        assert!(!is_valid_id(&"a".repeat(MAX_ID_LEN + 1)));
        assert!(!is_valid_id("abcd1234"));
        assert!(!is_valid_id("abcd-efgh"));
        assert!(!is_valid_id(""));
    }
}
