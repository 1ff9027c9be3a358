//! DTOs for snippet endpoints.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to store a snippet.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSnippetRequest {
    #[validate(length(min = 1, message = "Content must not be empty"))]
    pub content: String,

    /// Optional passphrase. An empty string means "not encrypted", matching
    /// an empty form field.
    #[serde(default)]
    pub key: Option<String>,
}

impl CreateSnippetRequest {
    /// Splits the request into content and the effective passphrase.
    pub fn into_parts(self) -> (String, Option<String>) {
        (self.content, self.key.filter(|k| !k.is_empty()))
    }
}

/// Response for a stored snippet.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateSnippetResponse {
    pub id: String,
    pub link: String,
    pub encrypted: bool,
}

/// Snippet content as returned to readers.
///
/// `content` is the ciphertext while `encrypted` is `true`.
#[derive(Debug, Serialize, Deserialize)]
pub struct SnippetResponse {
    pub id: String,
    pub content: String,
    pub encrypted: bool,
}

/// Request to decrypt a snippet.
#[derive(Debug, Deserialize, Validate)]
pub struct UnlockSnippetRequest {
    #[validate(length(min = 1, message = "Key must not be empty"))]
    pub key: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_key_means_unencrypted() {
        let request: CreateSnippetRequest =
            serde_json::from_str(r#"{"content":"hello","key":""}"#).unwrap();

        let (content, key) = request.into_parts();
        assert_eq!(content, "hello");
        assert!(key.is_none());
    }

    #[test]
    fn test_missing_key_is_allowed() {
        let request: CreateSnippetRequest =
            serde_json::from_str(r#"{"content":"hello"}"#).unwrap();

        assert!(request.validate().is_ok());
        assert!(request.key.is_none());
    }

    #[test]
    fn test_empty_content_fails_validation() {
        let request: CreateSnippetRequest = serde_json::from_str(r#"{"content":""}"#).unwrap();

        assert!(request.validate().is_err());
    }
}
