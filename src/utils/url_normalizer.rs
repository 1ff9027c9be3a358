//! Long URL validation and canonicalization for the shortener.
//!
//! Equivalent spellings of a URL (host case, default port, surrounding
//! whitespace) must map to one stored long URL, otherwise the same target
//! would receive several short ids.

use url::Url;

/// Longest long URL accepted for shortening.
pub const MAX_LONG_URL_LEN: usize = 2048;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UrlNormalizationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL must contain a host")]
    MissingHost,

    #[error("URLs with embedded credentials are not allowed")]
    EmbeddedCredentials,

    #[error("URL exceeds {MAX_LONG_URL_LEN} characters")]
    TooLong,
}

/// Validates `input` and returns its canonical form.
///
/// # Rules
///
/// 1. Surrounding whitespace is ignored
/// 2. Only `http` and `https` schemes
/// 3. A host is required; the host is lowercased
/// 4. Default ports (80, 443) are dropped
/// 5. `user:pass@` credentials are rejected
/// 6. Path, query and fragment are kept verbatim
///
/// # Errors
///
/// Returns an [`UrlNormalizationError`] describing the first violated rule.
pub fn normalize_url(input: &str) -> Result<String, UrlNormalizationError> {
    let trimmed = input.trim();
    if trimmed.len() > MAX_LONG_URL_LEN {
        return Err(UrlNormalizationError::TooLong);
    }

    let mut url =
        Url::parse(trimmed).map_err(|e| UrlNormalizationError::InvalidFormat(e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(UrlNormalizationError::UnsupportedProtocol);
    }

    let host = url
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or(UrlNormalizationError::MissingHost)?
        .to_ascii_lowercase();

    if !url.username().is_empty() || url.password().is_some() {
        return Err(UrlNormalizationError::EmbeddedCredentials);
    }

    url.set_host(Some(&host))
        .map_err(|e| UrlNormalizationError::InvalidFormat(e.to_string()))?;

    let canonical = url.to_string();
    if canonical.len() > MAX_LONG_URL_LEN {
        return Err(UrlNormalizationError::TooLong);
    }

    Ok(canonical)
}
