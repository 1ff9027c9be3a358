//! DTOs for the URL shortening endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to shorten a URL.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// The original URL to shorten (must be valid HTTP/HTTPS).
    #[validate(url(message = "Invalid URL format"))]
    pub long_url: String,
}

/// Response with the short id and full short URL.
#[derive(Debug, Serialize, Deserialize)]
pub struct ShortenResponse {
    pub long_url: String,
    pub short_id: String,
    pub short_url: String,
}
