//! Short URL entity representing a long URL mapping.

use chrono::{DateTime, Utc};

/// A stored mapping between a short identifier and a long URL.
///
/// Both sides are unique: one long URL always resolves to the same short id.
#[derive(Debug, Clone)]
pub struct ShortUrl {
    pub short_id: String,
    pub long_url: String,
    pub created_at: DateTime<Utc>,
}

impl ShortUrl {
    pub fn new(short_id: String, long_url: String, created_at: DateTime<Utc>) -> Self {
        Self {
            short_id,
            long_url,
            created_at,
        }
    }
}

/// Input data for a single mapping insertion attempt.
#[derive(Debug, Clone)]
pub struct NewShortUrl {
    pub short_id: String,
    pub long_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_url_creation() {
        let now = Utc::now();
        let url = ShortUrl::new(
            "abcdEFGH".to_string(),
            "https://example.com".to_string(),
            now,
        );

        assert_eq!(url.short_id, "abcdEFGH");
        assert_eq!(url.long_url, "https://example.com");
        assert_eq!(url.created_at, now);
    }
}
