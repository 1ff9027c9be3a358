//! Shareable link construction.

/// Joins a base URL and an identifier with exactly one `/` between them.
///
/// Trailing slashes on `base_url` are collapsed, so `https://x.test` and
/// `https://x.test/` produce the same link.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(join_link("https://x.test/", "abc"), "https://x.test/abc");
/// assert_eq!(join_link("https://x.test", "abc"), "https://x.test/abc");
/// ```
pub fn join_link(base_url: &str, id: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_without_trailing_slash() {
        assert_eq!(
            join_link("https://x.test", "AbCdEfGhIj"),
            "https://x.test/AbCdEfGhIj"
        );
    }

    #[test]
    fn test_join_with_trailing_slash() {
        assert_eq!(
            join_link("https://x.test/", "AbCdEfGhIj"),
            "https://x.test/AbCdEfGhIj"
        );
    }

    #[test]
    fn test_join_with_repeated_trailing_slashes() {
        assert_eq!(join_link("https://x.test//", "abc"), "https://x.test/abc");
    }

    #[test]
    fn test_join_with_path_prefix() {
        assert_eq!(
            join_link("https://x.test/s/", "abc"),
            "https://x.test/s/abc"
        );
    }
}
