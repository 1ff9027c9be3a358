//! Core domain entities.
//!
//! - [`Snippet`] - A stored text snippet, plain or encrypted
//! - [`ShortUrl`] - A short identifier mapped to a long URL
//!
//! Creation goes through separate `New*` structs: each insertion attempt is a
//! fresh candidate value with its own identifier.

pub mod short_url;
pub mod snippet;

pub use short_url::{NewShortUrl, ShortUrl};
pub use snippet::{NewSnippet, SALT_LEN, Salt, Snippet};
