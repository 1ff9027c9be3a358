//! Helper functions used across the application:
//!
//! - [`code_generator`] - Random identifier generation and validation
//! - [`link`] - Shareable link construction
//! - [`url_normalizer`] - Long URL validation and canonicalization

pub mod code_generator;
pub mod link;
pub mod url_normalizer;
