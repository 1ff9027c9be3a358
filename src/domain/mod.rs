//! Domain layer containing business entities and storage contracts.
//!
//! # Architecture
//!
//! - [`entities`] - Core data structures
//! - [`repositories`] - Persistence gateway trait definitions
//!
//! The domain layer has no dependency on infrastructure or HTTP. Business
//! rules live in [`crate::application::services`].

pub mod entities;
pub mod repositories;
