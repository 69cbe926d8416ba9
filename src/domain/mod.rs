//! Domain layer: the short link entity and the storage contract.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Storage trait definitions
//! - [`errors`] - Failures shared by all storage backends
//!
//! The domain layer has no knowledge of HTTP or of any concrete backend.
//! Business rules live in [`crate::application::services`].

pub mod entities;
pub mod errors;
pub mod repositories;
