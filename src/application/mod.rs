//! Application layer services implementing business logic.
//!
//! Services consume repository traits and give HTTP handlers and the admin
//! CLI a storage-agnostic API.
//!
//! # Available Services
//!
//! - [`services::shortener::Shortener`] - Short code allocation and resolution
pub mod services;
