//! Repository trait definitions for the domain layer.
//!
//! The single [`LinkRepository`] trait is the storage abstraction the
//! shortener is written against. Concrete backends live in
//! `crate::infrastructure::persistence` and are picked at startup from the
//! storage connection string; nothing above this trait knows which one runs.
//!
//! # Testing
//!
//! A `mockall` mock is generated under `cfg(test)`. Integration tests in
//! `tests/` use the in-memory backend instead.

pub mod link_repository;

pub use link_repository::LinkRepository;

#[cfg(test)]
pub use link_repository::MockLinkRepository;
