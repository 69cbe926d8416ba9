//! Storage backend implementations.
//!
//! Concrete implementations of [`crate::domain::repositories::LinkRepository`].
//!
//! # Repositories
//!
//! - [`PgLinkRepository`] - PostgreSQL via SQLx
//! - [`RedisLinkRepository`] - Redis hashes with Lua scripts
//! - [`MemoryLinkRepository`] - In-process map for local runs and tests
//!
//! [`connect_storage`] picks one from the connection string at startup.

pub mod backend;
pub mod memory_link_repository;
pub mod pg_link_repository;
pub mod redis_link_repository;

pub use backend::{PoolSettings, StorageBackend, connect_storage};
pub use memory_link_repository::MemoryLinkRepository;
pub use pg_link_repository::PgLinkRepository;
pub use redis_link_repository::RedisLinkRepository;
