//! Storage contract for short links.

use crate::domain::entities::ShortLink;
use crate::domain::errors::StorageError;
use async_trait::async_trait;

/// Capability set every storage backend provides.
///
/// The shortener only relies on [`create`](Self::create) and
/// [`get_and_touch`](Self::get_and_touch); both must be atomic at the storage
/// layer since the service keeps no in-process shared state.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL, unique key + `UPDATE ... RETURNING`
/// - [`crate::infrastructure::persistence::RedisLinkRepository`] - Redis hashes driven by Lua scripts
/// - [`crate::infrastructure::persistence::MemoryLinkRepository`] - in-process map
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Stores `code -> original_url` with zero hits if no record exists yet.
    ///
    /// Two concurrent calls with the same code never both succeed.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::DuplicateKey`] if the code is already taken.
    /// Returns [`StorageError::Backend`] on any other failure.
    async fn create(&self, code: &str, original_url: &str) -> Result<(), StorageError>;

    /// Looks a code up and increments its hit counter in the same atomic step.
    ///
    /// The returned link carries the counter value after the increment.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] if no record exists for `code`.
    /// Returns [`StorageError::Backend`] on any other failure.
    async fn get_and_touch(&self, code: &str) -> Result<ShortLink, StorageError>;

    /// Returns every stored link ordered by code.
    ///
    /// Meant for operator tooling; never called on the request path.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Backend`] on failure.
    async fn list(&self) -> Result<Vec<ShortLink>, StorageError>;

    /// Reports whether the backend is reachable.
    async fn health_check(&self) -> bool;

    /// Short backend name used in logs and health output.
    fn backend_name(&self) -> &'static str;
}
