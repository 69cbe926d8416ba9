//! Storage-level failures shared by every [`LinkRepository`] backend.
//!
//! [`LinkRepository`]: crate::domain::repositories::LinkRepository

use thiserror::Error;

/// Boxed backend error preserved as the source of [`StorageError::Backend`].
pub type BackendError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors reported by storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A record already exists under this code. Returned only by `create`.
    #[error("short code already exists: {0}")]
    DuplicateKey(String),

    /// No record exists under this code. Returned only by `get_and_touch`.
    #[error("short code not found: {0}")]
    NotFound(String),

    /// Anything else: connectivity, protocol, or malformed data.
    #[error("storage backend failure: {0}")]
    Backend(#[source] BackendError),
}

impl StorageError {
    /// Wraps an arbitrary backend error.
    pub fn backend(err: impl Into<BackendError>) -> Self {
        Self::Backend(err.into())
    }
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        Self::backend(err)
    }
}

impl From<redis::RedisError> for StorageError {
    fn from(err: redis::RedisError) -> Self {
        Self::backend(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_backend_keeps_source() {
        let err = StorageError::backend("connection reset");

        assert_eq!(
            err.to_string(),
            "storage backend failure: connection reset"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn test_sqlx_error_maps_to_backend() {
        let err: StorageError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, StorageError::Backend(_)));
    }
}
