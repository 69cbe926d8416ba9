//! Storage backend selection and startup connection.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{info, warn};

use super::{MemoryLinkRepository, PgLinkRepository, RedisLinkRepository};
use crate::domain::errors::StorageError;
use crate::domain::repositories::LinkRepository;

/// Connection attempts made before giving up at startup.
const CONNECT_ATTEMPTS: usize = 5;

/// Backend kinds a storage connection string can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Redis,
    Memory,
}

impl StorageBackend {
    /// Picks the backend from the connection string scheme.
    ///
    /// `postgres://` and `postgresql://` select PostgreSQL, `redis://` and
    /// `rediss://` select Redis, `memory://` selects the in-process map.
    pub fn from_url(url: &str) -> Option<Self> {
        let (scheme, _) = url.split_once("://")?;

        match scheme.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Some(Self::Postgres),
            "redis" | "rediss" => Some(Self::Redis),
            "memory" => Some(Self::Memory),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::Redis => "redis",
            Self::Memory => "memory",
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// PostgreSQL pool tuning. Ignored by the other backends.
#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 10,
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            max_lifetime: Duration::from_secs(1800),
        }
    }
}

/// Delays between startup connection attempts: 100ms doubling, capped at 2s,
/// jittered, one fewer than [`CONNECT_ATTEMPTS`].
fn connect_backoff() -> impl Iterator<Item = Duration> {
    ExponentialBackoff::from_millis(2)
        .factor(50)
        .max_delay(Duration::from_secs(2))
        .map(jitter)
        .take(CONNECT_ATTEMPTS - 1)
}

/// Connects to the backend selected by `url`.
///
/// Transient connection failures are retried with jittered exponential
/// backoff (100ms doubling, capped at 2s) for up to five attempts. For
/// PostgreSQL, pending migrations are applied when `run_migrations` is set.
///
/// # Errors
///
/// Returns [`StorageError::Backend`] if the scheme is unknown, every
/// connection attempt fails, or a migration fails.
pub async fn connect_storage(
    url: &str,
    pool: &PoolSettings,
    run_migrations: bool,
) -> Result<Arc<dyn LinkRepository>, StorageError> {
    let backend = StorageBackend::from_url(url).ok_or_else(|| {
        StorageError::backend(format!(
            "unsupported storage scheme in {:?}",
            url.split("://").next().unwrap_or_default()
        ))
    })?;

    match backend {
        StorageBackend::Memory => {
            info!("Using in-memory storage; links are lost on restart");
            Ok(Arc::new(MemoryLinkRepository::new()))
        }
        StorageBackend::Redis => {
            let repo = Retry::start(connect_backoff(), || async {
                RedisLinkRepository::connect(url).await.inspect_err(|e| {
                    warn!(error = %e, "Redis connection attempt failed");
                })
            })
            .await?;

            Ok(Arc::new(repo))
        }
        StorageBackend::Postgres => {
            let pg_pool = Retry::start(connect_backoff(), || async {
                PgPoolOptions::new()
                    .max_connections(pool.max_connections)
                    .acquire_timeout(pool.acquire_timeout)
                    .idle_timeout(Some(pool.idle_timeout))
                    .max_lifetime(Some(pool.max_lifetime))
                    .connect(url)
                    .await
                    .inspect_err(|e| {
                        warn!(error = %e, "PostgreSQL connection attempt failed");
                    })
            })
            .await?;
            info!("Connected to PostgreSQL");

            let repo = PgLinkRepository::new(Arc::new(pg_pool));
            if run_migrations {
                repo.migrate().await?;
                info!("Migrations applied");
            }

            Ok(Arc::new(repo))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_from_url() {
        assert_eq!(
            StorageBackend::from_url("postgres://u:p@localhost/db"),
            Some(StorageBackend::Postgres)
        );
        assert_eq!(
            StorageBackend::from_url("postgresql://localhost/db"),
            Some(StorageBackend::Postgres)
        );
        assert_eq!(
            StorageBackend::from_url("redis://localhost:6379/0"),
            Some(StorageBackend::Redis)
        );
        assert_eq!(
            StorageBackend::from_url("rediss://secure:6380"),
            Some(StorageBackend::Redis)
        );
        assert_eq!(
            StorageBackend::from_url("memory://"),
            Some(StorageBackend::Memory)
        );
        assert_eq!(
            StorageBackend::from_url("REDIS://localhost"),
            Some(StorageBackend::Redis)
        );
    }

    #[test]
    fn test_backend_from_url_rejects_unknown() {
        assert_eq!(StorageBackend::from_url("mysql://localhost/db"), None);
        assert_eq!(StorageBackend::from_url("localhost:5432"), None);
        assert_eq!(StorageBackend::from_url(""), None);
    }

    #[test]
    fn test_connect_backoff_is_bounded() {
        let delays: Vec<Duration> = connect_backoff().collect();

        assert_eq!(delays.len(), CONNECT_ATTEMPTS - 1);
        assert!(delays.iter().all(|d| *d <= Duration::from_secs(2)));
    }

    #[tokio::test]
    async fn test_connect_memory_storage() {
        let repo = connect_storage("memory://", &PoolSettings::default(), true)
            .await
            .unwrap();

        assert_eq!(repo.backend_name(), "memory");
        assert!(repo.health_check().await);
    }

    #[tokio::test]
    async fn test_connect_unknown_scheme_fails() {
        let result = connect_storage("mysql://localhost/db", &PoolSettings::default(), false).await;
        assert!(matches!(result, Err(StorageError::Backend(_))));
    }
}
