//! PostgreSQL implementation of the link repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::debug;

use crate::domain::entities::ShortLink;
use crate::domain::errors::StorageError;
use crate::domain::repositories::LinkRepository;
use crate::utils::db_error::is_unique_violation_on_code;

/// Row shape of the `urls` table.
#[derive(Debug, sqlx::FromRow)]
struct UrlRow {
    code: String,
    original_url: String,
    hits: i64,
}

impl From<UrlRow> for ShortLink {
    fn from(row: UrlRow) -> Self {
        ShortLink::new(row.code, row.original_url).with_hits(u64::try_from(row.hits).unwrap_or(0))
    }
}

/// PostgreSQL repository for short links.
///
/// Create-if-absent relies on the primary key on `urls.code`; get-and-touch
/// is a single `UPDATE ... RETURNING` so the read and the increment can't be
/// split by a concurrent writer.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Applies the embedded schema migrations.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Backend`] if a migration fails.
    pub async fn migrate(&self) -> Result<(), StorageError> {
        sqlx::migrate!("./migrations")
            .run(self.pool.as_ref())
            .await
            .map_err(StorageError::backend)
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn create(&self, code: &str, original_url: &str) -> Result<(), StorageError> {
        sqlx::query("INSERT INTO urls (code, original_url, hits) VALUES ($1, $2, 0)")
            .bind(code)
            .bind(original_url)
            .execute(self.pool.as_ref())
            .await
            .map_err(|e| {
                if is_unique_violation_on_code(&e) {
                    StorageError::DuplicateKey(code.to_string())
                } else {
                    StorageError::from(e)
                }
            })?;

        Ok(())
    }

    async fn get_and_touch(&self, code: &str) -> Result<ShortLink, StorageError> {
        let row = sqlx::query_as::<_, UrlRow>(
            r#"
            UPDATE urls
            SET hits = hits + 1
            WHERE code = $1
            RETURNING code, original_url, hits
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        let link: ShortLink = row
            .map(Into::into)
            .ok_or_else(|| StorageError::NotFound(code.to_string()))?;

        debug!(code = %link.code, hits = link.hits, "link resolved");
        Ok(link)
    }

    async fn list(&self) -> Result<Vec<ShortLink>, StorageError> {
        let rows = sqlx::query_as::<_, UrlRow>(
            "SELECT code, original_url, hits FROM urls ORDER BY code",
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn health_check(&self) -> bool {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(self.pool.as_ref())
            .await
            .is_ok()
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
