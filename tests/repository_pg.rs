//! PostgreSQL adapter tests. Need a live server via `DATABASE_URL`:
//!
//! ```bash
//! cargo test --test repository_pg -- --ignored
//! ```

use sqlx::PgPool;
use std::sync::Arc;
use shortlink::domain::errors::StorageError;
use shortlink::domain::repositories::LinkRepository;
use shortlink::infrastructure::persistence::PgLinkRepository;

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_create_and_get_and_touch(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    repo.create("abc123", "https://example.com").await.unwrap();

    let link = repo.get_and_touch("abc123").await.unwrap();
    assert_eq!(link.code, "abc123");
    assert_eq!(link.original_url, "https://example.com");
    assert_eq!(link.hits, 1);

    let link = repo.get_and_touch("abc123").await.unwrap();
    assert_eq!(link.hits, 2);
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_create_duplicate_code(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool.clone()));

    repo.create("dup001", "https://first.example").await.unwrap();
    let result = repo.create("dup001", "https://second.example").await;

    assert!(matches!(result, Err(StorageError::DuplicateKey(code)) if code == "dup001"));

    let url: String = sqlx::query_scalar("SELECT original_url FROM urls WHERE code = $1")
        .bind("dup001")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(url, "https://first.example");
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_get_and_touch_not_found(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    let result = repo.get_and_touch("nothere").await;

    assert!(matches!(result, Err(StorageError::NotFound(_))));
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_new_link_starts_with_zero_hits(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool.clone()));

    repo.create("zero01", "https://example.com").await.unwrap();

    let hits: i64 = sqlx::query_scalar("SELECT hits FROM urls WHERE code = $1")
        .bind("zero01")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(hits, 0);
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_list_ordered_by_code(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    repo.create("bbbbbb", "https://b.example").await.unwrap();
    repo.create("aaaaaa", "https://a.example").await.unwrap();
    repo.get_and_touch("bbbbbb").await.unwrap();

    let links = repo.list().await.unwrap();

    assert_eq!(links.len(), 2);
    assert_eq!(links[0].code, "aaaaaa");
    assert_eq!(links[1].code, "bbbbbb");
    assert_eq!(links[1].hits, 1);
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_health_check(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    assert!(repo.health_check().await);
    assert_eq!(repo.backend_name(), "postgres");
}
