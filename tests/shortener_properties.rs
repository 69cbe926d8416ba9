//! Behavioural properties of the shortener over the in-memory backend.

mod common;

use shortlink::application::services::{Shortener, ShortenerError};
use shortlink::domain::repositories::LinkRepository;
use shortlink::infrastructure::persistence::MemoryLinkRepository;
use std::collections::HashSet;
use std::sync::Arc;

fn shortener(repo: Arc<MemoryLinkRepository>) -> Shortener {
    Shortener::new(repo, common::BASE_URL, 6, 5)
}

#[tokio::test]
async fn test_every_create_yields_fresh_code() {
    let repo = Arc::new(MemoryLinkRepository::new());
    let shortener = shortener(repo.clone());

    let mut codes = HashSet::new();
    for i in 0..200 {
        let created = shortener
            .create_short_url(&format!("https://example.com/{i}"))
            .await
            .unwrap();
        assert!(common::is_alphanumeric_code(&created.code, 6));
        assert!(codes.insert(created.code));
    }

    assert_eq!(repo.len(), 200);
}

#[tokio::test]
async fn test_round_trip() {
    let repo = Arc::new(MemoryLinkRepository::new());
    let shortener = shortener(repo);

    let url = "https://example.com/a/b?c=d#e";
    let created = shortener.create_short_url(url).await.unwrap();

    assert_eq!(shortener.resolve_code(&created.code).await.unwrap(), url);
}

#[tokio::test]
async fn test_short_url_format() {
    let repo = Arc::new(MemoryLinkRepository::new());
    let shortener = shortener(repo);

    let created = shortener
        .create_short_url("https://example.com")
        .await
        .unwrap();

    let code = created
        .short_url
        .strip_prefix("http://s.test/")
        .unwrap();
    assert_eq!(code, created.code);
    assert!(common::is_alphanumeric_code(code, 6));
}

#[tokio::test]
async fn test_hits_count_successful_resolves_only() {
    let repo = Arc::new(MemoryLinkRepository::new());
    let shortener = shortener(repo.clone());

    let created = shortener
        .create_short_url("https://example.com")
        .await
        .unwrap();
    assert_eq!(repo.peek(&created.code).unwrap().hits, 0);

    for expected in 1..=3 {
        shortener.resolve_code(&created.code).await.unwrap();
        assert_eq!(repo.peek(&created.code).unwrap().hits, expected);
    }

    assert!(matches!(
        shortener.resolve_code("zzzzzz").await,
        Err(ShortenerError::NotFound(_))
    ));
    assert_eq!(repo.peek(&created.code).unwrap().hits, 3);
}

#[tokio::test]
async fn test_invalid_url_leaves_storage_untouched() {
    let repo = Arc::new(MemoryLinkRepository::new());
    let shortener = shortener(repo.clone());

    let result = shortener.create_short_url("javascript:alert(1)").await;

    assert!(matches!(result, Err(ShortenerError::InvalidUrl(_))));
    assert!(repo.is_empty());
}

#[tokio::test]
async fn test_empty_code_is_not_found() {
    let repo = Arc::new(MemoryLinkRepository::new());
    let shortener = shortener(repo);

    assert!(matches!(
        shortener.resolve_code("").await,
        Err(ShortenerError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_existing_mapping_is_never_overwritten() {
    let repo = Arc::new(MemoryLinkRepository::new());
    repo.create("AAAAAA", "https://first.example").await.unwrap();

    let shortener = Shortener::new(repo.clone(), common::BASE_URL, 6, 2)
        .with_generator(Arc::new(common::SequenceGenerator::new(&["AAAAAA"])));

    let result = shortener.create_short_url("https://second.example").await;

    assert!(matches!(
        result,
        Err(ShortenerError::ExhaustedRetries { attempts: 2 })
    ));
    assert_eq!(
        shortener.resolve_code("AAAAAA").await.unwrap(),
        "https://first.example"
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_get_distinct_codes() {
    let repo = Arc::new(MemoryLinkRepository::new());
    let shortener = Arc::new(shortener(repo.clone()));

    let handles: Vec<_> = (0..64)
        .map(|i| {
            let shortener = shortener.clone();
            tokio::spawn(async move {
                shortener
                    .create_short_url(&format!("https://example.com/{i}"))
                    .await
            })
        })
        .collect();

    let mut codes = HashSet::new();
    for handle in handles {
        let created = handle.await.unwrap().unwrap();
        assert!(codes.insert(created.code));
    }

    assert_eq!(repo.len(), 64);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_resolves_count_every_hit() {
    let repo = Arc::new(MemoryLinkRepository::new());
    let shortener = Arc::new(shortener(repo.clone()));
    let code = shortener
        .create_short_url("https://example.com")
        .await
        .unwrap()
        .code;

    let handles: Vec<_> = (0..50)
        .map(|_| {
            let shortener = shortener.clone();
            let code = code.clone();
            tokio::spawn(async move { shortener.resolve_code(&code).await })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(repo.peek(&code).unwrap().hits, 50);
}
