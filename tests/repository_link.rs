mod common;

use std::sync::Arc;
use puny_url::domain::entities::NewLink;
use puny_url::domain::repositories::LinkRepository;
use puny_url::error::AppError;
use puny_url::infrastructure::persistence::SqliteLinkRepository;

fn new_link(code: &str, url: &str) -> NewLink {
    NewLink {
        code: code.to_string(),
        long_url: url.to_string(),
    }
}

#[tokio::test]
async fn test_create_link() {
    let repo = SqliteLinkRepository::new(Arc::new(common::test_pool().await));

    let link = repo
        .create(new_link("test123", "https://example.com/"))
        .await
        .unwrap();

    assert_eq!(link.code, "test123");
    assert_eq!(link.long_url, "https://example.com/");
}

#[tokio::test]
async fn test_find_by_code() {
    let pool = common::test_pool().await;
    common::create_test_link(&pool, "abc123", "https://example.com/").await;
    let repo = SqliteLinkRepository::new(Arc::new(pool));

    let link = repo.find_by_code("abc123").await.unwrap();

    assert!(link.is_some());
    assert_eq!(link.unwrap().long_url, "https://example.com/");
}

#[tokio::test]
async fn test_find_by_code_not_found() {
    let repo = SqliteLinkRepository::new(Arc::new(common::test_pool().await));

    let link = repo.find_by_code("notfound").await.unwrap();

    assert!(link.is_none());
}

#[tokio::test]
async fn test_find_by_long_url() {
    let pool = common::test_pool().await;
    common::create_test_link(&pool, "abc123", "https://example.com/").await;
    let repo = SqliteLinkRepository::new(Arc::new(pool));

    let link = repo.find_by_long_url("https://example.com/").await.unwrap();
    assert_eq!(link.unwrap().code, "abc123");

    let missing = repo.find_by_long_url("https://other.com/").await.unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_duplicate_code_is_conflict() {
    let repo = SqliteLinkRepository::new(Arc::new(common::test_pool().await));
    repo.create(new_link("dup", "https://first.com/"))
        .await
        .unwrap();

    let result = repo.create(new_link("dup", "https://second.com/")).await;

    assert!(matches!(result, Err(AppError::Conflict { .. })));
}

#[tokio::test]
async fn test_duplicate_long_url_is_conflict() {
    let repo = SqliteLinkRepository::new(Arc::new(common::test_pool().await));
    repo.create(new_link("first", "https://example.com/"))
        .await
        .unwrap();

    let result = repo.create(new_link("second", "https://example.com/")).await;

    assert!(matches!(result, Err(AppError::Conflict { .. })));
    assert_eq!(repo.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_count() {
    let pool = common::test_pool().await;
    let repo = SqliteLinkRepository::new(Arc::new(pool.clone()));
    assert_eq!(repo.count().await.unwrap(), 0);

    common::create_test_link(&pool, "a", "https://a.com/").await;
    common::create_test_link(&pool, "b", "https://b.com/").await;

    assert_eq!(repo.count().await.unwrap(), 2);
}

#[tokio::test]
async fn test_closed_pool_is_internal_error() {
    let pool = common::test_pool().await;
    let repo = SqliteLinkRepository::new(Arc::new(pool.clone()));
    pool.close().await;

    let result = repo.find_by_code("abc123").await;

    assert!(matches!(result, Err(AppError::Internal { .. })));
}
