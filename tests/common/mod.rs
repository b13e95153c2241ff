#![allow(dead_code)]

use puny_url::infrastructure::cache::{Clock, LinkCache};
use puny_url::infrastructure::persistence;
use puny_url::state::AppState;
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

pub const BASE_URL: &str = "http://s.test/";
pub const TTL: Duration = Duration::from_secs(30);

/// Fresh in-memory database with migrations applied.
///
/// A single connection keeps every query on the same in-memory database.
pub async fn test_pool() -> SqlitePool {
    persistence::connect("sqlite::memory:", 1).await.unwrap()
}

/// Database file inside `dir`, shared by up to `max_connections` connections.
pub async fn file_pool(dir: &TempDir, max_connections: u32) -> SqlitePool {
    let url = format!("sqlite://{}", dir.path().join("links.db").display());
    persistence::connect(&url, max_connections).await.unwrap()
}

pub fn create_test_state(pool: SqlitePool) -> AppState {
    AppState::new(Arc::new(pool), Arc::new(LinkCache::new(TTL)), BASE_URL)
}

pub fn create_test_state_with_clock(pool: SqlitePool, clock: Arc<dyn Clock>) -> AppState {
    AppState::new(
        Arc::new(pool),
        Arc::new(LinkCache::with_clock(TTL, clock)),
        BASE_URL,
    )
}

pub async fn create_test_link(pool: &SqlitePool, code: &str, url: &str) {
    sqlx::query("INSERT INTO links (code, long_url) VALUES (?1, ?2)")
        .bind(code)
        .bind(url)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn count_links(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM links")
        .fetch_one(pool)
        .await
        .unwrap()
}
