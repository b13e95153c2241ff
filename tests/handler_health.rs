mod common;

use axum::{Router, routing::get};
use axum_test::TestServer;
use puny_url::api::handlers::health_handler;
use puny_url::state::AppState;

fn test_server(state: AppState) -> TestServer {
    let app = Router::new()
        .route("/health", get(health_handler))
        .with_state(state);

    TestServer::new(app).unwrap()
}

#[tokio::test]
async fn test_health_endpoint_success() {
    let pool = common::test_pool().await;
    common::create_test_link(&pool, "abc123", "https://example.com/").await;
    let state = common::create_test_state(pool);
    state.cache.put("abc123", "https://example.com/");
    let server = test_server(state);

    let response = server.get("/health").await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["database"]["status"], "ok");
    assert_eq!(
        json["checks"]["database"]["message"],
        "Connected, 1 links stored"
    );
    assert_eq!(json["checks"]["cache"]["message"], "1 entries, TTL 30s");
}

#[tokio::test]
async fn test_health_endpoint_structure() {
    let state = common::create_test_state(common::test_pool().await);
    let server = test_server(state);

    let response = server.get("/health").await;

    let json = response.json::<serde_json::Value>();

    assert!(json.get("status").is_some());
    assert!(json.get("version").is_some());
    assert!(json["checks"].get("database").is_some());
    assert!(json["checks"].get("cache").is_some());
}

#[tokio::test]
async fn test_health_degraded_when_database_closed() {
    let pool = common::test_pool().await;
    let state = common::create_test_state(pool.clone());
    let server = test_server(state);
    pool.close().await;

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), 503);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["database"]["status"], "error");
    assert_eq!(json["checks"]["cache"]["status"], "ok");
}
