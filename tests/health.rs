mod common;

use axum::extract::State;
use storefront_cart::{routes::health::health_check, storage::MemoryStore};

#[tokio::test]
async fn health_check_returns_ok() {
    let state = common::state_with_store(MemoryStore::new(), "http://127.0.0.1:9");
    let response = health_check(State(state)).await;
    assert_eq!(response.0.message, "Health check");

    let data = response.0.data.expect("health data");
    assert_eq!(data.status, "ok");
    assert_eq!(data.catalog, "loading");
    assert_eq!(data.products, 0);
}

#[tokio::test]
async fn health_check_reports_loaded_catalog() {
    let state = common::state_with_catalog(
        MemoryStore::new(),
        "http://127.0.0.1:9",
        vec![common::product("p1", 100), common::product("p2", 50)],
    );
    let data = health_check(State(state)).await.0.data.expect("health data");
    assert_eq!(data.catalog, "ready");
    assert_eq!(data.products, 2);
}
