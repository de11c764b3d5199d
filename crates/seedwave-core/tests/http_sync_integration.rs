//! End-to-end sync against a mock portal API.
//!
//! Runs on the real clock: the HTTP client's own timeouts must not be
//! advanced by a paused test clock.

use seedwave_core::sync::resources::Endpoint;
use seedwave_core::{Config, HttpTransport, MemoryCache, SyncController, SyncSettings};
use std::sync::Arc;
use std::time::Duration;

fn endpoints() -> Vec<Endpoint> {
    vec![
        Endpoint::new("sectors", "/api/sectors"),
        Endpoint::new("brands", "/api/brands"),
    ]
}

#[tokio::test]
async fn test_force_sync_populates_cache() {
    let mut server = mockito::Server::new_async().await;
    let sectors = server
        .mock("GET", "/api/sectors")
        .with_status(200)
        .with_body(r#"[{"id":1,"name":"Agriculture"}]"#)
        .create_async()
        .await;
    let brands = server
        .mock("GET", "/api/brands")
        .with_status(200)
        .with_body(r#"[{"id":7,"name":"Seedwave","sectorId":1}]"#)
        .create_async()
        .await;

    let transport =
        HttpTransport::new(&server.url(), &endpoints(), Duration::from_secs(5)).unwrap();
    let cache = Arc::new(MemoryCache::new(transport, ["sectors", "brands"]));
    let settings = SyncSettings::new(["sectors", "brands"], Duration::from_secs(60));
    let handle = SyncController::activate(cache.clone(), settings).unwrap();

    let outcome = handle.force_sync().await;
    handle.deactivate();

    assert!(outcome.is_success());
    assert!(handle.is_online());
    assert_eq!(cache.get("brands").unwrap().value[0]["name"], "Seedwave");
    assert!(!cache.is_stale("sectors"));
    sectors.assert_async().await;
    brands.assert_async().await;
}

#[tokio::test]
async fn test_server_error_marks_offline_and_keeps_other_keys() {
    let mut server = mockito::Server::new_async().await;
    let _sectors = server
        .mock("GET", "/api/sectors")
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;
    let _brands = server
        .mock("GET", "/api/brands")
        .with_status(500)
        .create_async()
        .await;

    let transport =
        HttpTransport::new(&server.url(), &endpoints(), Duration::from_secs(5)).unwrap();
    let cache = Arc::new(MemoryCache::new(transport, ["sectors", "brands"]));
    let settings = SyncSettings::new(["sectors", "brands"], Duration::from_secs(60));
    let handle = SyncController::activate(cache.clone(), settings).unwrap();

    let outcome = handle.force_sync().await;
    handle.deactivate();

    assert_eq!(outcome.failed_keys, vec!["brands"]);
    let status = handle.status();
    assert!(!status.connected);
    assert_eq!(
        status.errors.latest(),
        Some("Force sync error: brands: server responded with HTTP 500")
    );
    assert!(cache.get("sectors").is_some());
    assert!(cache.get("brands").is_none());
}

#[tokio::test]
async fn test_periodic_loop_hits_every_endpoint() {
    let mut server = mockito::Server::new_async().await;
    let sectors = server
        .mock("GET", "/api/sectors")
        .with_status(200)
        .with_body("[]")
        .expect_at_least(1)
        .create_async()
        .await;
    let brands = server
        .mock("GET", "/api/brands")
        .with_status(200)
        .with_body("[]")
        .expect_at_least(1)
        .create_async()
        .await;

    let mut config = Config::default();
    config.set("api.base_url", &server.url()).unwrap();
    config
        .set("resources", &serde_json::to_string(&endpoints()).unwrap())
        .unwrap();
    config.set("sync.interval_ms", "50").unwrap();

    let cache = Arc::new(MemoryCache::new(
        config.http_transport().unwrap(),
        ["sectors", "brands"],
    ));
    let handle = SyncController::activate(cache, config.sync_settings()).unwrap();
    let mut rx = handle.subscribe();

    tokio::time::timeout(Duration::from_secs(5), rx.changed())
        .await
        .expect("no periodic batch within timeout")
        .unwrap();
    handle.deactivate();

    assert!(handle.status().sync_count >= 1);
    assert!(handle.is_online());
    sectors.assert_async().await;
    brands.assert_async().await;
}
