//! The native update client against a live endpoint

use crate::common::{config_in, http_client, plugin_with, spawn_server, START};
use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use verstamp::client::api::{HttpFetcher, UpdateChecker};
use verstamp::core::time::FixedClock;

#[tokio::test]
async fn test_checker_sees_new_deployment() {
    let dir = TempDir::new().unwrap();
    let clock = FixedClock::at(START).unwrap();
    let mut plugin = plugin_with(&clock);
    plugin.config_resolved(&config_in(dir.path()), "development").unwrap();
    let state = plugin.configure_server().await.unwrap();
    let addr = spawn_server(state).await;

    let url = format!("http://{}/version.json", addr);
    let baseline = serde_json::json!({
        "version": "v1.2.3",
        "buildTime": "2025-01-01T00:00:00.000Z",
    });
    let fetcher = Arc::new(HttpFetcher::with_client(http_client()));
    let checker = Arc::new(UpdateChecker::new(baseline, url, fetcher));

    let current = checker.check().await;
    assert!(!current.updated);
    assert!(current.latest.is_some());

    clock.advance(chrono::Duration::hours(1));
    let mut updates = Box::pin(checker.clone().watch(Duration::from_millis(20)));
    let next = updates.next().await.unwrap();
    assert!(next.updated);
    assert_eq!(
        next.latest.unwrap()["buildTime"],
        "2025-01-01T01:00:00.000Z"
    );
}

#[tokio::test]
async fn test_unreachable_endpoint_is_not_an_update() {
    // bind and drop to get a port nobody listens on
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let fetcher = Arc::new(HttpFetcher::with_client(http_client()));
    let checker = UpdateChecker::new(
        serde_json::json!({"version": "v1"}),
        format!("http://{}/version.json", addr),
        fetcher,
    );

    let result = checker.check().await;
    assert!(!result.updated);
    assert!(result.latest.is_none());
}
