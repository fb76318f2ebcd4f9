//! The HTTP endpoint and virtual module over a real socket

use crate::common::{config_in, http_client, plugin_with, spawn_server, START};
use reqwest::StatusCode;
use tempfile::TempDir;
use verstamp::core::time::FixedClock;
use verstamp::plugin::api::PluginConfig;

async fn served(config: PluginConfig, clock: &FixedClock) -> std::net::SocketAddr {
    let mut plugin = plugin_with(clock);
    plugin.config_resolved(&config, "development").unwrap();
    let state = plugin.configure_server().await.unwrap();
    spawn_server(state).await
}

#[tokio::test]
async fn test_endpoint_revalidates_with_etag() {
    let dir = TempDir::new().unwrap();
    let clock = FixedClock::at(START).unwrap();
    let addr = served(config_in(dir.path()), &clock).await;
    let url = format!("http://{}/version.json", addr);
    let client = http_client();

    let first = client.get(&url).send().await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(first.headers()["cache-control"], "no-cache");
    assert!(first.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("application/json"));
    let etag = first.headers()["etag"].to_str().unwrap().to_string();
    assert!(etag.starts_with("W/\""));
    assert_eq!(
        first.text().await.unwrap(),
        "{\n  \"version\": \"v1.2.3\",\n  \"buildTime\": \"2025-01-01T00:00:00.000Z\"\n}\n"
    );

    let second = client
        .get(&url)
        .header("If-None-Match", &etag)
        .send()
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::NOT_MODIFIED);
    assert_eq!(second.headers()["etag"], etag.as_str());

    clock.advance(chrono::Duration::minutes(1));
    let third = client
        .get(&url)
        .header("If-None-Match", &etag)
        .send()
        .await
        .unwrap();
    assert_eq!(third.status(), StatusCode::OK);
    assert_ne!(third.headers()["etag"], etag.as_str());
}

#[tokio::test]
async fn test_endpoint_under_base_path() {
    let dir = TempDir::new().unwrap();
    let clock = FixedClock::at(START).unwrap();
    let config = PluginConfig {
        base: "/app/".to_string(),
        ..config_in(dir.path())
    };
    let addr = served(config, &clock).await;

    let hit = http_client()
        .get(format!("http://{}/app/version.json", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(hit.status(), StatusCode::OK);

    let miss = http_client()
        .get(format!("http://{}/version.json", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(miss.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_virtual_module_is_served() {
    let dir = TempDir::new().unwrap();
    let clock = FixedClock::at(START).unwrap();
    let addr = served(config_in(dir.path()), &clock).await;

    let response = http_client()
        .get(format!("http://{}/@id/virtual:app-version", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/javascript"));

    let source = response.text().await.unwrap();
    assert!(source.contains("\"version\": \"v1.2.3\""));
    assert!(source.contains("export async function checkForUpdate"));
    assert!(source.contains("export function onVersionUpdate"));
}

#[tokio::test]
async fn test_writes_are_rejected() {
    let dir = TempDir::new().unwrap();
    let clock = FixedClock::at(START).unwrap();
    let addr = served(config_in(dir.path()), &clock).await;

    let response = http_client()
        .post(format!("http://{}/version.json", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
