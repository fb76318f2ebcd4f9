//! Shared helpers for integration tests

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use verstamp::core::time::FixedClock;
use verstamp::delivery::api::{serve, DevServerState};
use verstamp::plugin::api::{PluginConfig, VersionPlugin};
use verstamp::source::api::CommandRunner;

pub const START: &str = "2025-01-01T00:00:00Z";

/// Runner for a checkout sitting exactly on `v1.2.3`
pub struct TaggedRunner;

#[async_trait::async_trait]
impl CommandRunner for TaggedRunner {
    async fn run(&self, args: &[&str]) -> Option<String> {
        match args {
            ["describe", "--tags", "--exact-match"] => Some("v1.2.3".to_string()),
            ["describe", "--tags"] => Some("v1.2.3".to_string()),
            ["rev-parse", "--short", "HEAD"] => Some("abc1234".to_string()),
            _ => None,
        }
    }
}

pub fn config_in(root: &Path) -> PluginConfig {
    PluginConfig {
        root: root.to_path_buf(),
        ..PluginConfig::default()
    }
}

pub fn plugin_with(clock: &FixedClock) -> VersionPlugin {
    VersionPlugin::new()
        .with_runner(Arc::new(TaggedRunner))
        .with_clock(Arc::new(clock.clone()))
}

/// HTTP client that never routes loopback traffic through a proxy
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .timeout(std::time::Duration::from_secs(5))
        .build()
        .unwrap()
}

/// Bind an ephemeral port and serve in the background
pub async fn spawn_server(state: DevServerState) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = serve(listener, state).await;
    });
    addr
}
