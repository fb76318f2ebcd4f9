//! One-shot build passes against a temporary project

use crate::common::{config_in, plugin_with, START};
use clap::Parser;
use tempfile::TempDir;
use verstamp::app::cli::api::Args;
use verstamp::app::startup::run;
use verstamp::core::time::FixedClock;
use verstamp::plugin::api::{PluginConfig, WriteOutcome, WriteStatus};

fn project() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("package.json"),
        r#"{"name": "shop", "version": "0.1.0"}"#,
    )
    .unwrap();
    dir
}

fn full_config(dir: &TempDir) -> PluginConfig {
    let mut config = PluginConfig::from_toml_str(
        r#"
        fields = ["version", "commitShort", "packageVersion", "mode", "buildTime"]

        [extra]
        channel = "beta"
        build = 42
        "#,
    )
    .unwrap();
    config.root = dir.path().to_path_buf();
    config
}

#[tokio::test]
async fn test_build_writes_every_selected_field_in_order() {
    let dir = project();
    let clock = FixedClock::at(START).unwrap();
    let mut plugin = plugin_with(&clock);

    plugin.config_resolved(&full_config(&dir), "production").unwrap();
    plugin.build_start().await.unwrap();
    plugin.generate_bundle().await.unwrap();

    let artifact = std::fs::read_to_string(dir.path().join("dist/version.json")).unwrap();
    assert_eq!(
        artifact,
        concat!(
            "{\n",
            "  \"version\": \"v1.2.3\",\n",
            "  \"commitShort\": \"abc1234\",\n",
            "  \"packageVersion\": \"0.1.0\",\n",
            "  \"mode\": \"production\",\n",
            "  \"buildTime\": \"2025-01-01T00:00:00.000Z\",\n",
            "  \"channel\": \"beta\",\n",
            "  \"build\": 42\n",
            "}\n"
        )
    );

    let declaration = std::fs::read_to_string(dir.path().join("src/app-version.d.ts")).unwrap();
    assert!(declaration.contains("commitShort?: string;"));
    assert!(declaration.contains("packageVersion?: string;"));
    assert!(declaration.contains("channel: string;"));
    assert!(declaration.contains("build: number;"));
}

#[tokio::test]
async fn test_watch_rebuild_with_same_state_is_idempotent() {
    let dir = project();
    let clock = FixedClock::at(START).unwrap();
    let mut plugin = plugin_with(&clock);
    plugin.config_resolved(&config_in(dir.path()), "production").unwrap();

    plugin.build_start().await.unwrap();
    let first = plugin.generate_bundle().await.unwrap();
    plugin.build_start().await.unwrap();
    let second = plugin.generate_bundle().await.unwrap();

    assert!(matches!(
        first.artifact,
        WriteOutcome::Done {
            status: WriteStatus::Written,
            ..
        }
    ));
    assert!(matches!(
        second.artifact,
        WriteOutcome::Done {
            status: WriteStatus::Unchanged,
            ..
        }
    ));
    assert!(matches!(
        second.declaration,
        Some(WriteOutcome::Done {
            status: WriteStatus::Unchanged,
            ..
        })
    ));
}

#[tokio::test]
async fn test_rebuild_after_time_moves_rewrites() {
    let dir = project();
    let clock = FixedClock::at(START).unwrap();
    let mut plugin = plugin_with(&clock);
    plugin.config_resolved(&config_in(dir.path()), "production").unwrap();

    plugin.build_start().await.unwrap();
    plugin.generate_bundle().await.unwrap();
    clock.advance(chrono::Duration::seconds(90));
    plugin.build_start().await.unwrap();
    let second = plugin.generate_bundle().await.unwrap();

    assert!(matches!(
        second.artifact,
        WriteOutcome::Done {
            status: WriteStatus::Written,
            ..
        }
    ));
    let artifact = std::fs::read_to_string(dir.path().join("dist/version.json")).unwrap();
    assert!(artifact.contains("2025-01-01T00:01:30.000Z"));
}

#[tokio::test]
async fn test_build_command_outside_a_repository() {
    let dir = project();
    std::fs::write(
        dir.path().join("verstamp.toml"),
        "fields = [\"version\", \"packageVersion\"]\ndts = false\n",
    )
    .unwrap();

    let root = dir.path().to_string_lossy().to_string();
    let args = Args::try_parse_from(["verstamp", "--root", &root, "build"]).unwrap();
    run(args).await.unwrap();

    let artifact = std::fs::read_to_string(dir.path().join("dist/version.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&artifact).unwrap();
    assert_eq!(value["packageVersion"], "0.1.0");
    assert!(!value["version"].as_str().unwrap().is_empty());
    assert!(!dir.path().join("src/app-version.d.ts").exists());
}

#[tokio::test]
async fn test_build_command_rejects_unknown_field() {
    let dir = project();
    std::fs::write(dir.path().join("verstamp.toml"), "fields = [\"branch\"]\n").unwrap();

    let root = dir.path().to_string_lossy().to_string();
    let args = Args::try_parse_from(["verstamp", "--root", &root, "build"]).unwrap();
    let err = run(args).await.unwrap_err();

    assert!(err.to_string().contains("branch"));
    assert!(!dir.path().join("dist").exists());
}
