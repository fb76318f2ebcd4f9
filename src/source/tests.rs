//! Tests for version source lookups

use super::api::*;
use super::manifest::{parse_cargo_toml, parse_package_json, read_package_version};
use crate::core::time::FixedClock;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

/// Runner answering from a fixed table keyed by the joined arguments
#[derive(Default)]
struct ScriptedRunner {
    answers: HashMap<String, String>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedRunner {
    fn with(mut self, args: &str, output: &str) -> Self {
        self.answers.insert(args.to_string(), output.to_string());
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, args: &[&str]) -> Option<String> {
        let key = args.join(" ");
        self.calls.lock().unwrap().push(key.clone());
        self.answers.get(&key).cloned()
    }
}

fn reader(runner: Arc<dyn CommandRunner>) -> VersionSourceReader {
    let clock = FixedClock::at("2025-01-01T00:00:00Z").unwrap();
    VersionSourceReader::new(runner, Vec::new()).with_clock(Arc::new(clock))
}

#[tokio::test]
async fn test_exact_tag_wins() {
    let runner = ScriptedRunner::default()
        .with("describe --tags --exact-match", "v1.2.3")
        .with("describe --tags", "v1.2.2-4-gabc1234")
        .with("rev-parse --short HEAD", "abc1234");

    let snapshot = reader(Arc::new(runner)).collect("production").await;

    assert_eq!(snapshot.version(), "v1.2.3");
    assert_eq!(snapshot.commit_short(), Some("abc1234"));
    assert_eq!(snapshot.mode(), "production");
    assert_eq!(snapshot.build_time(), "2025-01-01T00:00:00.000Z");
}

#[tokio::test]
async fn test_nearest_tag_when_not_on_tag() {
    let runner = ScriptedRunner::default()
        .with("describe --tags", "v1.2.2-4-gabc1234")
        .with("rev-parse --short HEAD", "abc1234");

    let snapshot = reader(Arc::new(runner)).collect("development").await;
    assert_eq!(snapshot.version(), "v1.2.2-4-gabc1234");
}

#[tokio::test]
async fn test_short_revision_when_no_tags() {
    let runner = ScriptedRunner::default().with("rev-parse --short HEAD", "abc1234");

    let snapshot = reader(Arc::new(runner)).collect("development").await;
    assert_eq!(snapshot.version(), "abc1234");
    assert_eq!(snapshot.commit_short(), Some("abc1234"));
}

#[tokio::test]
async fn test_timestamp_fallback_without_vcs() {
    let snapshot = reader(Arc::new(NoVcs)).collect("development").await;

    assert_eq!(snapshot.version(), "1735689600000");
    assert_eq!(snapshot.commit_short(), None);
    assert_eq!(snapshot.package_version(), None);
}

#[tokio::test]
async fn test_commit_short_is_looked_up_independently() {
    let runner = ScriptedRunner::default().with("describe --tags --exact-match", "v2.0.0");

    let snapshot = reader(Arc::new(runner)).collect("production").await;
    assert_eq!(snapshot.version(), "v2.0.0");
    assert_eq!(snapshot.commit_short(), None);
}

#[tokio::test]
async fn test_nearest_tag_not_queried_after_exact_match() {
    let runner = Arc::new(ScriptedRunner::default().with("describe --tags --exact-match", "v2.0.0"));

    reader(runner.clone()).collect("production").await;
    assert!(!runner.calls().contains(&"describe --tags".to_string()));
}

#[tokio::test]
async fn test_git_runner_failure_is_absent() {
    let dir = tempfile::tempdir().unwrap();
    let runner = GitRunner::new(dir.path());
    assert_eq!(runner.run(&["definitely-not-a-git-command"]).await, None);
}

#[cfg(unix)]
#[tokio::test]
async fn test_hung_command_times_out_as_absent() {
    use std::time::{Duration, Instant};

    let mut command = tokio::process::Command::new("sleep");
    command.arg("30");

    let started = Instant::now();
    let output =
        super::git::bounded_output(command, Duration::from_millis(50), "sleep 30").await;

    assert_eq!(output, None);
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_package_json_version_is_read() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("package.json"),
        r#"{"name": "app", "version": "0.1.0"}"#,
    )
    .unwrap();

    let clock = FixedClock::at("2025-01-01T00:00:00Z").unwrap();
    let snapshot = VersionSourceReader::new(Arc::new(NoVcs), default_candidates(dir.path()))
        .with_clock(Arc::new(clock))
        .collect("production")
        .await;
    assert_eq!(snapshot.package_version(), Some("0.1.0"));
}

#[tokio::test]
async fn test_cargo_manifest_used_when_no_package_json() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("Cargo.toml"),
        "[package]\nname = \"app\"\nversion = \"3.1.4\"\n",
    )
    .unwrap();

    let version = read_package_version(&default_candidates(dir.path())).await;
    assert_eq!(version.as_deref(), Some("3.1.4"));
}

#[tokio::test]
async fn test_malformed_manifest_is_absent() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("package.json"), "{ not json").unwrap();

    let version = read_package_version(&default_candidates(dir.path())).await;
    assert_eq!(version, None);
}

#[test]
fn test_manifest_parsers() {
    assert_eq!(parse_package_json(r#"{"version":"1.0.0"}"#).as_deref(), Some("1.0.0"));
    assert_eq!(parse_package_json(r#"{"version":""}"#), None);
    assert_eq!(parse_package_json(r#"{"version":7}"#), None);

    let workspace = "[package]\nversion.workspace = true\n\n[workspace.package]\nversion = \"0.9.0\"\n";
    assert_eq!(parse_cargo_toml(workspace).as_deref(), Some("0.9.0"));
    assert_eq!(parse_cargo_toml("[package]\nname = \"x\"\n"), None);
}

#[test]
fn test_manifest_kind_from_path() {
    use std::path::Path;
    assert_eq!(ManifestKind::from_path(Path::new("Cargo.toml")), ManifestKind::CargoToml);
    assert_eq!(ManifestKind::from_path(Path::new("package.json")), ManifestKind::PackageJson);
}

#[test]
fn test_snapshot_field_names() {
    let names: Vec<&str> = SnapshotField::names().collect();
    assert_eq!(
        names,
        vec!["version", "commitShort", "packageVersion", "buildTime", "mode"]
    );
    assert_eq!(SnapshotField::from_str("commitShort"), Ok(SnapshotField::CommitShort));
    assert!(SnapshotField::from_str("branch").is_err());
    assert_eq!(SnapshotField::BuildTime.to_string(), "buildTime");
}

#[test]
fn test_blank_version_falls_back_to_timestamp() {
    let clock = FixedClock::at("2025-01-01T00:00:00Z").unwrap();
    use crate::core::time::Clock;
    let snapshot = VersionSnapshot::new("  ", clock.now(), "production");
    assert_eq!(snapshot.version(), "1735689600000");
    assert_eq!(snapshot.get(SnapshotField::Mode), Some("production"));
    assert_eq!(snapshot.get(SnapshotField::PackageVersion), None);
}
