//! Collects a [`VersionSnapshot`] from git, the manifest and the clock

use super::git::CommandRunner;
use super::manifest::read_package_version;
use super::snapshot::VersionSnapshot;
use crate::core::time::{Clock, SystemClock};
use std::path::PathBuf;
use std::sync::Arc;

const EXACT_TAG: &[&str] = &["describe", "--tags", "--exact-match"];
const NEAREST_TAG: &[&str] = &["describe", "--tags"];
const SHORT_REVISION: &[&str] = &["rev-parse", "--short", "HEAD"];

/// Reads version sources. Never fails; missing data degrades per field.
#[derive(Clone)]
pub struct VersionSourceReader {
    runner: Arc<dyn CommandRunner>,
    manifests: Vec<PathBuf>,
    clock: Arc<dyn Clock>,
}

impl VersionSourceReader {
    pub fn new(runner: Arc<dyn CommandRunner>, manifests: Vec<PathBuf>) -> Self {
        Self {
            runner,
            manifests,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Resolve every field for `mode`.
    ///
    /// `version` is the first of: exact tag, nearest tag description, short
    /// revision, current time in epoch milliseconds.
    pub async fn collect(&self, mode: &str) -> VersionSnapshot {
        let commit_short = self.runner.run(SHORT_REVISION).await;

        let version = match self.runner.run(EXACT_TAG).await {
            Some(tag) => Some(tag),
            None => self.runner.run(NEAREST_TAG).await,
        }
        .or_else(|| commit_short.clone());

        if version.is_none() {
            log::debug!("no git version available, falling back to timestamp");
        }

        let package_version = read_package_version(&self.manifests).await;

        VersionSnapshot::new(version.unwrap_or_default(), self.clock.now(), mode)
            .with_commit_short(commit_short)
            .with_package_version(package_version)
    }
}

impl std::fmt::Debug for VersionSourceReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VersionSourceReader")
            .field("manifests", &self.manifests)
            .finish_non_exhaustive()
    }
}
