//! Version-control lookups through the `git` command line
//!
//! Every lookup is best effort: a failed spawn, a non-zero exit, a timeout
//! or blank output all come back as `None`.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Default upper bound for a single git invocation
pub const DEFAULT_GIT_TIMEOUT: Duration = Duration::from_secs(5);

/// Runs a version-control command and returns its trimmed stdout
#[async_trait::async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, args: &[&str]) -> Option<String>;
}

/// Spawns `git` in a project directory
#[derive(Debug, Clone)]
pub struct GitRunner {
    root: PathBuf,
    timeout: Duration,
}

impl GitRunner {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            timeout: DEFAULT_GIT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait::async_trait]
impl CommandRunner for GitRunner {
    async fn run(&self, args: &[&str]) -> Option<String> {
        let mut command = Command::new("git");
        command
            .args(args)
            .current_dir(&self.root)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());

        bounded_output(command, self.timeout, &format!("git {}", args.join(" "))).await
    }
}

/// Run `command` to completion within `timeout` and return its trimmed
/// stdout. The child is killed when the timeout fires.
pub(crate) async fn bounded_output(
    mut command: Command,
    timeout: Duration,
    label: &str,
) -> Option<String> {
    command.kill_on_drop(true);
    let output = match tokio::time::timeout(timeout, command.output()).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => {
            log::debug!("{} could not be started: {}", label, e);
            return None;
        }
        Err(_) => {
            log::debug!("{} timed out after {}ms", label, timeout.as_millis());
            return None;
        }
    };

    if !output.status.success() {
        log::debug!("{} exited with {}", label, output.status);
        return None;
    }

    String::from_utf8(output.stdout)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Runner used when version-control lookups are switched off
#[derive(Debug, Default, Clone, Copy)]
pub struct NoVcs;

#[async_trait::async_trait]
impl CommandRunner for NoVcs {
    async fn run(&self, _args: &[&str]) -> Option<String> {
        None
    }
}
