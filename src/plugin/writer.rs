//! Idempotent artifact writes
//!
//! Content identical to what is already on disk is not rewritten, so watch
//! loops do not see spurious modification events.

use crate::core::error_handling::warn_and_continue;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStatus {
    Written,
    Unchanged,
}

/// What happened to one output file during a lifecycle pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    Done { path: PathBuf, status: WriteStatus },
    Failed { path: PathBuf, message: String },
}

impl WriteOutcome {
    pub fn path(&self) -> &Path {
        match self {
            Self::Done { path, .. } | Self::Failed { path, .. } => path,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Write `contents` unless the file already holds exactly these bytes.
/// Parent directories are created as needed.
pub async fn write_if_changed(path: &Path, contents: &str) -> io::Result<WriteStatus> {
    match tokio::fs::read(path).await {
        Ok(existing) if existing == contents.as_bytes() => return Ok(WriteStatus::Unchanged),
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, contents).await?;
    Ok(WriteStatus::Written)
}

/// Write and report; failures are logged as warnings, never returned
pub async fn write_reported(path: &Path, contents: &str, what: &str) -> WriteOutcome {
    match write_if_changed(path, contents).await {
        Ok(status) => {
            match status {
                WriteStatus::Written => log::info!("wrote {} to {}", what, path.display()),
                WriteStatus::Unchanged => {
                    log::debug!("{} at {} is up to date", what, path.display())
                }
            }
            WriteOutcome::Done {
                path: path.to_path_buf(),
                status,
            }
        }
        Err(e) => {
            warn_and_continue(&e, &format!("could not write {} to {}", what, path.display()));
            WriteOutcome::Failed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
        }
    }
}
