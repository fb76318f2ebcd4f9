//! Public API for version source lookups

pub use crate::source::git::{CommandRunner, GitRunner, NoVcs, DEFAULT_GIT_TIMEOUT};
pub use crate::source::manifest::{default_candidates, ManifestKind};
pub use crate::source::reader::VersionSourceReader;
pub use crate::source::snapshot::{SnapshotField, VersionSnapshot};
