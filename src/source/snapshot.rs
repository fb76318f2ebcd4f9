//! The immutable version snapshot and its field names

use crate::core::time::{epoch_millis, iso_timestamp};
use chrono::{DateTime, Utc};
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

/// Names of the fields a snapshot carries, spelled as they are published
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, Display, IntoStaticStr,
)]
#[strum(serialize_all = "camelCase")]
pub enum SnapshotField {
    Version,
    CommitShort,
    PackageVersion,
    BuildTime,
    Mode,
}

impl SnapshotField {
    /// Fields that may be missing from a snapshot
    pub fn is_optional(&self) -> bool {
        matches!(self, Self::CommitShort | Self::PackageVersion)
    }

    pub fn names() -> impl Iterator<Item = &'static str> {
        use strum::IntoEnumIterator;
        Self::iter().map(|field| field.name())
    }

    pub fn name(&self) -> &'static str {
        self.into()
    }
}

/// Version fields resolved at one point in time
///
/// `version` is never empty. A snapshot has no mutators; a later request
/// builds a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionSnapshot {
    version: String,
    commit_short: Option<String>,
    package_version: Option<String>,
    build_time: String,
    mode: String,
}

impl VersionSnapshot {
    /// Build a snapshot taken at `at`.
    ///
    /// A blank `version` is replaced with `at` in epoch milliseconds.
    pub fn new(version: impl Into<String>, at: DateTime<Utc>, mode: impl Into<String>) -> Self {
        let version = version.into();
        let version = if version.trim().is_empty() {
            epoch_millis(at)
        } else {
            version
        };

        Self {
            version,
            commit_short: None,
            package_version: None,
            build_time: iso_timestamp(at),
            mode: mode.into(),
        }
    }

    pub fn with_commit_short(mut self, commit: Option<String>) -> Self {
        self.commit_short = commit.filter(|c| !c.is_empty());
        self
    }

    pub fn with_package_version(mut self, package_version: Option<String>) -> Self {
        self.package_version = package_version.filter(|v| !v.is_empty());
        self
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn commit_short(&self) -> Option<&str> {
        self.commit_short.as_deref()
    }

    pub fn package_version(&self) -> Option<&str> {
        self.package_version.as_deref()
    }

    pub fn build_time(&self) -> &str {
        &self.build_time
    }

    pub fn mode(&self) -> &str {
        &self.mode
    }

    /// Value of a field by name, `None` when the field is absent
    pub fn get(&self, field: SnapshotField) -> Option<&str> {
        match field {
            SnapshotField::Version => Some(self.version()),
            SnapshotField::CommitShort => self.commit_short(),
            SnapshotField::PackageVersion => self.package_version(),
            SnapshotField::BuildTime => Some(self.build_time()),
            SnapshotField::Mode => Some(self.mode()),
        }
    }
}
