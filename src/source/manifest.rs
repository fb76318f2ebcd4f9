//! Project manifest lookup for `packageVersion`
//!
//! `package.json` (top-level `version`) and `Cargo.toml`
//! (`[package].version`, falling back to `[workspace.package].version`)
//! are understood. Any read or parse problem yields `None`.

use std::path::{Path, PathBuf};

/// Manifest file names tried, in order, when no manifest is configured
pub const DEFAULT_MANIFESTS: [&str; 2] = ["package.json", "Cargo.toml"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestKind {
    PackageJson,
    CargoToml,
}

impl ManifestKind {
    /// TOML files are read as Cargo manifests, everything else as JSON
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::CargoToml,
            _ => Self::PackageJson,
        }
    }
}

/// Candidate manifest paths for a project root
pub fn default_candidates(root: &Path) -> Vec<PathBuf> {
    DEFAULT_MANIFESTS.iter().map(|name| root.join(name)).collect()
}

/// Read the declared version from the first candidate that has one
pub async fn read_package_version(candidates: &[PathBuf]) -> Option<String> {
    for path in candidates {
        if let Some(version) = read_manifest_version(path).await {
            return Some(version);
        }
    }
    None
}

async fn read_manifest_version(path: &Path) -> Option<String> {
    let contents = match tokio::fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(e) => {
            log::debug!("manifest {} not readable: {}", path.display(), e);
            return None;
        }
    };

    let version = match ManifestKind::from_path(path) {
        ManifestKind::PackageJson => parse_package_json(&contents),
        ManifestKind::CargoToml => parse_cargo_toml(&contents),
    };

    if version.is_none() {
        log::debug!("manifest {} has no usable version", path.display());
    }
    version
}

pub fn parse_package_json(contents: &str) -> Option<String> {
    let manifest: serde_json::Value = serde_json::from_str(contents).ok()?;
    manifest
        .get("version")
        .and_then(|v| v.as_str())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn parse_cargo_toml(contents: &str) -> Option<String> {
    let manifest: toml::Table = contents.parse().ok()?;
    let from_table = |table: Option<&toml::Value>| {
        table
            .and_then(|t| t.as_table())
            .and_then(|t| t.get("version"))
            .and_then(|v| v.as_str())
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    from_table(manifest.get("package")).or_else(|| {
        from_table(
            manifest
                .get("workspace")
                .and_then(|w| w.as_table())
                .and_then(|w| w.get("package")),
        )
    })
}
