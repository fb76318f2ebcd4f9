//! Plugin configuration and its validated form
//!
//! [`PluginConfig`] mirrors the TOML keys (kebab-case). It is checked once
//! by [`ResolvedConfig::resolve`]; after that, field names and extra-field
//! shapes are fixed for the lifetime of the plugin.

use super::error::{ConfigError, ConfigResult};
use crate::delivery::api::normalize_base;
use crate::emit::api::DEFAULT_VIRTUAL_ID;
use crate::projection::api::{ExtraFields, FieldSelection, DEFAULT_FIELDS};
use crate::source::manifest::default_candidates;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_FILENAME: &str = "version.json";
pub const DEFAULT_OUT_DIR: &str = "dist";
pub const DEFAULT_DTS_DIR: &str = "src";
pub const DECLARATION_FILENAME: &str = "app-version.d.ts";
pub const DEFAULT_GIT_TIMEOUT_MS: u64 = 5_000;

static MODULE_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s'\x22`\\]+$").expect("module id pattern is valid"));

/// Configuration as written by the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct PluginConfig {
    /// Project root; relative paths below are resolved against it
    pub root: PathBuf,
    /// Directory that receives the JSON artifact
    pub out_dir: PathBuf,
    pub filename: String,
    /// Public base path the endpoint is mounted under
    pub base: String,
    /// Published snapshot fields, in order
    pub fields: Vec<String>,
    /// Static fields appended after the snapshot fields
    pub extra: toml::Table,
    /// Manifest to read `packageVersion` from; discovered when unset
    pub manifest: Option<PathBuf>,
    /// Query git at all
    pub git: bool,
    pub git_timeout_ms: u64,
    pub virtual_module: bool,
    pub virtual_id: String,
    /// Write the type declaration file
    pub dts: bool,
    pub dts_dir: PathBuf,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            filename: DEFAULT_FILENAME.to_string(),
            base: "/".to_string(),
            fields: DEFAULT_FIELDS.iter().map(|f| f.name().to_string()).collect(),
            extra: toml::Table::new(),
            manifest: None,
            git: true,
            git_timeout_ms: DEFAULT_GIT_TIMEOUT_MS,
            virtual_module: true,
            virtual_id: DEFAULT_VIRTUAL_ID.to_string(),
            dts: true,
            dts_dir: PathBuf::from(DEFAULT_DTS_DIR),
        }
    }
}

impl PluginConfig {
    /// Parse a TOML document
    pub fn from_toml_str(contents: &str) -> ConfigResult<Self> {
        toml::from_str(contents).map_err(|e| ConfigError::Invalid {
            message: e.to_string(),
        })
    }
}

/// Validated configuration with every derived path computed
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub root: PathBuf,
    pub artifact_path: PathBuf,
    pub declaration_path: Option<PathBuf>,
    pub filename: String,
    pub base: String,
    pub endpoint_url: String,
    pub selection: FieldSelection,
    pub extra: ExtraFields,
    pub manifests: Vec<PathBuf>,
    pub git: bool,
    pub git_timeout: Duration,
    pub virtual_id: Option<String>,
}

impl ResolvedConfig {
    pub fn resolve(config: &PluginConfig) -> ConfigResult<Self> {
        let filename = config.filename.trim();
        if filename.is_empty() || filename.contains(['/', '\\']) {
            return Err(ConfigError::Invalid {
                message: format!(
                    "filename '{}' must be a plain file name without directories",
                    config.filename
                ),
            });
        }

        if config.git_timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                message: "git-timeout-ms must be greater than 0".to_string(),
            });
        }

        let virtual_id = if config.virtual_module {
            let id = config.virtual_id.trim();
            if !MODULE_ID.is_match(id) {
                return Err(ConfigError::Invalid {
                    message: format!(
                        "virtual-id '{}' must be non-empty and contain no whitespace or quotes",
                        config.virtual_id
                    ),
                });
            }
            Some(id.to_string())
        } else {
            None
        };

        let selection = FieldSelection::parse(&config.fields).map_err(|e| ConfigError::Invalid {
            message: format!("fields: {}", e),
        })?;
        let extra = ExtraFields::from_toml_table(&config.extra).map_err(|e| ConfigError::Invalid {
            message: format!("extra: {}", e),
        })?;

        let root = config.root.clone();
        let manifests = match &config.manifest {
            Some(manifest) => vec![join_root(&root, manifest)],
            None => default_candidates(&root),
        };
        let base = normalize_base(&config.base);

        Ok(Self {
            artifact_path: join_root(&root, &config.out_dir).join(filename),
            declaration_path: config
                .dts
                .then(|| join_root(&root, &config.dts_dir).join(DECLARATION_FILENAME)),
            filename: filename.to_string(),
            endpoint_url: format!("{}{}", base, filename),
            base,
            selection,
            extra,
            manifests,
            git: config.git,
            git_timeout: Duration::from_millis(config.git_timeout_ms),
            virtual_id,
            root,
        })
    }
}

fn join_root(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}
