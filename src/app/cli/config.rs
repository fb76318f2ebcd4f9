//! TOML configuration file discovery and loading
//!
//! Lookup order: `--config FILE` (must exist), then `verstamp.toml` in the
//! project root, then `verstamp/verstamp.toml` under the user config
//! directory. No file at all means defaults.

use super::args::Args;
use crate::plugin::api::{ConfigError, ConfigResult, PluginConfig};
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = "verstamp.toml";

/// Configuration file to load, if any
pub fn find_config_file(
    explicit: Option<&Path>,
    root: &Path,
    user_config_dir: Option<&Path>,
) -> ConfigResult<Option<PathBuf>> {
    if let Some(path) = explicit {
        // a file the user named must exist
        if !path.is_file() {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                message: "the specified configuration file does not exist".to_string(),
            });
        }
        return Ok(Some(path.to_path_buf()));
    }

    let candidates = std::iter::once(root.join(CONFIG_FILENAME))
        .chain(user_config_dir.map(|d| d.join("verstamp").join(CONFIG_FILENAME)));
    for candidate in candidates {
        if candidate.is_file() {
            return Ok(Some(candidate));
        }
    }
    Ok(None)
}

/// Read and parse one configuration file
pub async fn read_config_file(path: &Path) -> ConfigResult<PluginConfig> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    PluginConfig::from_toml_str(&contents).map_err(|e| ConfigError::Read {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Effective configuration for this invocation
pub async fn load_config(args: &Args) -> ConfigResult<PluginConfig> {
    let root = args.root.clone().unwrap_or_else(|| PathBuf::from("."));
    let user_dir = dirs::config_dir();
    let path = find_config_file(args.config_file.as_deref(), &root, user_dir.as_deref())?;

    let mut config = match &path {
        Some(path) => {
            log::debug!("loading configuration from {}", path.display());
            read_config_file(path).await?
        }
        None => {
            log::debug!("no configuration file found, using defaults");
            PluginConfig::default()
        }
    };

    // only a project-local file anchors a relative root
    let anchor = path
        .as_deref()
        .filter(|p| user_dir.as_deref().map_or(true, |d| !p.starts_with(d)));
    apply_overrides(&mut config, args, anchor);
    Ok(config)
}

/// Apply command-line overrides; a relative `root` from the file is taken
/// relative to the directory of `anchor`
pub fn apply_overrides(config: &mut PluginConfig, args: &Args, anchor: Option<&Path>) {
    match (&args.root, anchor.and_then(Path::parent)) {
        (Some(root), _) => config.root = root.clone(),
        (None, Some(dir)) if config.root.is_relative() && !dir.as_os_str().is_empty() => {
            config.root = dir.join(&config.root);
        }
        _ => {}
    }
}
