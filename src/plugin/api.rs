//! Public API for the plugin
//!
//! External modules should import from here rather than directly from
//! internal modules.

// Lifecycle
pub use crate::plugin::lifecycle::{BundleOutput, PluginState, VersionPlugin};

// Configuration
pub use crate::plugin::config::{
    PluginConfig, ResolvedConfig, DECLARATION_FILENAME, DEFAULT_DTS_DIR, DEFAULT_FILENAME,
    DEFAULT_GIT_TIMEOUT_MS, DEFAULT_OUT_DIR,
};

// Error handling
pub use crate::plugin::error::{ConfigError, ConfigResult, PluginError, PluginResult};

// Output files
pub use crate::plugin::writer::{write_if_changed, write_reported, WriteOutcome, WriteStatus};
