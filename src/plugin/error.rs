//! Plugin Error Types

use crate::core::error_handling::ContextualError;
use crate::emit::api::EmitError;
use std::path::PathBuf;

/// Configuration problems; all of them are fixable by the user
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid configuration: {message}")]
    Invalid { message: String },

    #[error("cannot read configuration file {}: {message}", path.display())]
    Read { path: PathBuf, message: String },
}

impl ContextualError for ConfigError {
    fn is_user_actionable(&self) -> bool {
        true
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            ConfigError::Invalid { message } | ConfigError::Read { message, .. } => Some(message),
        }
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    #[error("'{operation}' is not allowed while the plugin is {state}")]
    InvalidState {
        operation: &'static str,
        state: &'static str,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Emit(#[from] EmitError),
}

impl ContextualError for PluginError {
    fn is_user_actionable(&self) -> bool {
        matches!(self, PluginError::Config(_))
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            PluginError::Config(e) => e.user_message(),
            _ => None,
        }
    }
}

/// Result type for plugin lifecycle operations
pub type PluginResult<T> = Result<T, PluginError>;
