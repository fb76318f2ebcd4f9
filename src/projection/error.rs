//! Projection Error Types

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProjectionError {
    #[error("unknown field '{name}' (valid fields: {valid})")]
    UnknownField { name: String, valid: String },

    #[error("extra field '{key}': {reason}")]
    InvalidExtra { key: String, reason: String },

    #[error("failed to serialize projection: {message}")]
    Serialize { message: String },
}

/// Result type for projection operations
pub type ProjectionResult<T> = Result<T, ProjectionError>;
