//! Emitter Error Types

#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    #[error("artifact is not a JSON object: {message}")]
    InvalidArtifact { message: String },

    #[error("could not produce version artifact: {message}")]
    Artifact { message: String },
}

/// Result type for emitter operations
pub type EmitResult<T> = Result<T, EmitError>;
