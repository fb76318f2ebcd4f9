//! Update Client Error Types

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClientError {
    #[error("unsupported URL '{url}': only http:// and https:// are supported")]
    InvalidUrl { url: String },

    #[error("request to {url} failed: {cause}")]
    Network { url: String, cause: String },

    #[error("{url} answered HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("response is not valid JSON: {message}")]
    Parse { message: String },
}

/// Result type for update client operations
pub type ClientResult<T> = Result<T, ClientError>;
