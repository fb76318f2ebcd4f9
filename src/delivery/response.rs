//! Transport-neutral responses of the delivery endpoint

use crate::cache::Fingerprint;

pub const CACHE_CONTROL: &str = "Cache-Control";
pub const CONTENT_TYPE: &str = "Content-Type";
pub const ETAG: &str = "ETag";

/// Clients must revalidate before using a stored copy
pub const NO_CACHE: &str = "no-cache";
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryResponse {
    /// 200 with the serialized artifact
    Fresh { body: String, fingerprint: Fingerprint },
    /// 304, the caller already holds this fingerprint
    NotModified { fingerprint: Fingerprint },
    /// 500 with `{"error": "..."}`
    Failed { message: String },
}

impl DeliveryResponse {
    pub fn status(&self) -> u16 {
        match self {
            Self::Fresh { .. } => 200,
            Self::NotModified { .. } => 304,
            Self::Failed { .. } => 500,
        }
    }

    pub fn fingerprint(&self) -> Option<&Fingerprint> {
        match self {
            Self::Fresh { fingerprint, .. } | Self::NotModified { fingerprint } => Some(fingerprint),
            Self::Failed { .. } => None,
        }
    }

    /// Response body; empty for 304
    pub fn body(&self) -> String {
        match self {
            Self::Fresh { body, .. } => body.clone(),
            Self::NotModified { .. } => String::new(),
            Self::Failed { message } => {
                let mut body = serde_json::json!({ "error": message }).to_string();
                body.push('\n');
                body
            }
        }
    }

    pub fn headers(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::Fresh { fingerprint, .. } => vec![
                (CONTENT_TYPE, JSON_CONTENT_TYPE.to_string()),
                (CACHE_CONTROL, NO_CACHE.to_string()),
                (ETAG, fingerprint.to_string()),
            ],
            Self::NotModified { fingerprint } => vec![
                (CACHE_CONTROL, NO_CACHE.to_string()),
                (ETAG, fingerprint.to_string()),
            ],
            Self::Failed { .. } => vec![
                (CONTENT_TYPE, JSON_CONTENT_TYPE.to_string()),
                (CACHE_CONTROL, "no-store".to_string()),
            ],
        }
    }
}
