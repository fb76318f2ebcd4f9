//! Serialized artifact and its content fingerprint

use sha2::{Digest, Sha256};
use std::fmt;

/// Weak entity tag derived from the exact bytes served: `W/"<sha-256 hex>"`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn of(body: &[u8]) -> Self {
        let digest = Sha256::digest(body);
        let hex: String = digest.iter().map(|b| format!("{:02x}", b)).collect();
        Self(format!("W/\"{}\"", hex))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The quoted tag without the weak marker
    pub fn opaque_tag(&self) -> &str {
        self.0.strip_prefix("W/").unwrap_or(&self.0)
    }

    /// Weak comparison against one or more tags from `If-None-Match`.
    ///
    /// Accepts `*`, a single tag or a comma-separated list; the `W/` prefix
    /// is ignored on both sides.
    pub fn matches_header(&self, header: &str) -> bool {
        let header = header.trim();
        if header == "*" {
            return true;
        }
        header.split(',').map(str::trim).any(|candidate| {
            let candidate = candidate.strip_prefix("W/").unwrap_or(candidate);
            candidate == self.opaque_tag()
        })
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Last serialized projection plus its fingerprint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedArtifact {
    text: String,
    fingerprint: Fingerprint,
}

impl CachedArtifact {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let fingerprint = Fingerprint::of(text.as_bytes());
        Self { text, fingerprint }
    }

    /// Artifact handed out before anything has been computed
    pub fn empty() -> Self {
        Self::new("{}\n")
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    /// Parse the artifact text back into a JSON value
    pub fn to_value(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::from_str(&self.text)
    }
}
