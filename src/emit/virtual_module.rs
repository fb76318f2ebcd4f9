//! Resolution and loading of the virtual module id

use super::emitter::ModuleEmitter;
use super::error::{EmitError, EmitResult};
use crate::cache::SnapshotCache;
use std::sync::Arc;

/// Default import id of the virtual module
pub const DEFAULT_VIRTUAL_ID: &str = "virtual:app-version";

/// Prefix marking an id as handled here rather than backed by a file
const RESOLVED_PREFIX: char = '\0';

/// Virtual module bound to a cache, the loader side of the emitter
#[derive(Debug, Clone)]
pub struct VirtualModule {
    emitter: Arc<ModuleEmitter>,
    cache: Arc<SnapshotCache>,
}

impl VirtualModule {
    pub fn new(emitter: Arc<ModuleEmitter>, cache: Arc<SnapshotCache>) -> Self {
        Self { emitter, cache }
    }

    pub fn id(&self) -> &str {
        self.emitter.module_id()
    }

    pub fn resolved_id(&self) -> String {
        format!("{}{}", RESOLVED_PREFIX, self.id())
    }

    pub fn emitter(&self) -> &ModuleEmitter {
        &self.emitter
    }

    /// Resolved id for an import of this module, `None` for other ids
    pub fn resolve_id(&self, id: &str) -> Option<String> {
        if id == self.id() || id == self.resolved_id() {
            Some(self.resolved_id())
        } else {
            None
        }
    }

    /// Module source for a resolved id, `None` for other ids
    pub async fn load(&self, resolved_id: &str) -> Option<EmitResult<String>> {
        if self.resolve_id(resolved_id).is_none() {
            return None;
        }
        Some(self.source().await)
    }

    /// Module source built from the artifact chosen by the cache policy
    pub async fn source(&self) -> EmitResult<String> {
        let artifact = self
            .cache
            .obtain()
            .await
            .map_err(|e| EmitError::Artifact {
                message: e.to_string(),
            })?;
        self.emitter.emit_module(artifact.text())
    }
}
