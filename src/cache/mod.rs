//! Snapshot Cache
//!
//! Holds the most recent serialized projection. Under
//! [`RefreshPolicy::Always`] every [`SnapshotCache::obtain`] recomputes, so a
//! dev server always reflects live git and manifest state. Under
//! [`RefreshPolicy::Once`] a build pass refreshes once and every later
//! consumer in that pass reuses the stored artifact.

pub mod artifact;


pub use artifact::{CachedArtifact, Fingerprint};

use crate::projection::api::{project, ExtraFields, FieldSelection, ProjectionResult};
use crate::source::reader::VersionSourceReader;
use tokio::sync::RwLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshPolicy {
    /// Recompute on every request (interactive serving)
    Always,
    /// Recompute only when nothing is stored yet (one-shot builds)
    #[default]
    Once,
}

/// Everything needed to recompute an artifact
#[derive(Debug, Clone)]
pub struct ProjectionPlan {
    pub reader: VersionSourceReader,
    pub selection: FieldSelection,
    pub extra: ExtraFields,
    pub mode: String,
}

/// Cache of the last artifact, owned by one plugin instance
#[derive(Debug)]
pub struct SnapshotCache {
    plan: ProjectionPlan,
    policy: RwLock<RefreshPolicy>,
    current: RwLock<Option<CachedArtifact>>,
}

impl SnapshotCache {
    pub fn new(plan: ProjectionPlan, policy: RefreshPolicy) -> Self {
        Self {
            plan,
            policy: RwLock::new(policy),
            current: RwLock::new(None),
        }
    }

    pub fn plan(&self) -> &ProjectionPlan {
        &self.plan
    }

    pub async fn policy(&self) -> RefreshPolicy {
        *self.policy.read().await
    }

    pub async fn set_policy(&self, policy: RefreshPolicy) {
        *self.policy.write().await = policy;
    }

    /// Recompute, store and return a fresh artifact
    pub async fn refresh(&self) -> ProjectionResult<CachedArtifact> {
        let snapshot = self.plan.reader.collect(&self.plan.mode).await;
        let projected = project(&snapshot, &self.plan.selection, &self.plan.extra);
        let artifact = CachedArtifact::new(projected.to_pretty_json()?);

        log::debug!(
            "refreshed version artifact {} (version {})",
            artifact.fingerprint(),
            snapshot.version()
        );

        *self.current.write().await = Some(artifact.clone());
        Ok(artifact)
    }

    /// Last stored artifact, or `{}` when nothing has been computed
    pub async fn current(&self) -> CachedArtifact {
        self.current
            .read()
            .await
            .clone()
            .unwrap_or_else(CachedArtifact::empty)
    }

    /// True once any refresh has stored an artifact
    pub async fn is_populated(&self) -> bool {
        self.current.read().await.is_some()
    }

    /// Artifact according to the active policy
    pub async fn obtain(&self) -> ProjectionResult<CachedArtifact> {
        match self.policy().await {
            RefreshPolicy::Always => self.refresh().await,
            RefreshPolicy::Once => {
                if let Some(artifact) = self.current.read().await.clone() {
                    return Ok(artifact);
                }
                self.refresh().await
            }
        }
    }
}
