//! Host lifecycle state machine
//!
//! ```text
//! Unconfigured --config_resolved--> Configured --build_start--> Building
//!                                   Configured --configure_server--> Served
//! ```
//!
//! Handlers called out of order fail with [`PluginError::InvalidState`].

use super::config::{PluginConfig, ResolvedConfig};
use super::error::{PluginError, PluginResult};
use super::writer::{write_reported, WriteOutcome};
use crate::cache::{CachedArtifact, ProjectionPlan, RefreshPolicy, SnapshotCache};
use crate::core::time::{Clock, SystemClock};
use crate::delivery::api::{DeliveryEndpoint, DeliveryResponse, DevServerState};
use crate::emit::api::{ModuleEmitter, VirtualModule};
use crate::source::api::{CommandRunner, GitRunner, NoVcs, VersionSourceReader};
use std::path::Path;
use std::sync::Arc;
use strum_macros::IntoStaticStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum PluginState {
    Unconfigured,
    Configured,
    Building,
    Served,
}

/// Files produced by one `generate_bundle` pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleOutput {
    pub artifact: WriteOutcome,
    pub declaration: Option<WriteOutcome>,
}

/// Everything created from the resolved configuration
#[derive(Debug)]
struct Runtime {
    config: ResolvedConfig,
    cache: Arc<SnapshotCache>,
    emitter: Arc<ModuleEmitter>,
    module: Option<VirtualModule>,
}

/// The version plugin as driven by a build host
pub struct VersionPlugin {
    state: PluginState,
    runtime: Option<Runtime>,
    runner: Option<Arc<dyn CommandRunner>>,
    clock: Arc<dyn Clock>,
}

impl Default for VersionPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl VersionPlugin {
    pub fn new() -> Self {
        Self {
            state: PluginState::Unconfigured,
            runtime: None,
            runner: None,
            clock: Arc::new(SystemClock),
        }
    }

    /// Use this runner instead of spawning git
    pub fn with_runner(mut self, runner: Arc<dyn CommandRunner>) -> Self {
        self.runner = Some(runner);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn state(&self) -> PluginState {
        self.state
    }

    pub fn config(&self) -> Option<&ResolvedConfig> {
        self.runtime.as_ref().map(|rt| &rt.config)
    }

    pub fn cache(&self) -> Option<&Arc<SnapshotCache>> {
        self.runtime.as_ref().map(|rt| &rt.cache)
    }

    fn require(
        &self,
        operation: &'static str,
        allowed: &[PluginState],
    ) -> PluginResult<&Runtime> {
        match &self.runtime {
            Some(runtime) if allowed.contains(&self.state) => Ok(runtime),
            _ => Err(PluginError::InvalidState {
                operation,
                state: self.state.into(),
            }),
        }
    }

    /// Validate the configuration and build the cache, emitter and loader
    pub fn config_resolved(&mut self, config: &PluginConfig, mode: &str) -> PluginResult<()> {
        if self.state != PluginState::Unconfigured {
            return Err(PluginError::InvalidState {
                operation: "config_resolved",
                state: self.state.into(),
            });
        }

        let resolved = ResolvedConfig::resolve(config)?;

        let runner: Arc<dyn CommandRunner> = match (&self.runner, resolved.git) {
            (Some(runner), _) => runner.clone(),
            (None, true) => {
                Arc::new(GitRunner::new(&resolved.root).with_timeout(resolved.git_timeout))
            }
            (None, false) => Arc::new(NoVcs),
        };
        let reader = VersionSourceReader::new(runner, resolved.manifests.clone())
            .with_clock(self.clock.clone());

        let plan = ProjectionPlan {
            reader,
            selection: resolved.selection.clone(),
            extra: resolved.extra.clone(),
            mode: mode.to_string(),
        };
        let cache = Arc::new(SnapshotCache::new(plan, RefreshPolicy::Once));

        let module_id = resolved
            .virtual_id
            .clone()
            .unwrap_or_else(|| crate::emit::api::DEFAULT_VIRTUAL_ID.to_string());
        let emitter = Arc::new(ModuleEmitter::new(module_id, resolved.endpoint_url.clone())?);
        let module = resolved
            .virtual_id
            .as_ref()
            .map(|_| VirtualModule::new(emitter.clone(), cache.clone()));

        log::debug!(
            "configured for {} mode, artifact at {}",
            mode,
            resolved.artifact_path.display()
        );

        self.runtime = Some(Runtime {
            config: resolved,
            cache,
            emitter,
            module,
        });
        self.state = PluginState::Configured;
        Ok(())
    }

    /// Start a build pass: refresh the snapshot exactly once.
    ///
    /// May be called again from `Building` for the next pass of a watch
    /// build. A failed refresh is logged and the pass continues with the
    /// previous (or empty) artifact.
    pub async fn build_start(&mut self) -> PluginResult<CachedArtifact> {
        let runtime = self.require(
            "build_start",
            &[PluginState::Configured, PluginState::Building],
        )?;
        let cache = runtime.cache.clone();

        cache.set_policy(RefreshPolicy::Once).await;
        let artifact = match cache.refresh().await {
            Ok(artifact) => artifact,
            Err(e) => {
                log::warn!("version snapshot unavailable for this build: {}", e);
                cache.current().await
            }
        };

        self.state = PluginState::Building;
        Ok(artifact)
    }

    /// Write the JSON artifact and, when enabled, the declaration file
    pub async fn generate_bundle(&self) -> PluginResult<BundleOutput> {
        let runtime = self.require("generate_bundle", &[PluginState::Building])?;

        let artifact = runtime.cache.current().await;
        let artifact_outcome =
            write_reported(&runtime.config.artifact_path, artifact.text(), "version artifact")
                .await;

        let declaration = match &runtime.config.declaration_path {
            Some(path) => Some(self.write_declaration(runtime, path).await),
            None => None,
        };

        Ok(BundleOutput {
            artifact: artifact_outcome,
            declaration,
        })
    }

    async fn write_declaration(&self, runtime: &Runtime, path: &Path) -> WriteOutcome {
        match runtime
            .emitter
            .emit_type_description(&runtime.config.selection, &runtime.config.extra)
        {
            Ok(text) => write_reported(path, &text, "type declaration").await,
            Err(e) => {
                log::warn!("could not render type declaration: {}", e);
                WriteOutcome::Failed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                }
            }
        }
    }

    /// Switch to serving: every request recomputes. Writes the declaration
    /// file once and returns the dev server routing state.
    pub async fn configure_server(&mut self) -> PluginResult<DevServerState> {
        let runtime = self.require("configure_server", &[PluginState::Configured])?;

        runtime.cache.set_policy(RefreshPolicy::Always).await;
        if let Some(path) = &runtime.config.declaration_path {
            self.write_declaration(runtime, path).await;
        }

        let endpoint = DeliveryEndpoint::new(runtime.cache.clone());
        let mut state =
            DevServerState::new(endpoint, &runtime.config.base, &runtime.config.filename);
        if let Some(module) = &runtime.module {
            state = state.with_module(&runtime.config.base, module.clone());
        }

        self.state = PluginState::Served;
        Ok(state)
    }

    /// Answer a dev-server read; `None` when `path` is not the version path
    pub async fn serve_request(
        &self,
        path: &str,
        if_none_match: Option<&str>,
    ) -> PluginResult<Option<DeliveryResponse>> {
        let runtime = self.require("serve_request", &[PluginState::Served])?;

        if path != runtime.config.endpoint_url {
            return Ok(None);
        }
        let endpoint = DeliveryEndpoint::new(runtime.cache.clone());
        Ok(Some(endpoint.handle(if_none_match).await))
    }

    /// Claim the virtual module id
    pub fn resolve_id(&self, id: &str) -> PluginResult<Option<String>> {
        let runtime = self.require("resolve_id", &[PluginState::Building, PluginState::Served])?;
        Ok(runtime.module.as_ref().and_then(|m| m.resolve_id(id)))
    }

    /// Source of the virtual module; `None` for ids owned by someone else
    pub async fn load(&self, id: &str) -> PluginResult<Option<String>> {
        let runtime = self.require("load", &[PluginState::Building, PluginState::Served])?;
        let module = match &runtime.module {
            Some(module) => module,
            None => return Ok(None),
        };
        match module.load(id).await {
            Some(source) => Ok(Some(source?)),
            None => Ok(None),
        }
    }
}

impl std::fmt::Debug for VersionPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VersionPlugin")
            .field("state", &self.state)
            .field("runtime", &self.runtime)
            .finish_non_exhaustive()
    }
}
