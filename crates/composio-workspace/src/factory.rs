//! Workspace provisioning.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::host::HostWorkspace;
use crate::remote::RemoteWorkspace;
use crate::traits::{Workspace, WorkspaceConfig, WorkspaceError};
use composio_core::types::ExecEnv;

/// Creates workspaces for an environment.
///
/// Providers hand back a workspace that is ready to use. Starting and
/// stopping the underlying sandbox is the provider's business.
#[async_trait]
pub trait WorkspaceProvider: Send + Sync {
    /// Provision a workspace for `env`.
    async fn provision(
        &self,
        env: ExecEnv,
        config: &WorkspaceConfig,
    ) -> Result<Arc<dyn Workspace>, WorkspaceError>;
}

/// Provides the [`HostWorkspace`].
#[derive(Debug, Default)]
pub struct HostProvider;

#[async_trait]
impl WorkspaceProvider for HostProvider {
    async fn provision(
        &self,
        _env: ExecEnv,
        _config: &WorkspaceConfig,
    ) -> Result<Arc<dyn Workspace>, WorkspaceError> {
        Ok(Arc::new(HostWorkspace::new()))
    }
}

/// Connects to a tooling server that is already running at
/// [`WorkspaceConfig::url`].
#[derive(Debug, Default)]
pub struct EndpointProvider;

#[async_trait]
impl WorkspaceProvider for EndpointProvider {
    async fn provision(
        &self,
        env: ExecEnv,
        config: &WorkspaceConfig,
    ) -> Result<Arc<dyn Workspace>, WorkspaceError> {
        let url = config.url.as_deref().ok_or_else(|| {
            WorkspaceError::Config(format!("a tooling server URL is required for the {env} environment"))
        })?;

        Ok(Arc::new(RemoteWorkspace::new(
            env,
            url,
            config.access_token.clone(),
        )))
    }
}

/// Owns the toolset's workspace.
pub struct WorkspaceFactory {
    env: ExecEnv,
    config: WorkspaceConfig,
    providers: HashMap<ExecEnv, Arc<dyn WorkspaceProvider>>,
    current: Mutex<Option<Arc<dyn Workspace>>>,
    torn_down: AtomicBool,
}

impl WorkspaceFactory {
    /// Create a factory with the built-in providers: [`HostProvider`] for
    /// the host and [`EndpointProvider`] for every remote environment.
    #[must_use]
    pub fn new(env: ExecEnv, config: WorkspaceConfig) -> Self {
        let mut providers: HashMap<ExecEnv, Arc<dyn WorkspaceProvider>> = HashMap::new();
        let endpoint: Arc<dyn WorkspaceProvider> = Arc::new(EndpointProvider);
        for candidate in ExecEnv::ALL {
            if candidate.is_remote() {
                providers.insert(candidate, Arc::clone(&endpoint));
            } else {
                providers.insert(candidate, Arc::new(HostProvider));
            }
        }

        Self {
            env,
            config,
            providers,
            current: Mutex::new(None),
            torn_down: AtomicBool::new(false),
        }
    }

    /// Replace the provider for `env`.
    #[must_use]
    pub fn with_provider(mut self, env: ExecEnv, provider: Arc<dyn WorkspaceProvider>) -> Self {
        self.providers.insert(env, provider);
        self
    }

    /// Default environment.
    #[must_use]
    pub const fn env(&self) -> ExecEnv {
        self.env
    }

    /// Provisioning settings.
    #[must_use]
    pub const fn config(&self) -> &WorkspaceConfig {
        &self.config
    }

    /// Provision a workspace for `env` with `config`.
    ///
    /// An existing workspace for the same environment is reused and
    /// `config` is ignored. One for a different environment is torn down
    /// and replaced.
    ///
    /// # Errors
    ///
    /// Returns error if the factory was torn down, no provider handles
    /// `env`, or the provider fails.
    pub async fn new_workspace(
        &self,
        env: ExecEnv,
        config: &WorkspaceConfig,
    ) -> Result<Arc<dyn Workspace>, WorkspaceError> {
        if self.torn_down.load(Ordering::Acquire) {
            return Err(WorkspaceError::Closed);
        }

        let mut current = self.current.lock().await;

        // Teardown may have emptied the slot while we waited for the lock.
        if self.torn_down.load(Ordering::Acquire) {
            return Err(WorkspaceError::Closed);
        }

        if let Some(existing) = current.as_ref() {
            if existing.env() == env {
                return Ok(Arc::clone(existing));
            }
            tracing::info!(workspace = existing.id(), "Replacing workspace");
            existing.teardown().await?;
        }

        let provider = self
            .providers
            .get(&env)
            .ok_or(WorkspaceError::NoProvider(env))?;
        let workspace = provider.provision(env, config).await?;
        tracing::info!(workspace = workspace.id(), env = %env, "Provisioned workspace");

        *current = Some(Arc::clone(&workspace));
        Ok(workspace)
    }

    /// The workspace, provisioning one for the default environment with the
    /// factory's config if needed.
    ///
    /// # Errors
    ///
    /// See [`Self::new_workspace`].
    pub async fn get(&self) -> Result<Arc<dyn Workspace>, WorkspaceError> {
        self.new_workspace(self.env, &self.config).await
    }

    /// The workspace if one has been provisioned.
    pub async fn current(&self) -> Option<Arc<dyn Workspace>> {
        self.current.lock().await.clone()
    }

    /// Whether [`Self::teardown`] has run.
    #[must_use]
    pub fn is_torn_down(&self) -> bool {
        self.torn_down.load(Ordering::Acquire)
    }

    /// Tear down the workspace. Only the first call does anything.
    ///
    /// # Errors
    ///
    /// Returns the workspace's teardown error.
    pub async fn teardown(&self) -> Result<(), WorkspaceError> {
        if self.torn_down.swap(true, Ordering::AcqRel) {
            return Ok(());
        }

        let workspace = self.current.lock().await.take();
        match workspace {
            Some(workspace) => workspace.teardown().await,
            None => Ok(()),
        }
    }
}
