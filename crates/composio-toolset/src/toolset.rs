//! The toolset.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::error::ToolSetError;
use crate::filters::{ActionFilters, ToolFilters};
use composio_client::{ComposioApi, Entity, HttpClient, ListActionsQuery};
use composio_core::config::{Config, DEFAULT_BASE_URL};
use composio_core::secrets::{ApiKey, UserData, resolve_api_key};
use composio_core::types::{ActionList, ActionOutput, ActionParams, ActionSchema, EntityId, ExecEnv};
use composio_workspace::{ExecuteMetadata, WorkspaceConfig, WorkspaceFactory, WorkspaceProvider};

type EnvLookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Builder for [`ComposioToolSet`].
pub struct ToolSetBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    runtime: Option<String>,
    entity_id: EntityId,
    workspace_env: ExecEnv,
    workspace_url: Option<String>,
    workspace_access_token: Option<String>,
    user_data_path: Option<PathBuf>,
    env_lookup: EnvLookup,
    client: Option<Arc<dyn ComposioApi>>,
    providers: Vec<(ExecEnv, Arc<dyn WorkspaceProvider>)>,
}

impl Default for ToolSetBuilder {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            runtime: None,
            entity_id: EntityId::default(),
            workspace_env: ExecEnv::Host,
            workspace_url: None,
            workspace_access_token: None,
            user_data_path: UserData::default_path(),
            env_lookup: Box::new(|name: &str| std::env::var(name).ok()),
            client: None,
            providers: Vec::new(),
        }
    }
}

impl ToolSetBuilder {
    /// Start from a loaded configuration file.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            api_key: config.api_key.clone(),
            base_url: Some(config.base_url.clone()),
            runtime: config.runtime.clone(),
            entity_id: config.entity_id.clone(),
            workspace_env: config.workspace.env,
            workspace_url: config.workspace.url.clone(),
            workspace_access_token: config.workspace.access_token.clone(),
            ..Self::default()
        }
    }

    /// API key. Takes precedence over the environment and user data file.
    #[must_use]
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// API base URL.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Runtime tag reported to the API.
    #[must_use]
    pub fn runtime(mut self, runtime: impl Into<String>) -> Self {
        self.runtime = Some(runtime.into());
        self
    }

    /// Default entity for executions.
    #[must_use]
    pub fn entity_id(mut self, entity_id: EntityId) -> Self {
        self.entity_id = entity_id;
        self
    }

    /// Execution environment.
    #[must_use]
    pub const fn workspace_env(mut self, env: ExecEnv) -> Self {
        self.workspace_env = env;
        self
    }

    /// URL of a running tooling server for remote environments.
    #[must_use]
    pub fn workspace_url(mut self, url: impl Into<String>) -> Self {
        self.workspace_url = Some(url.into());
        self
    }

    /// Access token for the tooling server.
    #[must_use]
    pub fn workspace_access_token(mut self, token: impl Into<String>) -> Self {
        self.workspace_access_token = Some(token.into());
        self
    }

    /// User data file consulted for the API key. `None` disables it.
    #[must_use]
    pub fn user_data_path(mut self, path: Option<PathBuf>) -> Self {
        self.user_data_path = path;
        self
    }

    /// Environment variable lookup used during key resolution.
    #[must_use]
    pub fn env_lookup<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.env_lookup = Box::new(lookup);
        self
    }

    /// Use `client` instead of an [`HttpClient`].
    #[must_use]
    pub fn client(mut self, client: Arc<dyn ComposioApi>) -> Self {
        self.client = Some(client);
        self
    }

    /// Provision `env` workspaces with `provider`.
    #[must_use]
    pub fn provider(mut self, env: ExecEnv, provider: Arc<dyn WorkspaceProvider>) -> Self {
        self.providers.push((env, provider));
        self
    }

    /// Build the toolset.
    ///
    /// # Errors
    ///
    /// Returns [`ToolSetError::Key`] if no API key can be resolved.
    pub fn build(self) -> Result<ComposioToolSet, ToolSetError> {
        let lookup = &self.env_lookup;
        let api_key = resolve_api_key(
            self.api_key.as_deref(),
            |name| lookup(name),
            self.user_data_path.as_deref(),
        )?;

        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let client: Arc<dyn ComposioApi> = match self.client {
            Some(client) => client,
            None => {
                let mut http = HttpClient::with_base_url(api_key.clone(), base_url.clone());
                if let Some(runtime) = &self.runtime {
                    http = http.with_runtime(runtime.clone());
                }
                Arc::new(http)
            }
        };

        let mut workspace_config = WorkspaceConfig::new(api_key.clone()).with_base_url(base_url);
        if let Some(url) = self.workspace_url {
            workspace_config = workspace_config.with_url(url);
        }
        if let Some(token) = self.workspace_access_token {
            workspace_config = workspace_config.with_access_token(ApiKey::new(token));
        }

        let factory = self
            .providers
            .into_iter()
            .fold(
                WorkspaceFactory::new(self.workspace_env, workspace_config),
                |factory, (env, provider)| factory.with_provider(env, provider),
            );

        tracing::debug!(
            env = %self.workspace_env,
            entity = %self.entity_id,
            "Created toolset"
        );

        Ok(ComposioToolSet {
            client,
            api_key,
            runtime: self.runtime,
            entity_id: self.entity_id,
            workspace: Arc::new(factory),
            workspace_env: self.workspace_env,
            local_actions: OnceCell::new(),
        })
    }
}

/// Action catalogs and execution over the Composio API and a workspace.
///
/// Dropping the toolset makes one best-effort attempt to tear down its
/// workspace on the current Tokio runtime. Call [`Self::teardown`] to wait
/// for it instead.
pub struct ComposioToolSet {
    client: Arc<dyn ComposioApi>,
    api_key: ApiKey,
    runtime: Option<String>,
    entity_id: EntityId,
    workspace: Arc<WorkspaceFactory>,
    workspace_env: ExecEnv,
    local_actions: OnceCell<Vec<ActionSchema>>,
}

impl ComposioToolSet {
    /// Create a toolset.
    ///
    /// `api_key` falls back to `COMPOSIO_API_KEY`, then to
    /// `~/.composio/userData.json`. `base_url` defaults to the hosted API.
    ///
    /// # Errors
    ///
    /// Returns [`ToolSetError::Key`] if no API key can be resolved.
    pub fn new(
        api_key: Option<&str>,
        base_url: Option<&str>,
        runtime: Option<&str>,
        entity_id: EntityId,
        workspace_env: ExecEnv,
    ) -> Result<Self, ToolSetError> {
        let mut builder = ToolSetBuilder::default()
            .entity_id(entity_id)
            .workspace_env(workspace_env);
        builder.api_key = api_key.map(str::to_string);
        builder.base_url = base_url.map(str::to_string);
        builder.runtime = runtime.map(str::to_string);
        builder.build()
    }

    /// Start building a toolset.
    #[must_use]
    pub fn builder() -> ToolSetBuilder {
        ToolSetBuilder::default()
    }

    /// Resolved API key.
    #[must_use]
    pub const fn api_key(&self) -> &ApiKey {
        &self.api_key
    }

    /// Runtime tag, if any.
    #[must_use]
    pub fn runtime(&self) -> Option<&str> {
        self.runtime.as_deref()
    }

    /// Default entity.
    #[must_use]
    pub const fn entity_id(&self) -> &EntityId {
        &self.entity_id
    }

    /// Execution environment.
    #[must_use]
    pub const fn workspace_env(&self) -> ExecEnv {
        self.workspace_env
    }

    /// Workspace factory.
    #[must_use]
    pub const fn workspace(&self) -> &Arc<WorkspaceFactory> {
        &self.workspace
    }

    /// Cached local action schemas. Empty until [`Self::setup`] has run in a
    /// remote environment.
    #[must_use]
    pub fn local_actions(&self) -> &[ActionSchema] {
        self.local_actions.get().map(Vec::as_slice).unwrap_or_default()
    }

    /// Provision the workspace and, in remote environments, cache its local
    /// action schemas.
    ///
    /// # Errors
    ///
    /// Returns the workspace's error.
    pub async fn setup(&self) -> Result<(), ToolSetError> {
        let workspace = self
            .workspace
            .new_workspace(self.workspace_env, self.workspace.config())
            .await?;

        if self.workspace_env.is_remote() {
            let workspace = &workspace;
            self.local_actions
                .get_or_try_init(|| async move { workspace.local_actions_schema().await })
                .await?;
        }

        Ok(())
    }

    async fn list_remote(&self, query: &ListActionsQuery) -> Result<ActionList, ToolSetError> {
        Ok(self.client.list_actions(query).await?)
    }

    /// Schemas of the named actions: remote ones first, then local ones.
    ///
    /// # Errors
    ///
    /// Returns the workspace or client error.
    pub async fn get_actions_schema(
        &self,
        filters: &ActionFilters,
        entity_id: Option<&EntityId>,
    ) -> Result<Vec<ActionSchema>, ToolSetError> {
        tracing::debug!(
            actions = ?filters.actions,
            entity = %entity_id.unwrap_or(&self.entity_id),
            "Fetching action schemas"
        );

        let query = filters.to_query();
        let ((), remote) = futures::try_join!(self.setup(), self.list_remote(&query))?;

        let mut schemas = remote.items;
        schemas.extend(filters.select_local(self.local_actions()));
        Ok(schemas)
    }

    /// Schemas of the tools of the filtered apps: remote ones first, then
    /// local ones.
    ///
    /// # Errors
    ///
    /// Returns the workspace or client error.
    pub async fn get_tools_schema(
        &self,
        filters: &ToolFilters,
        entity_id: Option<&EntityId>,
    ) -> Result<Vec<ActionSchema>, ToolSetError> {
        tracing::debug!(
            apps = ?filters.apps,
            tags = ?filters.tags,
            use_case = ?filters.use_case,
            entity = %entity_id.unwrap_or(&self.entity_id),
            "Fetching tool schemas"
        );

        let query = filters.to_query();
        let ((), remote) = futures::try_join!(self.setup(), self.list_remote(&query))?;

        let mut schemas = remote.items;
        schemas.extend(filters.select_local(self.local_actions()));
        Ok(schemas)
    }

    /// Actions in a framework's native tool format.
    ///
    /// # Errors
    ///
    /// Always [`ToolSetError::NotImplemented`]; framework integrations
    /// provide this.
    pub async fn get_actions(
        &self,
        _filters: &ActionFilters,
        _entity_id: Option<&EntityId>,
    ) -> Result<serde_json::Value, ToolSetError> {
        Err(ToolSetError::NotImplemented("get_actions"))
    }

    /// Tools in a framework's native tool format.
    ///
    /// # Errors
    ///
    /// Always [`ToolSetError::NotImplemented`]; framework integrations
    /// provide this.
    pub async fn get_tools(
        &self,
        _filters: &ToolFilters,
        _entity_id: Option<&EntityId>,
    ) -> Result<serde_json::Value, ToolSetError> {
        Err(ToolSetError::NotImplemented("get_tools"))
    }

    /// Execute `action`.
    ///
    /// Remote environments run it in the workspace as the toolset's entity.
    /// On the host it goes to the API as `entity_id`, or as the `default`
    /// entity when `None`.
    ///
    /// # Errors
    ///
    /// Returns the workspace or client error.
    pub async fn execute_action(
        &self,
        action: &str,
        params: ActionParams,
        entity_id: Option<&EntityId>,
    ) -> Result<ActionOutput, ToolSetError> {
        if self.workspace_env.is_remote() {
            let workspace = self.workspace.get().await?;
            let metadata = ExecuteMetadata::for_entity(self.entity_id.clone());
            return Ok(workspace.execute_action(action, params, &metadata).await?);
        }

        let entity = entity_id.cloned().unwrap_or_default();
        Ok(Entity::new(&*self.client, entity)
            .execute(action, params)
            .await?)
    }

    /// Tear down the workspace. Only the first call does anything.
    ///
    /// # Errors
    ///
    /// Returns the workspace's teardown error.
    pub async fn teardown(&self) -> Result<(), ToolSetError> {
        Ok(self.workspace.teardown().await?)
    }
}

impl Drop for ComposioToolSet {
    fn drop(&mut self) {
        if self.workspace.is_torn_down() {
            return;
        }

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::debug!("No Tokio runtime, skipping workspace teardown");
            return;
        };

        let workspace = Arc::clone(&self.workspace);
        handle.spawn(async move {
            if let Err(e) = workspace.teardown().await {
                tracing::warn!(error = %e, "Workspace teardown failed");
            }
        });
    }
}
