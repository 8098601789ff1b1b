//! Workspace trait and shared types.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use composio_core::config::DEFAULT_BASE_URL;
use composio_core::secrets::ApiKey;
use composio_core::types::{ActionOutput, ActionParams, ActionSchema, EntityId, ExecEnv};

/// Workspace errors.
#[derive(Error, Debug)]
pub enum WorkspaceError {
    /// No provider registered for the environment.
    #[error("No workspace provider for environment: {0}")]
    NoProvider(ExecEnv),

    /// Operation not supported by this workspace.
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// Workspace was torn down.
    #[error("Workspace has been torn down")]
    Closed,

    /// Network error talking to the tooling server.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Tooling server returned a non-success status.
    #[error("Tooling server error: {status} - {message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Response body.
        message: String,
    },

    /// Action ran but reported an error.
    #[error("Execution error: {0}")]
    Execution(String),

    /// Invalid workspace configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Settings handed to providers when a workspace is provisioned.
#[derive(Debug, Clone)]
pub struct WorkspaceConfig {
    /// API key the workspace uses to reach the Composio API.
    pub api_key: ApiKey,
    /// Composio API base URL.
    pub base_url: String,
    /// URL of an already running tooling server.
    pub url: Option<String>,
    /// Access token for the tooling server.
    pub access_token: Option<ApiKey>,
}

impl WorkspaceConfig {
    /// Config pointing at the hosted API.
    #[must_use]
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            url: None,
            access_token: None,
        }
    }

    /// Set the API base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the tooling server URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the tooling server access token.
    #[must_use]
    pub fn with_access_token(mut self, token: ApiKey) -> Self {
        self.access_token = Some(token);
        self
    }
}

/// Context sent along with an execution.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExecuteMetadata {
    /// Entity the action runs for.
    pub entity_id: EntityId,
    /// Free-form metadata forwarded to the tooling server.
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl ExecuteMetadata {
    /// Metadata for `entity_id` with no extra fields.
    #[must_use]
    pub fn for_entity(entity_id: EntityId) -> Self {
        Self {
            entity_id,
            metadata: serde_json::Map::new(),
        }
    }
}

/// An environment actions can run in.
#[async_trait]
pub trait Workspace: Send + Sync {
    /// Workspace identifier.
    fn id(&self) -> &str;

    /// Environment this workspace runs in.
    fn env(&self) -> ExecEnv;

    /// Schemas of actions that only exist inside this workspace.
    async fn local_actions_schema(&self) -> Result<Vec<ActionSchema>, WorkspaceError>;

    /// Execute an action inside the workspace.
    async fn execute_action(
        &self,
        action: &str,
        params: ActionParams,
        metadata: &ExecuteMetadata,
    ) -> Result<ActionOutput, WorkspaceError>;

    /// Release the workspace. Calling it more than once is a no-op.
    async fn teardown(&self) -> Result<(), WorkspaceError>;
}
