//! Workspace backed by a running tooling server.
//!
//! The server exposes:
//! - `GET  /api/actions` - schemas of actions available in the sandbox
//! - `POST /api/actions/execute/{action}` - run one of them
//!
//! Both respond with `{ "data": ..., "error": ... }`.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::{Deserialize, Serialize};

use crate::traits::{ExecuteMetadata, Workspace, WorkspaceError};
use composio_core::secrets::{ApiKey, COMMON_SECRET_PATTERNS, scrub_secrets};
use composio_core::types::{ActionOutput, ActionParams, ActionSchema, ExecEnv};

/// Remote workspace.
pub struct RemoteWorkspace {
    id: String,
    env: ExecEnv,
    client: Client,
    url: String,
    access_token: Option<ApiKey>,
    closed: AtomicBool,
}

impl RemoteWorkspace {
    /// Connect to the tooling server at `url`.
    #[must_use]
    pub fn new(env: ExecEnv, url: impl Into<String>, access_token: Option<ApiKey>) -> Self {
        let url: String = url.into();
        let url = url.trim_end_matches('/').to_string();
        Self {
            id: format!("{env}@{url}"),
            env,
            client: Client::new(),
            url,
            access_token,
            closed: AtomicBool::new(false),
        }
    }

    /// Tooling server URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    fn ensure_open(&self) -> Result<(), WorkspaceError> {
        if self.closed.load(Ordering::Acquire) {
            Err(WorkspaceError::Closed)
        } else {
            Ok(())
        }
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, WorkspaceError> {
        let invalid = || WorkspaceError::Config(format!("Invalid tooling server URL: {}", self.url));

        let mut url = Url::parse(&self.url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|()| invalid())?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: reqwest::Method, url: Url) -> reqwest::RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.access_token {
            Some(token) => builder.header("x-api-key", token.expose()),
            None => builder,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ServerResponse<T> {
    data: Option<T>,
    #[serde(default)]
    error: Option<String>,
}

impl<T> ServerResponse<T> {
    fn into_result(self) -> Result<Option<T>, WorkspaceError> {
        match self.error {
            Some(error) => Err(WorkspaceError::Execution(error)),
            None => Ok(self.data),
        }
    }
}

#[derive(Debug, Serialize)]
struct ExecuteRequest<'a> {
    params: ActionParams,
    #[serde(flatten)]
    metadata: &'a ExecuteMetadata,
}

async fn check_status(response: Response) -> Result<Response, WorkspaceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(WorkspaceError::Server {
        status: status.as_u16(),
        message: scrub_secrets(&body, COMMON_SECRET_PATTERNS),
    })
}

#[async_trait]
impl Workspace for RemoteWorkspace {
    fn id(&self) -> &str {
        &self.id
    }

    fn env(&self) -> ExecEnv {
        self.env
    }

    async fn local_actions_schema(&self) -> Result<Vec<ActionSchema>, WorkspaceError> {
        self.ensure_open()?;

        let url = self.endpoint(&["api", "actions"])?;
        let response = self
            .request(reqwest::Method::GET, url)
            .send()
            .await?;
        let body: ServerResponse<Vec<ActionSchema>> = check_status(response).await?.json().await?;

        let actions = body.into_result()?.unwrap_or_default();
        tracing::debug!(workspace = %self.id, count = actions.len(), "Fetched local actions");
        Ok(actions)
    }

    async fn execute_action(
        &self,
        action: &str,
        params: ActionParams,
        metadata: &ExecuteMetadata,
    ) -> Result<ActionOutput, WorkspaceError> {
        self.ensure_open()?;
        tracing::debug!(workspace = %self.id, action, entity = %metadata.entity_id, "Executing action in workspace");

        let url = self.endpoint(&["api", "actions", "execute", action])?;
        let response = self
            .request(reqwest::Method::POST, url)
            .json(&ExecuteRequest { params, metadata })
            .send()
            .await?;
        let body: ServerResponse<ActionOutput> = check_status(response).await?.json().await?;

        Ok(body.into_result()?.unwrap_or_default())
    }

    async fn teardown(&self) -> Result<(), WorkspaceError> {
        if !self.closed.swap(true, Ordering::AcqRel) {
            tracing::info!(workspace = %self.id, "Workspace torn down");
        }
        Ok(())
    }
}
