//! HTTP implementation of the Composio API.

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::entity::Entity;
use crate::traits::{ClientError, ComposioApi, ListActionsQuery};
use composio_core::config::DEFAULT_BASE_URL;
use composio_core::secrets::{ApiKey, COMMON_SECRET_PATTERNS, scrub_secrets};
use composio_core::types::{ActionList, ActionOutput, ActionParams, EntityId};

const RUNTIME_HEADER: &str = "x-composio-runtime";

/// Composio API client over HTTP.
pub struct HttpClient {
    client: Client,
    api_key: ApiKey,
    base_url: String,
    runtime: Option<String>,
}

impl HttpClient {
    /// Create a client for the hosted API.
    #[must_use]
    pub fn new(api_key: ApiKey) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create with custom base URL.
    #[must_use]
    pub fn with_base_url(api_key: ApiKey, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            runtime: None,
        }
    }

    /// Set the runtime tag sent with every request.
    #[must_use]
    pub fn with_runtime(mut self, runtime: impl Into<String>) -> Self {
        self.runtime = Some(runtime.into());
        self
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Handle for executing actions as `id`.
    #[must_use]
    pub const fn entity(&self, id: EntityId) -> Entity<'_, Self> {
        Entity::new(self, id)
    }

    /// URL of the endpoint at `segments` below the base URL. Each segment is
    /// percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let invalid = || ClientError::Config(format!("Invalid base URL: {}", self.base_url));

        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|()| invalid())?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: reqwest::Method, url: Url) -> reqwest::RequestBuilder {
        let mut builder = self
            .client
            .request(method, url)
            .header("x-api-key", self.api_key.expose());

        if let Some(runtime) = &self.runtime {
            builder = builder.header(RUNTIME_HEADER, runtime);
        }

        builder
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExecuteRequest<'a> {
    entity_id: &'a str,
    input: ActionParams,
}

/// Map non-success responses to errors.
async fn check_status(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status.as_u16() == 429 {
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .unwrap_or(60);
        return Err(ClientError::RateLimited {
            retry_after_secs: retry_after,
        });
    }

    let body = response.text().await.unwrap_or_default();
    Err(ClientError::Api {
        status: status.as_u16(),
        message: scrub_secrets(&body, COMMON_SECRET_PATTERNS),
    })
}

/// Decode a successful response body.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let body = check_status(response).await?.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}

#[async_trait]
impl ComposioApi for HttpClient {
    async fn list_actions(&self, query: &ListActionsQuery) -> Result<ActionList, ClientError> {
        let pairs = query.to_query_pairs();
        tracing::debug!(query = ?pairs, "Listing actions");

        let url = self.endpoint(&["api", "v2", "actions"])?;
        let response = self
            .request(reqwest::Method::GET, url)
            .query(&pairs)
            .send()
            .await?;

        let list: ActionList = decode(response).await?;
        tracing::debug!(count = list.items.len(), "Listed actions");
        Ok(list)
    }

    async fn execute_action(
        &self,
        entity: &EntityId,
        action: &str,
        params: ActionParams,
    ) -> Result<ActionOutput, ClientError> {
        if action.is_empty() {
            return Err(ClientError::Config("Action name cannot be empty".to_string()));
        }

        tracing::debug!(action, entity = %entity, "Executing action");

        let body = ExecuteRequest {
            entity_id: entity.as_ref(),
            input: params,
        };

        let url = self.endpoint(&["api", "v2", "actions", action, "execute"])?;
        let response = self
            .request(reqwest::Method::POST, url)
            .json(&body)
            .send()
            .await?;

        decode(response).await
    }
}
