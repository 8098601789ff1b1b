//! Client traits.

use async_trait::async_trait;
use thiserror::Error;

use composio_core::types::{ActionList, ActionOutput, ActionParams, EntityId};

/// Client errors.
#[derive(Error, Debug)]
pub enum ClientError {
    /// API error.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message.
        message: String,
    },

    /// Network error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Rate limited.
    #[error("Rate limited, retry after {retry_after_secs} seconds")]
    RateLimited {
        /// Seconds to wait before retry.
        retry_after_secs: u64,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Filters for the action list endpoint.
///
/// List-valued filters are sent comma-joined; unset filters are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListActionsQuery {
    /// Specific action names.
    pub actions: Option<Vec<String>>,
    /// Apps to list actions for.
    pub apps: Option<Vec<String>>,
    /// Tags to filter by.
    pub tags: Option<Vec<String>>,
    /// Include actions hidden by default.
    pub show_all: bool,
    /// Only return the most important actions of each app.
    pub filter_important_actions: Option<bool>,
    /// Free-text use case to match against.
    pub use_case: Option<String>,
}

impl ListActionsQuery {
    /// Query string pairs, in a stable order.
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        if let Some(actions) = &self.actions {
            pairs.push(("actions", actions.join(",")));
        }
        if let Some(apps) = &self.apps {
            pairs.push(("apps", apps.join(",")));
        }
        if let Some(tags) = &self.tags {
            pairs.push(("tags", tags.join(",")));
        }
        pairs.push(("showAll", self.show_all.to_string()));
        if let Some(important) = self.filter_important_actions {
            pairs.push(("filterImportantActions", important.to_string()));
        }
        if let Some(use_case) = &self.use_case {
            pairs.push(("useCase", use_case.clone()));
        }

        pairs
    }
}

/// Remote action API.
#[async_trait]
pub trait ComposioApi: Send + Sync {
    /// List action schemas matching `query`.
    async fn list_actions(&self, query: &ListActionsQuery) -> Result<ActionList, ClientError>;

    /// Execute `action` for `entity`.
    async fn execute_action(
        &self,
        entity: &EntityId,
        action: &str,
        params: ActionParams,
    ) -> Result<ActionOutput, ClientError>;
}
