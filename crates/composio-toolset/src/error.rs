//! Toolset errors.

use thiserror::Error;

use composio_client::ClientError;
use composio_core::{ConfigError, KeyError};
use composio_workspace::WorkspaceError;

/// Toolset errors. Collaborator errors pass through unchanged.
#[derive(Error, Debug)]
pub enum ToolSetError {
    /// No API key could be resolved.
    #[error(transparent)]
    Key(#[from] KeyError),

    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Remote API failure.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Workspace failure.
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    /// Operation left to framework integrations.
    #[error("Not implemented: {0}")]
    NotImplemented(&'static str),
}
