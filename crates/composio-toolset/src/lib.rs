//! # Composio Toolset
//!
//! [`ComposioToolSet`] resolves an API key, builds the API client, provisions
//! a workspace, and serves action catalogs and executions from both.
//!
//! ```no_run
//! # async fn run() -> Result<(), composio_toolset::ToolSetError> {
//! use composio_toolset::{ActionFilters, ComposioToolSet};
//!
//! let toolset = ComposioToolSet::builder().build()?;
//! let schemas = toolset
//!     .get_actions_schema(&ActionFilters::actions(["GITHUB_STAR_A_REPOSITORY"]), None)
//!     .await?;
//! # let _ = schemas;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod filters;
mod toolset;

pub use error::ToolSetError;
pub use filters::{ActionFilters, ToolFilters};
pub use toolset::{ComposioToolSet, ToolSetBuilder};

pub use composio_client::{ComposioApi, HttpClient};
pub use composio_core::types::{ActionOutput, ActionParams, ActionSchema, EntityId, ExecEnv};
pub use composio_workspace::{Workspace, WorkspaceFactory, WorkspaceProvider};
