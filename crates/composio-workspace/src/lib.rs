//! # Composio Workspace
//!
//! Execution environments for actions: the host process, or a tooling
//! server running in a sandbox. The factory provisions one workspace per
//! toolset and tears it down once.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod factory;
pub mod host;
pub mod remote;
pub mod traits;

pub use factory::{EndpointProvider, HostProvider, WorkspaceFactory, WorkspaceProvider};
pub use host::HostWorkspace;
pub use remote::RemoteWorkspace;
pub use traits::{ExecuteMetadata, Workspace, WorkspaceConfig, WorkspaceError};
