//! Host workspace.

use async_trait::async_trait;

use crate::traits::{ExecuteMetadata, Workspace, WorkspaceError};
use composio_core::types::{ActionOutput, ActionParams, ActionSchema, ExecEnv};

/// The current process.
///
/// Host actions run through the remote API, so this workspace has no local
/// actions and refuses to execute anything itself.
#[derive(Debug, Default)]
pub struct HostWorkspace;

impl HostWorkspace {
    /// Create a host workspace.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Workspace for HostWorkspace {
    fn id(&self) -> &str {
        "host"
    }

    fn env(&self) -> ExecEnv {
        ExecEnv::Host
    }

    async fn local_actions_schema(&self) -> Result<Vec<ActionSchema>, WorkspaceError> {
        Ok(vec![])
    }

    async fn execute_action(
        &self,
        action: &str,
        _params: ActionParams,
        _metadata: &ExecuteMetadata,
    ) -> Result<ActionOutput, WorkspaceError> {
        Err(WorkspaceError::Unsupported(format!(
            "host workspace cannot execute '{action}', use the remote API"
        )))
    }

    async fn teardown(&self) -> Result<(), WorkspaceError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_host_workspace() {
        let host = HostWorkspace::new();
        assert_eq!(host.env(), ExecEnv::Host);
        assert!(host.local_actions_schema().await.unwrap().is_empty());

        let err = host
            .execute_action("NOOP", ActionParams::new(), &ExecuteMetadata::default())
            .await
            .unwrap_err();
        assert!(matches!(err, WorkspaceError::Unsupported(_)));
        assert!(host.teardown().await.is_ok());
    }
}
