//! CLI command implementations.

pub mod actions;
pub mod config;
pub mod execute;
pub mod tools;

pub use actions::run_actions;
pub use config::run_config_show;
pub use execute::run_execute;
pub use tools::run_tools;

use clap::Args;
use composio_core::config::Config;
use composio_core::types::{EntityId, ExecEnv};
use composio_toolset::{ComposioToolSet, ToolSetBuilder};

/// Runtime tag sent when the config does not name one.
const CLI_RUNTIME: &str = "composio-cli";

/// Toolset options shared by every command. Unset flags fall back to the
/// config file.
#[derive(Debug, Clone, Default, Args)]
pub struct ToolsetArgs {
    /// API key
    #[arg(long, global = true, env = "COMPOSIO_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// API base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Entity to run actions for
    #[arg(long, global = true)]
    pub entity_id: Option<String>,

    /// Execution environment: host, docker, e2b, flyio
    #[arg(long, global = true)]
    pub env: Option<ExecEnv>,

    /// Tooling server URL for remote environments
    #[arg(long, global = true)]
    pub workspace_url: Option<String>,
}

impl ToolsetArgs {
    /// Builder with config values overridden by flags.
    pub fn builder(&self, config: &Config) -> ToolSetBuilder {
        let mut builder = ToolSetBuilder::from_config(config);

        if config.runtime.is_none() {
            builder = builder.runtime(CLI_RUNTIME);
        }
        if let Some(api_key) = &self.api_key {
            builder = builder.api_key(api_key.clone());
        }
        if let Some(base_url) = &self.base_url {
            builder = builder.base_url(base_url.clone());
        }
        if let Some(entity_id) = &self.entity_id {
            builder = builder.entity_id(EntityId::new(entity_id.clone()));
        }
        if let Some(env) = self.env {
            builder = builder.workspace_env(env);
        }
        if let Some(url) = &self.workspace_url {
            builder = builder.workspace_url(url.clone());
        }

        builder
    }

    /// Build the toolset.
    pub fn build(&self, config: &Config) -> anyhow::Result<ComposioToolSet> {
        Ok(self.builder(config).build()?)
    }
}
