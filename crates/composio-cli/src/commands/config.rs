//! Config command - show the effective configuration.

use std::path::Path;

use crate::commands::ToolsetArgs;
use crate::ui;
use anyhow::Result;
use composio_core::config::Config;

/// Config with flags applied and secrets redacted.
fn effective_config(config: &Config, args: &ToolsetArgs) -> Config {
    let mut effective = config.clone();

    if args.api_key.is_some() {
        effective.api_key.clone_from(&args.api_key);
    }
    if let Some(base_url) = &args.base_url {
        effective.base_url.clone_from(base_url);
    }
    if let Some(entity_id) = &args.entity_id {
        effective.entity_id.0.clone_from(entity_id);
    }
    if let Some(env) = args.env {
        effective.workspace.env = env;
    }
    if args.workspace_url.is_some() {
        effective.workspace.url.clone_from(&args.workspace_url);
    }

    if effective.api_key.is_some() {
        effective.api_key = Some("[REDACTED]".to_string());
    }
    if effective.workspace.access_token.is_some() {
        effective.workspace.access_token = Some("[REDACTED]".to_string());
    }

    effective
}

/// Show the effective configuration.
pub fn run_config_show(path: &Path, config: &Config, args: &ToolsetArgs) -> Result<()> {
    if path.exists() {
        ui::kv("Config file", &path.display().to_string());
    } else {
        ui::warning(&format!(
            "Config file not found: {} (using defaults)",
            path.display()
        ));
    }

    ui::json(&effective_config(config, args))
}
