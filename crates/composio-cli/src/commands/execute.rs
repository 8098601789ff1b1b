//! Execute command - run one action.

use crate::ui;
use anyhow::{Context, Result};
use composio_toolset::{ActionParams, ComposioToolSet, EntityId};

/// Execute command arguments.
#[derive(Debug, Clone)]
pub struct ExecuteArgs {
    /// Action name.
    pub action: String,
    /// Parameters as a JSON object.
    pub params: String,
    /// Entity override.
    pub entity: Option<String>,
}

/// Parse `--params` into an object.
fn parse_params(raw: &str) -> Result<ActionParams> {
    let value: serde_json::Value =
        serde_json::from_str(raw).context("--params is not valid JSON")?;

    match value {
        serde_json::Value::Object(params) => Ok(params),
        other => anyhow::bail!("--params must be a JSON object, got {other}"),
    }
}

/// Run the execute command.
pub async fn run_execute(toolset: &ComposioToolSet, args: ExecuteArgs) -> Result<()> {
    let params = parse_params(&args.params)?;
    let entity = args
        .entity
        .map_or_else(|| toolset.entity_id().clone(), EntityId::new);

    ui::info(&format!(
        "Executing {} in {} environment",
        args.action,
        toolset.workspace_env()
    ));

    let output = toolset
        .execute_action(&args.action, params, Some(&entity))
        .await
        .with_context(|| format!("Failed to execute {}", args.action))?;

    ui::json(&output)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_params() {
        let params = parse_params(r#"{"owner": "composiohq"}"#).unwrap();
        assert_eq!(params["owner"], "composiohq");
    }

    #[test]
    fn test_parse_params_rejects_non_objects() {
        assert!(parse_params("[1, 2]").is_err());
        assert!(parse_params("not json").is_err());
    }
}
