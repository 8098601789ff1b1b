//! Actions command - show action schemas.

use crate::ui;
use anyhow::Result;
use composio_toolset::{ActionFilters, ComposioToolSet};

/// Run the actions command.
pub async fn run_actions(toolset: &ComposioToolSet, actions: Vec<String>) -> Result<()> {
    let filters = ActionFilters {
        actions: (!actions.is_empty()).then_some(actions),
    };

    let schemas = toolset.get_actions_schema(&filters, None).await?;
    ui::json(&schemas)?;
    ui::success(&format!("{} action(s)", schemas.len()));

    Ok(())
}
