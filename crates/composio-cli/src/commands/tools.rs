//! Tools command - show tool schemas for apps.

use crate::ui;
use anyhow::Result;
use composio_toolset::{ComposioToolSet, ToolFilters};

/// Tools command arguments.
#[derive(Debug, Clone, Default)]
pub struct ToolsArgs {
    /// Apps to list tools for.
    pub apps: Vec<String>,
    /// Tags to filter by.
    pub tags: Vec<String>,
    /// Use case to match.
    pub use_case: Option<String>,
}

impl ToolsArgs {
    fn into_filters(self) -> ToolFilters {
        ToolFilters {
            apps: self.apps,
            tags: (!self.tags.is_empty()).then_some(self.tags),
            use_case: self.use_case,
        }
    }
}

/// Run the tools command.
pub async fn run_tools(toolset: &ComposioToolSet, args: ToolsArgs) -> Result<()> {
    let filters = args.into_filters();

    let schemas = toolset.get_tools_schema(&filters, None).await?;
    ui::json(&schemas)?;
    ui::success(&format!(
        "{} tool(s) for {}",
        schemas.len(),
        filters.apps.join(", ")
    ));

    Ok(())
}
