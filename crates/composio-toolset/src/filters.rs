//! Catalog filters and the local/remote merge.

use composio_client::ListActionsQuery;
use composio_core::types::ActionSchema;

/// Filters for [`crate::ComposioToolSet::get_actions_schema`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionFilters {
    /// Action names to fetch. `None` lists without a name filter.
    pub actions: Option<Vec<String>>,
}

impl ActionFilters {
    /// Filter on the given action names.
    pub fn actions<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            actions: Some(names.into_iter().map(Into::into).collect()),
        }
    }

    /// Remote list query for these filters.
    #[must_use]
    pub fn to_query(&self) -> ListActionsQuery {
        ListActionsQuery {
            actions: self.actions.clone(),
            show_all: true,
            ..Default::default()
        }
    }

    /// Local actions named in the filter, first match per name.
    #[must_use]
    pub fn select_local(&self, local: &[ActionSchema]) -> Vec<ActionSchema> {
        let mut selected = Vec::new();
        for name in self.actions.iter().flatten() {
            if let Some(action) = local.iter().find(|a| &a.name == name) {
                upsert_by_name(&mut selected, action);
            }
        }
        selected
    }
}

/// Filters for [`crate::ComposioToolSet::get_tools_schema`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolFilters {
    /// Apps to list tools for.
    pub apps: Vec<String>,
    /// Tags to filter by.
    pub tags: Option<Vec<String>>,
    /// Free-text use case.
    pub use_case: Option<String>,
}

impl ToolFilters {
    /// Filter on the given apps.
    pub fn apps<I, S>(apps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            apps: apps.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Restrict to the given tags.
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    /// Match against a use case.
    #[must_use]
    pub fn with_use_case(mut self, use_case: impl Into<String>) -> Self {
        self.use_case = Some(use_case.into());
        self
    }

    /// Remote list query for these filters.
    ///
    /// Without tags or a use case only the important actions of each app
    /// are requested. An empty use case counts as none.
    #[must_use]
    pub fn to_query(&self) -> ListActionsQuery {
        let use_case = self.use_case.clone().filter(|u| !u.is_empty());
        ListActionsQuery {
            apps: Some(self.apps.clone()),
            tags: self.tags.clone(),
            show_all: true,
            filter_important_actions: Some(self.tags.is_none() && use_case.is_none()),
            use_case,
            ..Default::default()
        }
    }

    /// Local actions of the filtered apps, one per name.
    #[must_use]
    pub fn select_local(&self, local: &[ActionSchema]) -> Vec<ActionSchema> {
        let mut selected = Vec::new();
        for app in &self.apps {
            for action in local.iter().filter(|a| a.belongs_to(app)) {
                upsert_by_name(&mut selected, action);
            }
        }
        selected
    }
}

/// Insert `action`, replacing an entry with the same name in place.
fn upsert_by_name(selected: &mut Vec<ActionSchema>, action: &ActionSchema) {
    match selected.iter_mut().find(|a| a.name == action.name) {
        Some(existing) => existing.clone_from(action),
        None => selected.push(action.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn action(name: &str, app: &str) -> ActionSchema {
        ActionSchema::new(name, Some(app.to_string()))
    }

    fn names(actions: &[ActionSchema]) -> Vec<&str> {
        actions.iter().map(|a| a.name.as_str()).collect()
    }

    fn local() -> Vec<ActionSchema> {
        vec![
            action("FILETOOL_LIST_FILES", "filetool"),
            action("SHELLTOOL_EXEC_COMMAND", "shelltool"),
            action("FILETOOL_OPEN_FILE", "filetool"),
        ]
    }

    #[test]
    fn test_select_local_by_name_follows_request_order() {
        let filters = ActionFilters::actions([
            "FILETOOL_OPEN_FILE",
            "GITHUB_STAR_A_REPOSITORY",
            "SHELLTOOL_EXEC_COMMAND",
            "FILETOOL_OPEN_FILE",
        ]);

        let selected = filters.select_local(&local());
        assert_eq!(names(&selected), vec!["FILETOOL_OPEN_FILE", "SHELLTOOL_EXEC_COMMAND"]);
    }

    #[test]
    fn test_select_local_without_names() {
        assert!(ActionFilters::default().select_local(&local()).is_empty());
    }

    #[test]
    fn test_select_local_by_app() {
        let filters = ToolFilters::apps(["filetool", "github", "filetool"]);
        let selected = filters.select_local(&local());
        assert_eq!(names(&selected), vec!["FILETOOL_LIST_FILES", "FILETOOL_OPEN_FILE"]);
    }

    #[test]
    fn test_action_query() {
        let query = ActionFilters::actions(["A", "B"]).to_query();
        assert_eq!(query.actions, Some(vec!["A".to_string(), "B".to_string()]));
        assert!(query.show_all);
        assert_eq!(query.filter_important_actions, None);
    }

    #[test]
    fn test_tool_query_important_only_without_tags_or_use_case() {
        let query = ToolFilters::apps(["github"]).to_query();
        assert_eq!(query.filter_important_actions, Some(true));
        assert!(query.show_all);

        let query = ToolFilters::apps(["github"]).with_tags(["issues"]).to_query();
        assert_eq!(query.filter_important_actions, Some(false));
        assert_eq!(query.tags, Some(vec!["issues".to_string()]));

        let query = ToolFilters::apps(["github"]).with_use_case("star a repo").to_query();
        assert_eq!(query.filter_important_actions, Some(false));
        assert_eq!(query.use_case.as_deref(), Some("star a repo"));
    }

    #[test]
    fn test_tool_query_empty_use_case_is_absent() {
        let query = ToolFilters::apps(["github"]).with_use_case("").to_query();
        assert_eq!(query.filter_important_actions, Some(true));
        assert_eq!(query.use_case, None);
        assert!(!query.to_query_pairs().iter().any(|(key, _)| *key == "useCase"));
    }
}
