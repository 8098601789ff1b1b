//! Core types shared by the client, workspaces, and the toolset.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Input parameters for an action.
pub type ActionParams = serde_json::Map<String, serde_json::Value>;

/// Output of an action execution, passed through untouched.
pub type ActionOutput = serde_json::Value;

/// Identifier of the end user on whose behalf remote actions run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub String);

impl EntityId {
    /// Create a new entity ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the default entity ID.
    #[must_use]
    pub fn default_entity() -> Self {
        Self("default".to_string())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::default_entity()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Execution environment a workspace runs in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecEnv {
    /// The current process. Actions execute through the remote API.
    #[default]
    Host,
    /// A Docker container running the tooling server.
    Docker,
    /// An E2B sandbox.
    E2b,
    /// A Fly.io machine.
    FlyIo,
}

impl ExecEnv {
    /// All known environments.
    pub const ALL: [Self; 4] = [Self::Host, Self::Docker, Self::E2b, Self::FlyIo];

    /// Get string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Host => "host",
            Self::Docker => "docker",
            Self::E2b => "e2b",
            Self::FlyIo => "flyio",
        }
    }

    /// Whether actions run in a separate workspace process.
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        !matches!(self, Self::Host)
    }
}

impl fmt::Display for ExecEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing an [`ExecEnv`] from a string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown execution environment: {0} (expected host, docker, e2b or flyio)")]
pub struct UnknownExecEnv(pub String);

impl FromStr for ExecEnv {
    type Err = UnknownExecEnv;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|env| env.as_str() == lowered)
            .ok_or_else(|| UnknownExecEnv(s.to_string()))
    }
}

/// An action (or tool) description.
///
/// Only the fields the toolset looks at are typed; everything else the
/// service sends is kept in `extra` and serialized back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionSchema {
    /// Unique action name, e.g. `GITHUB_STAR_A_REPOSITORY`.
    pub name: String,

    /// App the action belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,

    /// Remaining fields, preserved verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ActionSchema {
    /// Create a schema with just a name and app.
    #[must_use]
    pub fn new(name: impl Into<String>, app_name: Option<String>) -> Self {
        Self {
            name: name.into(),
            app_name,
            extra: serde_json::Map::new(),
        }
    }

    /// Whether this action belongs to `app`.
    #[must_use]
    pub fn belongs_to(&self, app: &str) -> bool {
        self.app_name.as_deref() == Some(app)
    }
}

/// A page of actions as returned by the list endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionList {
    /// Listed actions.
    #[serde(default)]
    pub items: Vec<ActionSchema>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_exec_env_parsing() {
        assert_eq!("host".parse::<ExecEnv>().unwrap(), ExecEnv::Host);
        assert_eq!("Docker".parse::<ExecEnv>().unwrap(), ExecEnv::Docker);
        assert_eq!(" FLYIO ".parse::<ExecEnv>().unwrap(), ExecEnv::FlyIo);
        assert!("kubernetes".parse::<ExecEnv>().is_err());
    }

    #[test]
    fn test_exec_env_remote() {
        assert!(!ExecEnv::Host.is_remote());
        assert!(ExecEnv::Docker.is_remote());
        assert!(ExecEnv::E2b.is_remote());
        assert_eq!(serde_json::to_string(&ExecEnv::FlyIo).unwrap(), "\"flyio\"");
    }

    #[test]
    fn test_action_schema_keeps_unknown_fields() {
        let raw = serde_json::json!({
            "name": "GITHUB_STAR_A_REPOSITORY",
            "appName": "github",
            "description": "Star a repository",
            "parameters": {"type": "object"}
        });

        let schema: ActionSchema = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(schema.app_name.as_deref(), Some("github"));
        assert!(schema.belongs_to("github"));
        assert_eq!(schema.extra["description"], "Star a repository");
        assert_eq!(serde_json::to_value(&schema).unwrap(), raw);
    }

    #[test]
    fn test_action_list_missing_items() {
        let list: ActionList = serde_json::from_str("{}").unwrap();
        assert!(list.items.is_empty());
    }

    #[test]
    fn test_entity_default() {
        assert_eq!(EntityId::default().0, "default");
        assert_eq!(EntityId::new("alice").to_string(), "alice");
    }
}
