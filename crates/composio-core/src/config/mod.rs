//! Configuration loading and validation.
//!
//! Supports JSON5 format. Config location: `~/.composio/config.json`

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::types::{EntityId, ExecEnv};

/// Base URL of the hosted Composio API.
pub const DEFAULT_BASE_URL: &str = "https://backend.composio.dev";

/// Environment variable overriding the state directory.
pub const STATE_DIR_ENV: &str = "COMPOSIO_STATE_DIR";

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON5 parsing error.
    #[error("Parse error: {0}")]
    Parse(#[from] json5::Error),

    /// Config validation error.
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// API key (prefer `COMPOSIO_API_KEY` or the user data file).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// API base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Runtime tag reported to the API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<String>,

    /// Entity actions run for by default.
    #[serde(default)]
    pub entity_id: EntityId,

    /// Workspace configuration.
    #[serde(default)]
    pub workspace: WorkspaceSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            runtime: None,
            entity_id: EntityId::default(),
            workspace: WorkspaceSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Config {
    /// Load configuration from `path`, or the defaults if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns error if an existing file cannot be loaded or parsed.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "No configuration file, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path.
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read, parsed, or fails validation.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = json5::from_str(&content)?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Save configuration to a path.
    ///
    /// # Errors
    ///
    /// Returns error if serialization or file write fails.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::Validation(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default config file path.
    #[must_use]
    pub fn default_path() -> PathBuf {
        Self::default_path_from(|name| std::env::var(name).ok())
    }

    /// Default config file path, reading the environment through `lookup`.
    #[must_use]
    pub fn default_path_from<F>(lookup: F) -> PathBuf
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::state_dir_from(lookup).join("config.json")
    }

    /// Get the Composio state directory.
    ///
    /// Uses `COMPOSIO_STATE_DIR` env var if set, otherwise `~/.composio`.
    #[must_use]
    pub fn state_dir() -> PathBuf {
        Self::state_dir_from(|name| std::env::var(name).ok())
    }

    /// State directory, reading the environment through `lookup`.
    #[must_use]
    pub fn state_dir_from<F>(lookup: F) -> PathBuf
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(STATE_DIR_ENV).filter(|d| !d.is_empty()) {
            PathBuf::from(dir)
        } else if let Some(home) = dirs::home_dir() {
            home.join(".composio")
        } else {
            PathBuf::from(".composio")
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns error if a URL is not http(s) or the entity ID is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_http_url(&self.base_url) {
            return Err(ConfigError::Validation(format!(
                "baseUrl must be an http(s) URL, got '{}'",
                self.base_url
            )));
        }

        if let Some(url) = &self.workspace.url {
            if !is_http_url(url) {
                return Err(ConfigError::Validation(format!(
                    "workspace.url must be an http(s) URL, got '{url}'"
                )));
            }
        }

        if self.entity_id.0.trim().is_empty() {
            return Err(ConfigError::Validation(
                "entityId cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

/// Workspace configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceSettings {
    /// Execution environment.
    #[serde(default)]
    pub env: ExecEnv,

    /// URL of a running tooling server (remote environments).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Access token for the tooling server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingSettings {
    /// Default filter directive, e.g. `info` or `composio_client=debug`.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Log format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format.
    #[default]
    Pretty,
    /// JSON format.
    Json,
}
