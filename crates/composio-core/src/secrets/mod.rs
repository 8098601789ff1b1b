//! API key handling.
//!
//! - `ApiKey`: Wrapper that prevents accidental logging
//! - `resolve_api_key`: Argument, then `COMPOSIO_API_KEY`, then the user data file
//! - `scrub_secrets`: Redact secrets from error messages

use secrecy::{ExposeSecret, SecretBox};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable consulted for the API key.
pub const API_KEY_ENV: &str = "COMPOSIO_API_KEY";

/// Errors from API key resolution.
#[derive(Error, Debug)]
pub enum KeyError {
    /// No source produced a key.
    #[error(
        "API key is required, please pass it either by using `COMPOSIO_API_KEY` environment variable or during initialization"
    )]
    Missing,
}

/// API key wrapper that prevents accidental logging.
///
/// The inner value is wrapped with `secrecy::SecretBox` to ensure
/// it's not accidentally printed in logs or debug output.
#[derive(Clone)]
pub struct ApiKey(SecretBox<str>);

impl ApiKey {
    /// Create a new API key.
    #[must_use]
    pub fn new(key: String) -> Self {
        Self(SecretBox::new(key.into_boxed_str()))
    }

    /// Expose the secret for actual API calls.
    ///
    /// Use sparingly - only when actually sending to an API.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ApiKey([REDACTED])")
    }
}

impl std::fmt::Display for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[REDACTED]")
    }
}

/// Contents of `~/.composio/userData.json` written by the login flow.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    /// Stored API key.
    #[serde(default)]
    pub api_key: Option<String>,
}

impl UserData {
    /// Default location of the user data file.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".composio").join("userData.json"))
    }

    /// Load user data, treating an unreadable or malformed file as empty.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };

        serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::debug!(path = %path.display(), error = %e, "Ignoring malformed user data file");
            Self::default()
        })
    }
}

/// Resolve the API key.
///
/// Sources, in order: `explicit`, the `COMPOSIO_API_KEY` variable read
/// through `env`, then the `apiKey` field of the user data file. Empty
/// values are skipped.
///
/// # Errors
///
/// Returns [`KeyError::Missing`] if no source yields a key.
pub fn resolve_api_key<F>(
    explicit: Option<&str>,
    env: F,
    user_data_path: Option<&Path>,
) -> Result<ApiKey, KeyError>
where
    F: Fn(&str) -> Option<String>,
{
    let from_user_data = || {
        user_data_path
            .map(UserData::load)
            .and_then(|data| data.api_key)
    };

    explicit
        .map(str::to_string)
        .filter(|k| !k.is_empty())
        .or_else(|| env(API_KEY_ENV).filter(|k| !k.is_empty()))
        .or_else(|| from_user_data().filter(|k| !k.is_empty()))
        .map(ApiKey::new)
        .ok_or(KeyError::Missing)
}

/// Scrub secrets from error messages and logs.
///
/// Replaces values after known secret patterns with `[REDACTED]`.
///
/// # Arguments
///
/// * `text` - Text to scrub
/// * `patterns` - Patterns to look for (e.g., `["api_key=", "token="]`)
#[must_use]
pub fn scrub_secrets(text: &str, patterns: &[&str]) -> String {
    let mut result = text.to_string();

    for pattern in patterns {
        let mut search_start = 0;
        while let Some(start) = result[search_start..].find(pattern) {
            let abs_start = search_start + start + pattern.len();

            // Value ends at whitespace, a quote, or a separator
            let end = result[abs_start..]
                .find(|c: char| c.is_whitespace() || c == '"' || c == '\'' || c == '&' || c == ',')
                .map_or(result.len(), |e| abs_start + e);

            result.replace_range(abs_start..end, "[REDACTED]");

            search_start = abs_start + "[REDACTED]".len();
        }
    }

    result
}

/// Common secret patterns to scrub from logs.
pub const COMMON_SECRET_PATTERNS: &[&str] = &[
    "api_key=",
    "apiKey=",
    "api-key=",
    "token=",
    "\"apiKey\":\"",
    "\"api_key\":\"",
    "\"accessToken\":\"",
    "x-api-key: ",
    "Authorization: Bearer ",
];

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_api_key_redaction() {
        let key = ApiKey::new("sk-secret-key-12345".to_string());

        assert_eq!(format!("{key:?}"), "ApiKey([REDACTED])");
        assert_eq!(format!("{key}"), "[REDACTED]");
        assert_eq!(key.expose(), "sk-secret-key-12345");
    }

    #[test]
    fn test_explicit_key_wins() {
        let key = resolve_api_key(Some("explicit"), |_| Some("from-env".into()), None).unwrap();
        assert_eq!(key.expose(), "explicit");
    }

    #[test]
    fn test_env_key_used_when_no_argument() {
        let key = resolve_api_key(
            None,
            |name| (name == API_KEY_ENV).then(|| "from-env".to_string()),
            None,
        )
        .unwrap();
        assert_eq!(key.expose(), "from-env");
    }

    #[test]
    fn test_empty_values_are_skipped() {
        let key = resolve_api_key(Some(""), |_| Some("from-env".into()), None).unwrap();
        assert_eq!(key.expose(), "from-env");

        let result = resolve_api_key(Some(""), |_| Some(String::new()), None);
        assert!(matches!(result, Err(KeyError::Missing)));
    }

    #[test]
    fn test_user_data_fallback() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("userData.json");
        std::fs::write(&path, r#"{"apiKey": "from-file", "email": "a@b.c"}"#).unwrap();

        let key = resolve_api_key(None, no_env, Some(&path)).unwrap();
        assert_eq!(key.expose(), "from-file");
    }

    #[test]
    fn test_malformed_user_data_is_absent() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("userData.json");
        std::fs::write(&path, "not json").unwrap();

        let result = resolve_api_key(None, no_env, Some(&path));
        assert!(matches!(result, Err(KeyError::Missing)));

        let missing = temp.path().join("nope.json");
        assert!(resolve_api_key(None, no_env, Some(&missing)).is_err());
    }

    #[test]
    fn test_empty_user_data_key_is_absent() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("userData.json");
        std::fs::write(&path, r#"{"apiKey": ""}"#).unwrap();

        let result = resolve_api_key(None, no_env, Some(&path));
        assert!(matches!(result, Err(KeyError::Missing)));
    }

    #[test]
    fn test_missing_key_message() {
        let err = resolve_api_key(None, no_env, None).unwrap_err();
        assert!(err.to_string().contains("COMPOSIO_API_KEY"));
    }

    #[test]
    fn test_scrub_secrets() {
        let text = "Error: api_key=sk-12345 failed with token=abc123";
        let scrubbed = scrub_secrets(text, &["api_key=", "token="]);
        assert_eq!(
            scrubbed,
            "Error: api_key=[REDACTED] failed with token=[REDACTED]"
        );
    }

    #[test]
    fn test_scrub_secrets_json_body() {
        let text = r#"{"apiKey":"sk-secret","other":"value"}"#;
        let scrubbed = scrub_secrets(text, COMMON_SECRET_PATTERNS);
        assert!(scrubbed.contains("[REDACTED]"));
        assert!(!scrubbed.contains("sk-secret"));
    }
}
