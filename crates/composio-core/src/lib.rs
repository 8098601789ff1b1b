//! # Composio Core
//!
//! Core types, configuration, and API key handling for the Composio toolset.
//!
//! This crate provides:
//! - Configuration loading and validation (JSON5 format)
//! - API key resolution (argument, environment, user data file)
//! - Opaque action records shared by the client and workspaces

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod secrets;
pub mod types;

pub use config::{Config, ConfigError, DEFAULT_BASE_URL};
pub use secrets::{ApiKey, KeyError, UserData, resolve_api_key, scrub_secrets};
pub use types::{ActionList, ActionOutput, ActionParams, ActionSchema, EntityId, ExecEnv};

