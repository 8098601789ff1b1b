//! # Composio Client
//!
//! HTTP client for the Composio action API: listing action schemas and
//! executing actions on behalf of an entity.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod traits;
mod entity;
mod http;

pub use traits::{ComposioApi, ClientError, ListActionsQuery};
pub use entity::Entity;
pub use http::HttpClient;
