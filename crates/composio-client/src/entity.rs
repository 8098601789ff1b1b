//! Entity handle.

use composio_core::types::{ActionOutput, ActionParams, EntityId};

use crate::traits::{ClientError, ComposioApi};

/// An end user of the remote API, bound to a client.
pub struct Entity<'a, A: ComposioApi + ?Sized> {
    api: &'a A,
    id: EntityId,
}

impl<'a, A: ComposioApi + ?Sized> Entity<'a, A> {
    /// Bind `id` to `api`.
    #[must_use]
    pub const fn new(api: &'a A, id: EntityId) -> Self {
        Self { api, id }
    }

    /// Entity ID.
    #[must_use]
    pub const fn id(&self) -> &EntityId {
        &self.id
    }

    /// Execute an action as this entity.
    ///
    /// # Errors
    ///
    /// Returns the client's error unchanged.
    pub async fn execute(
        &self,
        action: &str,
        params: ActionParams,
    ) -> Result<ActionOutput, ClientError> {
        self.api.execute_action(&self.id, action, params).await
    }
}
