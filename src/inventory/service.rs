use std::sync::Arc;

use crate::error::Result;
use crate::inventory::{InventoryItem, InventoryRepository};
use crate::model::body::Item;
use crate::session::SessionContext;

/// Inventory use cases, always scoped to the session's user.
///
/// Every operation reads the session first: an anonymous session is refused
/// before the body is checked or storage is touched.
#[derive(Clone)]
pub struct InventoryService {
    repo: Arc<dyn InventoryRepository>,
}

impl InventoryService {
    /// Create a new [`InventoryService`].
    pub fn new(repo: Arc<dyn InventoryRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(
        &self,
        session: &dyn SessionContext,
        body: Item,
    ) -> Result<i64> {
        let identity = session.require_identity().await?;
        let fields = body.fields()?;

        let item_id = self.repo.insert(identity.user_id, &fields).await?;

        tracing::info!(user_id = identity.user_id, item_id, "item created");
        Ok(item_id)
    }

    pub async fn list(
        &self,
        session: &dyn SessionContext,
    ) -> Result<Vec<InventoryItem>> {
        let identity = session.require_identity().await?;
        self.repo.list_by_owner(identity.user_id).await
    }

    /// Update an owned item.
    ///
    /// An id that does not exist or belongs to someone else is not an error:
    /// nothing is written and the call still succeeds.
    pub async fn update(
        &self,
        session: &dyn SessionContext,
        item_id: i64,
        body: Item,
    ) -> Result<()> {
        let identity = session.require_identity().await?;
        let fields = body.fields()?;

        let rows_affected =
            self.repo.update(identity.user_id, item_id, &fields).await?;

        tracing::info!(
            user_id = identity.user_id,
            item_id,
            rows_affected,
            "item updated"
        );
        Ok(())
    }

    /// Delete an owned item. Same silent no-op as [`Self::update`].
    pub async fn delete(
        &self,
        session: &dyn SessionContext,
        item_id: i64,
    ) -> Result<()> {
        let identity = session.require_identity().await?;

        let rows_affected = self.repo.delete(identity.user_id, item_id).await?;

        tracing::info!(
            user_id = identity.user_id,
            item_id,
            rows_affected,
            "item deleted"
        );
        Ok(())
    }
}
