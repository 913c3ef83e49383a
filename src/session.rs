//! Session helpers binding an authenticated user to subsequent requests.
//!
//! A session is either anonymous or holds an [`Identity`]. Idle expiry is
//! enforced by the transport: once the idle timeout elapses the stored record
//! is gone and the session reads as anonymous.

pub mod store;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::error::{Result, ServerError};

pub(crate) const IDENTITY_KEY: &str = "identity";

/// Authenticated user bound to a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: i64,
    pub username: String,
}

/// Per-request view of the session state.
#[async_trait]
pub trait SessionContext: Send + Sync {
    /// Current identity, `None` when anonymous.
    async fn identity(&self) -> Result<Option<Identity>>;

    /// Move to the authenticated state.
    async fn authenticate(&self, identity: Identity) -> Result<()>;

    /// Drop every value held by the session.
    async fn clear(&self) -> Result<()>;

    /// Require an authenticated identity or fail with
    /// [`ServerError::Unauthorized`].
    async fn require_identity(&self) -> Result<Identity> {
        self.identity().await?.ok_or(ServerError::Unauthorized)
    }
}

#[async_trait]
impl SessionContext for Session {
    async fn identity(&self) -> Result<Option<Identity>> {
        Ok(self.get::<Identity>(IDENTITY_KEY).await?)
    }

    async fn authenticate(&self, identity: Identity) -> Result<()> {
        self.insert(IDENTITY_KEY, identity).await?;
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.flush().await?;
        Ok(())
    }
}
