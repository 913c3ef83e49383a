use axum::Json;
use axum::extract::State;
use tower_sessions::Session;

use crate::AppState;
use crate::error::Result;
use crate::inventory::InventoryItem;

/// Handler returning the items owned by the session's user.
pub async fn handler(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Vec<InventoryItem>>> {
    Ok(Json(state.inventory.list(&session).await?))
}
