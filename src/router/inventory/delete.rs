use axum::Json;
use axum::extract::State;
use tower_sessions::Session;

use crate::AppState;
use crate::error::Result;
use crate::model::response::Message;
use crate::router::Param;

/// Handler to remove an owned item.
pub async fn handler(
    State(state): State<AppState>,
    session: Session,
    Param(item_id): Param<i64>,
) -> Result<Json<Message>> {
    state.inventory.delete(&session, item_id).await?;

    Ok(Json(Message::new("Inventory item deleted successfully")))
}
