use axum::Json;
use axum::extract::State;
use tower_sessions::Session;

use crate::AppState;
use crate::error::Result;
use crate::model::body::Item;
use crate::model::response::Message;
use crate::router::{Param, Payload};

/// Handler to replace an owned item.
pub async fn handler(
    State(state): State<AppState>,
    session: Session,
    Param(item_id): Param<i64>,
    Payload(body): Payload<Item>,
) -> Result<Json<Message>> {
    state.inventory.update(&session, item_id, body).await?;

    Ok(Json(Message::new("Inventory item updated successfully")))
}
