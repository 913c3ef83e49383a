use axum::Json;
use axum::extract::State;
use tower_sessions::Session;

use crate::AppState;
use crate::error::Result;
use crate::model::response::Message;

/// Handler to close the session. Always succeeds.
pub async fn handler(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Message>> {
    state.accounts.logout(&session).await?;

    Ok(Json(Message::new("Logged out successfully")))
}
