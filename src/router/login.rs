use axum::Json;
use axum::extract::State;
use tower_sessions::Session;

use crate::AppState;
use crate::error::Result;
use crate::model::body::Login;
use crate::model::response::Message;
use crate::router::Payload;

/// Handler to open a session.
pub async fn handler(
    State(state): State<AppState>,
    session: Session,
    Payload(body): Payload<Login>,
) -> Result<Json<Message>> {
    state.accounts.login(&session, body).await?;

    Ok(Json(Message::new("Logged in successfully")))
}
