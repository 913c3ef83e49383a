use axum::extract::State;
use axum::{Json, http::StatusCode};

use crate::AppState;
use crate::error::Result;
use crate::model::body::Register;
use crate::model::response::Message;
use crate::router::Payload;

/// Handler to create user.
pub async fn handler(
    State(state): State<AppState>,
    Payload(body): Payload<Register>,
) -> Result<(StatusCode, Json<Message>)> {
    state.accounts.register(body).await?;

    Ok((
        StatusCode::CREATED,
        Json(Message::new("User registered successfully")),
    ))
}
