//! Middlewares for routes.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use tower_sessions::Session;

use crate::ServerError;
use crate::error::Result;
use crate::session::SessionContext;

/// Refuse anonymous sessions before the handler parses the body.
pub async fn require_session(
    session: Session,
    req: Request,
    next: Next,
) -> Result<Response> {
    if session.identity().await?.is_none() {
        return Err(ServerError::Unauthorized);
    }

    Ok(next.run(req).await)
}
