//! Inventory HTTP API. Every route requires a session.
mod create;
mod delete;
mod list;
mod update;

use axum::Router;
use axum::middleware;
use axum::routing::{get, put};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        // `GET /inventory` goes to `list`, `POST /inventory` to `create`.
        .route("/inventory", get(list::handler).post(create::handler))
        // `PUT /inventory/{id}` goes to `update`, `DELETE` to `delete`.
        .route(
            "/inventory/{item_id}",
            put(update::handler).delete(delete::handler),
        )
        .route_layer(middleware::from_fn(crate::middleware::require_session))
}
