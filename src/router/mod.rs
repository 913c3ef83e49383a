//! HTTP handlers.
pub mod inventory;
pub mod login;
pub mod logout;
pub mod register;
pub mod status;

use axum::extract::{FromRequest, FromRequestParts};

use crate::ServerError;

/// JSON body whose rejection is reported as `{"error": ...}`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ServerError))]
pub struct Payload<T>(pub T);

/// Path parameters; a mismatch is answered `404 Not Found`.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ServerError))]
pub struct Param<T>(pub T);

/// Fallback for unknown routes.
pub async fn not_found() -> ServerError {
    ServerError::NotFound
}

/// Application state backed by in-memory storage.
#[cfg(test)]
pub fn state() -> crate::AppState {
    use std::sync::Arc;

    use crate::inventory::InventoryService;
    use crate::inventory::memory::MemoryInventoryRepository;
    use crate::user::AccountService;
    use crate::user::memory::MemoryUserRepository;

    crate::AppState {
        config: Arc::new(crate::config::Configuration::default()),
        accounts: AccountService::new(
            Arc::new(MemoryUserRepository::default()),
            crate::crypto::fast_password_manager(),
        ),
        inventory: InventoryService::new(Arc::new(
            MemoryInventoryRepository::default(),
        )),
        sessions: crate::session::store::MemorySessionStore::default(),
        session_key: crate::crypto::session_key(None),
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use crate::*;

    #[tokio::test]
    async fn test_unknown_route() {
        let app = app(router::state());

        let response =
            make_request(app, Method::GET, "/nowhere", None, String::default())
                .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(read_json(response).await, json!({ "error": "Not found" }));
    }
}
