use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tower_sessions::Session;

use crate::AppState;
use crate::error::Result;
use crate::model::body::Item;
use crate::model::response::Message;
use crate::router::Payload;

/// Handler to add an item to the session's inventory.
pub async fn handler(
    State(state): State<AppState>,
    session: Session,
    Payload(body): Payload<Item>,
) -> Result<(StatusCode, Json<Message>)> {
    state.inventory.create(&session, body).await?;

    Ok((
        StatusCode::CREATED,
        Json(Message::new("Inventory item created successfully")),
    ))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use crate::router::inventory::tests::login;
    use crate::*;

    #[tokio::test]
    async fn test_create_handler() {
        let app = app(router::state());
        let cookie = login(app.clone(), "alice01", "a@x.com").await;

        let response = make_request(
            app,
            Method::POST,
            "/inventory",
            Some(&cookie),
            json!({ "item_name": "Widget", "quantity": 5, "price": 9.99 })
                .to_string(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            read_json(response).await,
            json!({ "message": "Inventory item created successfully" })
        );
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_items() {
        let app = app(router::state());
        let cookie = login(app.clone(), "alice01", "a@x.com").await;

        for (body, error) in [
            (
                json!({ "quantity": 5, "price": 1 }),
                "Item name must be a non-empty string.",
            ),
            (
                json!({
                    "item_name": "Widget",
                    "description": "d".repeat(501),
                    "quantity": 5,
                    "price": 1,
                }),
                "Description must not exceed 500 characters.",
            ),
            (
                json!({ "item_name": "Widget", "quantity": 1.5, "price": 1 }),
                "Quantity must be a non-negative integer.",
            ),
            (
                json!({ "item_name": "Widget", "quantity": 1, "price": -1 }),
                "Price must be a non-negative number.",
            ),
        ] {
            let response = make_request(
                app.clone(),
                Method::POST,
                "/inventory",
                Some(&cookie),
                body.to_string(),
            )
            .await;

            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(read_json(response).await, json!({ "error": error }));
        }
    }

    #[tokio::test]
    async fn test_create_rejects_malformed_json() {
        let app = app(router::state());
        let cookie = login(app.clone(), "alice01", "a@x.com").await;

        let response = make_request(
            app,
            Method::POST,
            "/inventory",
            Some(&cookie),
            "{\"item_name\":".to_owned(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
