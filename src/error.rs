//! Error handler for stockpile.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use sqlx::Error as SQLxError;
use thiserror::Error;
use validator::ValidationErrors;

pub type Result<T> = std::result::Result<T, ServerError>;

const INTERNAL_SERVER_ERROR: &str = "Internal server error";

/// Enum representing server-side errors.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("{}", first_message(.0))]
    Validation(#[from] ValidationErrors),

    #[error("{}", .0.body_text())]
    Json(#[from] JsonRejection),

    #[error("Not found")]
    Path(#[from] PathRejection),

    #[error("Not found")]
    NotFound,

    #[error("Unauthorized access")]
    Unauthorized,

    /// Same message whether the username exists or not.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Username or email already exists.")]
    Conflict,

    #[error("SQL request failed: {0}")]
    Sql(#[from] SQLxError),

    #[error("session store failed: {0}")]
    Session(#[from] tower_sessions::session::Error),

    #[error("internal server error, {details}")]
    Internal {
        details: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl ServerError {
    /// Wrap an unexpected failure.
    pub fn internal<E>(details: impl Into<String>, err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Internal {
            details: details.into(),
            source: Some(Box::new(err)),
        }
    }

    /// HTTP status code matching the error kind.
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::Validation(_) | ServerError::Json(_) => {
                StatusCode::BAD_REQUEST
            },
            ServerError::Path(_) | ServerError::NotFound => {
                StatusCode::NOT_FOUND
            },
            ServerError::Unauthorized | ServerError::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            },
            ServerError::Conflict => StatusCode::CONFLICT,
            ServerError::Sql(_)
            | ServerError::Session(_)
            | ServerError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            },
        }
    }
}

/// Only the first failing rule is ever reported.
fn first_message(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .into_values()
        .flat_map(|issues| issues.iter())
        .find_map(|issue| issue.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Invalid request.".to_owned())
}

/// Body of every error response.
#[derive(Debug, Serialize)]
pub struct ResponseError {
    error: String,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();

        let error = if status == StatusCode::INTERNAL_SERVER_ERROR {
            match &self {
                ServerError::Internal { details, source } => {
                    tracing::error!(err = ?source, %details, "server returned 500 status")
                },
                err => tracing::error!(error = %err, "server returned 500 status"),
            }

            INTERNAL_SERVER_ERROR.to_owned()
        } else {
            self.to_string()
        };

        match serde_json::to_string(&ResponseError { error }) {
            Ok(body) => Response::builder()
                .status(status)
                .header(header::CONTENT_TYPE, "application/json")
                .body(body.into())
                .unwrap_or_else(|_| internal_server_error()),
            Err(_) => internal_server_error(),
        }
    }
}

fn internal_server_error() -> Response {
    Response::builder()
        .status(StatusCode::INTERNAL_SERVER_ERROR)
        .header(header::CONTENT_TYPE, "application/json")
        .body(
            serde_json::json!({ "error": INTERNAL_SERVER_ERROR })
                .to_string()
                .into(),
        )
        .unwrap_or_else(|_| Response::new(INTERNAL_SERVER_ERROR.into()))
}
