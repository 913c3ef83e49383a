//! Stockpile is a small multi-user inventory tracker.
//!
//! Accounts authenticate with a password, receive a signed session cookie
//! and manage their own inventory items.

#[forbid(unsafe_code)]
#[deny(missing_docs, unused_mut)]
mod crypto;
pub mod config;
mod database;
pub mod error;
mod inventory;
mod middleware;
mod model;
mod router;
mod session;
pub mod telemetry;
mod user;
mod validation;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::http::{Method, StatusCode, header};
use axum::routing::{get, post};
use axum::{Router, middleware as AxumMiddleware};
use error::ServerError;
use session::store::MemorySessionStore;
use tower::ServiceBuilder;
use tower_http::LatencyUnit;
use tower_http::cors::{Any, CorsLayer};
use tower_http::sensitive_headers::SetSensitiveHeadersLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{
    DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer,
};
use tower_sessions::cookie::Key;
use tower_sessions::{Expiry, SessionManagerLayer};

/// MUST NEVER be used in production.
#[cfg(test)]
pub async fn make_request(
    app: Router,
    method: Method,
    path: &str,
    cookie: Option<&str>,
    body: String,
) -> axum::http::Response<axum::body::Body> {
    use axum::extract::Request;
    use tower::util::ServiceExt;

    let mut request = Request::builder()
        .method(method)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        request = request.header(header::COOKIE, cookie);
    }

    app.oneshot(request.body(axum::body::Body::from(body)).unwrap())
        .await
        .unwrap()
}

/// Collect a response body as JSON.
#[cfg(test)]
pub async fn read_json(
    response: axum::http::Response<axum::body::Body>,
) -> serde_json::Value {
    use http_body_util::BodyExt;

    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

/// `name=value` pair of the cookie set by a response, if any.
#[cfg(test)]
pub fn session_cookie(
    response: &axum::http::Response<axum::body::Body>,
) -> Option<String> {
    let value = response.headers().get(header::SET_COOKIE)?.to_str().ok()?;
    value.split(';').next().map(str::to_owned)
}

/// State sharing between routes.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<config::Configuration>,
    pub accounts: user::AccountService,
    pub inventory: inventory::InventoryService,
    pub sessions: MemorySessionStore,
    pub session_key: Key,
}

/// Create router.
pub fn app(state: AppState) -> Router {
    let middleware = ServiceBuilder::new()
        // Add high level tracing/logging to all requests.
        .layer(
            TraceLayer::new_for_http()
                .on_body_chunk(|chunk: &Bytes, latency: Duration, _span: &tracing::Span| {
                    tracing::trace!(size_bytes = chunk.len(), latency = ?latency, "sending body chunk")
                })
                .make_span_with(DefaultMakeSpan::new().include_headers(true).level(tracing::Level::INFO))
                .on_request(DefaultOnRequest::new())
                .on_response(DefaultOnResponse::new().include_headers(true).latency_unit(LatencyUnit::Micros)),
        )
        // Set a timeout.
        .layer(TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, Duration::from_secs(10)))
        // Remove session cookies from trace.
        .layer(SetSensitiveHeadersLayer::new([header::AUTHORIZATION, header::COOKIE, header::SET_COOKIE]))
        // Add CORS preflight support.
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
                .allow_headers(Any),
        );

    let cookie = &state.config.session;
    let sessions = SessionManagerLayer::new(state.sessions.clone())
        .with_name(cookie.cookie_name.clone())
        .with_secure(cookie.secure)
        .with_http_only(true)
        // Every answered request moves the idle deadline forward.
        .with_always_save(true)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            cookie.idle_timeout.into(),
        )))
        .with_signed(state.session_key.clone());

    Router::new()
        // `GET /status.json` goes to `status`.
        .route("/status.json", get(router::status::status))
        // `POST /register` goes to `register`.
        .route("/register", post(router::register::handler))
        // `POST /login` goes to `login`.
        .route("/login", post(router::login::handler))
        // `POST /logout` goes to `logout`.
        .route("/logout", post(router::logout::handler))
        .merge(router::inventory::router())
        .fallback(router::not_found)
        .with_state(state)
        .layer(sessions)
        .route_layer(AxumMiddleware::from_fn(telemetry::track))
        .layer(middleware)
}

/// Initialize the application state.
pub async fn initialize_state() -> Result<AppState, Box<dyn std::error::Error>>
{
    // read configuration file. let it in memory.
    let mut config = config::Configuration::default();
    if let Ok(path) = std::env::var("CONFIG_PATH") {
        config = config.path(PathBuf::from(path));
    }
    let config = config.read();

    let db = database::Database::new(config.postgres.as_ref()).await?;

    // execute migrations scripts on start.
    db.migrate().await?;

    let pwd = crypto::PasswordManager::new(config.argon2.clone())?;

    let session_key = match std::env::var("KEY") {
        Ok(key) => crypto::session_key(Some(key.as_bytes())),
        Err(_) => {
            tracing::warn!(
                "missing `KEY` environnement variable, sessions will not survive a restart"
            );
            crypto::session_key(None)
        },
    };

    // evict expired sessions in background.
    let sessions = MemorySessionStore::default();
    tokio::spawn(session::store::delete_expired_every(
        sessions.clone(),
        Duration::from_secs(config.session.cleanup_interval.max(1)),
    ));

    Ok(AppState {
        config,
        accounts: user::AccountService::new(
            Arc::new(user::PgUserRepository::new(db.postgres.clone())),
            pwd,
        ),
        inventory: inventory::InventoryService::new(Arc::new(
            inventory::PgInventoryRepository::new(db.postgres),
        )),
        sessions,
        session_key,
    })
}
