//! MindCare, a small wellness API: mood tracking, journaling, local +
//! Google OAuth authentication, and an AI chatbot proxy, plus the client
//! sync layer the browser frontend builds on.

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{any, delete, get, post},
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod client;
pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod store;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn store::Datastore>,
    pub config: Arc<config::Config>,
}

pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/api/auth/signup", post(handlers::auth::signup))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/config", get(handlers::auth::oauth_config))
        .route("/auth/callback", get(handlers::auth::oauth_callback))
        .route("/api/moods", get(handlers::moods::list_moods))
        .route("/api/moods", post(handlers::moods::log_mood))
        .route("/api/moods/:id", delete(handlers::moods::delete_mood))
        .route("/api/chat", post(handlers::chat::chat))
        .route("/health", get(handlers::health::health_check))
        .route("/api/health", get(handlers::health::health_check));

    let protected_routes = Router::new()
        .route("/api/journal", get(handlers::journal::list_entries))
        .route("/api/journal", post(handlers::journal::create_entry))
        .route("/api/journal/:id", delete(handlers::journal::delete_entry))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::middleware::require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        // Unmatched API paths get the JSON envelope; everything else falls
        // through to the static frontend.
        .route("/api/*path", any(handlers::api_not_found))
        .fallback_service(ServeDir::new("public"))
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(state)
}

/// Final process-wide safety net: a panicking handler becomes the generic
/// 500 envelope, never a dropped connection or a stack trace.
fn handle_panic(
    err: Box<dyn std::any::Any + Send + 'static>,
) -> axum::http::Response<http_body_util::Full<axum::body::Bytes>> {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic"
    };
    tracing::error!(panic = detail, "Unhandled panic in request handler");

    axum::http::Response::builder()
        .status(axum::http::StatusCode::INTERNAL_SERVER_ERROR)
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(http_body_util::Full::new(axum::body::Bytes::from_static(
            br#"{"success":false,"error":"Internal server error"}"#,
        )))
        .expect("static response must build")
}
