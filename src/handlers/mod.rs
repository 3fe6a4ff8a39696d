use axum::{http::StatusCode, Json};
use serde_json::{json, Value};

pub mod auth;
pub mod chat;
pub mod health;
pub mod journal;
pub mod moods;

/// Catch-all for unmatched `/api/*` paths; non-API paths fall through to the
/// static file service instead.
pub async fn api_not_found() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "success": false,
            "error": "API route not found",
        })),
    )
}
