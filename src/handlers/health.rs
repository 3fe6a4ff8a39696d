use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;

use crate::dto::HealthResponse;
use crate::store::Datastore;
use crate::AppState;

/// Liveness + dependency report. The Gemini check is configuration-only; no
/// API call is made on the health path.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database = match state.store.ping().await {
        Ok(()) => "connected",
        Err(e) => {
            tracing::error!(error = %e, "Health check: database unreachable");
            "disconnected"
        }
    };

    let gemini = if state.config.gemini_api_key.is_some() {
        "configured"
    } else {
        "not_configured"
    };

    let healthy = database == "connected" && gemini == "configured";
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(HealthResponse {
            status: if healthy { "healthy" } else { "unhealthy" }.into(),
            timestamp: Utc::now().to_rfc3339(),
            database: database.into(),
            gemini: gemini.into(),
        }),
    )
}
