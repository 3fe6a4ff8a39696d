use axum::{extract::State, Json};

use crate::dto::{ChatRequest, ChatResponse};
use crate::error::{AppError, AppResult};
use crate::services::gemini;
use crate::AppState;

/// Proxy one user message to the text-generation provider. No persistence
/// happens on this path, so no database connection is held across the
/// upstream call.
pub async fn chat(
    State(state): State<AppState>,
    Json(body): Json<ChatRequest>,
) -> AppResult<Json<ChatResponse>> {
    let message = body.message.as_deref().map(str::trim).unwrap_or_default();
    if message.is_empty() {
        return Err(AppError::Validation("Message is required".into()));
    }

    if state.config.gemini_api_key.is_none() {
        return Err(AppError::NotConfigured(
            "Gemini API key is not configured".into(),
        ));
    }

    tracing::debug!(chars = message.len(), "chat message received");

    let prompt = gemini::build_prompt(message);
    let reply = gemini::generate(&state.config, &prompt).await?;

    Ok(Json(ChatResponse {
        success: true,
        reply,
    }))
}
