use axum::{
    extract::{Path, State},
    Json,
};

use crate::dto::{CreatedResponse, ListResponse, LogMoodRequest, MessageResponse};
use crate::error::{AppError, AppResult};
use crate::models::mood::MoodEntry;
use crate::store::MoodStore;
use crate::AppState;

pub async fn list_moods(
    State(state): State<AppState>,
) -> AppResult<Json<ListResponse<MoodEntry>>> {
    let data = state.store.list_moods().await?;
    Ok(Json(ListResponse {
        success: true,
        data,
    }))
}

pub async fn log_mood(
    State(state): State<AppState>,
    Json(body): Json<LogMoodRequest>,
) -> AppResult<Json<CreatedResponse>> {
    let (mood, mood_value) = body.validated().map_err(AppError::Validation)?;

    let id = state.store.insert_mood(mood, mood_value).await?;

    Ok(Json(CreatedResponse {
        success: true,
        id,
        message: "Mood logged successfully".into(),
    }))
}

pub async fn delete_mood(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    // Parsed by hand so a malformed id is a 400 in the envelope, not a bare
    // path-rejection response.
    let id: i64 = id
        .parse()
        .map_err(|_| AppError::Validation("Valid mood ID is required".into()))?;

    if !state.store.delete_mood(id).await? {
        return Err(AppError::NotFound("Mood entry not found".into()));
    }

    Ok(Json(MessageResponse {
        success: true,
        message: "Mood deleted successfully".into(),
    }))
}
