use axum::{
    extract::{Path, State},
    Extension, Json,
};

use crate::auth::middleware::AuthUser;
use crate::dto::{CreateJournalRequest, CreatedResponse, ListResponse, MessageResponse};
use crate::error::{AppError, AppResult};
use crate::models::journal::JournalEntry;
use crate::store::JournalStore;
use crate::AppState;

pub async fn list_entries(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<ListResponse<JournalEntry>>> {
    let data = state.store.list_entries(auth_user.id).await?;
    Ok(Json(ListResponse {
        success: true,
        data,
    }))
}

pub async fn create_entry(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<CreateJournalRequest>,
) -> AppResult<Json<CreatedResponse>> {
    let (title, content) = body.validated().map_err(AppError::Validation)?;

    let id = state
        .store
        .insert_entry(auth_user.id, &title, content)
        .await?;

    Ok(Json(CreatedResponse {
        success: true,
        id,
        message: "Journal entry saved successfully".into(),
    }))
}

pub async fn delete_entry(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let id: i64 = id
        .parse()
        .map_err(|_| AppError::Validation("Valid journal entry ID is required".into()))?;

    // Scoped by owner; an entry that exists but belongs to someone else is
    // indistinguishable from one that never existed.
    if !state.store.delete_entry(auth_user.id, id).await? {
        return Err(AppError::NotFound("Journal entry not found".into()));
    }

    Ok(Json(MessageResponse {
        success: true,
        message: "Journal entry deleted successfully".into(),
    }))
}
