use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::auth::jwt::verify;
use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i64,
    pub username: String,
}

/// Missing or unparsable credentials are 401; a token that is present but
/// fails verification is 403. The split is part of the existing contract.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::AuthRequired)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .filter(|t| !t.is_empty())
        .ok_or(AppError::AuthRequired)?;

    let claims = verify(token, &state.config)?;

    req.extensions_mut().insert(AuthUser {
        id: claims.user_id,
        username: claims.username,
    });
    Ok(next.run(req).await)
}
