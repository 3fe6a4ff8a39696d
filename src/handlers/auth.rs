use axum::{
    extract::{Query, State},
    response::Redirect,
    Json,
};
use url::Url;
use validator::Validate;

use crate::auth::jwt;
use crate::auth::password::{hash_password, verify_password};
use crate::config::Config;
use crate::dto::{AuthResponse, CallbackQuery, LoginRequest, OAuthConfigResponse, SignupRequest};
use crate::error::{AppError, AppResult};
use crate::models::user::AuthProvider;
use crate::services::oauth;
use crate::store::UserStore;
use crate::AppState;

pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> AppResult<Json<AuthResponse>> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let password_hash = hash_password(&body.password)?;

    let user_id = state
        .store
        .create_user(
            &body.username,
            &body.email,
            Some(&password_hash),
            AuthProvider::Local,
        )
        .await?;

    let token = jwt::issue(user_id, &body.username, &state.config)?;

    Ok(Json(AuthResponse {
        success: true,
        token,
        user_id,
        username: body.username,
    }))
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    // Username lookup first; fall back to email only when no row matched.
    let user = match state.store.find_by_username(&body.username).await? {
        Some(user) => user,
        None => state
            .store
            .find_by_email(&body.username)
            .await?
            .ok_or(AppError::InvalidCredentials)?,
    };

    // OAuth-only accounts carry no usable hash and can never log in here.
    let hash = user
        .usable_password_hash()
        .ok_or(AppError::InvalidCredentials)?;

    if !verify_password(&body.password, hash)? {
        return Err(AppError::InvalidCredentials);
    }

    let token = jwt::issue(user.id, &user.username, &state.config)?;

    Ok(Json(AuthResponse {
        success: true,
        token,
        user_id: user.id,
        username: user.username,
    }))
}

/// OAuth bootstrap for the browser: which provider project to talk to.
pub async fn oauth_config(
    State(state): State<AppState>,
) -> AppResult<Json<OAuthConfigResponse>> {
    match (&state.config.supabase_url, &state.config.supabase_anon_key) {
        (Some(url), Some(key)) => Ok(Json(OAuthConfigResponse {
            success: true,
            supabase_url: url.clone(),
            supabase_anon_key: key.clone(),
        })),
        _ => Err(AppError::NotConfigured(
            "OAuth provider is not configured".into(),
        )),
    }
}

/// Provider redirect target. Every outcome is a redirect back into the
/// frontend: success appends the session token, failure appends an error
/// code the login page can render.
pub async fn oauth_callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> Redirect {
    if let Some(provider_error) = query.error {
        tracing::warn!(error = %provider_error, "OAuth provider returned an error");
        return login_redirect(&state.config, "oauth_failed");
    }

    let Some(code) = query.code.filter(|c| !c.is_empty()) else {
        return login_redirect(&state.config, "missing_code");
    };

    match complete_callback(&state, &code).await {
        Ok(target) => Redirect::to(target.as_str()),
        Err(e) => {
            tracing::warn!(error = %e, "OAuth callback failed");
            login_redirect(&state.config, "oauth_failed")
        }
    }
}

async fn complete_callback(state: &AppState, code: &str) -> anyhow::Result<Url> {
    let identity = oauth::exchange_code(&state.config, code).await?;
    let user = oauth::reconcile_oauth_identity(
        state.store.as_ref(),
        &identity.email,
        &identity.display_name,
    )
    .await?;

    let token = jwt::issue(user.id, &user.username, &state.config)?;

    let mut target = Url::parse(&state.config.frontend_url)?;
    target.set_path("/auth/success");
    target
        .query_pairs_mut()
        .append_pair("token", &token)
        .append_pair("userId", &user.id.to_string())
        .append_pair("username", &user.username);
    Ok(target)
}

fn login_redirect(config: &Config, error: &str) -> Redirect {
    let target = match Url::parse(&config.frontend_url) {
        Ok(mut url) => {
            url.set_path("/login");
            url.query_pairs_mut().append_pair("error", error);
            url.to_string()
        }
        Err(_) => format!("/login?error={error}"),
    };
    Redirect::to(&target)
}
