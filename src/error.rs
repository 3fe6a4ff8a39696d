use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use once_cell::sync::OnceCell;
use serde_json::json;

/// Set once at startup. Error responses attach the underlying failure detail
/// only when this is true; production responses never leak internals.
static DEVELOPMENT_MODE: OnceCell<bool> = OnceCell::new();

pub fn set_development_mode(enabled: bool) {
    let _ = DEVELOPMENT_MODE.set(enabled);
}

fn development_mode() -> bool {
    DEVELOPMENT_MODE.get().copied().unwrap_or(false)
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    DuplicateIdentity(String),

    #[error("Authentication required")]
    AuthRequired,

    #[error("Invalid or expired token")]
    AuthInvalid,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    NotConfigured(String),

    #[error("API quota exceeded. Please check your Gemini API account billing.")]
    QuotaExceeded(String),

    #[error("Too many requests, please try again in a moment.")]
    RateLimited(String),

    #[error("Invalid API key. Please check your Gemini API key configuration.")]
    UpstreamAuth(String),

    #[error("Network error connecting to Gemini API. Please check your internet connection.")]
    UpstreamUnavailable(String),

    #[error("Unable to connect to AI service. Please try again.")]
    Upstream(String),

    #[error("Database operation failed")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::DuplicateIdentity(_) => StatusCode::BAD_REQUEST,
            AppError::AuthRequired
            | AppError::InvalidCredentials
            | AppError::UpstreamAuth(_) => StatusCode::UNAUTHORIZED,
            AppError::AuthInvalid => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::QuotaExceeded(_) | AppError::RateLimited(_) => {
                StatusCode::TOO_MANY_REQUESTS
            }
            AppError::UpstreamUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::NotConfigured(_)
            | AppError::Upstream(_)
            | AppError::Database(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The raw underlying message, surfaced as `details` in development mode.
    fn detail(&self) -> Option<String> {
        match self {
            AppError::QuotaExceeded(raw)
            | AppError::RateLimited(raw)
            | AppError::UpstreamAuth(raw)
            | AppError::UpstreamUnavailable(raw)
            | AppError::Upstream(raw) => Some(raw.clone()),
            AppError::Database(e) => Some(e.to_string()),
            AppError::Internal(e) => Some(e.to_string()),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match &self {
            AppError::NotFound(msg) => msg.clone(),
            AppError::Database(e) => {
                tracing::error!(error = %e, "Database error");
                self.to_string()
            }
            AppError::Internal(e) => {
                tracing::error!(error = %e, "Internal error");
                self.to_string()
            }
            AppError::Upstream(raw) if development_mode() => format!("API Error: {raw}"),
            _ => self.to_string(),
        };

        let mut body = json!({
            "success": false,
            "error": message,
        });

        if development_mode() {
            if let Some(detail) = self.detail() {
                body["details"] = json!(detail);
            }
        }

        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
