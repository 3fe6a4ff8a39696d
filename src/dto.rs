//! # MindCare — Request/Response DTOs
//!
//! All API contract types in one module.
//!
//! Conventions:
//! - `*Request`  → deserialized from client JSON body or query params
//! - `*Response` → serialized to client JSON; every success body carries the
//!   `success: true` envelope flag, errors are rendered by `AppError`
//! - Field-level validation is expressed via `validator` derive macros;
//!   cross-field rules live in `impl` blocks below

use serde::{Deserialize, Serialize};
use validator::Validate;

// ============================================================================
// Common
// ============================================================================

/// List endpoints: `{success, data: [...]}`
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub success: bool,
    pub data: Vec<T>,
}

/// Create endpoints: `{success, id, message}`
#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub success: bool,
    pub id: i64,
    pub message: String,
}

/// Delete endpoints: `{success, message}`
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

// ============================================================================
// Auth
// ============================================================================

/// POST /api/auth/signup
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 3, max = 30, message = "Username must be 3-30 characters"))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    #[validate(length(max = 254, message = "Email too long"))]
    pub email: String,

    #[validate(length(min = 6, max = 128, message = "Password must be 6-128 characters"))]
    pub password: String,
}

/// POST /api/auth/login. `username` also accepts the account email.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response for signup and login
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub token: String,
    #[serde(rename = "userId")]
    pub user_id: i64,
    pub username: String,
}

/// GET /api/auth/config: OAuth bootstrap for the browser
#[derive(Debug, Serialize)]
pub struct OAuthConfigResponse {
    pub success: bool,
    #[serde(rename = "supabaseUrl")]
    pub supabase_url: String,
    #[serde(rename = "supabaseAnonKey")]
    pub supabase_anon_key: String,
}

/// GET /auth/callback query params
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub error: Option<String>,
}

// ============================================================================
// Moods
// ============================================================================

/// POST /api/moods. `mood_value` is accepted as raw JSON so a non-integer
/// fails validation (400) instead of body deserialization.
#[derive(Debug, Deserialize)]
pub struct LogMoodRequest {
    pub mood: Option<String>,
    pub mood_value: Option<serde_json::Value>,
}

impl LogMoodRequest {
    /// Returns the trimmed label and the validated 1-5 value.
    pub fn validated(&self) -> Result<(&str, i32), String> {
        let mood = self.mood.as_deref().map(str::trim).unwrap_or_default();
        let value = self.mood_value.as_ref().filter(|v| !v.is_null());

        if mood.is_empty() || value.is_none() {
            return Err("Mood and mood_value are required".into());
        }

        let value = value
            .and_then(|v| v.as_i64())
            .filter(|v| (1..=5).contains(v))
            .ok_or("mood_value must be an integer between 1 and 5")?;

        Ok((mood, value as i32))
    }
}

// ============================================================================
// Journal
// ============================================================================

/// POST /api/journal
#[derive(Debug, Deserialize)]
pub struct CreateJournalRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl CreateJournalRequest {
    /// `content` is required non-empty after trimming; a blank `title`
    /// defaults to "Untitled".
    pub fn validated(&self) -> Result<(String, &str), String> {
        let content = self.content.as_deref().map(str::trim).unwrap_or_default();
        if content.is_empty() {
            return Err("Journal content is required".into());
        }

        let title = match self.title.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => "Untitled".to_string(),
        };

        Ok((title, content))
    }
}

// ============================================================================
// Chat
// ============================================================================

/// POST /api/chat
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
}

/// `{success, reply}`
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub success: bool,
    pub reply: String,
}

// ============================================================================
// System
// ============================================================================

/// GET /health and GET /api/health
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "healthy" or "unhealthy"
    pub status: String,
    pub timestamp: String,
    /// "connected" or "disconnected"
    pub database: String,
    /// "configured" or "not_configured"
    pub gemini: String,
}
