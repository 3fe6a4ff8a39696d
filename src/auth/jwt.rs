use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{AppError, AppResult};

/// Session token payload. Stateless: nothing is persisted server-side and
/// there is no revocation list; expiry is the only termination mechanism.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: i64,
    pub username: String,
    pub iat: i64,
    pub exp: i64,
}

pub fn issue(user_id: i64, username: &str, config: &Config) -> AppResult<String> {
    let now = Utc::now();
    let claims = Claims {
        user_id,
        username: username.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::seconds(config.jwt_ttl_secs)).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to create session token: {}", e)))
}

/// A tampered signature and an expired token fail identically; the caller
/// must not be able to tell which check rejected the token.
pub fn verify(token: &str, config: &Config) -> AppResult<Claims> {
    let mut validation = Validation::default();
    validation.validate_exp = true;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::AuthInvalid)
}
