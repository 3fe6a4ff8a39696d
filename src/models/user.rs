use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    /// Empty/NULL for OAuth-only accounts. Such a record can never pass
    /// password login.
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub auth_provider: AuthProvider,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// A usable hash exists only for locally-registered accounts.
    pub fn usable_password_hash(&self) -> Option<&str> {
        self.password_hash.as_deref().filter(|h| !h.is_empty())
    }
}

/// How the account was created. Stored as lowercase text so the same model
/// works against both backends.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    Local,
    Google,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oauth_account_has_no_usable_hash() {
        let user = User {
            id: 1,
            username: "carol".into(),
            email: "carol@example.com".into(),
            password_hash: Some(String::new()),
            auth_provider: AuthProvider::Google,
            created_at: Utc::now(),
        };
        assert!(user.usable_password_hash().is_none());

        let user = User {
            password_hash: None,
            ..user
        };
        assert!(user.usable_password_hash().is_none());
    }
}
